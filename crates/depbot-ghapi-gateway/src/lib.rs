//! Process-wide gateway to the hosting platform.

#![warn(clippy::all)]

mod gateway;
mod queue;
mod retry;

pub use gateway::GatewayApiService;
pub use queue::RequestQueue;
pub use retry::BoundedBackoff;
