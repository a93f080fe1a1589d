mod errors;
mod interface;
mod retry;

pub use errors::{DatabaseError, Result};
pub use interface::DbService;
pub use retry::with_retries;
