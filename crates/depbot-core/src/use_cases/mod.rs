//! Use cases.

pub mod branches;
pub mod checks;
pub mod jobs;
pub mod lifecycle;
pub mod releases;
