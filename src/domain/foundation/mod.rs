//! Shared domain primitives.

mod errors;
mod timestamp;

pub use errors::ValidationError;
pub use timestamp::Timestamp;
