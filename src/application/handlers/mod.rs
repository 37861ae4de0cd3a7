//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod support;

pub use support::{
    ErrorKind, SupportRequestCommand, SupportRequestError, SupportRequestHandler,
    SupportRequestResult,
};
