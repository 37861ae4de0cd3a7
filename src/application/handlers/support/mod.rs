//! Support Command Handlers
//!
//! ## Commands
//! - `SupportRequest` - Answer the latest customer turn of a conversation

mod handle_support_request;

pub use handle_support_request::{
    ErrorKind, SupportRequestCommand, SupportRequestError, SupportRequestHandler,
    SupportRequestResult,
};
