//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, errors)
//! - `support` - Query classification, prompt composition and response policy
//!
//! Nothing in this layer performs I/O; the model call lives behind
//! [`crate::ports::AIProvider`].

pub mod foundation;
pub mod support;
