//! Support Relay - Customer-support chat relay
//!
//! Screens customer queries with rule-based filters, forwards the rest to a
//! hosted language model, and post-processes the model's answer before it
//! reaches the customer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
