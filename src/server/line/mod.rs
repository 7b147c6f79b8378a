//! LINE platform integration.
//!
//! - [`signature`] verifies the `x-line-signature` header of webhook requests
//! - [`model`] holds webhook event payloads and Messaging API request/response bodies
//! - [`client`] is the Messaging API client used for replies, pushes and profile lookups

pub mod client;
pub mod model;
pub mod signature;

pub use client::LineClient;
