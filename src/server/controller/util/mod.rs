//! Helpers shared by controllers.
//!
//! Provides the admin session guard used by every administrative endpoint.

pub mod admin;
