//! Utility functions and helpers for server operations.
//!
//! CSV writing for exports and date/time helpers used by reports and diagnostics.

pub mod csv;
pub mod time;

#[cfg(test)]
pub mod test;
