//! Lions Club membership, event check-in and LINE bot backend.

pub mod model;
pub mod server;
