//! Data access layer repositories.
//!
//! One repository per table. Repositories are generic over `ConnectionTrait` so the
//! same methods work on the pooled connection and inside a transaction.

pub mod announcement;
pub mod checkin;
pub mod event;
pub mod file;
pub mod member;
pub mod message_log;
pub mod payment;
pub mod push_record;
pub mod push_template;
pub mod registration;
