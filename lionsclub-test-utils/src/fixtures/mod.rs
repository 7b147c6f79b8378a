//! Fixture helpers used during test execution.
//!
//! - `member` - member records with optional LINE link, role and status
//! - `event` - event records with optional capacity and status, plus registrations and check-ins
//! - `line` - mocked LINE Messaging API endpoints and webhook signing

pub mod event;
pub mod line;
pub mod member;
