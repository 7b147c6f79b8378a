//! Service layer for business logic and orchestration.
//!
//! Services implement the club's rules on top of the repositories: member lookup, the
//! single check-in path shared by REST, LIFF and the LINE bot, registration capacity and
//! waitlist promotion, push fan-out with retries, announcement publishing, uploads,
//! reports, admin authentication and system diagnostics.

pub mod announcement;
pub mod auth;
pub mod checkin;
pub mod event;
pub mod file;
pub mod liff;
pub mod member;
pub mod payment;
pub mod push;
pub mod registration;
pub mod report;
pub mod retry;
pub mod system;
pub mod webhook;
