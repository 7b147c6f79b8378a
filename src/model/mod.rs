//! Request and response DTOs shared by the HTTP API.

pub mod announcement;
pub mod api;
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
pub mod system;
