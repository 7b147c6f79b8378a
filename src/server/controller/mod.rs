//! HTTP controller endpoints for the Lions Club API.
//!
//! Axum handlers extract and validate requests, enforce the admin session where required,
//! call into the service layer and shape JSON responses. Every handler carries a utoipa
//! annotation for the OpenAPI document.

pub mod admin;
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
pub mod system;
pub mod util;
pub mod webhook;
