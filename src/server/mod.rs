//! Server application core modules.
//!
//! This module contains the backend of the Lions Club application: HTTP routing, admin
//! sessions, database repositories, business services for members, events, registrations,
//! check-ins and push notifications, the LINE webhook and Messaging API integration, and
//! the cron scheduler publishing scheduled announcements.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod line;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
