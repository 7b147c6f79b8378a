//! SeaORM entity definitions for the Lions Club database schema.

pub mod prelude;

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
pub mod sea_orm_active_enums;
