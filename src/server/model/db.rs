//! Database model type aliases.
//!
//! Shorthands for the sea-orm models of the `entity` crate so services and
//! controllers don't spell out `entity::<table>::Model` everywhere.

/// Club member, optionally linked to a LINE account
pub type MemberModel = entity::member::Model;

/// Event with optional capacity
pub type EventModel = entity::event::Model;

/// A member's registration for an event
pub type RegistrationModel = entity::registration::Model;

pub type AnnouncementModel = entity::announcement::Model;

/// Metadata of an uploaded file
pub type FileModel = entity::file::Model;
