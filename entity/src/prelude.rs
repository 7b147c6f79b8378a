pub use super::announcement::Entity as Announcement;
pub use super::checkin::Entity as Checkin;
pub use super::event::Entity as Event;
pub use super::file::Entity as File;
pub use super::member::Entity as Member;
pub use super::message_log::Entity as MessageLog;
pub use super::payment::Entity as Payment;
pub use super::push_record::Entity as PushRecord;
pub use super::push_template::Entity as PushTemplate;
pub use super::registration::Entity as Registration;
