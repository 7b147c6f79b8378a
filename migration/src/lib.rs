pub use sea_orm_migration::prelude::*;

mod m20250301_000001_member;
mod m20250301_000002_event;
mod m20250301_000003_registration;
mod m20250301_000004_checkin;
mod m20250301_000005_payment;
mod m20250301_000006_announcement;
mod m20250301_000007_message_log;
mod m20250301_000008_push_template;
mod m20250301_000009_push_record;
mod m20250301_000010_file;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_member::Migration),
            Box::new(m20250301_000002_event::Migration),
            Box::new(m20250301_000003_registration::Migration),
            Box::new(m20250301_000004_checkin::Migration),
            Box::new(m20250301_000005_payment::Migration),
            Box::new(m20250301_000006_announcement::Migration),
            Box::new(m20250301_000007_message_log::Migration),
            Box::new(m20250301_000008_push_template::Migration),
            Box::new(m20250301_000009_push_record::Migration),
            Box::new(m20250301_000010_file::Migration),
        ]
    }
}
