use sea_orm_migration::prelude::*;

mod m20250301_000001_create_identity_tables;
mod m20250301_000002_create_lookup_tables;
mod m20250301_000003_create_work_requests_table;
mod m20250301_000004_create_request_assign_smagent_table;
mod m20250301_000005_create_work_request_media_table;
mod m20250301_000006_create_action_logs_table;
mod m20250301_000007_create_complaints_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_identity_tables::Migration),
            Box::new(m20250301_000002_create_lookup_tables::Migration),
            Box::new(m20250301_000003_create_work_requests_table::Migration),
            Box::new(m20250301_000004_create_request_assign_smagent_table::Migration),
            Box::new(m20250301_000005_create_work_request_media_table::Migration),
            Box::new(m20250301_000006_create_action_logs_table::Migration),
            Box::new(m20250301_000007_create_complaints_table::Migration),
        ]
    }
}
