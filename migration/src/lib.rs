pub use sea_orm_migration::prelude::*;

mod m20250902_081500_create_reading_cursor_table;
mod m20250902_082000_create_subscriber_preference_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250902_081500_create_reading_cursor_table::Migration),
            Box::new(m20250902_082000_create_subscriber_preference_table::Migration),
        ]
    }
}
