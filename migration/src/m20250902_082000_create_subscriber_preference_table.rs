use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriberPreference::Table)
                    .if_not_exists()
                    .col(string(SubscriberPreference::SubscriberId).primary_key())
                    .col(integer(SubscriberPreference::BatchSize).default(1))
                    .col(big_integer(SubscriberPreference::UpdatedAtMs))
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubscriberPreference::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum SubscriberPreference {
    Table,
    SubscriberId,
    BatchSize,
    UpdatedAtMs,
}
