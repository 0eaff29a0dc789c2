use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReadingCursor::Table)
                    .if_not_exists()
                    .col(string(ReadingCursor::SubscriberId).primary_key())
                    .col(string(ReadingCursor::Book))
                    .col(integer(ReadingCursor::Chapter))
                    .col(integer(ReadingCursor::Verse))
                    .col(big_integer(ReadingCursor::UpdatedAtMs))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReadingCursor::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ReadingCursor {
    Table,
    SubscriberId,
    Book,
    Chapter,
    Verse,
    UpdatedAtMs,
}
