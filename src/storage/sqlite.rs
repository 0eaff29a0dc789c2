use async_trait::async_trait;
use chrono::Utc;
use entities::{reading_cursor, subscriber_preference};
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait, sea_query::OnConflict};

use super::{CursorStore, PreferenceStore};
use crate::domain::models::{BatchSize, Position};

/// Cursor and preference tables in the application database.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CursorStore for SqliteStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get(&self, subscriber: &str) -> anyhow::Result<Option<Position>> {
        let row = reading_cursor::Entity::find_by_id(subscriber.to_string())
            .one(&self.db)
            .await?;
        Ok(row.and_then(|m| {
            let chapter = u32::try_from(m.chapter).ok()?;
            let verse = u32::try_from(m.verse).ok()?;
            Some(Position::new(m.book, chapter, verse))
        }))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn set(&self, subscriber: &str, position: &Position) -> anyhow::Result<()> {
        let row = reading_cursor::ActiveModel {
            subscriber_id: Set(subscriber.to_string()),
            book: Set(position.book.clone()),
            chapter: Set(i32::try_from(position.chapter)?),
            verse: Set(i32::try_from(position.verse)?),
            updated_at_ms: Set(Utc::now().timestamp_millis()),
        };
        reading_cursor::Entity::insert(row)
            .on_conflict(
                OnConflict::column(reading_cursor::Column::SubscriberId)
                    .update_columns([
                        reading_cursor::Column::Book,
                        reading_cursor::Column::Chapter,
                        reading_cursor::Column::Verse,
                        reading_cursor::Column::UpdatedAtMs,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for SqliteStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get(&self, subscriber: &str) -> anyhow::Result<Option<BatchSize>> {
        let row = subscriber_preference::Entity::find_by_id(subscriber.to_string())
            .one(&self.db)
            .await?;
        Ok(row.map(|m| BatchSize::clamped(i64::from(m.batch_size))))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn set(&self, subscriber: &str, size: BatchSize) -> anyhow::Result<()> {
        let row = subscriber_preference::ActiveModel {
            subscriber_id: Set(subscriber.to_string()),
            batch_size: Set(size.get() as i32),
            updated_at_ms: Set(Utc::now().timestamp_millis()),
        };
        subscriber_preference::Entity::insert(row)
            .on_conflict(
                OnConflict::column(subscriber_preference::Column::SubscriberId)
                    .update_columns([
                        subscriber_preference::Column::BatchSize,
                        subscriber_preference::Column::UpdatedAtMs,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        tracing::info!(%subscriber, %size, "updated batch size preference");
        Ok(())
    }
}
