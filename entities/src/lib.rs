//! sea-orm entities for the delivery engine's persisted state.

pub mod reading_cursor;
pub mod subscriber_preference;

pub mod prelude {
    pub use super::reading_cursor::Entity as ReadingCursor;
    pub use super::subscriber_preference::Entity as SubscriberPreference;
}
