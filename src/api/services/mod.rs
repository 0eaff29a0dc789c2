pub mod health;
pub mod subscribers;
