pub mod advance;
pub mod mapping;
pub mod models;
