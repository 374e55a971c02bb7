// Data models
pub mod discord;
pub mod schema;
