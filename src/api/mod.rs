// External API clients
pub mod discord;
