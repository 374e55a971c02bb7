// Guild Bootstrap
// Provisions a Discord server and records its ids for the bot

pub mod api;
pub mod features;
pub mod models;
pub mod utils;

pub use api::discord::{ApiError, DiscordClient};
pub use features::bootstrap::{run, BootstrapError, BootstrapReport, HelpChannel};
pub use utils::config::{Config, ConfigError};
