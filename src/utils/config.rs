// Run configuration
// Everything is read once at startup and passed into the bootstrapper

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::discord::DISCORD_API_BASE;
use crate::models::schema::ServerSchema;
use crate::utils::env_file::DEFAULT_ENV_FILE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Couldn't find {key} in the environment variables. {hint}")]
    MissingVar { key: &'static str, hint: String },
    #[error("{key} has an invalid value {value:?}: expected {expected}")]
    InvalidVar {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read schema file {path}")]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse schema file {path}")]
    SchemaParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("help channel {0:?} is not one of the schema's channels")]
    HelpChannelNotListed(String),
}

/// Settings for one bootstrap run
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub guild_id: String,
    pub api_base: String,
    pub env_file: PathBuf,
    pub schema: ServerSchema,
    /// Fail the run when the community upgrade doesn't stick
    pub verify_community: bool,
    /// Write roles/channels/categories before touching webhooks
    pub checkpoint: bool,
}

// Keep the token out of logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("guild_id", &self.guild_id)
            .field("api_base", &self.api_base)
            .field("env_file", &self.env_file)
            .field("verify_community", &self.verify_community)
            .field("checkpoint", &self.checkpoint)
            .finish()
    }
}

impl Config {
    /// Build a config with defaults for everything but the credentials
    pub fn new(bot_token: impl Into<String>, guild_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            guild_id: guild_id.into(),
            api_base: DISCORD_API_BASE.to_string(),
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            schema: ServerSchema::default(),
            verify_community: false,
            checkpoint: true,
        }
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = required(&lookup, "BOT_TOKEN", "value_of_your_bot_token")?;
        let guild_id = required(&lookup, "GUILD_ID", "value_of_your_discord_server_id")?;
        if guild_id.parse::<u64>().is_err() {
            return Err(ConfigError::InvalidVar {
                key: "GUILD_ID",
                value: guild_id,
                expected: "a numeric server id",
            });
        }

        let mut config = Self::new(bot_token, guild_id);

        if let Some(base) = optional(&lookup, "DISCORD_API_BASE") {
            config.api_base = base;
        }
        if let Some(path) = optional(&lookup, "BOOTSTRAP_ENV_FILE") {
            config.env_file = PathBuf::from(path);
        }
        if let Some(path) = optional(&lookup, "BOOTSTRAP_SCHEMA") {
            config.schema = load_schema(PathBuf::from(path))?;
        }
        if let Some(value) = optional(&lookup, "BOOTSTRAP_VERIFY_COMMUNITY") {
            config.verify_community = parse_flag("BOOTSTRAP_VERIFY_COMMUNITY", value)?;
        }
        if let Some(value) = optional(&lookup, "BOOTSTRAP_CHECKPOINT") {
            config.checkpoint = parse_flag("BOOTSTRAP_CHECKPOINT", value)?;
        }

        Ok(config)
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn required<F>(lookup: &F, key: &'static str, placeholder: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, key) {
        Some(value) => Ok(value),
        None => {
            let err = ConfigError::MissingVar {
                key,
                hint: format!(
                    "Make sure to add it to the `.env` file likewise: `{key}={placeholder}`"
                ),
            };
            warn!("{}", err);
            Err(err)
        }
    }
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            key,
            value,
            expected: "a boolean",
        }),
    }
}

/// Read a schema JSON file and check it names its help channel
pub fn load_schema(path: PathBuf) -> Result<ServerSchema, ConfigError> {
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(source) => return Err(ConfigError::SchemaRead { path, source }),
    };
    let schema = match ServerSchema::from_json(&text) {
        Ok(schema) => schema,
        Err(source) => return Err(ConfigError::SchemaParse { path, source }),
    };

    if !schema.lists_help_channel() {
        return Err(ConfigError::HelpChannelNotListed(schema.help_channel));
    }

    info!(
        "Loaded schema from {} ({} roles, {} channels, {} categories, {} webhooks)",
        path.display(),
        schema.roles.len(),
        schema.channels.len(),
        schema.categories.len(),
        schema.webhooks.len()
    );
    Ok(schema)
}
