// Server bootstrapper
// Reconciles a live guild against the expected schema and writes .env.server

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::discord::{ApiError, DiscordClient, NameMap};
use crate::models::discord::WebhookLookup;
use crate::models::schema::{FieldDescriptor, ServerSchema};
use crate::utils::config::Config;
use crate::utils::env_file::EnvFile;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("no channel named {0:?} to hold its webhook")]
    MissingWebhookChannel(String),
    #[error("guild {0} still lacks the COMMUNITY feature after upgrading")]
    CommunityUpgradeFailed(String),
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BootstrapError>;

/// How the help forum was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpChannel {
    /// Already a forum channel
    Reused(String),
    /// Existed with the wrong type, deleted and created again
    Replaced { old_id: String, new_id: String },
    /// Did not exist
    Created(String),
}

impl HelpChannel {
    pub fn id(&self) -> &str {
        match self {
            HelpChannel::Reused(id) | HelpChannel::Created(id) => id,
            HelpChannel::Replaced { new_id, .. } => new_id,
        }
    }
}

/// What a run did
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub env_file: EnvFile,
    pub community_upgraded: bool,
    pub help_channel: HelpChannel,
    /// Names of webhooks that had to be created
    pub created_webhooks: Vec<String>,
    /// Expected names that were not found, as `prefix_name`
    pub missing: Vec<String>,
}

/// Run the whole bootstrap against the configured guild
pub async fn run(client: &DiscordClient, config: &Config) -> Result<BootstrapReport> {
    let guild_id = config.guild_id.as_str();
    let schema = &config.schema;
    let mut file = EnvFile::new();
    let mut missing = Vec::new();

    let all_roles = client.get_all_roles(guild_id).await?;
    file.section("Roles");
    emit_expected(&mut file, &mut missing, "roles", "role", &schema.roles, &all_roles);

    let (all_channels, all_categories) = client.get_all_channels_and_categories(guild_id).await?;

    let community_upgraded = ensure_community(client, config).await?;
    let help_channel = resolve_help_channel(client, guild_id, schema, &all_channels).await?;

    file.section("Channels");
    emit_expected(
        &mut file,
        &mut missing,
        "channels",
        "channel",
        &schema.channels,
        &all_channels,
    );
    // The resolved forum goes last so it wins over a replaced channel's id
    file.entry(format!("channels_{}", schema.help_channel), help_channel.id());

    file.section("Categories");
    emit_expected(
        &mut file,
        &mut missing,
        "categories",
        "category",
        &schema.categories,
        &all_categories,
    );

    if config.checkpoint {
        write(&file, config).await?;
        info!("Checkpoint written to {}", config.env_file.display());
    }

    file.section("Webhooks");
    let mut created_webhooks = Vec::new();
    for webhook in &schema.webhooks {
        let channel_id = all_channels
            .get(&webhook.name)
            .ok_or_else(|| BootstrapError::MissingWebhookChannel(webhook.name.clone()))?;

        let webhook_id = match client.find_webhook(&webhook.id).await? {
            WebhookLookup::Found(id) => id,
            WebhookLookup::NotFound => {
                let id = client.create_webhook(&webhook.name, channel_id).await?;
                info!("Created webhook {} ({}) in channel {}", webhook.name, id, channel_id);
                created_webhooks.push(webhook.name.clone());
                id
            }
        };

        file.entry(format!("webhooks_{}__id", webhook.name), webhook_id);
        file.entry(format!("webhooks_{}__channel", webhook.name), channel_id.as_str());
    }

    file.section("Emojis").entry("emojis_trashcan", "🗑️");

    write(&file, config).await?;
    info!(
        "Wrote {} entries to {} ({} expected objects missing)",
        file.len(),
        config.env_file.display(),
        missing.len()
    );

    Ok(BootstrapReport {
        env_file: file,
        community_upgraded,
        help_channel,
        created_webhooks,
        missing,
    })
}

/// Emit `prefix_name=id` for every expected name found on the server
fn emit_expected(
    file: &mut EnvFile,
    missing: &mut Vec<String>,
    prefix: &str,
    kind: &str,
    expected: &[FieldDescriptor],
    found: &NameMap,
) {
    for field in expected {
        match found.get(&field.name) {
            Some(id) => {
                file.entry(format!("{}_{}", prefix, field.name), id.as_str());
            }
            None => {
                match &field.default {
                    Some(default) => warn!(
                        "Couldn't find the {} {} in the guild, the default value {} will be used.",
                        kind, field.name, default
                    ),
                    None => warn!(
                        "Couldn't find the {} {} in the guild, the bot's default value will be used.",
                        kind, field.name
                    ),
                }
                missing.push(format!("{}_{}", prefix, field.name));
            }
        }
    }
}

/// Upgrade the guild to community if needed; true when an upgrade was sent
async fn ensure_community(client: &DiscordClient, config: &Config) -> Result<bool> {
    let guild_id = config.guild_id.as_str();
    if client.is_community_server(guild_id).await? {
        return Ok(false);
    }

    info!("Upgrading guild {} to a community server", guild_id);
    // Only verified when BOOTSTRAP_VERIFY_COMMUNITY is set
    let accepted = client.upgrade_server_to_community(guild_id).await?;
    if !config.verify_community {
        if !accepted {
            warn!("Community upgrade for guild {} was not accepted", guild_id);
        }
        return Ok(true);
    }

    if !accepted || !client.is_community_server(guild_id).await? {
        return Err(BootstrapError::CommunityUpgradeFailed(guild_id.to_string()));
    }
    Ok(true)
}

/// Make sure the help channel exists and is a forum channel
async fn resolve_help_channel(
    client: &DiscordClient,
    guild_id: &str,
    schema: &ServerSchema,
    channels: &NameMap,
) -> Result<HelpChannel> {
    let forum_name = schema.help_channel.replace('_', "-");

    let Some(existing) = channels.get(&schema.help_channel) else {
        let id = client.create_forum_channel(guild_id, &forum_name, None).await?;
        info!("Created help forum {} ({})", forum_name, id);
        return Ok(HelpChannel::Created(id));
    };

    if client.is_forum_channel(existing).await? {
        info!("Help channel {} is already a forum", existing);
        return Ok(HelpChannel::Reused(existing.clone()));
    }

    client.delete_channel(existing).await?;
    warn!("Deleted help channel {} because it was not a forum", existing);
    let id = client.create_forum_channel(guild_id, &forum_name, None).await?;
    info!("Created help forum {} ({})", forum_name, id);

    Ok(HelpChannel::Replaced {
        old_id: existing.clone(),
        new_id: id,
    })
}

async fn write(file: &EnvFile, config: &Config) -> Result<()> {
    file.write_to(&config.env_file)
        .await
        .map_err(|source| BootstrapError::Write {
            path: config.env_file.clone(),
            source,
        })
}
