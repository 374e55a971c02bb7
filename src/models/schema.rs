// Expected server layout
// Roles, channels, categories and webhooks the bot reads from .env.server

use serde::{Deserialize, Deserializer};

/// Name of the help channel in the built-in schema
pub const DEFAULT_HELP_CHANNEL: &str = "python_help";

/// An expected role, channel or category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawField")]
pub struct FieldDescriptor {
    /// Normalized name, as produced by `utils::names::normalize_name`
    pub name: String,
    /// Id the consuming bot falls back to when the object is missing
    pub default: Option<String>,
}

impl FieldDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }
}

// Schema files may list bare names or full descriptors
#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl From<RawField> for FieldDescriptor {
    fn from(raw: RawField) -> Self {
        match raw {
            RawField::Name(name) => Self::named(name),
            RawField::Full { name, default } => Self { name, default },
        }
    }
}

/// An expected webhook and the id it had on the last run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookDescriptor {
    /// Also the name of the channel the webhook posts into
    pub name: String,
    #[serde(deserialize_with = "snowflake")]
    pub id: String,
}

impl WebhookDescriptor {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Accepts snowflakes written either as JSON strings or numbers
fn snowflake<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(u64),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Text(s) => s,
        Repr::Number(n) => n.to_string(),
    })
}

/// Everything the consuming bot expects to find on the server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSchema {
    #[serde(default)]
    pub roles: Vec<FieldDescriptor>,
    #[serde(default)]
    pub channels: Vec<FieldDescriptor>,
    #[serde(default)]
    pub categories: Vec<FieldDescriptor>,
    #[serde(default)]
    pub webhooks: Vec<WebhookDescriptor>,
    #[serde(default = "default_help_channel")]
    pub help_channel: String,
}

fn default_help_channel() -> String {
    DEFAULT_HELP_CHANNEL.to_string()
}

impl ServerSchema {
    /// Parse a schema from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Whether the designated help channel is one of the expected channels
    pub fn lists_help_channel(&self) -> bool {
        self.channels.iter().any(|c| c.name == self.help_channel)
    }
}

fn fields(names: &[&str]) -> Vec<FieldDescriptor> {
    names.iter().map(|n| FieldDescriptor::named(*n)).collect()
}

impl Default for ServerSchema {
    /// The layout a Python Discord style bot reads from `.env.server`
    fn default() -> Self {
        Self {
            roles: fields(&[
                "owners",
                "admins",
                "moderators",
                "mod_team",
                "helpers",
                "core_developers",
                "devops",
                "domain_leads",
                "project_leads",
                "events_lead",
                "contributors",
                "partners",
                "python_community",
                "voice_verified",
                "video",
                "announcements",
                "lovefest",
                "content_creators",
                "jammers",
                "patreon_tier_1",
                "patreon_tier_2",
                "patreon_tier_3",
            ]),
            channels: fields(&[
                "announcements",
                "changelog",
                "mailing_lists",
                "python_events",
                "python_news",
                "reddit",
                "dev_contrib",
                "dev_core",
                "dev_log",
                "meta",
                "python_general",
                DEFAULT_HELP_CHANNEL,
                "attachment_log",
                "filter_log",
                "message_log",
                "mod_log",
                "user_log",
                "voice_log",
                "off_topic_0",
                "off_topic_1",
                "off_topic_2",
                "bot_commands",
                "discord_bots",
                "esoteric",
                "voice_gate",
                "admins",
                "admin_spam",
                "mods",
                "mod_meta",
                "mod_spam",
                "mod_tools",
                "nominations",
                "nomination_voting",
                "organisation",
                "big_brother",
                "duck_pond",
                "incidents",
                "incidents_archive",
                "roles",
                "rules",
            ]),
            categories: fields(&["logs", "moderators", "modmail", "appeals", "voice"]),
            webhooks: vec![
                WebhookDescriptor::new("big_brother", "569133704568373283"),
                WebhookDescriptor::new("dev_log", "680501655111729222"),
                WebhookDescriptor::new("duck_pond", "637821475327311927"),
                WebhookDescriptor::new("incidents", "816650601844572212"),
                WebhookDescriptor::new("incidents_archive", "720671599790915702"),
                WebhookDescriptor::new("python_news", "704381182279942324"),
            ],
            help_channel: default_help_channel(),
        }
    }
}
