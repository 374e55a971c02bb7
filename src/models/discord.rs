// Discord REST payloads used by the bootstrapper
// Only the fields we read are modelled; everything else is ignored

use serde::Deserialize;

/// Guild feature flag that unlocks forum channels
pub const COMMUNITY_FEATURE: &str = "COMMUNITY";

/// Channel type code for a category
pub const GUILD_CATEGORY_TYPE: u8 = 4;

/// Channel type code for a forum channel
pub const GUILD_FORUM_TYPE: u8 = 15;

#[derive(Debug, Clone, Deserialize)]
pub struct Guild {
    #[serde(default)]
    pub features: Vec<String>,
}

impl Guild {
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

impl Channel {
    pub fn is_category(&self) -> bool {
        self.kind == GUILD_CATEGORY_TYPE
    }

    pub fn is_forum(&self) -> bool {
        self.kind == GUILD_FORUM_TYPE
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Webhook {
    pub id: String,
}

/// Outcome of looking a webhook up by a previously known id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookLookup {
    Found(String),
    NotFound,
}
