// Discord REST API client
// Thin wrapper around reqwest bound to one bot token

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::models::discord::{
    Channel, Guild, Role, Webhook, WebhookLookup, COMMUNITY_FEATURE, GUILD_FORUM_TYPE,
};
use crate::utils::names::{normalize_name, OffTopicCounter};

pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

const USER_AGENT: &str = concat!("DiscordBot (guild-bootstrap, ", env!("CARGO_PKG_VERSION"), ")");

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid bot token")]
    InvalidToken(#[from] InvalidHeaderValue),
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),
    #[error("{method} {path} failed")]
    Request {
        method: Method,
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
        body: String,
    },
    #[error("failed to decode response from {path}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Normalized name -> id
pub type NameMap = HashMap<String, String>;

/// Discord REST client
pub struct DiscordClient {
    client: Client,
    base_url: String,
}

impl DiscordClient {
    /// Create a client that sends `Authorization: Bot <token>` on every call
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bot {}", token))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(ApiError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request; any non-2xx status becomes `ApiError::Status`
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Response> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|source| ApiError::Request {
            method: method.clone(),
            path: path.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            method,
            path: path.to_string(),
            status,
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
        response.json().await.map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, None).await?;
        Self::decode(path, response).await
    }

    // ---- discovery ----

    pub async fn get_guild(&self, guild_id: &str) -> Result<Guild> {
        self.get(&format!("/guilds/{}", guild_id)).await
    }

    /// Whether the guild has the COMMUNITY feature
    pub async fn is_community_server(&self, guild_id: &str) -> Result<bool> {
        let guild = self.get_guild(guild_id).await?;
        Ok(guild.has_feature(COMMUNITY_FEATURE))
    }

    /// All roles in the guild, keyed by normalized name
    pub async fn get_all_roles(&self, guild_id: &str) -> Result<NameMap> {
        let roles: Vec<Role> = self.get(&format!("/guilds/{}/roles", guild_id)).await?;

        Ok(roles
            .into_iter()
            .map(|role| (normalize_name(&role.name), role.id))
            .collect())
    }

    /// All channels and categories in the guild, keyed by normalized name
    pub async fn get_all_channels_and_categories(
        &self,
        guild_id: &str,
    ) -> Result<(NameMap, NameMap)> {
        let listing: Vec<Channel> = self.get(&format!("/guilds/{}/channels", guild_id)).await?;

        let mut counter = OffTopicCounter::new();
        let mut channels = NameMap::new();
        let mut categories = NameMap::new();

        for channel in listing {
            let name = counter.key_for(&channel.name);
            if channel.is_category() {
                categories.insert(name, channel.id);
            } else {
                channels.insert(name, channel.id);
            }
        }

        Ok((channels, categories))
    }

    pub async fn get_channel(&self, channel_id: &str) -> Result<Channel> {
        self.get(&format!("/channels/{}", channel_id)).await
    }

    /// Whether the channel is a forum channel
    pub async fn is_forum_channel(&self, channel_id: &str) -> Result<bool> {
        Ok(self.get_channel(channel_id).await?.is_forum())
    }

    /// Look a webhook up by id; 404 is a result, not an error
    pub async fn find_webhook(&self, webhook_id: &str) -> Result<WebhookLookup> {
        match self.get::<Webhook>(&format!("/webhooks/{}", webhook_id)).await {
            Ok(webhook) => Ok(WebhookLookup::Found(webhook.id)),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => Ok(WebhookLookup::NotFound),
            Err(e) => Err(e),
        }
    }

    // ---- mutation ----

    /// Turn on the COMMUNITY feature; true when Discord accepted the change
    pub async fn upgrade_server_to_community(&self, guild_id: &str) -> Result<bool> {
        let payload = json!({ "features": [COMMUNITY_FEATURE] });
        let response = self
            .send(Method::PATCH, &format!("/guilds/{}", guild_id), Some(payload))
            .await?;
        Ok(response.status().is_success())
    }

    /// Create a forum channel, optionally under a category; returns its id
    pub async fn create_forum_channel(
        &self,
        guild_id: &str,
        name: &str,
        category_id: Option<&str>,
    ) -> Result<String> {
        let mut payload = json!({ "name": name, "type": GUILD_FORUM_TYPE });
        if let Some(parent) = category_id {
            payload["parent_id"] = json!(parent);
        }

        let path = format!("/guilds/{}/channels", guild_id);
        let response = self.send(Method::POST, &path, Some(payload)).await?;
        let channel: Channel = Self::decode(&path, response).await?;
        Ok(channel.id)
    }

    /// Delete a channel; returns Discord's copy of the deleted channel
    pub async fn delete_channel(&self, channel_id: &str) -> Result<Value> {
        let path = format!("/channels/{}", channel_id);
        let response = self.send(Method::DELETE, &path, None).await?;
        Self::decode(&path, response).await
    }

    /// Create a webhook in a channel; returns its id
    pub async fn create_webhook(&self, name: &str, channel_id: &str) -> Result<String> {
        let path = format!("/channels/{}/webhooks", channel_id);
        let response = self
            .send(Method::POST, &path, Some(json!({ "name": name })))
            .await?;
        let webhook: Webhook = Self::decode(&path, response).await?;
        Ok(webhook.id)
    }
}
