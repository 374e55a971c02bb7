#![allow(dead_code)]

use std::path::PathBuf;

use httpmock::Method::GET;
use httpmock::{Mock, MockServer};
use serde_json::{json, Value};

use guild_bootstrap::models::schema::{FieldDescriptor, ServerSchema, WebhookDescriptor};
use guild_bootstrap::{Config, DiscordClient};

pub const GUILD_ID: &str = "123";
pub const TOKEN: &str = "x";

/// A file under the system temp dir, unique to this test binary and name
pub fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "guild-bootstrap-{}-{}.env",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

pub fn client(server: &MockServer) -> DiscordClient {
    DiscordClient::new(&server.base_url(), TOKEN).unwrap()
}

/// admins/helpers, meta/python_help/dev_log, logs, one dev_log webhook
pub fn small_schema() -> ServerSchema {
    ServerSchema {
        roles: vec![
            FieldDescriptor::named("admins"),
            FieldDescriptor::named("helpers"),
        ],
        channels: vec![
            FieldDescriptor::named("meta"),
            FieldDescriptor::named("python_help"),
            FieldDescriptor::named("dev_log"),
        ],
        categories: vec![FieldDescriptor::named("logs")],
        webhooks: vec![WebhookDescriptor::new("dev_log", "700")],
        help_channel: "python_help".to_string(),
    }
}

pub fn config(server: &MockServer, name: &str) -> Config {
    let mut config = Config::new(TOKEN, GUILD_ID);
    config.api_base = server.base_url();
    config.env_file = temp_path(name);
    config.schema = small_schema();
    config
}

pub async fn mock_get<'a>(server: &'a MockServer, path: &str, body: Value) -> Mock<'a> {
    let path = path.to_string();
    server
        .mock_async(move |when, then| {
            when.method(GET)
                .path(path.as_str())
                .header("authorization", "Bot x");
            then.status(200).json_body(body);
        })
        .await
}

pub async fn mock_guild(server: &MockServer, community: bool) -> Mock<'_> {
    let features: Vec<&str> = if community { vec!["COMMUNITY"] } else { vec![] };
    mock_get(server, "/guilds/123", json!({ "id": GUILD_ID, "features": features })).await
}

pub async fn mock_roles(server: &MockServer) -> Mock<'_> {
    mock_get(
        server,
        "/guilds/123/roles",
        json!([
            { "id": "123", "name": "@everyone" },
            { "id": "555", "name": "Admins" }
        ]),
    )
    .await
}

/// Listing with the help channel as the given type, or without it
pub async fn mock_channels(server: &MockServer, help_type: Option<u8>) -> Mock<'_> {
    let mut listing = vec![
        json!({ "id": "20", "name": "Logs", "type": 4 }),
        json!({ "id": "10", "name": "meta", "type": 0, "parent_id": null }),
        json!({ "id": "12", "name": "dev-log", "type": 0, "parent_id": "20" }),
        json!({ "id": "13", "name": "ot0-banana", "type": 0 }),
    ];
    if let Some(kind) = help_type {
        listing.push(json!({ "id": "11", "name": "python-help", "type": kind }));
    }
    mock_get(server, "/guilds/123/channels", Value::Array(listing)).await
}
