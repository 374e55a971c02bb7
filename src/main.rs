// Guild Bootstrap
// Sets up roles, channels and webhooks on a Discord server and writes .env.server

use std::env;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guild_bootstrap::{run, Config, DiscordClient, HelpChannel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG can live there too
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "guild_bootstrap=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    info!("Bootstrapping guild {}...", config.guild_id);

    let client = DiscordClient::new(&config.api_base, &config.bot_token)
        .context("failed to create Discord client")?;

    let report = run(&client, &config)
        .await
        .with_context(|| format!("failed to bootstrap guild {}", config.guild_id))?;

    if report.community_upgraded {
        info!("Guild was upgraded to a community server");
    }
    match &report.help_channel {
        HelpChannel::Reused(id) => info!("Help forum: {} (unchanged)", id),
        HelpChannel::Created(id) => info!("Help forum: {} (created)", id),
        HelpChannel::Replaced { old_id, new_id } => {
            info!("Help forum: {} (replaced {})", new_id, old_id)
        }
    }
    if !report.created_webhooks.is_empty() {
        info!("Created webhooks: {}", report.created_webhooks.join(", "));
    }

    info!("Done! Configuration written to {}", config.env_file.display());
    Ok(())
}
