//! Discord channel → GitHub issue bridge.
//!
//! Watches a single configured channel and turns qualifying messages
//! into GitHub issues, reporting the outcome back into the channel with
//! a reaction or a timed confirmation message.

mod bridge;
mod config;
mod errors;
mod feedback;
mod handlers;
mod health;
mod poller;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bridge::IssueBridge;
use crate::config::{Config, IngestMode};
use crate::handlers::Handler;
use crate::health::AppState;

/// Issue bridge CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/issue-bot.toml")]
    config: String,

    /// Discord bot token (overrides config file)
    #[arg(long, env = "DISCORD_BOT_TOKEN")]
    bot_token: Option<String>,

    /// Channel to watch (overrides config file)
    #[arg(long, env = "BRIDGE_CHANNEL_ID")]
    channel_id: Option<u64>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3001")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "issue_bot=debug,issue_github=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting issue bridge");

    let args = Args::parse();

    // Load configuration
    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, loading from environment");
        Config::from_env()?
    };

    if let Some(bot_token) = args.bot_token {
        config.discord.bot_token = bot_token;
    }
    if let Some(channel_id) = args.channel_id {
        config.discord.channel_id = channel_id;
    }

    // Fatal before any connection is opened; names the offending field.
    config.validate()?;

    info!(
        "Watching channel {} for {}/{} ({} mode)",
        config.discord.channel_id,
        config.github.owner,
        config.github.repo,
        config.ingest.mode.as_str()
    );

    let github = issue_github::IssueClient::with_base_url(
        config.github.token.clone(),
        config.github.owner.clone(),
        config.github.repo.clone(),
        config.github.api_url.clone(),
    )?;

    let bridge = Arc::new(IssueBridge::new(github, &config));

    // Start health check server
    let health_state = AppState::new(config.ingest.mode);
    let health_for_server = health_state.clone();
    let health_port = args.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_for_server, health_port).await {
            error!("Health server error: {}", e);
        }
    });

    match config.ingest.mode {
        IngestMode::Events => run_gateway(config, bridge, health_state).await,
        IngestMode::Poll => poller::run(config, bridge, health_state).await,
    }
}

/// Event-driven mode: a gateway subscription delivers each message
/// exactly once.
async fn run_gateway(config: Config, bridge: Arc<IssueBridge>, health_state: AppState) -> Result<()> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord.bot_token, intents)
        .event_handler(Handler)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    // Insert bridge and health state into client data
    {
        let mut data = client.data.write().await;
        data.insert::<IssueBridge>(bridge);
        data.insert::<AppState>(health_state);
    }

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, stopping Discord client...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord gateway connection...");

    // Blocks until all shards are stopped.
    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {}", e))?;

    info!("Issue bridge stopped");
    Ok(())
}

pub(crate) async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.ok();
    }
}
