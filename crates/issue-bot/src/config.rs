//! Configuration management for issue-bot

#[path = "config_tests.rs"]
mod config_tests;

use std::env;
use std::fs;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_SUCCESS_MESSAGE: &str =
    "Your issue was successfully created. We will work on it asap.";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;
const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment access, injectable for tests.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// Delegates to `std::env`.
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    pub github: GithubConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

/// Where bug reports come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token from the Discord developer portal
    pub bot_token: String,
    /// The single channel watched for bug reports
    pub channel_id: u64,
    /// Authors whose messages are never converted
    #[serde(default)]
    pub exclude_users: Vec<u64>,
}

/// Where issues go
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    pub token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// How messages are obtained from the channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IngestMode {
    /// Gateway subscription; every message is delivered exactly once.
    #[default]
    Events,
    /// Periodic fetch of the channel's recent-message window.
    Poll,
}

impl IngestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestMode::Events => "events",
            IngestMode::Poll => "poll",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub mode: IngestMode,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            mode: IngestMode::default(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

/// How outcomes are reported back into the channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMode {
    /// Success or failure emoji on the source message.
    #[default]
    Reaction,
    /// Confirmation message, then delayed cleanup of both messages.
    Confirm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default)]
    pub mode: FeedbackMode,
    #[serde(default)]
    pub include_attachments: bool,
    #[serde(default = "default_success_message")]
    pub success_message: String,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            mode: FeedbackMode::default(),
            include_attachments: false,
            success_message: default_success_message(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_impl(&SystemEnv)
    }

    pub fn from_env_impl<E: ReadEnv>(env: &E) -> Result<Self> {
        let bot_token = env
            .var("DISCORD_BOT_TOKEN")
            .context("DISCORD_BOT_TOKEN not set")?;
        let channel_id = env
            .var("BRIDGE_CHANNEL_ID")
            .context("BRIDGE_CHANNEL_ID not set")?
            .parse()
            .context("BRIDGE_CHANNEL_ID is not a valid channel ID")?;
        let exclude_users = parse_id_list(&env.var("BRIDGE_EXCLUDE_USERS").unwrap_or_default());

        let owner = env.var("GITHUB_OWNER").context("GITHUB_OWNER not set")?;
        let repo = env.var("GITHUB_REPO").context("GITHUB_REPO not set")?;
        let token = env.var("GITHUB_TOKEN").context("GITHUB_TOKEN not set")?;
        let api_url = env.var("GITHUB_API_URL").unwrap_or_else(default_api_url);

        let mode = match env
            .var("BRIDGE_INGEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "poll" => IngestMode::Poll,
            _ => IngestMode::Events,
        };
        let poll_interval_secs = env
            .var("BRIDGE_POLL_INTERVAL_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        let feedback_mode = match env
            .var("BRIDGE_FEEDBACK_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "confirm" => FeedbackMode::Confirm,
            _ => FeedbackMode::Reaction,
        };
        let include_attachments = env
            .var("BRIDGE_INCLUDE_ATTACHMENTS")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);
        let success_message = env
            .var("BRIDGE_SUCCESS_MESSAGE")
            .unwrap_or_else(default_success_message);

        Ok(Config {
            discord: DiscordConfig {
                bot_token,
                channel_id,
                exclude_users,
            },
            github: GithubConfig {
                owner,
                repo,
                token,
                api_url,
            },
            ingest: IngestConfig {
                mode,
                poll_interval_secs,
            },
            feedback: FeedbackConfig {
                mode: feedback_mode,
                include_attachments,
                success_message,
            },
        })
    }

    /// Startup invariant: every required field is present, non-empty and
    /// not the literal string `"undefined"` (a classic artifact of
    /// templated deployments). Violations are fatal before any
    /// connection is opened.
    pub fn validate(&self) -> Result<()> {
        require("discord.bot_token", &self.discord.bot_token)?;
        if self.discord.channel_id == 0 {
            bail!("You must set discord.channel_id in the configuration");
        }
        require("github.owner", &self.github.owner)?;
        require("github.repo", &self.github.repo)?;
        require("github.token", &self.github.token)?;
        if self.ingest.mode == IngestMode::Poll && self.ingest.poll_interval_secs == 0 {
            bail!("ingest.poll_interval_secs must be at least 1");
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() || value == "undefined" {
        bail!("You must set {} in the configuration", field);
    }
    Ok(())
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_success_message() -> String {
    DEFAULT_SUCCESS_MESSAGE.to_string()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn parse_id_list(s: &str) -> Vec<u64> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .filter_map(|x| x.parse::<u64>().ok())
        .collect()
}
