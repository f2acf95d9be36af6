//! Per-message pipeline: classify → split → render → compose → submit →
//! report.
//!
//! Converts serenity messages into platform-independent snapshots and
//! drives each one through the same stages regardless of how it was
//! obtained (gateway event or poll window).

#[path = "bridge_tests.rs"]
mod bridge_tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use issue_github::IssueClient;
use issue_types::{
    compose_issue, render_attachments, split_content, Attachment, ChannelMessage, IntakePolicy,
    MessageAuthor,
};
use serenity::http::Http;
use serenity::model::channel::Message as SerenityMessage;
use serenity::model::channel::ReactionType;
use serenity::prelude::TypeMapKey;
use tracing::{debug, info, warn};

use crate::config::{Config, FeedbackMode};
use crate::feedback;

/// Discord → GitHub bridge, shared by both ingestion modes.
pub struct IssueBridge {
    github: IssueClient,
    intake: IntakePolicy,
    channel_id: u64,
    feedback_mode: FeedbackMode,
    include_attachments: bool,
    success_message: String,
    bot_user_id: AtomicU64,
}

impl TypeMapKey for IssueBridge {
    type Value = Arc<IssueBridge>;
}

impl IssueBridge {
    pub fn new(github: IssueClient, config: &Config) -> Self {
        Self {
            github,
            intake: IntakePolicy::new(config.discord.exclude_users.clone()),
            channel_id: config.discord.channel_id,
            feedback_mode: config.feedback.mode,
            include_attachments: config.feedback.include_attachments,
            success_message: config.feedback.success_message.clone(),
            bot_user_id: AtomicU64::new(0),
        }
    }

    /// Store the bot's own user ID (called from the ready handler, and
    /// by the poller after the identity lookup).
    pub fn set_bot_user_id(&self, id: u64) {
        self.bot_user_id.store(id, Ordering::Relaxed);
    }

    pub fn bot_user_id(&self) -> u64 {
        self.bot_user_id.load(Ordering::Relaxed)
    }

    /// Whether a message belongs to the watched channel.
    pub fn watches_channel(&self, channel_id: u64) -> bool {
        self.channel_id == channel_id
    }

    // ── Conversion helpers ─────────────────────────────────────────────────

    /// Snapshot a serenity message into the shape the pipeline operates
    /// on.
    pub fn convert_message(msg: &SerenityMessage, bot_user_id: u64) -> ChannelMessage {
        let attachments = msg
            .attachments
            .iter()
            .map(|a| Attachment {
                filename: a.filename.clone(),
                url: a.url.clone(),
            })
            .collect();

        // Unicode emoji this bot has already applied; custom emoji are
        // never used as outcome markers.
        let own_reactions = msg
            .reactions
            .iter()
            .filter(|r| r.me)
            .filter_map(|r| match &r.reaction_type {
                ReactionType::Unicode(s) => Some(s.clone()),
                _ => None,
            })
            .collect();

        // Bots can delete their own messages anywhere and, given Manage
        // Messages, other users' messages in guilds — never other
        // users' DMs.
        let deletable = msg.author.id.get() == bot_user_id || msg.guild_id.is_some();

        ChannelMessage {
            id: msg.id.get(),
            channel_id: msg.channel_id.get(),
            author: MessageAuthor {
                id: msg.author.id.get(),
                username: msg.author.name.clone(),
                discriminator: msg.author.discriminator.map(|d| d.get()),
                bot: msg.author.bot,
            },
            content: msg.content.clone(),
            attachments,
            own_reactions,
            deletable,
        }
    }

    // ── Pipeline ───────────────────────────────────────────────────────────

    /// Drive one message through the pipeline. Returns the created issue
    /// number when a submission succeeded. `marker_guard` is on in
    /// polling mode (see [`IntakePolicy::should_process`]).
    pub async fn process_message(
        &self,
        http: &Arc<Http>,
        message: &ChannelMessage,
        marker_guard: bool,
    ) -> Option<u64> {
        if !self.intake.should_process(message, marker_guard) {
            debug!(
                "Skipping message {} from {}",
                message.id, message.author.username
            );
            return None;
        }

        let split = split_content(&message.content);
        let markup = if self.include_attachments {
            render_attachments(&message.attachments)
        } else {
            String::new()
        };
        let draft = compose_issue(&split, &message.author.username, &markup);

        let outcome = self.github.create_issue(&draft).await;
        let issue_number = match &outcome {
            Ok(created) => {
                info!(
                    "Created issue #{} from message {} by {} ({})",
                    created.number,
                    message.id,
                    message.author.tag(),
                    message.author.id
                );
                Some(created.number)
            }
            Err(e) => {
                warn!("Issue creation failed for message {}: {}", message.id, e);
                None
            }
        };

        feedback::report(
            http,
            outcome.is_ok(),
            message,
            self.feedback_mode,
            &self.success_message,
        )
        .await;

        issue_number
    }
}
