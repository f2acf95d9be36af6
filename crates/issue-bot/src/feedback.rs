//! Outcome reporting back into the channel.
//!
//! Reaction mode marks the source message with the outcome emoji.
//! Confirm mode posts the configured success text, then removes both the
//! report and the confirmation after a delay, keeping short-lived report
//! channels clean.

use std::sync::Arc;
use std::time::Duration;

use issue_types::{ChannelMessage, FAILURE_MARKER, SUCCESS_MARKER};
use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::channel::ReactionType;
use serenity::model::id::{ChannelId, MessageId};
use tracing::debug;

use crate::config::FeedbackMode;
use crate::errors;

/// How long a confirmation stays visible before cleanup.
const CLEANUP_DELAY: Duration = Duration::from_secs(90);

/// Apply the visible outcome for one processed message. Side effects
/// are best-effort: failures are logged and never escalated.
pub async fn report(
    http: &Arc<Http>,
    success: bool,
    message: &ChannelMessage,
    mode: FeedbackMode,
    success_message: &str,
) {
    if !success {
        // Deletion is never attempted on failure, whatever the mode.
        react(http, message, FAILURE_MARKER).await;
        return;
    }

    match mode {
        FeedbackMode::Reaction => react(http, message, SUCCESS_MARKER).await,
        FeedbackMode::Confirm if message.deletable => {
            // The marker is the only duplicate guard a poll cycle has;
            // it must be on the message for the whole cleanup window,
            // not just until deletion.
            react(http, message, SUCCESS_MARKER).await;
            confirm_and_cleanup(http, message, success_message).await;
        }
        // The report itself cannot be removed, so a confirmation that
        // deletes itself later would leave it dangling; fall back to
        // the marker.
        FeedbackMode::Confirm => react(http, message, SUCCESS_MARKER).await,
    }
}

async fn react(http: &Http, message: &ChannelMessage, emoji: &str) {
    let reaction = ReactionType::Unicode(emoji.to_string());
    if let Err(e) = http
        .create_reaction(
            ChannelId::new(message.channel_id),
            MessageId::new(message.id),
            &reaction,
        )
        .await
    {
        errors::log_side_effect("Reaction", message.id, &e);
    }
}

async fn confirm_and_cleanup(http: &Arc<Http>, message: &ChannelMessage, text: &str) {
    let channel = ChannelId::new(message.channel_id);
    let confirmation = match channel
        .send_message(&**http, CreateMessage::new().content(text))
        .await
    {
        Ok(sent) => sent,
        Err(e) => {
            errors::log_side_effect("Confirmation send", message.id, &e);
            return;
        }
    };

    debug!(
        "Confirmation {} posted for message {}, cleanup in {:?}",
        confirmation.id, message.id, CLEANUP_DELAY
    );

    // Detached on purpose: the delay must not hold up other messages,
    // and a process exit mid-delay simply loses the cleanup.
    let http = Arc::clone(http);
    let report_id = MessageId::new(message.id);
    let confirmation_id = confirmation.id;
    tokio::spawn(async move {
        tokio::time::sleep(CLEANUP_DELAY).await;
        if let Err(e) = channel.delete_message(&*http, report_id).await {
            errors::log_side_effect("Report delete", report_id.get(), &e);
        }
        if let Err(e) = channel.delete_message(&*http, confirmation_id).await {
            errors::log_side_effect("Confirmation delete", confirmation_id.get(), &e);
        }
    });
}
