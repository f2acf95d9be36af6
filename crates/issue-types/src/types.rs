//! Core domain types for the bridge

use serde::{Deserialize, Serialize};

/// Emoji applied to a message once its issue was created.
pub const SUCCESS_MARKER: &str = "✅";

/// Emoji applied to a message whose issue creation failed.
pub const FAILURE_MARKER: &str = "❌";

/// Author of a channel message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageAuthor {
    pub id: u64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<u16>,
    pub bot: bool,
}

impl MessageAuthor {
    /// `name#0042` tag, or the bare username for accounts without a
    /// discriminator.
    pub fn tag(&self) -> String {
        match self.discriminator {
            Some(d) => format!("{}#{:04}", self.username, d),
            None => self.username.clone(),
        }
    }
}

/// Message attachment, already hosted by the chat platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
}

/// Immutable snapshot of a channel message, taken once per gateway event
/// or poll cycle and read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelMessage {
    pub id: u64,
    pub channel_id: u64,
    pub author: MessageAuthor,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Unicode emoji the bot itself has already applied to this message.
    #[serde(default)]
    pub own_reactions: Vec<String>,
    /// Whether the bot is able to delete this message.
    pub deletable: bool,
}

/// Title and body of an issue, ready for submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
}
