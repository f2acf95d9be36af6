//! Intake policy: which channel messages become issues

use serde::{Deserialize, Serialize};

use crate::types::{ChannelMessage, FAILURE_MARKER, SUCCESS_MARKER};

/// Decides whether a channel message should be turned into an issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakePolicy {
    /// Author IDs whose messages are never converted.
    #[serde(default)]
    pub excluded_authors: Vec<u64>,
}

impl IntakePolicy {
    pub fn new(excluded_authors: Vec<u64>) -> Self {
        Self { excluded_authors }
    }

    /// Pure predicate over the message snapshot.
    ///
    /// `marker_guard` is enabled in polling mode, where the whole recent
    /// window is re-read every cycle: a message already carrying the
    /// bot's success or failure marker has been handled and must not be
    /// submitted again. The gateway delivers each message exactly once,
    /// so event mode runs with the guard off.
    pub fn should_process(&self, message: &ChannelMessage, marker_guard: bool) -> bool {
        if message.author.bot {
            return false;
        }
        if self.excluded_authors.contains(&message.author.id) {
            return false;
        }
        if marker_guard && Self::carries_marker(message) {
            return false;
        }
        true
    }

    fn carries_marker(message: &ChannelMessage) -> bool {
        message
            .own_reactions
            .iter()
            .any(|emoji| emoji == SUCCESS_MARKER || emoji == FAILURE_MARKER)
    }
}
