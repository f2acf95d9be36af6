//! Discord side-effect error handling.
//!
//! Feedback side effects (reactions, confirmation sends, deletions) are
//! best-effort: nothing downstream depends on them, so the only
//! decision left is the log level. Permission and not-found failures
//! are permanent and logged at warn; everything else is transient noise
//! at debug.

use serenity::http::HttpError;
use tracing::{debug, warn};

/// Result of classifying a failed Discord side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffectClass {
    /// The call can never succeed (missing permission, deleted target).
    Permanent,
    /// Likely fine on a later message.
    Transient,
}

/// Classify a serenity error for logging purposes.
pub fn classify(err: &serenity::Error) -> SideEffectClass {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => {
            match resp.status_code.as_u16() {
                401 | 403 | 404 => SideEffectClass::Permanent,
                _ => SideEffectClass::Transient,
            }
        }
        _ => SideEffectClass::Transient,
    }
}

/// Log a failed side effect at the level its class warrants.
pub fn log_side_effect(context: &str, message_id: u64, err: &serenity::Error) {
    match classify(err) {
        SideEffectClass::Permanent => {
            warn!(
                "{} failed for message {} (permanent): {}",
                context, message_id, err
            );
        }
        SideEffectClass::Transient => {
            debug!(
                "{} failed for message {} (transient): {}",
                context, message_id, err
            );
        }
    }
}
