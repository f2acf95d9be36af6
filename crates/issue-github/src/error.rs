//! Error types for issue-github

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for issue submission
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub answered outside the 2xx class.
    #[error("GitHub returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never completed (connect, TLS, timeout, or an
    /// unreadable response body).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// HTTP status carried by the error, when GitHub answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}
