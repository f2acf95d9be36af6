//! Shared types for the channel-to-issue bridge

pub mod content;
pub mod policies;
pub mod types;

pub use content::{compose_issue, render_attachments, split_content, SplitContent};
pub use policies::IntakePolicy;
pub use types::*;
