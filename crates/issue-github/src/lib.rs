//! # issue-github
//!
//! Minimal GitHub REST client for the bridge. One operation: create an
//! issue from a drafted title/body.
//!
//! ## How it works
//!
//! 1. `POST {api_url}/repos/{owner}/{repo}/issues` with a JSON payload
//!    `{title, body, labels: ["bug"]}` and a bearer token.
//! 2. A 2xx response yields the created issue's number.
//! 3. Anything else — non-2xx status or a transport failure — is an
//!    [`Error`]. The call is made exactly once; there is no retry, the
//!    caller reports the failure against the source message instead.

pub mod client;
pub mod error;

pub use client::{CreatedIssue, IssueClient};
pub use error::{Error, Result};
