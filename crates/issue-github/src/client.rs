//! GitHub issue creation over the REST v3 API.

use std::time::Duration;

use issue_types::IssueDraft;
use reqwest::header;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

const GITHUB_API_URL: &str = "https://api.github.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
// GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = concat!("issue-bridge/", env!("CARGO_PKG_VERSION"));

/// Every created issue carries this fixed label set.
const ISSUE_LABELS: &[&str] = &["bug"];

/// Longest error-body excerpt kept on a failure.
const ERROR_EXCERPT_LEN: usize = 200;

#[derive(Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    body: &'a str,
    labels: &'a [&'a str],
}

/// The created issue, as far as the bridge cares.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    pub number: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Client bound to one repository, holding the bearer credential.
pub struct IssueClient {
    http: HttpClient,
    base_url: String,
    token: String,
    owner: String,
    repo: String,
}

impl IssueClient {
    pub fn new(token: String, owner: String, repo: String) -> Result<Self> {
        Self::with_base_url(token, owner, repo, GITHUB_API_URL.to_string())
    }

    /// Like [`IssueClient::new`] with an explicit API base URL, so tests
    /// and GitHub Enterprise deployments can point elsewhere.
    pub fn with_base_url(
        token: String,
        owner: String,
        repo: String,
        base_url: String,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            owner,
            repo,
        })
    }

    /// Create one issue from the draft. Exactly one request is made: a
    /// non-2xx answer or a transport failure is returned as-is, never
    /// retried.
    pub async fn create_issue(&self, draft: &IssueDraft) -> Result<CreatedIssue> {
        let url = format!(
            "{}/repos/{}/{}/issues",
            self.base_url, self.owner, self.repo
        );
        let request = CreateIssueRequest {
            title: &draft.title,
            body: &draft.body,
            labels: ISSUE_LABELS,
        };

        debug!("Creating issue in {}/{}", self.owner, self.repo);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = excerpt(&response.text().await.unwrap_or_default());
            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreatedIssue = response.json().await?;
        debug!("Created issue #{}", created.number);
        Ok(created)
    }
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= ERROR_EXCERPT_LEN {
        body.to_string()
    } else {
        let mut cut: String = body.chars().take(ERROR_EXCERPT_LEN).collect();
        cut.push('…');
        cut
    }
}
