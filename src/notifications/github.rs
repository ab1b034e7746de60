//! Pull request comments on GitHub

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::env;
use std::fs;

const DEFAULT_API_URL: &str = "https://api.github.com";

/// Where a comment should be posted
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestTarget {
    pub api_url: String,
    pub repository: String,
    pub number: u64,
}

impl PullRequestTarget {
    /// Resolve the target from the variables GitHub Actions sets.
    ///
    /// Returns `Ok(None)` when the run was not triggered by a pull request.
    pub fn from_env() -> Result<Option<Self>> {
        let repository = match env::var("GITHUB_REPOSITORY") {
            Ok(repo) if !repo.is_empty() => repo,
            _ => return Ok(None),
        };

        let event_path = match env::var("GITHUB_EVENT_PATH") {
            Ok(path) if !path.is_empty() => path,
            _ => return Ok(None),
        };

        let event = fs::read_to_string(&event_path)
            .with_context(|| format!("Failed to read GitHub event payload: {}", event_path))?;

        let Some(number) = pull_request_number(&event)? else {
            return Ok(None);
        };

        let api_url = env::var("GITHUB_API_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Some(Self {
            api_url,
            repository,
            number,
        }))
    }

    pub fn comments_url(&self) -> String {
        format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_url.trim_end_matches('/'),
            self.repository,
            self.number
        )
    }
}

/// Extract `pull_request.number` from a webhook event payload
pub fn pull_request_number(event_json: &str) -> Result<Option<u64>> {
    let event: Value =
        serde_json::from_str(event_json).context("GitHub event payload is not valid JSON")?;

    Ok(event
        .get("pull_request")
        .and_then(|pr| pr.get("number"))
        .and_then(Value::as_u64))
}

/// Post a comment with the given Markdown body
pub async fn post_pull_request_comment(
    target: &PullRequestTarget,
    token: &str,
    body: &str,
) -> Result<()> {
    let payload = json!({ "body": body });

    let client = reqwest::Client::new();
    let response = client
        .post(target.comments_url())
        .header("Authorization", format!("token {}", token))
        .header("User-Agent", "covgate")
        .header("Accept", "application/vnd.github.v3+json")
        .json(&payload)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        anyhow::bail!("GitHub comment failed: {} - {}", status, text);
    }

    Ok(())
}
