//! Notifications module
//!
//! Provides:
//! - GitHub pull request comments

mod github;

pub use github::*;

use log::{info, warn};

use crate::coverage::CoverageSummary;
use crate::report::format_comment;

/// Post the coverage comment when a token and a pull request are available.
///
/// Missing context only skips the comment; errors are returned to the caller
/// so it can decide whether they matter.
pub async fn send_coverage_comment(
    summary: &CoverageSummary,
    project_name: &str,
    token: Option<&str>,
) -> anyhow::Result<bool> {
    let Some(token) = token else {
        warn!("report_coverage_comment is set but no GitHub token was given, skipping comment");
        return Ok(false);
    };

    let Some(target) = PullRequestTarget::from_env()? else {
        warn!("Not running for a pull request, skipping coverage comment");
        return Ok(false);
    };

    let body = format_comment(summary, project_name);
    post_pull_request_comment(&target, token, &body).await?;
    info!(
        "Posted coverage comment on {}#{}",
        target.repository, target.number
    );

    Ok(true)
}
