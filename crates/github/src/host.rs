use chrono::{DateTime, Utc};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{GitHubError, Result};
use crate::retry::with_retry;
use crate::traits::CodeHost;
use crate::types::{
    ChangeRequestSnapshot, ChangeRequestState, Comment, CommitSha, MergeStrategy, RepoSlug,
};

/// `CodeHost` backed by the `gh` CLI, using the user's local authentication.
///
/// Reads go through `gh api` REST endpoints because their numeric ids are
/// creation-ordered; the GraphQL node ids surfaced by `gh pr view` are not.
pub struct GhHost {
    repo: RepoSlug,
}

impl GhHost {
    pub fn new(repo: RepoSlug) -> Self {
        Self { repo }
    }

    /// Check if gh CLI is available and authenticated
    pub async fn is_available() -> bool {
        let output = Command::new("gh").args(["auth", "status"]).output().await;

        match output {
            Ok(o) => o.status.success(),
            Err(_) => false,
        }
    }

    async fn run_gh(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("gh").args(args).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let subcommand = args.first().copied().unwrap_or("gh");
            return Err(GitHubError::Command(format!(
                "gh {} failed: {}",
                subcommand,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn fetch_status(&self, number: u64) -> Result<ChangeRequestState> {
        let path = format!("repos/{}/pulls/{}", self.repo, number);
        let stdout = self.run_gh(&["api", &path]).await?;
        parse_status(&stdout)
    }

    async fn fetch_comments(&self, number: u64) -> Result<Vec<Comment>> {
        let path = format!("repos/{}/issues/{}/comments", self.repo, number);
        let stdout = self.run_gh(&["api", "--paginate", &path]).await?;
        parse_comments(&stdout)
    }

    async fn fetch_commits(&self, number: u64) -> Result<Vec<CommitSha>> {
        let path = format!("repos/{}/pulls/{}/commits", self.repo, number);
        let stdout = self.run_gh(&["api", "--paginate", &path]).await?;
        parse_commits(&stdout)
    }

    async fn comment_once(&self, number: u64, body: &str) -> Result<()> {
        let number_arg = number.to_string();
        let repo = self.repo.to_string();
        self.run_gh(&["pr", "comment", &number_arg, "--repo", &repo, "--body", body])
            .await?;
        Ok(())
    }

    async fn merge_once(&self, number: u64, strategy: MergeStrategy) -> Result<()> {
        let number_arg = number.to_string();
        let repo = self.repo.to_string();
        let strategy_flag = format!("--{}", strategy.as_str());
        self.run_gh(&["pr", "merge", &number_arg, "--repo", &repo, "--auto", &strategy_flag])
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CodeHost for GhHost {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn fetch_change_request(&self, number: u64) -> Result<ChangeRequestSnapshot> {
        let status = with_retry(|| self.fetch_status(number), "fetch pull request").await?;
        let comments = with_retry(|| self.fetch_comments(number), "list comments").await?;
        let commits = with_retry(|| self.fetch_commits(number), "list commits").await?;

        debug!(
            pr = number,
            status = status.as_str(),
            comments = comments.len(),
            commits = commits.len(),
            "Fetched change request"
        );

        Ok(ChangeRequestSnapshot {
            status,
            comments,
            commits,
        })
    }

    async fn post_comment(&self, number: u64, body: &str) -> Result<()> {
        info!(pr = number, "Posting comment via gh CLI");
        with_retry(|| self.comment_once(number, body), "post comment").await
    }

    async fn enable_auto_merge(&self, number: u64, strategy: MergeStrategy) -> Result<()> {
        info!(
            pr = number,
            strategy = strategy.as_str(),
            "Enabling auto-merge via gh CLI"
        );
        with_retry(|| self.merge_once(number, strategy), "enable auto-merge").await
    }
}

#[derive(serde::Deserialize)]
struct PullWire {
    state: String,
    #[serde(default)]
    merged: bool,
    merged_at: Option<DateTime<Utc>>,
}

#[derive(serde::Deserialize)]
struct CommentWire {
    id: u64,
    body: Option<String>,
    user: UserWire,
    created_at: DateTime<Utc>,
}

#[derive(serde::Deserialize)]
struct UserWire {
    login: String,
}

#[derive(serde::Deserialize)]
struct CommitWire {
    sha: String,
}

impl From<CommentWire> for Comment {
    fn from(wire: CommentWire) -> Self {
        Comment {
            id: wire.id,
            author: wire.user.login,
            body: wire.body.unwrap_or_default(),
            created_at: wire.created_at,
        }
    }
}

fn parse_status(json: &str) -> Result<ChangeRequestState> {
    let pull: PullWire = serde_json::from_str(json)
        .map_err(|e| GitHubError::Parse(format!("pull request: {}", e)))?;

    if pull.merged || pull.merged_at.is_some() {
        return Ok(ChangeRequestState::Merged);
    }

    match pull.state.as_str() {
        "open" => Ok(ChangeRequestState::Open),
        "closed" => Ok(ChangeRequestState::Closed),
        other => Err(GitHubError::Parse(format!(
            "unexpected pull request state '{}'",
            other
        ))),
    }
}

/// `gh api --paginate` emits one JSON array per page, concatenated.
fn parse_comments(json: &str) -> Result<Vec<Comment>> {
    let mut comments = Vec::new();

    for page in serde_json::Deserializer::from_str(json).into_iter::<Vec<CommentWire>>() {
        let page = page.map_err(|e| GitHubError::Parse(format!("comment list: {}", e)))?;
        comments.extend(page.into_iter().map(Comment::from));
    }

    // The snapshot contract orders comments by id, not arrival.
    comments.sort_by_key(|c| c.id);
    Ok(comments)
}

fn parse_commits(json: &str) -> Result<Vec<CommitSha>> {
    let mut commits = Vec::new();

    for page in serde_json::Deserializer::from_str(json).into_iter::<Vec<CommitWire>>() {
        let page = page.map_err(|e| GitHubError::Parse(format!("commit list: {}", e)))?;
        commits.extend(page.into_iter().map(|wire| CommitSha::new(wire.sha)));
    }

    Ok(commits)
}
