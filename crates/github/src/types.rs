use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GitHubError;

// =============================================================================
// Repository
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn from_full_name(full_name: &str) -> Option<Self> {
        let parts: Vec<&str> = full_name.split('/').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            Some(Self::new(parts[0], parts[1]))
        } else {
            None
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoSlug {
    type Err = GitHubError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_full_name(s)
            .ok_or_else(|| GitHubError::Config(format!("expected owner/repo, got '{}'", s)))
    }
}

// =============================================================================
// Change Request
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeRequestState {
    Open,
    Merged,
    Closed,
}

impl ChangeRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeRequestState::Open => "open",
            ChangeRequestState::Merged => "merged",
            ChangeRequestState::Closed => "closed",
        }
    }

    /// Merged and closed requests accept no further review rounds.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ChangeRequestState::Merged | ChangeRequestState::Closed
        )
    }
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Numeric identifier, assigned in increasing order per repository.
    /// The only reliable sequence key; `created_at` is carried for logs.
    pub id: u64,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Commits
// =============================================================================

/// Content-addressed commit identifier. Equality only, no ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSha(String);

impl CommitSha {
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(7)]
    }
}

impl fmt::Display for CommitSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// The state of a change request as of one fetch: merge status, discussion
/// comments ordered by id, and branch commits with the head last.
#[derive(Debug, Clone)]
pub struct ChangeRequestSnapshot {
    pub status: ChangeRequestState,
    pub comments: Vec<Comment>,
    pub commits: Vec<CommitSha>,
}

impl ChangeRequestSnapshot {
    pub fn latest_comment_id(&self) -> Option<u64> {
        self.comments.iter().map(|c| c.id).max()
    }

    pub fn head_sha(&self) -> Option<&CommitSha> {
        self.commits.last()
    }
}

// =============================================================================
// Merge Strategy
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    Merge,
    Squash,
    Rebase,
}

impl MergeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::Merge => "merge",
            MergeStrategy::Squash => "squash",
            MergeStrategy::Rebase => "rebase",
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = GitHubError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(MergeStrategy::Merge),
            "squash" => Ok(MergeStrategy::Squash),
            "rebase" => Ok(MergeStrategy::Rebase),
            other => Err(GitHubError::Config(format!(
                "unknown merge strategy '{}' (expected merge, squash, or rebase)",
                other
            ))),
        }
    }
}
