use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("timed out waiting for {phase} after {elapsed_secs}s (deadline {deadline_secs}s)")]
    WaitTimeout {
        phase: WaitPhase,
        elapsed_secs: u64,
        deadline_secs: u64,
    },

    #[error("iteration limit of {limit} reached without approval")]
    IterationLimitReached { limit: u32 },

    #[error("platform error: {0}")]
    Host(#[from] github::GitHubError),
}

/// Which wait a deadline expired in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPhase {
    ReviewComment,
    NewCommit,
}

impl WaitPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitPhase::ReviewComment => "review comment",
            WaitPhase::NewCommit => "new commit",
        }
    }
}

impl fmt::Display for WaitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
