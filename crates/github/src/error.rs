use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("gh command failed: {0}")]
    Command(String),

    #[error("failed to run gh: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse gh output: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GitHubError {
    /// Whether a failed call may succeed if issued again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GitHubError::Command(_) | GitHubError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;
