pub mod error;
pub mod host;
pub mod retry;
pub mod traits;
pub mod types;

pub use error::{GitHubError, Result};
pub use host::GhHost;
pub use traits::CodeHost;
pub use types::{
    ChangeRequestSnapshot, ChangeRequestState, Comment, CommitSha, MergeStrategy, RepoSlug,
};
