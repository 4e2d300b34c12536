use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChangeRequestSnapshot, MergeStrategy};

/// Trait for collaboration platform operations on one repository
#[async_trait]
pub trait CodeHost: Send + Sync {
    /// Get the name of the platform backend
    fn name(&self) -> &'static str;

    /// Fetch the current state of a change request: merge status, comment
    /// stream, and branch commits
    async fn fetch_change_request(&self, number: u64) -> Result<ChangeRequestSnapshot>;

    /// Post a discussion comment on a change request
    async fn post_comment(&self, number: u64, body: &str) -> Result<()>;

    /// Ask the platform to merge a change request once its checks allow it
    async fn enable_auto_merge(&self, number: u64, strategy: MergeStrategy) -> Result<()>;
}
