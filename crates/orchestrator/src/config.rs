use std::time::Duration;

use github::MergeStrategy;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_PHASE_DEADLINE_SECS: u64 = 3600;

/// Settings for one review-loop run.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Change request number the loop drives.
    pub request: u64,
    /// Login whose comments count as review feedback.
    pub reviewer: String,
    /// Login addressed by revision requests.
    pub implementer: String,
    /// Time between polls while waiting for an event.
    pub poll_interval: Duration,
    /// Maximum time to spend in any single wait before failing the run.
    pub phase_deadline: Duration,
    /// Strategy passed through when auto-merge is enabled.
    pub merge_strategy: MergeStrategy,
    /// Optional cap on review rounds. The protocol itself is unbounded;
    /// exceeding a configured cap fails the run.
    pub max_iterations: Option<u32>,
}

impl LoopConfig {
    pub fn new(request: u64, reviewer: impl Into<String>, implementer: impl Into<String>) -> Self {
        Self {
            request,
            reviewer: reviewer.into(),
            implementer: implementer.into(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            phase_deadline: Duration::from_secs(DEFAULT_PHASE_DEADLINE_SECS),
            merge_strategy: MergeStrategy::Squash,
            max_iterations: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_phase_deadline(mut self, deadline: Duration) -> Self {
        self.phase_deadline = deadline;
        self
    }

    pub fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }

    pub fn with_max_iterations(mut self, limit: u32) -> Self {
        self.max_iterations = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = LoopConfig::new(42, "review-agent", "implementation-agent");

        assert_eq!(config.request, 42);
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.phase_deadline, Duration::from_secs(3600));
        assert_eq!(config.merge_strategy, MergeStrategy::Squash);
        assert_eq!(config.max_iterations, None);
    }

    #[test]
    fn test_config_builder() {
        let config = LoopConfig::new(7, "alice", "bob")
            .with_poll_interval(Duration::from_secs(5))
            .with_phase_deadline(Duration::from_secs(120))
            .with_merge_strategy(MergeStrategy::Rebase)
            .with_max_iterations(10);

        assert_eq!(config.reviewer, "alice");
        assert_eq!(config.implementer, "bob");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.phase_deadline, Duration::from_secs(120));
        assert_eq!(config.merge_strategy, MergeStrategy::Rebase);
        assert_eq!(config.max_iterations, Some(10));
    }
}
