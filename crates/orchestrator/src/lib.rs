pub mod classifier;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod messages;
pub mod watcher;

pub use classifier::{classify, Verdict};
pub use config::LoopConfig;
pub use context::LoopContext;
pub use controller::{LoopController, LoopOutcome, LoopPhase};
pub use error::{OrchestratorError, Result, WaitPhase};
pub use messages::LoopMessages;
pub use watcher::{wait_for_new_commit, wait_for_review_comment, WatchOutcome};
