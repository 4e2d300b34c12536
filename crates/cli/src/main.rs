use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use github::{GhHost, MergeStrategy, RepoSlug};
use orchestrator::config::{DEFAULT_PHASE_DEADLINE_SECS, DEFAULT_POLL_INTERVAL_SECS};
use orchestrator::{LoopConfig, LoopController, LoopOutcome};

const DEFAULT_REVIEWER: &str = "review-agent";
const DEFAULT_IMPLEMENTER: &str = "implementation-agent";

#[derive(Parser)]
#[command(name = "mergeloop")]
#[command(about = "Drives a change request through agent review rounds until it can merge", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository the change request lives in, as owner/repo
    #[arg(long)]
    repo: RepoSlug,

    /// Pull request number to drive
    #[arg(long)]
    pr: u64,

    /// Login whose comments count as review feedback
    #[arg(long, default_value = DEFAULT_REVIEWER)]
    reviewer: String,

    /// Login addressed by revision requests
    #[arg(long, default_value = DEFAULT_IMPLEMENTER)]
    implementer: String,

    /// Seconds between polls while waiting for review or revision
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    poll_interval: u64,

    /// Seconds allowed in each wait before the run fails
    #[arg(long, default_value_t = DEFAULT_PHASE_DEADLINE_SECS)]
    deadline: u64,

    /// How the platform merges once its checks pass
    #[arg(long, default_value = "squash")]
    merge_strategy: MergeStrategy,

    /// Fail after this many review rounds (unbounded when omitted)
    #[arg(long)]
    max_iterations: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    if !GhHost::is_available().await {
        bail!("gh CLI not found or not authenticated; run 'gh auth login' first");
    }

    let mut config = LoopConfig::new(cli.pr, cli.reviewer, cli.implementer)
        .with_poll_interval(Duration::from_secs(cli.poll_interval))
        .with_phase_deadline(Duration::from_secs(cli.deadline))
        .with_merge_strategy(cli.merge_strategy);
    if let Some(limit) = cli.max_iterations {
        config = config.with_max_iterations(limit);
    }

    tracing::info!(repo = %cli.repo, pr = cli.pr, "Starting mergeloop");

    let host = GhHost::new(cli.repo.clone());
    let controller = LoopController::new(host, config);

    match controller.run().await? {
        LoopOutcome::AutoMergeEnabled { iterations } => {
            println!();
            println!(
                "Auto-merge enabled for {}#{} after {} review round(s).",
                cli.repo, cli.pr, iterations
            );
        }
        LoopOutcome::AlreadyFinished { state } => {
            println!();
            println!(
                "{}#{} is already {}; nothing to do.",
                cli.repo,
                cli.pr,
                state.as_str()
            );
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mergeloop=info,orchestrator=info,github=info".into()),
        )
        .init();
}
