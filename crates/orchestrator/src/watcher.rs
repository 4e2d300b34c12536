use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info};

use github::{ChangeRequestSnapshot, ChangeRequestState, CodeHost, Comment, CommitSha};

use crate::error::{OrchestratorError, Result, WaitPhase};

/// What a wait produced: the event it was waiting for, or the discovery
/// that the change request went terminal while waiting.
#[derive(Debug)]
pub enum WatchOutcome<T> {
    Event(T),
    Terminal(ChangeRequestState),
}

/// Poll the host until `predicate` yields an event, the change request
/// reaches a terminal state, or `deadline` elapses.
///
/// Each poll checks the terminal state first, then the predicate, then the
/// deadline. The final sleep is clamped so one poll lands exactly on the
/// deadline boundary; the timeout never fires before `deadline` has fully
/// elapsed.
pub async fn await_event<H, F, T>(
    host: &H,
    number: u64,
    phase: WaitPhase,
    poll_interval: Duration,
    deadline: Duration,
    mut predicate: F,
) -> Result<WatchOutcome<T>>
where
    H: CodeHost + ?Sized,
    F: FnMut(&ChangeRequestSnapshot) -> Option<T>,
{
    let start = Instant::now();

    loop {
        let snapshot = host.fetch_change_request(number).await?;

        if snapshot.status.is_terminal() {
            info!(
                pr = number,
                status = snapshot.status.as_str(),
                phase = phase.as_str(),
                "Change request reached a terminal state while waiting"
            );
            return Ok(WatchOutcome::Terminal(snapshot.status));
        }

        if let Some(event) = predicate(&snapshot) {
            return Ok(WatchOutcome::Event(event));
        }

        let elapsed = start.elapsed();
        if elapsed >= deadline {
            error!(
                pr = number,
                phase = phase.as_str(),
                elapsed_secs = elapsed.as_secs(),
                deadline_secs = deadline.as_secs(),
                "Wait deadline expired"
            );
            return Err(OrchestratorError::WaitTimeout {
                phase,
                elapsed_secs: elapsed.as_secs(),
                deadline_secs: deadline.as_secs(),
            });
        }

        tokio::time::sleep(poll_interval.min(deadline - elapsed)).await;
    }
}

/// Wait for a comment authored by `author` with an id above
/// `last_comment_id`. New comments from anyone else are logged once and
/// skipped; they never satisfy the wait.
pub async fn wait_for_review_comment<H>(
    host: &H,
    number: u64,
    author: &str,
    last_comment_id: Option<u64>,
    poll_interval: Duration,
    deadline: Duration,
) -> Result<WatchOutcome<Comment>>
where
    H: CodeHost + ?Sized,
{
    let mut seen_third_party: Vec<u64> = Vec::new();

    await_event(
        host,
        number,
        WaitPhase::ReviewComment,
        poll_interval,
        deadline,
        move |snapshot| {
            for comment in &snapshot.comments {
                if last_comment_id.map_or(false, |last| comment.id <= last) {
                    continue;
                }
                if comment.author == author {
                    return Some(comment.clone());
                }
                if !seen_third_party.contains(&comment.id) {
                    seen_third_party.push(comment.id);
                    debug!(
                        pr = number,
                        comment_id = comment.id,
                        author = %comment.author,
                        "Skipping comment from a non-reviewer"
                    );
                }
            }
            None
        },
    )
    .await
}

/// Wait for the branch head to differ from `last_sha`.
pub async fn wait_for_new_commit<H>(
    host: &H,
    number: u64,
    last_sha: Option<&CommitSha>,
    poll_interval: Duration,
    deadline: Duration,
) -> Result<WatchOutcome<CommitSha>>
where
    H: CodeHost + ?Sized,
{
    await_event(
        host,
        number,
        WaitPhase::NewCommit,
        poll_interval,
        deadline,
        |snapshot| {
            snapshot
                .head_sha()
                .filter(|head| last_sha != Some(*head))
                .cloned()
        },
    )
    .await
}
