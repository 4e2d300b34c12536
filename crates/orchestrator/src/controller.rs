use tracing::{debug, error, info};

use github::{ChangeRequestState, CodeHost, Comment, CommitSha};

use crate::classifier::{classify, Verdict};
use crate::config::LoopConfig;
use crate::context::LoopContext;
use crate::error::{OrchestratorError, Result};
use crate::messages::LoopMessages;
use crate::watcher::{wait_for_new_commit, wait_for_review_comment, WatchOutcome};

/// Phases of the review loop. Each iteration walks
/// `RequestReview -> AwaitReview -> Classify`, then either `Merge` (done) or
/// `RequestRevision -> AwaitRevision` and back to `RequestReview`.
#[derive(Debug, Clone)]
pub enum LoopPhase {
    RequestReview,
    AwaitReview,
    Classify(Comment),
    Merge,
    RequestRevision(Comment),
    AwaitRevision,
}

impl LoopPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopPhase::RequestReview => "request_review",
            LoopPhase::AwaitReview => "await_review",
            LoopPhase::Classify(_) => "classify",
            LoopPhase::Merge => "merge",
            LoopPhase::RequestRevision(_) => "request_revision",
            LoopPhase::AwaitRevision => "await_revision",
        }
    }
}

/// How a completed run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// An approving review arrived and auto-merge was enabled.
    AutoMergeEnabled { iterations: u32 },
    /// The change request was merged or closed outside the loop.
    AlreadyFinished { state: ChangeRequestState },
}

enum Flow {
    Continue(LoopPhase),
    Finished(LoopOutcome),
}

/// Drives one change request through review rounds until an approving
/// review enables auto-merge, the request finishes externally, or a wait
/// deadline expires.
pub struct LoopController<H: CodeHost> {
    host: H,
    config: LoopConfig,
}

impl<H: CodeHost> LoopController<H> {
    pub fn new(host: H, config: LoopConfig) -> Self {
        Self { host, config }
    }

    pub async fn run(&self) -> Result<LoopOutcome> {
        info!(
            pr = self.config.request,
            host = self.host.name(),
            reviewer = %self.config.reviewer,
            implementer = %self.config.implementer,
            "Starting review loop"
        );

        let baseline = self.host.fetch_change_request(self.config.request).await?;
        if baseline.status.is_terminal() {
            info!(
                pr = self.config.request,
                status = baseline.status.as_str(),
                "Change request already finished; nothing to do"
            );
            return Ok(LoopOutcome::AlreadyFinished {
                state: baseline.status,
            });
        }

        let mut ctx = LoopContext::baseline(&baseline);
        debug!(
            pr = self.config.request,
            baseline_comment_id = ?ctx.last_comment_id(),
            baseline_head = ?ctx.last_commit_sha().map(CommitSha::short),
            "Recorded dedup baseline"
        );

        let mut phase = LoopPhase::RequestReview;
        loop {
            let from = phase.as_str();
            let flow = match phase {
                LoopPhase::RequestReview => self.request_review(&ctx).await?,
                LoopPhase::AwaitReview => self.await_review(&mut ctx).await?,
                LoopPhase::Classify(comment) => self.classify_comment(&ctx, comment),
                LoopPhase::Merge => self.merge(&ctx).await?,
                LoopPhase::RequestRevision(comment) => self.request_revision(&ctx, comment).await?,
                LoopPhase::AwaitRevision => self.await_revision(&mut ctx).await?,
            };

            match flow {
                Flow::Continue(next) => {
                    info!(
                        pr = self.config.request,
                        iteration = ctx.iteration(),
                        from = from,
                        to = next.as_str(),
                        "Transition"
                    );
                    phase = next;
                }
                Flow::Finished(outcome) => return Ok(outcome),
            }
        }
    }

    /// Post a review request, unless the change request finished while the
    /// loop was not looking.
    async fn request_review(&self, ctx: &LoopContext) -> Result<Flow> {
        let snapshot = self.host.fetch_change_request(self.config.request).await?;
        if snapshot.status.is_terminal() {
            info!(
                pr = self.config.request,
                status = snapshot.status.as_str(),
                "Change request finished externally; stopping without a review request"
            );
            return Ok(Flow::Finished(LoopOutcome::AlreadyFinished {
                state: snapshot.status,
            }));
        }

        let message = LoopMessages::review_request(&self.config.reviewer, snapshot.head_sha());
        self.host.post_comment(self.config.request, &message).await?;
        info!(
            pr = self.config.request,
            iteration = ctx.iteration(),
            message = %message,
            "Posted review request"
        );

        Ok(Flow::Continue(LoopPhase::AwaitReview))
    }

    async fn await_review(&self, ctx: &mut LoopContext) -> Result<Flow> {
        info!(
            pr = self.config.request,
            iteration = ctx.iteration(),
            reviewer = %self.config.reviewer,
            "Waiting for a review comment"
        );

        let outcome = wait_for_review_comment(
            &self.host,
            self.config.request,
            &self.config.reviewer,
            ctx.last_comment_id(),
            self.config.poll_interval,
            self.config.phase_deadline,
        )
        .await?;

        match outcome {
            WatchOutcome::Terminal(state) => {
                Ok(Flow::Finished(LoopOutcome::AlreadyFinished { state }))
            }
            WatchOutcome::Event(comment) => {
                ctx.advance_comment(comment.id);
                info!(
                    pr = self.config.request,
                    iteration = ctx.iteration(),
                    comment_id = comment.id,
                    author = %comment.author,
                    body = %preview(&comment.body),
                    "Received review comment"
                );
                Ok(Flow::Continue(LoopPhase::Classify(comment)))
            }
        }
    }

    fn classify_comment(&self, ctx: &LoopContext, comment: Comment) -> Flow {
        let verdict = classify(&comment.body);

        match verdict {
            Verdict::Approved => {
                info!(
                    pr = self.config.request,
                    iteration = ctx.iteration(),
                    comment_id = comment.id,
                    verdict = verdict.as_str(),
                    "Review approved the changes"
                );
                Flow::Continue(LoopPhase::Merge)
            }
            Verdict::NeedsRevision {
                ref matched_patterns,
            } => {
                info!(
                    pr = self.config.request,
                    iteration = ctx.iteration(),
                    comment_id = comment.id,
                    verdict = verdict.as_str(),
                    matched_patterns = ?matched_patterns,
                    "Review requests changes"
                );
                Flow::Continue(LoopPhase::RequestRevision(comment))
            }
        }
    }

    /// Enable auto-merge and finish. Fire-and-forget: the platform merges
    /// once its checks pass, and the loop does not wait to confirm.
    async fn merge(&self, ctx: &LoopContext) -> Result<Flow> {
        self.host
            .enable_auto_merge(self.config.request, self.config.merge_strategy)
            .await?;

        info!(
            pr = self.config.request,
            iterations = ctx.iteration(),
            strategy = self.config.merge_strategy.as_str(),
            "Auto-merge enabled; review loop complete"
        );

        Ok(Flow::Finished(LoopOutcome::AutoMergeEnabled {
            iterations: ctx.iteration(),
        }))
    }

    async fn request_revision(&self, ctx: &LoopContext, feedback: Comment) -> Result<Flow> {
        let message = LoopMessages::revision_request(&self.config.implementer, &feedback.body);
        self.host.post_comment(self.config.request, &message).await?;
        info!(
            pr = self.config.request,
            iteration = ctx.iteration(),
            feedback_comment_id = feedback.id,
            message = %preview(&message),
            "Posted revision request"
        );

        Ok(Flow::Continue(LoopPhase::AwaitRevision))
    }

    async fn await_revision(&self, ctx: &mut LoopContext) -> Result<Flow> {
        info!(
            pr = self.config.request,
            iteration = ctx.iteration(),
            implementer = %self.config.implementer,
            "Waiting for a new commit"
        );

        let outcome = wait_for_new_commit(
            &self.host,
            self.config.request,
            ctx.last_commit_sha(),
            self.config.poll_interval,
            self.config.phase_deadline,
        )
        .await?;

        match outcome {
            WatchOutcome::Terminal(state) => {
                Ok(Flow::Finished(LoopOutcome::AlreadyFinished { state }))
            }
            WatchOutcome::Event(sha) => {
                info!(
                    pr = self.config.request,
                    iteration = ctx.iteration(),
                    head = sha.short(),
                    "New commit observed; starting next review round"
                );
                ctx.advance_commit(sha);
                ctx.next_iteration();

                if let Some(limit) = self.config.max_iterations {
                    if ctx.iteration() > limit {
                        error!(
                            pr = self.config.request,
                            limit = limit,
                            "Iteration limit reached without approval"
                        );
                        return Err(OrchestratorError::IterationLimitReached { limit });
                    }
                }

                Ok(Flow::Continue(LoopPhase::RequestReview))
            }
        }
    }
}

/// First 200 characters of a body, for log lines.
fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
