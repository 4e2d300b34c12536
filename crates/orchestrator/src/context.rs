use github::{ChangeRequestSnapshot, CommitSha};

/// Mutable state threaded through one review-loop run.
///
/// Owned by the controller and dropped when the run ends; nothing here is
/// shared or persisted. The comment cursor only moves forward, so an event
/// is processed at most once no matter how often polling re-delivers it.
#[derive(Debug, Clone)]
pub struct LoopContext {
    last_comment_id: Option<u64>,
    last_commit_sha: Option<CommitSha>,
    iteration: u32,
}

impl LoopContext {
    /// Seed the cursors from the state observed when the loop starts, so
    /// comments and commits that predate the run are never treated as new.
    pub fn baseline(snapshot: &ChangeRequestSnapshot) -> Self {
        Self {
            last_comment_id: snapshot.latest_comment_id(),
            last_commit_sha: snapshot.head_sha().cloned(),
            iteration: 1,
        }
    }

    pub fn last_comment_id(&self) -> Option<u64> {
        self.last_comment_id
    }

    pub fn last_commit_sha(&self) -> Option<&CommitSha> {
        self.last_commit_sha.as_ref()
    }

    /// Current review round, starting at 1.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Move the comment cursor to `id`. Ids that do not advance the cursor
    /// are ignored, so the cursor never moves backward.
    pub fn advance_comment(&mut self, id: u64) {
        if self.is_new_comment(id) {
            self.last_comment_id = Some(id);
        }
    }

    /// Record the branch head after a revision.
    pub fn advance_commit(&mut self, sha: CommitSha) {
        self.last_commit_sha = Some(sha);
    }

    pub fn next_iteration(&mut self) {
        self.iteration += 1;
    }

    pub fn is_new_comment(&self, id: u64) -> bool {
        self.last_comment_id.map_or(true, |last| id > last)
    }

    pub fn is_new_commit(&self, sha: &CommitSha) -> bool {
        self.last_commit_sha.as_ref() != Some(sha)
    }
}
