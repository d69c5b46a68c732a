//! Aggregate counts derived from discussion threads.

use serde::Serialize;

use super::model::{DiscussionThread, NoteKind};

/// Comment statistics for a merge request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateSummary {
    /// Every user-authored note across all threads.
    pub total_comments: u64,
    /// Threads with at least one open resolvable note.
    pub unresolved_threads: u64,
    /// Notes anchored to the diff.
    pub diff_comments: u64,
    /// Conversational notes.
    pub general_comments: u64,
}

impl AggregateSummary {
    /// Computes the summary for a set of threads.
    #[must_use]
    pub fn from_threads(threads: &[DiscussionThread]) -> Self {
        threads.iter().fold(Self::default(), |mut summary, thread| {
            if thread.is_unresolved() {
                summary.unresolved_threads += 1;
            }
            for note in thread.notes() {
                summary.total_comments += 1;
                match note.kind {
                    NoteKind::Diff => summary.diff_comments += 1,
                    NoteKind::General => summary.general_comments += 1,
                }
            }
            summary
        })
    }
}
