//! Strict domain model for a merge request report.
//!
//! Every type here is built fresh from the raw payloads by the normaliser
//! and serialises directly into the JSON document the CLI prints.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::summary::AggregateSummary;

/// A GitLab user reference.
///
/// Two authors are equal when their handles match; the display name is
/// informational only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Unique handle (`username`).
    pub username: String,
}

impl Author {
    /// Creates an author from a display name and handle.
    #[must_use]
    pub fn new(name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
        }
    }
}

impl PartialEq for Author {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl Eq for Author {}

impl Hash for Author {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.username.hash(state);
    }
}

/// Core merge request attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeRequestRecord {
    /// Project-scoped IID.
    pub iid: u64,
    /// Title.
    pub title: String,
    /// Lifecycle state (`opened`, `merged`, `closed`, ...).
    pub state: String,
    /// Merge status reported by GitLab (`can_be_merged`, ...).
    pub status: String,
    /// Author of the merge request.
    pub author: Author,
    /// Source branch name.
    pub source_branch: String,
    /// Target branch name.
    pub target_branch: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
    /// Number of changed files.
    pub changes_count: u64,
    /// Added line count.
    pub additions: u64,
    /// Deleted line count.
    pub deletions: u64,
    /// Canonical web URL.
    pub web_url: String,
}

/// Whether a note is anchored to the diff or part of the general
/// conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// Anchored to a file and line in the change set.
    Diff,
    /// Conversational note.
    General,
}

/// A single user-authored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    /// Note identifier.
    pub id: u64,
    /// Note author.
    pub author: Author,
    /// Markdown body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Diff or general note.
    pub kind: NoteKind,
    /// Participates in resolution tracking.
    pub resolvable: bool,
    /// Has been resolved.
    pub resolved: bool,
    /// File path for notes carrying position information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line number for notes carrying position information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

impl Note {
    /// True when the note still needs resolving.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.resolvable && !self.resolved
    }
}

/// A discussion thread holding at least one user-authored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscussionThread {
    id: String,
    notes: Vec<Note>,
    unresolved: bool,
}

impl DiscussionThread {
    /// Builds a thread from its notes in creation order.
    ///
    /// Returns `None` for an empty note list: threads without surviving
    /// notes are never reported.
    #[must_use]
    pub fn new(id: impl Into<String>, notes: Vec<Note>) -> Option<Self> {
        if notes.is_empty() {
            return None;
        }
        let unresolved = notes.iter().any(Note::is_open);
        Some(Self {
            id: id.into(),
            notes,
            unresolved,
        })
    }

    /// Thread identifier.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Notes in creation order.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// True when at least one note is resolvable and not resolved.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        self.unresolved
    }
}

/// Approval requirements and who has approved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApprovalState {
    /// Approvals required before merging.
    pub approvals_required: i64,
    /// Approvals still outstanding, as reported upstream.
    pub approvals_left: i64,
    /// Approvers in the order GitLab listed them.
    pub approved_by: Vec<Author>,
}

/// The merged report printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeRequestReport {
    /// Merge request attributes.
    pub mr: MergeRequestRecord,
    /// Threads with at least one user-authored note.
    pub discussions: Vec<DiscussionThread>,
    /// Approval state.
    pub approvals: ApprovalState,
    /// Counts derived from `discussions`.
    pub summary: AggregateSummary,
}

impl MergeRequestReport {
    /// Assembles a report, deriving the summary from the threads.
    #[must_use]
    pub fn new(
        mr: MergeRequestRecord,
        discussions: Vec<DiscussionThread>,
        approvals: ApprovalState,
    ) -> Self {
        let summary = AggregateSummary::from_threads(&discussions);
        Self {
            mr,
            discussions,
            approvals,
            summary,
        }
    }
}
