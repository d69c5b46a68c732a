//! Groups raw discussion notes into threads.

use serde_json::Value;

use super::model::{DiscussionThread, Note, NoteKind};
use super::payload::LooseObject;

/// Upstream note type marking a diff-anchored note.
const DIFF_NOTE_TYPE: &str = "DiffNote";

/// Converts the raw discussion list into threads.
///
/// System-generated notes are dropped before anything else looks at them,
/// and discussions left without notes are omitted. Thread and note order
/// follow the payload.
#[must_use]
pub fn aggregate_threads(discussions: &[Value]) -> Vec<DiscussionThread> {
    discussions
        .iter()
        .map(LooseObject::new)
        .filter_map(|discussion| {
            let id = discussion.string("id");
            let notes: Vec<Note> = discussion
                .list("notes")
                .iter()
                .map(LooseObject::new)
                .filter(|note| is_user_note(&id, note))
                .map(|note| normalize_note(&note))
                .collect();

            let thread = DiscussionThread::new(id, notes);
            if thread.is_none() {
                tracing::trace!(
                    discussion = %discussion.string("id"),
                    "dropping discussion without user notes"
                );
            }
            thread
        })
        .collect()
}

fn is_user_note(discussion_id: &str, note: &LooseObject<'_>) -> bool {
    if !note.is_object() {
        return false;
    }
    if note.flag("system") {
        tracing::trace!(
            discussion = %discussion_id,
            note = note.count("id"),
            "dropping system note"
        );
        return false;
    }
    true
}

fn normalize_note(note: &LooseObject<'_>) -> Note {
    let kind = classify(note);
    let position = note.object("position");
    let (file, line) = if kind == NoteKind::Diff && position.is_object() {
        (
            position
                .optional_string("new_path")
                .or_else(|| position.optional_string("old_path")),
            position
                .optional_count("new_line")
                .or_else(|| position.optional_count("old_line")),
        )
    } else {
        (None, None)
    };

    Note {
        id: note.count("id"),
        author: note.author("author"),
        body: note.string("body"),
        created_at: note.timestamp("created_at"),
        kind,
        resolvable: note.flag("resolvable"),
        resolved: note.flag("resolved"),
        file,
        line,
    }
}

fn classify(note: &LooseObject<'_>) -> NoteKind {
    if note.optional_string("type").as_deref() == Some(DIFF_NOTE_TYPE) {
        NoteKind::Diff
    } else {
        NoteKind::General
    }
}
