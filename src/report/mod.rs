//! Normalised merge request report.
//!
//! Raw payloads enter through [`normalize_report`]; everything downstream
//! works with the strict model in [`model`]. Tolerance for missing or
//! mistyped upstream fields lives in [`payload`] and nowhere else.

pub mod model;
pub mod normalize;
pub mod payload;
pub mod summary;
pub mod threads;

pub use model::{
    ApprovalState, Author, DiscussionThread, MergeRequestRecord, MergeRequestReport, Note,
    NoteKind,
};
pub use normalize::{normalize_approvals, normalize_merge_request, normalize_report};
pub use payload::{LooseObject, PayloadShape, parse_payload};
pub use summary::AggregateSummary;
pub use threads::aggregate_threads;
