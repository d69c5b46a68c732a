//! Maps raw GitLab payloads onto the strict domain model.

use serde_json::Value;

use crate::gitlab::error::FetchError;
use crate::gitlab::intake::RawPayloads;
use crate::gitlab::locator::Endpoint;

use super::model::{ApprovalState, MergeRequestRecord, MergeRequestReport};
use super::payload::{LooseObject, PayloadShape, parse_payload};
use super::threads::aggregate_threads;

/// Builds the merged report from the three raw payloads.
///
/// The result depends only on the input bytes.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] when a payload is not JSON or does not
/// have its expected top-level shape (object for the merge request and
/// approvals, array for discussions).
pub fn normalize_report(payloads: &RawPayloads) -> Result<MergeRequestReport, FetchError> {
    let merge_request = parse_payload(
        Endpoint::MergeRequest.label(),
        &payloads.merge_request,
        PayloadShape::Object,
    )?;
    let discussions = parse_payload(
        Endpoint::Discussions.label(),
        &payloads.discussions,
        PayloadShape::Array,
    )?;
    let approvals = parse_payload(
        Endpoint::Approvals.label(),
        &payloads.approvals,
        PayloadShape::Object,
    )?;

    let threads = discussions
        .as_array()
        .map(|list| aggregate_threads(list.as_slice()))
        .unwrap_or_default();

    Ok(MergeRequestReport::new(
        normalize_merge_request(&merge_request),
        threads,
        normalize_approvals(&approvals),
    ))
}

/// Extracts merge request attributes, defaulting anything missing.
#[must_use]
pub fn normalize_merge_request(raw: &Value) -> MergeRequestRecord {
    let fields = LooseObject::new(raw);
    MergeRequestRecord {
        iid: fields.count("iid"),
        title: fields.string("title"),
        state: fields.string("state"),
        status: fields.string("merge_status"),
        author: fields.author("author"),
        source_branch: fields.string("source_branch"),
        target_branch: fields.string("target_branch"),
        created_at: fields.timestamp("created_at"),
        updated_at: fields.timestamp("updated_at"),
        description: fields.string("description"),
        changes_count: fields.count("changes_count"),
        additions: fields.count("additions"),
        deletions: fields.count("deletions"),
        web_url: fields.string("web_url"),
    }
}

/// Extracts approval counts and approvers in received order.
#[must_use]
pub fn normalize_approvals(raw: &Value) -> ApprovalState {
    let fields = LooseObject::new(raw);
    ApprovalState {
        approvals_required: fields.signed("approvals_required"),
        approvals_left: fields.signed("approvals_left"),
        approved_by: fields
            .list("approved_by")
            .iter()
            .map(|entry| LooseObject::new(entry).author("user"))
            .collect(),
    }
}
