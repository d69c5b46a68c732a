//! GitLab merge request fetching and normalisation.
//!
//! The library loads a merge request, its discussion threads, and its
//! approval state through a pluggable gateway, fetching all three
//! concurrently, and folds them into a single [`MergeRequestReport`] with
//! aggregate comment counts.

pub mod config;
pub mod gitlab;
pub mod report;

pub use config::{GatewayChoice, MrFetchConfig};
pub use gitlab::{
    ErrorReport, FetchError, GitLabGateway, GlabCliGateway, MergeRequestIid, MergeRequestIntake,
    MergeRequestLocator, PersonalAccessToken, ProjectPath, RawPayloads, RestGateway,
};
pub use report::{AggregateSummary, MergeRequestReport};
