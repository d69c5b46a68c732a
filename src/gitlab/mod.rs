//! GitLab merge request fetching.
//!
//! A [`MergeRequestLocator`] names the project and merge request; a
//! [`GitLabGateway`] turns resource paths into raw bytes; and
//! [`MergeRequestIntake`] fetches the three resources concurrently before
//! handing them to [`crate::report`] for normalisation. Failures from any
//! layer are [`FetchError`] values carrying a stable kind.

pub mod error;
pub mod gateway;
pub mod intake;
pub mod locator;

pub use error::{ErrorReport, FetchError};
pub use gateway::{DEFAULT_GLAB_COMMAND, GitLabGateway, GlabCliGateway, RestGateway};
pub use intake::{MergeRequestIntake, RawPayloads};
pub use locator::{
    DEFAULT_PROJECT, Endpoint, MergeRequestIid, MergeRequestLocator, PersonalAccessToken,
    ProjectPath, decode_project_path, encode_project_path,
};

#[cfg(test)]
pub use gateway::MockGitLabGateway;
