//! Gateways for reading raw GitLab API responses.
//!
//! The fetch pipeline only ever sees [`GitLabGateway`]: a resource path goes
//! in, raw response bytes or a classified [`FetchError`] come out. The `glab`
//! implementation shells out to the GitLab CLI, which owns authentication;
//! the REST implementation talks to the API directly with a personal access
//! token.

mod error_mapping;
mod glab;
mod rest;

pub use glab::{DEFAULT_GLAB_COMMAND, GlabCliGateway};
pub use rest::RestGateway;

use async_trait::async_trait;

use crate::gitlab::error::FetchError;

/// Gateway that can load one GitLab API resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitLabGateway: Send + Sync {
    /// Fetch the resource at `resource_path` (relative to `/api/v4`) and
    /// return the raw response body.
    async fn get(&self, resource_path: &str) -> Result<Vec<u8>, FetchError>;
}
