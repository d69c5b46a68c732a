//! Concurrent fetch of the three merge request resources.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::report::{MergeRequestReport, normalize_report};

use super::error::FetchError;
use super::gateway::GitLabGateway;
use super::locator::{Endpoint, MergeRequestLocator};

/// Raw response bodies for one merge request, exactly as returned by the
/// gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPayloads {
    /// `merge_requests/:iid` body.
    pub merge_request: Vec<u8>,
    /// `merge_requests/:iid/discussions` body.
    pub discussions: Vec<u8>,
    /// `merge_requests/:iid/approvals` body.
    pub approvals: Vec<u8>,
}

/// Fan-in slots; each endpoint fills its own.
#[derive(Default)]
struct PendingPayloads {
    merge_request: Option<Vec<u8>>,
    discussions: Option<Vec<u8>>,
    approvals: Option<Vec<u8>>,
}

impl PendingPayloads {
    fn store(&mut self, endpoint: Endpoint, body: Vec<u8>) {
        let slot = match endpoint {
            Endpoint::MergeRequest => &mut self.merge_request,
            Endpoint::Discussions => &mut self.discussions,
            Endpoint::Approvals => &mut self.approvals,
        };
        *slot = Some(body);
    }

    fn complete(self) -> Result<RawPayloads, FetchError> {
        match (self.merge_request, self.discussions, self.approvals) {
            (Some(merge_request), Some(discussions), Some(approvals)) => Ok(RawPayloads {
                merge_request,
                discussions,
                approvals,
            }),
            _ => Err(FetchError::Upstream {
                message: "a fetch finished without reporting a result".to_owned(),
            }),
        }
    }
}

/// Loads and merges merge request details, discussions and approvals
/// through a gateway.
pub struct MergeRequestIntake<Gateway>
where
    Gateway: GitLabGateway + 'static,
{
    gateway: Arc<Gateway>,
}

impl<Gateway> MergeRequestIntake<Gateway>
where
    Gateway: GitLabGateway + 'static,
{
    /// Create a new intake using the provided gateway.
    #[must_use]
    pub const fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Fetch all three resources concurrently.
    ///
    /// The fetches run as one task group. The first failure aborts the
    /// remaining fetches and is returned straight away; completion order is
    /// otherwise irrelevant.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error observed, annotated with the
    /// endpoint that produced it.
    pub async fn fetch(&self, locator: &MergeRequestLocator) -> Result<RawPayloads, FetchError> {
        let mut tasks = JoinSet::new();
        for endpoint in Endpoint::ALL {
            let gateway = Arc::clone(&self.gateway);
            let resource_path = locator.resource_path(endpoint);
            tasks.spawn(async move {
                let result = gateway.get(&resource_path).await;
                (endpoint, result)
            });
        }
        tracing::debug!(
            project = %locator.project(),
            iid = %locator.iid(),
            "started merge request fetches"
        );

        let mut pending = PendingPayloads::default();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|error| FetchError::Upstream {
                message: format!("fetch task did not complete: {error}"),
            });
            match outcome {
                Ok((endpoint, Ok(body))) => {
                    tracing::debug!(endpoint = endpoint.label(), bytes = body.len(), "fetched");
                    pending.store(endpoint, body);
                }
                Ok((endpoint, Err(error))) => {
                    tasks.abort_all();
                    tracing::debug!(endpoint = endpoint.label(), %error, "aborting fetches");
                    return Err(error.in_operation(endpoint.label()));
                }
                Err(error) => {
                    tasks.abort_all();
                    return Err(error);
                }
            }
        }

        pending.complete()
    }

    /// Fetch all three resources and build the normalised report.
    ///
    /// # Errors
    ///
    /// Propagates the first fetch failure, or [`FetchError::Parse`] when a
    /// payload has the wrong top-level shape.
    pub async fn load(
        &self,
        locator: &MergeRequestLocator,
    ) -> Result<MergeRequestReport, FetchError> {
        let payloads = self.fetch(locator).await?;
        normalize_report(&payloads)
    }
}
