//! Gateway that calls the GitLab REST API directly.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::gitlab::error::FetchError;
use crate::gitlab::locator::PersonalAccessToken;

use super::GitLabGateway;
use super::error_mapping::{extract_gitlab_message, map_http_error, map_transport_error};

const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `reqwest`-backed gateway authenticating with a personal access token.
#[derive(Debug, Clone)]
pub struct RestGateway {
    client: Client,
    api_base: String,
    token: PersonalAccessToken,
}

impl RestGateway {
    /// Builds a gateway for an API base such as `https://gitlab.com/api/v4`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] when the base URL cannot be
    /// parsed or the HTTP client cannot be constructed.
    pub fn new(api_url: &str, token: PersonalAccessToken) -> Result<Self, FetchError> {
        let parsed = Url::parse(api_url).map_err(|error| FetchError::Configuration {
            message: format!("invalid API URL `{api_url}`: {error}"),
        })?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| FetchError::Configuration {
                message: format!("build HTTP client failed: {error}"),
            })?;

        Ok(Self {
            client,
            api_base: parsed.as_str().trim_end_matches('/').to_owned(),
            token,
        })
    }

    fn endpoint_url(&self, resource_path: &str) -> String {
        format!(
            "{base}/{path}",
            base = self.api_base,
            path = resource_path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl GitLabGateway for RestGateway {
    async fn get(&self, resource_path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.endpoint_url(resource_path);
        tracing::debug!(%url, "requesting GitLab resource");

        let response = self
            .client
            .get(&url)
            .header(PRIVATE_TOKEN_HEADER, self.token.value())
            .send()
            .await
            .map_err(|error| map_transport_error(resource_path, &error))?;

        let status = response.status();
        if status.is_success() {
            return response
                .bytes()
                .await
                .map(|body| body.to_vec())
                .map_err(|error| map_transport_error(resource_path, &error));
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_http_error(
            resource_path,
            status,
            extract_gitlab_message(&body),
        ))
    }
}
