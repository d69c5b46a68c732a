//! Gateway backed by the `glab` command-line client.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::gitlab::error::FetchError;

use super::GitLabGateway;
use super::error_mapping::{classify_cli_failure, map_spawn_error};

/// Executable name used when none is configured.
pub const DEFAULT_GLAB_COMMAND: &str = "glab";

/// Runs `glab api <resource>` for every request.
///
/// The child is killed if the pending request is dropped, so an aborted
/// fetch does not leave a `glab` process behind.
#[derive(Debug, Clone)]
pub struct GlabCliGateway {
    command: String,
}

impl GlabCliGateway {
    /// Creates a gateway that launches `command` instead of `glab`.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl GitLabGateway for GlabCliGateway {
    async fn get(&self, resource_path: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(command = %self.command, resource_path, "invoking glab api");

        let output = Command::new(&self.command)
            .arg("api")
            .arg(resource_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|error| map_spawn_error(&self.command, &error))?;

        if output.status.success() {
            return Ok(output.stdout);
        }

        tracing::debug!(status = %output.status, resource_path, "glab api failed");
        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
        Err(classify_cli_failure(resource_path, &combined))
    }
}
