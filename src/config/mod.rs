//! Application configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – project `cnty-ai/continuity`, the `glab` executable
//! 2. **Configuration file** – `.gitlab-mr-fetch.toml` in the current
//!    directory, home directory, or XDG config directory
//! 3. **Environment variables** – `MR_FETCH_PROJECT`, `MR_FETCH_TOKEN`, or
//!    legacy `GITLAB_TOKEN`
//! 4. **Command-line arguments** – `--project`/`-p`, `--summary`/`-s`,
//!    `--glab-command`, `--api-url` and `--token`/`-t`
//!
//! The merge request IID itself is positional and is handled by the binary
//! before the remaining arguments reach this module.
//!
//! # Configuration File
//!
//! ```toml
//! project = "group/subgroup/app"
//! summary = false
//! glab_command = "/opt/glab/bin/glab"
//! api_url = "https://gitlab.example.com/api/v4"
//! token = "glpat-example"
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::gitlab::error::FetchError;
use crate::gitlab::gateway::DEFAULT_GLAB_COMMAND;
use crate::gitlab::locator::{PersonalAccessToken, ProjectPath};

/// Environment variable consulted when no token is configured.
const LEGACY_TOKEN_VARIABLE: &str = "GITLAB_TOKEN";

/// How GitLab should be reached, derived from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayChoice<'a> {
    /// Shell out to the GitLab CLI, which owns authentication.
    Glab {
        /// Executable to run.
        command: &'a str,
    },
    /// Call the REST API directly with a personal access token.
    Rest {
        /// API v4 base URL.
        api_url: &'a str,
    },
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use gitlab_mr_fetch::MrFetchConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = MrFetchConfig::load().expect("failed to load configuration");
/// let project = config.project_path().expect("project path is valid");
/// println!("fetching from {project}");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "MR_FETCH",
    discovery(
        dotfile_name = ".gitlab-mr-fetch.toml",
        config_file_name = "gitlab-mr-fetch.toml",
        app_name = "gitlab-mr-fetch"
    )
)]
pub struct MrFetchConfig {
    /// Project path, for example `group/subgroup/app`.
    ///
    /// Can be provided via:
    /// - CLI: `--project <PATH>` or `-p <PATH>`
    /// - Environment: `MR_FETCH_PROJECT`
    /// - Config file: `project = "..."`
    #[ortho_config(cli_short = 'p')]
    pub project: Option<String>,

    /// Emits only the aggregate comment counts instead of the full report.
    ///
    /// Can be provided via:
    /// - CLI: `--summary` / `-s`
    /// - Config file: `summary = true`
    #[ortho_config(cli_short = 's')]
    pub summary: bool,

    /// GitLab CLI executable used by the default gateway.
    #[ortho_config()]
    pub glab_command: Option<String>,

    /// GitLab API v4 base URL. When set, requests go straight to the REST
    /// API instead of through the GitLab CLI.
    #[ortho_config()]
    pub api_url: Option<String>,

    /// Personal access token for the REST gateway.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `MR_FETCH_TOKEN` or `GITLAB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,
}

impl MrFetchConfig {
    /// Returns the configured project, or the default project when unset.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] when the configured path is
    /// blank or contains `%`.
    pub fn project_path(&self) -> Result<ProjectPath, FetchError> {
        self.project
            .as_deref()
            .map_or_else(|| Ok(ProjectPath::default()), ProjectPath::new)
    }

    /// Returns the GitLab CLI executable to run.
    #[must_use]
    pub fn glab_command(&self) -> &str {
        self.glab_command.as_deref().unwrap_or(DEFAULT_GLAB_COMMAND)
    }

    /// Decides which gateway serves this run.
    #[must_use]
    pub fn gateway_choice(&self) -> GatewayChoice<'_> {
        match self.api_url.as_deref() {
            Some(api_url) if !api_url.trim().is_empty() => GatewayChoice::Rest { api_url },
            _ => GatewayChoice::Glab {
                command: self.glab_command(),
            },
        }
    }

    /// Returns the token from configuration or the legacy `GITLAB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] when no non-blank token is
    /// available.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, FetchError> {
        let value = self
            .token
            .clone()
            .or_else(|| env::var(LEGACY_TOKEN_VARIABLE).ok())
            .ok_or_else(|| FetchError::Configuration {
                message: format!(
                    "a token is required with --api-url (use --token, MR_FETCH_TOKEN or {LEGACY_TOKEN_VARIABLE})"
                ),
            })?;
        PersonalAccessToken::new(value)
    }
}

#[cfg(test)]
mod tests;
