//! Error types exposed by the GitLab fetch layer.

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced while parsing input, talking to GitLab, or rendering the
/// report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The CLI did not include a merge request number.
    #[error("merge request IID is required (usage: gitlab-mr-fetch <mr-iid> [--project=path] [--summary])")]
    MissingArgument,

    /// The merge request number is not a positive integer.
    #[error("merge request IID must be a positive integer, got `{argument}`")]
    InvalidArgument {
        /// The value supplied on the command line.
        argument: String,
    },

    /// The gateway executable could not be found on the search path.
    #[error("`{command}` was not found; install the GitLab CLI from https://gitlab.com/gitlab-org/cli")]
    MissingDependency {
        /// Command that failed to launch.
        command: String,
    },

    /// GitLab rejected the call as unauthenticated.
    #[error("GitLab authentication failed: {message}")]
    Authentication {
        /// Detail describing the rejected request.
        message: String,
    },

    /// The merge request or one of its sub-resources does not exist or is
    /// not visible to the caller.
    #[error("not found or no access: {message}")]
    NotFound {
        /// Detail naming the missing resource.
        message: String,
    },

    /// Any other non-success response from the gateway.
    #[error("GitLab API error: {message}")]
    Upstream {
        /// Output or response body returned by the gateway.
        message: String,
    },

    /// A raw payload did not have the expected top-level shape.
    #[error("failed to parse {message}")]
    Parse {
        /// Which payload failed and why.
        message: String,
    },

    /// The final report could not be serialised or written.
    #[error("failed to encode report: {message}")]
    Encoding {
        /// Serialiser or I/O error detail.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl FetchError {
    /// Short, stable identifier for the error category.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingArgument => "MissingArgument",
            Self::InvalidArgument { .. } => "InvalidArgument",
            Self::MissingDependency { .. } => "MissingDependency",
            Self::Authentication { .. } => "AuthenticationFailure",
            Self::NotFound { .. } => "NotFound",
            Self::Upstream { .. } => "UpstreamError",
            Self::Parse { .. } => "ParseFailure",
            Self::Encoding { .. } => "EncodingFailure",
            Self::Configuration { .. } => "ConfigurationFailure",
        }
    }

    /// Prefixes the detail message with the operation that produced it.
    ///
    /// Argument and dependency errors carry no free-form message and are
    /// returned unchanged.
    #[must_use]
    pub fn in_operation(self, operation: &str) -> Self {
        match self {
            Self::Authentication { message } => Self::Authentication {
                message: format!("{operation}: {message}"),
            },
            Self::NotFound { message } => Self::NotFound {
                message: format!("{operation}: {message}"),
            },
            Self::Upstream { message } => Self::Upstream {
                message: format!("{operation}: {message}"),
            },
            Self::Parse { message } => Self::Parse {
                message: format!("{operation}: {message}"),
            },
            other => other,
        }
    }
}

/// Structured error object written to standard error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Short error kind, see [`FetchError::kind`].
    pub error: &'static str,
    /// Optional human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&FetchError> for ErrorReport {
    fn from(error: &FetchError) -> Self {
        Self {
            error: error.kind(),
            details: Some(error.to_string()),
        }
    }
}
