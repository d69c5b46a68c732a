//! Identity wrappers for the merge request being fetched.

use std::fmt;

use super::error::FetchError;

/// Project used when no `--project` is configured.
pub const DEFAULT_PROJECT: &str = "cnty-ai/continuity";

/// Namespaced project path such as `group/subgroup/project`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPath(String);

impl ProjectPath {
    /// Wraps a project path, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] when the path is blank or
    /// contains `%`. GitLab paths never contain `%`, and an already-encoded
    /// path would not survive encoding and decoding unchanged.
    pub fn new(value: impl AsRef<str>) -> Result<Self, FetchError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FetchError::Configuration {
                message: "project path must not be blank".to_owned(),
            });
        }
        if trimmed.contains('%') {
            return Err(FetchError::Configuration {
                message: format!("project path `{trimmed}` must not contain `%`"),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the raw path.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Path with every `/` replaced by `%2F`, ready to embed in an API path.
    #[must_use]
    pub fn encoded(&self) -> String {
        encode_project_path(self.as_str())
    }
}

impl Default for ProjectPath {
    fn default() -> Self {
        Self(DEFAULT_PROJECT.to_owned())
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Replaces `/` with `%2F`. No other character is touched.
#[must_use]
pub fn encode_project_path(path: &str) -> String {
    path.replace('/', "%2F")
}

/// Inverse of [`encode_project_path`].
#[must_use]
pub fn decode_project_path(encoded: &str) -> String {
    encoded.replace("%2F", "/")
}

/// Project-scoped merge request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRequestIid(u64);

impl MergeRequestIid {
    /// Parses a command-line value into an IID.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidArgument`] when the value is not a
    /// positive integer.
    pub fn parse(value: &str) -> Result<Self, FetchError> {
        let invalid = || FetchError::InvalidArgument {
            argument: value.to_owned(),
        };
        let number = value.trim().parse::<u64>().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }
        Ok(Self(number))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MergeRequestIid {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, FetchError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FetchError::Configuration {
                message: "a personal access token is required when --api-url is set".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(..)")
    }
}

/// The three GitLab resources combined into one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /projects/:id/merge_requests/:iid`
    MergeRequest,
    /// `GET /projects/:id/merge_requests/:iid/discussions`
    Discussions,
    /// `GET /projects/:id/merge_requests/:iid/approvals`
    Approvals,
}

impl Endpoint {
    /// Every endpoint, in fan-out order.
    pub const ALL: [Self; 3] = [Self::MergeRequest, Self::Discussions, Self::Approvals];

    /// Human-readable label used in error details and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MergeRequest => "merge request",
            Self::Discussions => "discussions",
            Self::Approvals => "approvals",
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::MergeRequest => "",
            Self::Discussions => "/discussions",
            Self::Approvals => "/approvals",
        }
    }
}

/// Project and IID identifying one merge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestLocator {
    project: ProjectPath,
    iid: MergeRequestIid,
}

impl MergeRequestLocator {
    /// Creates a locator from its parts.
    #[must_use]
    pub const fn new(project: ProjectPath, iid: MergeRequestIid) -> Self {
        Self { project, iid }
    }

    /// Project the merge request belongs to.
    #[must_use]
    pub const fn project(&self) -> &ProjectPath {
        &self.project
    }

    /// Merge request IID.
    #[must_use]
    pub const fn iid(&self) -> MergeRequestIid {
        self.iid
    }

    /// API resource path, relative to the `/api/v4` root, for an endpoint.
    #[must_use]
    pub fn resource_path(&self, endpoint: Endpoint) -> String {
        format!(
            "projects/{project}/merge_requests/{iid}{suffix}",
            project = self.project.encoded(),
            iid = self.iid,
            suffix = endpoint.suffix()
        )
    }
}
