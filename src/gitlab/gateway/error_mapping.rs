//! Error mapping helpers shared by the gateway implementations.

use std::io;

use http::StatusCode;
use serde_json::Value;

use crate::gitlab::error::FetchError;

/// Checks if a GitLab status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Text that may directly precede an HTTP status in `glab` output.
const STATUS_MARKERS: &[&str] = &["HTTP ", ": ", "("];

/// Maps a failed `glab api` invocation onto the error taxonomy.
///
/// `glab` reports HTTP failures as text (`HTTP 401: Unauthorized`), so the
/// combined output is searched for an anchored status code. Digits inside
/// URLs, IIDs or identifiers never count as a status.
pub(super) fn classify_cli_failure(resource_path: &str, output: &str) -> FetchError {
    let detail = output.trim();
    match status_in_output(detail) {
        Some(status) if is_auth_failure(status) => FetchError::Authentication {
            message: format!("{resource_path} was rejected; run `glab auth login` ({detail})"),
        },
        Some(StatusCode::NOT_FOUND) => FetchError::NotFound {
            message: format!("{resource_path} ({detail})"),
        },
        _ if detail.is_empty() => FetchError::Upstream {
            message: format!("{resource_path} failed without output"),
        },
        _ => FetchError::Upstream {
            message: format!("{resource_path}: {detail}"),
        },
    }
}

/// First three-digit status that starts the output or follows one of
/// [`STATUS_MARKERS`] and is not followed by another alphanumeric.
fn status_in_output(output: &str) -> Option<StatusCode> {
    let bytes = output.as_bytes();
    (0..bytes.len()).find_map(|start| {
        let digits = bytes.get(start..start + 3)?;
        if !digits.iter().all(u8::is_ascii_digit)
            || bytes.get(start + 3).is_some_and(u8::is_ascii_alphanumeric)
        {
            return None;
        }
        let preceding = output.get(..start)?;
        let anchored =
            start == 0 || STATUS_MARKERS.iter().any(|marker| preceding.ends_with(marker));
        if !anchored {
            return None;
        }
        StatusCode::from_bytes(digits).ok()
    })
}

/// Maps a process launch failure; a missing executable is a dependency
/// problem rather than an upstream one.
pub(super) fn map_spawn_error(command: &str, error: &io::Error) -> FetchError {
    if error.kind() == io::ErrorKind::NotFound {
        FetchError::MissingDependency {
            command: command.to_owned(),
        }
    } else {
        FetchError::Upstream {
            message: format!("failed to launch `{command}`: {error}"),
        }
    }
}

pub(super) fn map_http_error(
    resource_path: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> FetchError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_auth_failure(status) {
        FetchError::Authentication {
            message: format!("{resource_path}: GitLab returned {status} {message}"),
        }
    } else if status == StatusCode::NOT_FOUND {
        FetchError::NotFound {
            message: format!("{resource_path}: GitLab returned {status} {message}"),
        }
    } else {
        FetchError::Upstream {
            message: format!("{resource_path} failed with status {status}: {message}"),
        }
    }
}

pub(super) fn map_transport_error(resource_path: &str, error: &reqwest::Error) -> FetchError {
    let cause = if error.is_timeout() {
        "request timed out".to_owned()
    } else if error.is_connect() {
        "failed to connect to GitLab".to_owned()
    } else {
        error.to_string()
    };
    FetchError::Upstream {
        message: format!("{resource_path}: {cause}"),
    }
}

/// Pulls the `message` (or `error`) field out of a GitLab error body.
pub(super) fn extract_gitlab_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    let field = value.get("message").or_else(|| value.get("error"))?;
    match field {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
