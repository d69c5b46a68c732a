//! `gitlab-mr-fetch` CLI entrypoint.
//!
//! Usage: `gitlab-mr-fetch <mr-iid> [--project=<path>] [--summary]`.

use std::env;
use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use gitlab_mr_fetch::{FetchError, MergeRequestIid, MrFetchConfig};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

mod cli;

/// Environment variable holding the log filter directive.
const LOG_FILTER_VARIABLE: &str = "MR_FETCH_LOG";

/// Flags whose following argument is a value rather than a positional.
const VALUE_FLAGS: &[&str] = &[
    "--project",
    "-p",
    "--glab-command",
    "--api-url",
    "--token",
    "-t",
];

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(kind = error.kind(), %error, "fetch failed");
            let mut stderr = io::stderr().lock();
            let _ignored = cli::output::write_error_to(&mut stderr, &error);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), FetchError> {
    let (positional, remaining) = extract_positional_mr_number(env::args_os().collect());
    let iid = parse_mr_number(positional)?;
    let config = load_config(remaining)?;
    cli::fetch::run(&config, iid).await
}

/// Logs go to stderr and stay silent unless `MR_FETCH_LOG` asks for them,
/// so stderr normally carries only the structured error object.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_VARIABLE).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ignored = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Validates the positional merge request number.
fn parse_mr_number(positional: Option<String>) -> Result<MergeRequestIid, FetchError> {
    positional
        .ok_or(FetchError::MissingArgument)
        .and_then(|value| MergeRequestIid::parse(&value))
}

/// Loads configuration from the non-positional arguments, environment, and
/// files.
///
/// # Errors
///
/// Returns [`FetchError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config(args: Vec<OsString>) -> Result<MrFetchConfig, FetchError> {
    MrFetchConfig::load_from_iter(args).map_err(|error| FetchError::Configuration {
        message: error.to_string(),
    })
}

/// Splits the first positional argument from the flags handed to
/// ortho-config.
///
/// The first element is the program name and is always kept. Values of
/// flags listed in [`VALUE_FLAGS`] are never positional; `--` ends flag
/// parsing and is dropped. Arguments that look like negative numbers are
/// positional so that they surface as invalid merge request numbers.
fn extract_positional_mr_number(args: Vec<OsString>) -> (Option<String>, Vec<OsString>) {
    let mut iter = args.into_iter();
    let mut remaining: Vec<OsString> = iter.next().into_iter().collect();
    let mut positional = None;
    let mut flags_ended = false;

    while let Some(arg) = iter.next() {
        let text = arg.to_string_lossy().into_owned();

        if !flags_ended && text == "--" {
            flags_ended = true;
            continue;
        }

        if !flags_ended && is_flag(&text) {
            let takes_value = VALUE_FLAGS.contains(&text.as_str());
            remaining.push(arg);
            if takes_value {
                remaining.extend(iter.next());
            }
            continue;
        }

        if positional.is_none() {
            positional = Some(text);
        } else {
            remaining.push(arg);
        }
    }

    (positional, remaining)
}

fn is_flag(text: &str) -> bool {
    text.len() > 1 && text.starts_with('-') && text.parse::<i64>().is_err()
}
