//! Process-level tests for the `gitlab-mr-fetch` binary.
//!
//! These spawn the binary with a hermetic environment and check exit status,
//! stdout, and the structured error object on stderr.

mod support;

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rstest::rstest;
use serde_json::{Value, json};

use support::create_temp_dir;

/// Returns the path to the built binary.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gitlab-mr-fetch"))
}

fn run_fetch(args: &[&str], home: &Path) -> Output {
    Command::new(binary_path())
        .args(args)
        .env_remove("MR_FETCH_PROJECT")
        .env_remove("MR_FETCH_SUMMARY")
        .env_remove("MR_FETCH_GLAB_COMMAND")
        .env_remove("MR_FETCH_API_URL")
        .env_remove("MR_FETCH_TOKEN")
        .env_remove("MR_FETCH_LOG")
        .env_remove("GITLAB_TOKEN")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .current_dir(home)
        .output()
        .unwrap_or_else(|error| panic!("failed to execute binary: {error}"))
}

fn stderr_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stderr).unwrap_or_else(|error| {
        panic!(
            "stderr should be a JSON error object ({error}): {}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

fn assert_failure_kind(output: &Output, kind: &str) {
    assert_eq!(output.status.code(), Some(1), "expected exit code 1");
    assert!(output.stdout.is_empty(), "stdout should be empty on failure");
    assert_eq!(stderr_json(output)["error"], json!(kind));
}

#[test]
fn missing_number_is_reported() {
    let home = create_temp_dir();
    let output = run_fetch(&[], home.path());
    assert_failure_kind(&output, "MissingArgument");
}

#[rstest]
#[case::letters("abc")]
#[case::zero("0")]
#[case::negative("-7")]
fn invalid_number_is_reported(#[case] argument: &str) {
    let home = create_temp_dir();
    let output = run_fetch(&[argument], home.path());

    assert_failure_kind(&output, "InvalidArgument");
    let details = stderr_json(&output)["details"]
        .as_str()
        .map(str::to_owned)
        .unwrap_or_default();
    assert!(details.contains(argument), "details should echo {argument}: {details}");
}

#[test]
fn absent_glab_is_a_missing_dependency() {
    let home = create_temp_dir();
    let missing = home.path().join("no-such-glab");
    let missing_arg = missing.to_string_lossy().to_string();

    let output = run_fetch(&["42", "--glab-command", &missing_arg], home.path());

    assert_failure_kind(&output, "MissingDependency");
}

#[cfg(unix)]
mod with_fake_glab {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use serde_json::{Value, json};

    use super::{assert_failure_kind, create_temp_dir, run_fetch};

    /// Script answering `glab api <path>` from `<last path segment>.json`
    /// next to itself, or failing like glab does when no file matches.
    /// Every invocation is appended to `requests.log`.
    const FAKE_GLAB: &str = r#"#!/bin/sh
dir=$(dirname "$0")
echo "$1 $2" >> "$dir/requests.log"
name=$(basename "$2")
if [ -f "$dir/$name.json" ]; then
  cat "$dir/$name.json"
else
  echo "glab: 404 Not Found" >&2
  exit 1
fi
"#;

    fn install_fake_glab(dir: &Path, responses: &[(&str, Value)]) -> PathBuf {
        for (name, body) in responses {
            fs::write(dir.join(format!("{name}.json")), body.to_string())
                .unwrap_or_else(|error| panic!("failed to write {name}.json: {error}"));
        }
        let script = dir.join("glab");
        fs::write(&script, FAKE_GLAB)
            .unwrap_or_else(|error| panic!("failed to write fake glab: {error}"));
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .unwrap_or_else(|error| panic!("failed to mark fake glab executable: {error}"));
        script
    }

    fn full_responses() -> Vec<(&'static str, Value)> {
        vec![
            (
                "7849",
                json!({
                    "iid": 7849,
                    "title": "Tighten retry budget",
                    "state": "opened",
                    "merge_status": "can_be_merged",
                    "author": { "name": "Ada Lovelace", "username": "ada" },
                    "created_at": "2024-04-02T08:15:00Z",
                    "updated_at": "2024-04-03T10:00:00Z"
                }),
            ),
            (
                "discussions",
                json!([
                    {
                        "id": "d1",
                        "notes": [
                            { "id": 1, "system": true, "body": "added 1 commit" },
                            {
                                "id": 2,
                                "type": "DiffNote",
                                "body": "Off by one?",
                                "resolvable": true,
                                "resolved": false,
                                "position": { "new_path": "src/retry.rs", "new_line": 9 }
                            }
                        ]
                    },
                    { "id": "d2", "notes": [{ "id": 1, "system": true }] }
                ]),
            ),
            (
                "approvals",
                json!({
                    "approvals_required": 2,
                    "approvals_left": 0,
                    "approved_by": [
                        { "user": { "name": "Grace Hopper", "username": "grace" } },
                        { "user": { "name": "Alan Turing", "username": "alan" } }
                    ]
                }),
            ),
        ]
    }

    fn parse_stdout(stdout: &[u8]) -> Value {
        serde_json::from_slice(stdout).unwrap_or_else(|error| {
            panic!(
                "stdout should be JSON ({error}): {}",
                String::from_utf8_lossy(stdout)
            )
        })
    }

    #[test]
    fn full_report_is_written_to_stdout() {
        let home = create_temp_dir();
        let glab = install_fake_glab(home.path(), &full_responses());
        let glab_arg = glab.to_string_lossy().to_string();

        let output = run_fetch(&["7849", "--glab-command", &glab_arg], home.path());

        assert!(
            output.status.success(),
            "expected success, stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert!(output.stdout.ends_with(b"}\n"), "report should end with a newline");
        let report = parse_stdout(&output.stdout);
        assert_eq!(report["mr"]["iid"], json!(7849));
        assert_eq!(report["mr"]["status"], json!("can_be_merged"));
        assert_eq!(
            report["discussions"].as_array().map(Vec::len),
            Some(1),
            "system-only discussion should be dropped"
        );
        assert_eq!(report["approvals"]["approved_by"][1]["username"], json!("alan"));
        assert_eq!(
            report["summary"],
            json!({
                "total_comments": 1,
                "unresolved_threads": 1,
                "diff_comments": 1,
                "general_comments": 0
            })
        );
    }

    #[test]
    fn summary_flag_prints_counts_only() {
        let home = create_temp_dir();
        let glab = install_fake_glab(home.path(), &full_responses());
        let glab_arg = glab.to_string_lossy().to_string();

        let output = run_fetch(
            &["--summary", "--glab-command", &glab_arg, "7849"],
            home.path(),
        );

        assert!(output.status.success(), "expected success");
        assert_eq!(
            parse_stdout(&output.stdout),
            json!({
                "total_comments": 1,
                "unresolved_threads": 1,
                "diff_comments": 1,
                "general_comments": 0
            })
        );
    }

    #[test]
    fn missing_endpoint_is_not_found() {
        let home = create_temp_dir();
        let mut responses = full_responses();
        responses.retain(|(name, _)| *name != "approvals");
        let glab = install_fake_glab(home.path(), &responses);
        let glab_arg = glab.to_string_lossy().to_string();

        let output = run_fetch(&["7849", "--glab-command", &glab_arg], home.path());

        assert_failure_kind(&output, "NotFound");
    }

    #[test]
    fn malformed_discussions_are_a_parse_failure() {
        let home = create_temp_dir();
        let mut responses = full_responses();
        for (name, body) in &mut responses {
            if *name == "discussions" {
                *body = json!({ "message": "unexpected" });
            }
        }
        let glab = install_fake_glab(home.path(), &responses);
        let glab_arg = glab.to_string_lossy().to_string();

        let output = run_fetch(&["7849", "--glab-command", &glab_arg], home.path());

        assert_failure_kind(&output, "ParseFailure");
    }

    #[test]
    fn project_flag_is_encoded_into_every_request() {
        let home = create_temp_dir();
        let glab = install_fake_glab(home.path(), &full_responses());
        let glab_arg = glab.to_string_lossy().to_string();

        let output = run_fetch(
            &["--project=group/app", "7849", "--glab-command", &glab_arg],
            home.path(),
        );

        assert!(
            output.status.success(),
            "custom project should still resolve, stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let log = fs::read_to_string(home.path().join("requests.log"))
            .unwrap_or_else(|error| panic!("fake glab should log requests: {error}"));
        let mut requests: Vec<&str> = log.lines().collect();
        requests.sort_unstable();
        assert_eq!(
            requests,
            vec![
                "api projects/group%2Fapp/merge_requests/7849",
                "api projects/group%2Fapp/merge_requests/7849/approvals",
                "api projects/group%2Fapp/merge_requests/7849/discussions",
            ]
        );
    }
}
