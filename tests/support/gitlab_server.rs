//! Wiremock-backed GitLab API stand-in driven from a shared Tokio runtime.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use serde_json::Value;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path prefix GitLab serves API v4 under.
pub const API_PREFIX: &str = "/api/v4";

/// Runtime handle that can live in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Starts the runtime and mock server on first use and returns the runtime.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created.
pub fn ensure_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<SharedRuntime, io::Error> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(SharedRuntime(Rc::new(RefCell::new(Runtime::new()?))));
    }
    let shared = runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime missing after initialisation"))?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared.block_on(MockServer::start()));
    }
    Ok(shared)
}

/// API path for a merge request resource, `suffix` being `""`,
/// `"/discussions"` or `"/approvals"`.
pub fn merge_request_path(encoded_project: &str, iid: u64, suffix: &str) -> String {
    format!("{API_PREFIX}/projects/{encoded_project}/merge_requests/{iid}{suffix}")
}

/// Mounts a JSON response for `GET resource_path`.
///
/// # Errors
///
/// Returns an error if the server has not been started.
pub fn mount_json(
    runtime: &SharedRuntime,
    server: &Slot<MockServer>,
    resource_path: &str,
    status: u16,
    body: &Value,
) -> Result<(), io::Error> {
    let mock = Mock::given(method("GET"))
        .and(path(resource_path))
        .respond_with(ResponseTemplate::new(status).set_body_json(body));
    server
        .with_ref(|mock_server| runtime.block_on(mock.mount(mock_server)))
        .ok_or_else(|| io::Error::other("mock server not started"))
}
