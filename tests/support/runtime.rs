//! Tokio runtime and Wiremock server shared by behavioural tests.
//!
//! The client under test is blocking, so steps call it directly on the test
//! thread while the multi-threaded runtime keeps serving the mock server.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use bbpr::ApiRoot;
use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// Shared runtime wrapper that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Ensures a Tokio runtime and Wiremock server are initialised.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created or if the slots behave unexpectedly.
pub fn ensure_runtime_and_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<SharedRuntime, io::Error> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(SharedRuntime::new(Runtime::new()?));
    }

    let shared_runtime = runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime not initialised after set"))?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared_runtime.block_on(MockServer::start()));
    }

    Ok(shared_runtime)
}

/// Mounts `mock` on the scenario's server, starting both if needed.
///
/// # Panics
///
/// Panics if the runtime or server cannot be initialised.
pub fn mount(runtime: &Slot<SharedRuntime>, server: &Slot<MockServer>, mock: Mock) {
    let shared_runtime = ensure_runtime_and_server(runtime, server)
        .unwrap_or_else(|error| panic!("failed to start mock server: {error}"));
    server
        .with_ref(|mock_server| shared_runtime.block_on(mock.mount(mock_server)))
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

/// API root pointing at the scenario's mock server.
///
/// # Panics
///
/// Panics if the server has not been started.
pub fn mock_api_root(server: &Slot<MockServer>) -> ApiRoot {
    let uri = server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server not initialised"));
    ApiRoot::parse(&format!("{uri}/2.0"))
        .unwrap_or_else(|error| panic!("mock API root should parse: {error}"))
}

/// Number of requests the mock server has received.
///
/// # Panics
///
/// Panics if the server has not been started or does not record requests.
pub fn received_request_count(runtime: &Slot<SharedRuntime>, server: &Slot<MockServer>) -> usize {
    let shared_runtime = runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised"));
    server
        .with_ref(|mock_server| shared_runtime.block_on(mock_server.received_requests()))
        .flatten()
        .unwrap_or_else(|| panic!("request recording unavailable"))
        .len()
}
