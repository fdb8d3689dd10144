//! Support modules for the single pull request BDD tests.

#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use runtime::{mount, received_request_count};
pub(crate) use state::{ActionState, activity_path, client_for, pull_request_path};
