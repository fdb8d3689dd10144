//! Support modules for the pull request listing BDD tests.

#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use runtime::{mock_api_root, mount, received_request_count};
pub(crate) use state::{ListingState, page_of_pull_requests};
