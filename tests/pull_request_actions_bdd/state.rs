//! Scenario state for the single pull request BDD tests.

use bbpr::{ActivityEntry, BitbucketClient, ClientError, Credential};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::MockServer;

use super::runtime::{SharedRuntime, mock_api_root};

#[derive(ScenarioState, Default)]
pub(crate) struct ActionState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) credential: Slot<Credential>,
    pub(crate) completed: Slot<bool>,
    pub(crate) activity: Slot<Vec<ActivityEntry>>,
    pub(crate) error: Slot<ClientError>,
}

/// Mock server path of one pull request, optionally with an action suffix.
pub(crate) fn pull_request_path(id: u64, action: Option<&str>) -> String {
    let base = format!("/2.0/repositories/team/widgets/pullrequests/{id}");
    action.map_or_else(|| base.clone(), |suffix| format!("{base}/{suffix}"))
}

/// Mock server path of a pull request's activity feed.
pub(crate) fn activity_path(id: u64) -> String {
    pull_request_path(id, Some("activity"))
}

/// Client pointed at the scenario's mock server.
pub(crate) fn client_for(state: &ActionState) -> BitbucketClient {
    BitbucketClient::with_root(mock_api_root(&state.server))
        .unwrap_or_else(|error| panic!("client should build: {error}"))
}
