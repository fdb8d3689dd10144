//! Scenario state for the pull request listing BDD tests.

use bbpr::bitbucket::models::test_support::{page_json, pull_request_json};
use bbpr::{ClientError, Credential, PullRequestSummary};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::Value;
use wiremock::MockServer;

use super::runtime::SharedRuntime;

#[derive(ScenarioState, Default)]
pub(crate) struct ListingState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) credential: Slot<Credential>,
    pub(crate) result: Slot<Vec<PullRequestSummary>>,
    pub(crate) error: Slot<ClientError>,
}

/// Page `page` (1-based) of `total` pull requests split evenly over `pages`.
pub(crate) fn page_of_pull_requests(total: u64, pages: u32, page: u32) -> Value {
    let per_page = total.div_ceil(u64::from(pages.max(1)));
    let first = per_page * u64::from(page - 1) + 1;
    let last = total.min(per_page * u64::from(page));
    let values = (first..=last)
        .map(|id| pull_request_json(id, &format!("PR #{id}"), "contributor"))
        .collect();
    let pagelen = u32::try_from(per_page.max(1)).unwrap_or(u32::MAX);
    page_json(values, page, pagelen, Some(total), None)
}
