//! Shared test utilities for CLI tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bbpr::bitbucket::{
    ActivityEntry, CallOptions, CreatePullRequest, PullRequestApi, PullRequestDetail,
    PullRequestSummary,
};
use bbpr::{ClientError, Credential, PullRequestId, RepositoryTarget};

/// Client operation recorded by [`FakeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `list_requests`.
    List,
    /// `get_request` with the id.
    Get(u64),
    /// `approve_request` with the id.
    Approve(u64),
    /// `unapprove_request` with the id.
    Unapprove(u64),
    /// `decline_request` with the id.
    Decline(u64),
    /// `merge_request` with the id.
    Merge(u64),
    /// `activity_request` with the id.
    Activity(u64),
    /// `create_request` with the payload.
    Create(CreatePullRequest),
}

/// A fake client that records its calls and serves canned responses.
#[derive(Clone, Default)]
pub struct FakeClient {
    /// Calls received, in order.
    pub calls: Arc<Mutex<Vec<Call>>>,
    /// Details served by `get_request`, also summarised by `list_requests`.
    pub details: Vec<PullRequestDetail>,
    /// Entries served by `activity_request`.
    pub activity: Vec<ActivityEntry>,
    /// Error returned by every operation when set.
    pub failure: Option<ClientError>,
}

impl FakeClient {
    /// Fake serving the given pull requests.
    pub fn with_details(details: Vec<PullRequestDetail>) -> Self {
        Self {
            details,
            ..Self::default()
        }
    }

    /// Fake whose every operation fails with `error`.
    pub fn failing(error: ClientError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Snapshot of the calls received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .expect("calls mutex should be available")
            .clone()
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        self.calls
            .lock()
            .expect("calls mutex should be available")
            .push(call);
        self.failure.clone().map_or(Ok(()), Err)
    }

    fn by_id(&self) -> HashMap<u64, &PullRequestDetail> {
        self.details
            .iter()
            .map(|detail| (detail.summary.id.get(), detail))
            .collect()
    }
}

impl PullRequestApi for FakeClient {
    fn list_requests(
        &self,
        _credential: &Credential,
        _target: &RepositoryTarget,
        _options: &CallOptions,
    ) -> Result<Vec<PullRequestSummary>, ClientError> {
        self.record(Call::List)?;
        Ok(self
            .details
            .iter()
            .map(|detail| detail.summary.clone())
            .collect())
    }

    fn get_request(
        &self,
        _credential: &Credential,
        _target: &RepositoryTarget,
        id: PullRequestId,
        _options: &CallOptions,
    ) -> Result<PullRequestDetail, ClientError> {
        self.record(Call::Get(id.get()))?;
        self.by_id()
            .get(&id.get())
            .map(|detail| (*detail).clone())
            .ok_or_else(|| ClientError::RemoteApi {
                status: 404,
                message: "Not Found".to_owned(),
            })
    }

    fn approve_request(
        &self,
        _credential: &Credential,
        _target: &RepositoryTarget,
        id: PullRequestId,
        _options: &CallOptions,
    ) -> Result<(), ClientError> {
        self.record(Call::Approve(id.get()))
    }

    fn unapprove_request(
        &self,
        _credential: &Credential,
        _target: &RepositoryTarget,
        id: PullRequestId,
        _options: &CallOptions,
    ) -> Result<(), ClientError> {
        self.record(Call::Unapprove(id.get()))
    }

    fn decline_request(
        &self,
        _credential: &Credential,
        _target: &RepositoryTarget,
        id: PullRequestId,
        _options: &CallOptions,
    ) -> Result<(), ClientError> {
        self.record(Call::Decline(id.get()))
    }

    fn merge_request(
        &self,
        _credential: &Credential,
        _target: &RepositoryTarget,
        id: PullRequestId,
        _options: &CallOptions,
    ) -> Result<(), ClientError> {
        self.record(Call::Merge(id.get()))
    }

    fn activity_request(
        &self,
        _credential: &Credential,
        _target: &RepositoryTarget,
        id: PullRequestId,
        _options: &CallOptions,
    ) -> Result<Vec<ActivityEntry>, ClientError> {
        self.record(Call::Activity(id.get()))?;
        Ok(self.activity.clone())
    }

    fn create_request(
        &self,
        _credential: &Credential,
        _target: &RepositoryTarget,
        request: &CreatePullRequest,
        _options: &CallOptions,
    ) -> Result<PullRequestId, ClientError> {
        self.record(Call::Create(request.clone()))?;
        PullRequestId::new(42)
    }
}
