//! Blocking client for the Bitbucket pull request resource.
//!
//! Every operation takes the credential and repository target explicitly, so
//! one client can serve concurrent callers acting as different principals.
//! Operations issue their HTTP calls one at a time and never retry.

use std::collections::HashSet;

use super::decode::{
    decode_activity_page, decode_created, decode_detail, decode_summary_page, ensure_success,
};
use super::error::ClientError;
use super::models::{ActivityEntry, CreatePullRequest, PullRequestDetail, PullRequestSummary};
use super::options::CallOptions;
use super::request::{ApiRoot, Operation, PreparedRequest, prepare, prepare_next_page};
use super::target::{Credential, PullRequestId, RepositoryTarget};
use super::transport::{HttpTransport, RawResponse, ReqwestTransport};

/// Operations available on a repository's pull requests.
pub trait PullRequestApi: Send + Sync {
    /// Lists open pull requests, following every page of the listing.
    ///
    /// # Errors
    ///
    /// Returns the first transport, remote, or decode failure encountered.
    fn list_requests(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        options: &CallOptions,
    ) -> Result<Vec<PullRequestSummary>, ClientError>;

    /// Fetches one pull request with its reviewers.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RemoteApi`] when the pull request is not
    /// visible, or another failure from the exchange.
    fn get_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<PullRequestDetail, ClientError>;

    /// Approves the pull request as the credential's principal.
    ///
    /// # Errors
    ///
    /// Returns the failure reported by the exchange.
    fn approve_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<(), ClientError>;

    /// Withdraws the principal's approval.
    ///
    /// # Errors
    ///
    /// Returns the failure reported by the exchange.
    fn unapprove_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<(), ClientError>;

    /// Declines the pull request.
    ///
    /// # Errors
    ///
    /// Returns the failure reported by the exchange.
    fn decline_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<(), ClientError>;

    /// Merges the pull request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RemoteApi`] when merge preconditions are unmet,
    /// or another failure from the exchange.
    fn merge_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<(), ClientError>;

    /// Fetches the activity feed, oldest entry first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] when an entry is neither a single
    /// update nor a single comment, or another failure from the exchange.
    fn activity_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<Vec<ActivityEntry>, ClientError>;

    /// Opens a new pull request and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RemoteApi`] when Bitbucket rejects the payload,
    /// or another failure from the exchange.
    fn create_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        request: &CreatePullRequest,
        options: &CallOptions,
    ) -> Result<PullRequestId, ClientError>;
}

/// [`PullRequestApi`] implementation backed by an [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct BitbucketClient<T = ReqwestTransport> {
    root: ApiRoot,
    transport: T,
}

impl BitbucketClient<ReqwestTransport> {
    /// Client for Bitbucket Cloud using the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when the HTTP client cannot be
    /// built.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_root(ApiRoot::bitbucket_cloud()?)
    }

    /// Client for a custom API root using the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when the HTTP client cannot be
    /// built.
    pub fn with_root(root: ApiRoot) -> Result<Self, ClientError> {
        Ok(Self::with_transport(root, ReqwestTransport::new()?))
    }
}

impl<T: HttpTransport> BitbucketClient<T> {
    /// Client using the supplied transport.
    #[must_use]
    pub const fn with_transport(root: ApiRoot, transport: T) -> Self {
        Self { root, transport }
    }

    /// API root requests are resolved against.
    #[must_use]
    pub const fn root(&self) -> &ApiRoot {
        &self.root
    }

    fn send(
        &self,
        operation: &str,
        request: &PreparedRequest,
        options: &CallOptions,
    ) -> Result<RawResponse, ClientError> {
        options.ensure_not_cancelled()?;
        tracing::debug!(
            operation,
            method = %request.method(),
            path = request.url().path(),
            "sending Bitbucket request"
        );
        self.transport.execute(request, options.timeout())
    }

    fn execute(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        operation: &Operation<'_>,
        options: &CallOptions,
    ) -> Result<RawResponse, ClientError> {
        let request = prepare(&self.root, credential, target, operation)?;
        self.send(operation.name(), &request, options)
    }

    fn execute_action(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        operation: &Operation<'_>,
        options: &CallOptions,
    ) -> Result<(), ClientError> {
        let response = self.execute(credential, target, operation, options)?;
        ensure_success(&response)
    }
}

impl<T: HttpTransport> PullRequestApi for BitbucketClient<T> {
    fn list_requests(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        options: &CallOptions,
    ) -> Result<Vec<PullRequestSummary>, ClientError> {
        let mut pull_requests = Vec::new();
        let mut page = 1_u32;

        loop {
            let operation = Operation::List { page };
            let response = self.execute(credential, target, &operation, options)?;
            let decoded = decode_summary_page(operation.name(), &response)?;
            let page_was_empty = decoded.items.is_empty();
            pull_requests.extend(decoded.items);

            let collected = u64::try_from(pull_requests.len()).unwrap_or(u64::MAX);
            let exhausted = match decoded.size {
                Some(size) => collected >= size,
                None => decoded.next.is_none(),
            };
            if page_was_empty || exhausted {
                break;
            }

            page = page.checked_add(1).ok_or_else(|| {
                ClientError::decode(operation.name(), "page counter overflowed")
            })?;
        }

        Ok(pull_requests)
    }

    fn get_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<PullRequestDetail, ClientError> {
        let operation = Operation::Get(id);
        let response = self.execute(credential, target, &operation, options)?;
        decode_detail(operation.name(), &response)
    }

    fn approve_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<(), ClientError> {
        self.execute_action(credential, target, &Operation::Approve(id), options)
    }

    fn unapprove_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<(), ClientError> {
        self.execute_action(credential, target, &Operation::Unapprove(id), options)
    }

    fn decline_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<(), ClientError> {
        self.execute_action(credential, target, &Operation::Decline(id), options)
    }

    fn merge_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<(), ClientError> {
        self.execute_action(credential, target, &Operation::Merge(id), options)
    }

    fn activity_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        id: PullRequestId,
        options: &CallOptions,
    ) -> Result<Vec<ActivityEntry>, ClientError> {
        let operation = Operation::Activity(id);
        let name = operation.name();
        let mut request = prepare(&self.root, credential, target, &operation)?;
        let mut visited = HashSet::new();
        let mut entries = Vec::new();

        loop {
            visited.insert(request.url().as_str().to_owned());
            let response = self.send(name, &request, options)?;
            let decoded = decode_activity_page(name, &response)?;
            entries.extend(decoded.items);

            let Some(next) = decoded.next else {
                break;
            };
            request = prepare_next_page(&self.root, credential, name, &next)?;
            if visited.contains(request.url().as_str()) {
                return Err(ClientError::decode(
                    name,
                    format!("next link `{next}` repeats a page already fetched"),
                ));
            }
        }

        entries.sort_by_key(ActivityEntry::occurred_at);
        Ok(entries)
    }

    fn create_request(
        &self,
        credential: &Credential,
        target: &RepositoryTarget,
        request: &CreatePullRequest,
        options: &CallOptions,
    ) -> Result<PullRequestId, ClientError> {
        let operation = Operation::Create(request);
        let response = self.execute(credential, target, &operation, options)?;
        decode_created(operation.name(), &response)
    }
}
