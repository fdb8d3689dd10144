//! bbpr library crate for working with Bitbucket Cloud pull requests.
//!
//! The library builds authenticated requests for the pull request resource,
//! decodes Bitbucket's JSON into typed models, and surfaces transport, remote,
//! and decoding failures as distinct error variants the CLI can render.

pub mod bitbucket;
pub mod config;

pub use bitbucket::{
    ActivityEntry, ApiRoot, BitbucketClient, CallOptions, CancellationToken, ClientError,
    CreatePullRequest, Credential, PullRequestApi, PullRequestDetail, PullRequestId,
    PullRequestSummary, RepositoryTarget,
};
pub use config::{Action, BbprConfig};
