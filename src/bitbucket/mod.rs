//! Bitbucket Cloud pull request client.
//!
//! The client turns one pull request action into one authenticated HTTP
//! exchange against `/repositories/<workspace>/<repo>/pullrequests`, decodes
//! the result into domain types, and reports failures through
//! [`ClientError`]. Credentials and targets are passed to every call so a
//! single client can be shared freely between threads.

pub mod client;
pub mod decode;
pub mod error;
pub mod models;
pub mod options;
pub mod request;
pub mod target;
pub mod transport;

pub use client::{BitbucketClient, PullRequestApi};
pub use error::{ClientError, TransportFailureKind};
pub use models::{
    ActivityEntry, BranchRef, CommentActivity, CreatePullRequest, PullRequestDetail,
    PullRequestSummary, Reviewer, UpdateActivity, User,
};
pub use options::{CallOptions, CancellationToken};
pub use request::{ApiRoot, DEFAULT_API_ROOT};
pub use target::{
    AccessToken, Credential, PullRequestId, RepositorySlug, RepositoryTarget, Workspace,
};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};

