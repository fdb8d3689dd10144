//! Request construction for the pull request resource.
//!
//! Builds the method, URL, headers, and body for each operation without
//! performing any I/O. URLs are assembled segment by segment so workspace and
//! repository names are always percent-encoded and never produce `//`.

use base64::prelude::{BASE64_STANDARD, Engine as _};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use http::Method;
use url::Url;

use super::error::ClientError;
use super::models::CreatePullRequest;
use super::models::api::ApiCreatePullRequest;
use super::target::{Credential, PullRequestId, RepositoryTarget};

/// Public Bitbucket Cloud REST root.
pub const DEFAULT_API_ROOT: &str = "https://api.bitbucket.org/2.0";

/// Validated API root URL every resource path is appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoot(Url);

impl ApiRoot {
    /// Parses an absolute `http` or `https` root such as
    /// `https://api.bitbucket.org/2.0`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] when the value is not an absolute
    /// HTTP(S) URL that can carry a path.
    pub fn parse(value: &str) -> Result<Self, ClientError> {
        let mut url = Url::parse(value.trim()).map_err(|error| {
            ClientError::invalid_input(format!("API root `{value}` is not a URL: {error}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ClientError::invalid_input(format!(
                "API root `{value}` must be an http(s) URL"
            )));
        }
        let trimmed = url.path().trim_end_matches('/').to_owned();
        url.set_path(&trimmed);
        Ok(Self(url))
    }

    /// The public Bitbucket Cloud root, [`DEFAULT_API_ROOT`].
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature mirrors [`ApiRoot::parse`].
    pub fn bitbucket_cloud() -> Result<Self, ClientError> {
        Self::parse(DEFAULT_API_ROOT)
    }

    /// Borrow the root URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }

    /// True when `other` shares scheme, host, and port with the root.
    pub(crate) fn same_origin(&self, other: &Url) -> bool {
        self.0.origin() == other.origin()
    }
}

/// One pull request action, carrying what its URL and body need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'payload> {
    /// `GET /pullrequests?page=N`.
    List {
        /// 1-based page number.
        page: u32,
    },
    /// `GET /pullrequests/<id>`.
    Get(PullRequestId),
    /// `POST /pullrequests/<id>/approve`.
    Approve(PullRequestId),
    /// `DELETE /pullrequests/<id>/approve`.
    Unapprove(PullRequestId),
    /// `POST /pullrequests/<id>/decline`.
    Decline(PullRequestId),
    /// `POST /pullrequests/<id>/merge`.
    Merge(PullRequestId),
    /// `GET /pullrequests/<id>/activity` (first page).
    Activity(PullRequestId),
    /// `POST /pullrequests` with a JSON body.
    Create(&'payload CreatePullRequest),
}

impl Operation<'_> {
    /// HTTP method used by the operation.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::List { .. } | Self::Get(_) | Self::Activity(_) => Method::GET,
            Self::Approve(_) | Self::Decline(_) | Self::Merge(_) | Self::Create(_) => Method::POST,
            Self::Unapprove(_) => Method::DELETE,
        }
    }

    /// Short human-readable name used in errors and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list pull requests",
            Self::Get(_) => "get pull request",
            Self::Approve(_) => "approve pull request",
            Self::Unapprove(_) => "unapprove pull request",
            Self::Decline(_) => "decline pull request",
            Self::Merge(_) => "merge pull request",
            Self::Activity(_) => "pull request activity",
            Self::Create(_) => "create pull request",
        }
    }

    fn id_and_action(&self) -> Option<(PullRequestId, Option<&'static str>)> {
        match self {
            Self::List { .. } | Self::Create(_) => None,
            Self::Get(id) => Some((*id, None)),
            Self::Approve(id) | Self::Unapprove(id) => Some((*id, Some("approve"))),
            Self::Decline(id) => Some((*id, Some("decline"))),
            Self::Merge(id) => Some((*id, Some("merge"))),
            Self::Activity(id) => Some((*id, Some("activity"))),
        }
    }
}

/// Fully formed request ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl PreparedRequest {
    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute request URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers, including `Authorization`.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Serialised JSON body for write operations that carry one.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Resolves `<root>/repositories/<workspace>/<repo>/pullrequests<suffix>`.
#[must_use]
pub fn resource_url(root: &ApiRoot, target: &RepositoryTarget, operation: &Operation<'_>) -> Url {
    let mut url = root.as_url().clone();
    url.set_query(None);
    url.set_fragment(None);

    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend([
            "repositories",
            target.workspace().as_str(),
            target.repository().as_str(),
            "pullrequests",
        ]);
        if let Some((id, action)) = operation.id_and_action() {
            segments.push(&id.get().to_string());
            if let Some(action_segment) = action {
                segments.push(action_segment);
            }
        }
    }

    if let Operation::List { page } = operation {
        url.query_pairs_mut().append_pair("page", &page.to_string());
    }
    url
}

/// Builds the authenticated request for `operation` against `target`.
///
/// # Errors
///
/// Returns [`ClientError::InvalidInput`] when the credential cannot be
/// encoded as a header, or [`ClientError::Decode`] when the create payload
/// fails to serialise.
pub fn prepare(
    root: &ApiRoot,
    credential: &Credential,
    target: &RepositoryTarget,
    operation: &Operation<'_>,
) -> Result<PreparedRequest, ClientError> {
    let body = match operation {
        Operation::Create(payload) => Some(
            serde_json::to_vec(&ApiCreatePullRequest::from(*payload))
                .map_err(|error| ClientError::decode(operation.name(), error.to_string()))?,
        ),
        _ => None,
    };

    Ok(PreparedRequest {
        method: operation.method(),
        url: resource_url(root, target, operation),
        headers: build_headers(credential, body.is_some())?,
        body,
    })
}

/// Builds a `GET` for a pagination link returned by the service.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] when the link is not a URL on the same
/// origin as `root`, so credentials never travel to another host.
pub(crate) fn prepare_next_page(
    root: &ApiRoot,
    credential: &Credential,
    operation_name: &str,
    next: &str,
) -> Result<PreparedRequest, ClientError> {
    let url = Url::parse(next).map_err(|error| {
        ClientError::decode(operation_name, format!("invalid next link `{next}`: {error}"))
    })?;
    if !root.same_origin(&url) {
        return Err(ClientError::decode(
            operation_name,
            format!("next link `{next}` points outside the API root"),
        ));
    }

    Ok(PreparedRequest {
        method: Method::GET,
        url,
        headers: build_headers(credential, false)?,
        body: None,
    })
}

fn build_headers(credential: &Credential, has_body: bool) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization_value(credential)?);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if has_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    Ok(headers)
}

fn authorization_value(credential: &Credential) -> Result<HeaderValue, ClientError> {
    let raw = match credential {
        Credential::Token(token) => format!("Bearer {}", token.value()),
        Credential::Basic { username, password } => {
            let encoded = BASE64_STANDARD.encode(format!("{username}:{password}"));
            format!("Basic {encoded}")
        }
    };
    let mut value = HeaderValue::from_str(&raw).map_err(|_| {
        ClientError::invalid_input("credential contains characters not allowed in a header")
    })?;
    value.set_sensitive(true);
    Ok(value)
}
