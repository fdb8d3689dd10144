//! Interprets HTTP status and body into domain values or typed failures.
//!
//! Any non-2xx status becomes [`ClientError::RemoteApi`]; a 2xx body that
//! does not match the expected document becomes [`ClientError::Decode`].

use serde::de::DeserializeOwned;

use super::error::ClientError;
use super::models::api::{ApiActivity, ApiCreated, ApiErrorDocument, ApiPage, ApiPullRequest};
use super::models::{ActivityEntry, PullRequestDetail, PullRequestSummary};
use super::target::PullRequestId;
use super::transport::RawResponse;

/// One decoded page of a paginated collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage<T> {
    /// Items on this page, in service order.
    pub items: Vec<T>,
    /// Total item count across all pages, when the service reports it.
    pub size: Option<u64>,
    /// Link to the following page, when there is one.
    pub next: Option<String>,
}

/// Fails with [`ClientError::RemoteApi`] unless the status is 2xx.
///
/// # Errors
///
/// Returns [`ClientError::RemoteApi`] carrying the status code and status
/// text, followed by Bitbucket's error message when the body has one.
pub fn ensure_success(response: &RawResponse) -> Result<(), ClientError> {
    if response.status.is_success() {
        return Ok(());
    }

    let reason = response
        .status
        .canonical_reason()
        .unwrap_or("Unknown Status");
    let message = match service_message(&response.body) {
        Some(detail) => format!("{reason}: {detail}"),
        None => reason.to_owned(),
    };
    Err(ClientError::RemoteApi {
        status: response.status.as_u16(),
        message,
    })
}

/// Decodes a single pull request with its participants.
///
/// # Errors
///
/// Returns [`ClientError::RemoteApi`] for non-2xx responses and
/// [`ClientError::Decode`] when the body is not a pull request document.
pub fn decode_detail(operation: &str, response: &RawResponse) -> Result<PullRequestDetail, ClientError> {
    decode_json::<ApiPullRequest>(operation, response)?
        .into_detail()
        .map_err(|message| ClientError::decode(operation, message))
}

/// Decodes one page of pull request summaries.
///
/// # Errors
///
/// Returns [`ClientError::RemoteApi`] for non-2xx responses and
/// [`ClientError::Decode`] when the page or any item is malformed.
pub fn decode_summary_page(
    operation: &str,
    response: &RawResponse,
) -> Result<DecodedPage<PullRequestSummary>, ClientError> {
    let page: ApiPage<ApiPullRequest> = decode_json(operation, response)?;
    let items = page
        .values
        .into_iter()
        .map(ApiPullRequest::into_summary)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|message| ClientError::decode(operation, message))?;

    Ok(DecodedPage {
        items,
        size: page.size,
        next: page.next,
    })
}

/// Decodes one page of activity, rejecting ambiguous entries.
///
/// Each item must carry exactly one populated `update` or `comment` object.
///
/// # Errors
///
/// Returns [`ClientError::RemoteApi`] for non-2xx responses and
/// [`ClientError::Decode`] naming the offending entry when an item has
/// neither or both sub-objects.
pub fn decode_activity_page(
    operation: &str,
    response: &RawResponse,
) -> Result<DecodedPage<ActivityEntry>, ClientError> {
    let page: ApiPage<ApiActivity> = decode_json(operation, response)?;
    let items = page
        .values
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .into_entry()
                .map_err(|message| ClientError::decode(operation, format!("entry {index}: {message}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedPage {
        items,
        size: page.size,
        next: page.next,
    })
}

/// Decodes the identifier of a newly created pull request.
///
/// # Errors
///
/// Returns [`ClientError::RemoteApi`] for non-2xx responses and
/// [`ClientError::Decode`] when the body lacks a positive `id`.
pub fn decode_created(operation: &str, response: &RawResponse) -> Result<PullRequestId, ClientError> {
    let created: ApiCreated = decode_json(operation, response)?;
    PullRequestId::new(created.id).map_err(|error| ClientError::decode(operation, error.to_string()))
}

fn decode_json<T: DeserializeOwned>(operation: &str, response: &RawResponse) -> Result<T, ClientError> {
    ensure_success(response)?;
    serde_json::from_str(&response.body).map_err(|error| ClientError::decode(operation, error.to_string()))
}

fn service_message(body: &str) -> Option<String> {
    let document = serde_json::from_str::<ApiErrorDocument>(body).ok()?;
    let message = document.error.message.trim().to_owned();
    if message.is_empty() {
        return None;
    }
    Some(match document.error.detail {
        Some(detail) if !detail.trim().is_empty() => format!("{message} ({})", detail.trim()),
        _ => message,
    })
}
