//! Actions on a single pull request.

use std::io::Write;

use bbpr::bitbucket::{CreatePullRequest, PullRequestApi};
use bbpr::config::Action;
use bbpr::{ClientError, PullRequestId};

use super::Session;
use super::output::{write_activity, write_created, write_detail, write_transition};

/// Prints one pull request in full.
///
/// # Errors
///
/// Returns the client or output failure.
pub fn show<C: PullRequestApi, W: Write>(
    client: &C,
    session: &Session,
    id: PullRequestId,
    writer: &mut W,
) -> Result<(), ClientError> {
    let detail = client.get_request(&session.credential, &session.target, id, &session.options)?;
    write_detail(writer, &detail)
}

/// Approves, unapproves, declines, or merges a pull request.
///
/// # Errors
///
/// Returns [`ClientError::Configuration`] for actions that are not state
/// changes, or the client or output failure.
pub fn transition<C: PullRequestApi, W: Write>(
    client: &C,
    session: &Session,
    action: Action,
    id: PullRequestId,
    writer: &mut W,
) -> Result<(), ClientError> {
    let Session {
        credential,
        target,
        options,
    } = session;
    match action {
        Action::Approve => client.approve_request(credential, target, id, options)?,
        Action::Unapprove => client.unapprove_request(credential, target, id, options)?,
        Action::Decline => client.decline_request(credential, target, id, options)?,
        Action::Merge => client.merge_request(credential, target, id, options)?,
        Action::List | Action::Show | Action::Activity | Action::Create => {
            return Err(ClientError::Configuration {
                message: format!("`{action}` does not change a pull request's state"),
            });
        }
    }
    write_transition(writer, action, id)
}

/// Prints a pull request's activity feed, oldest first.
///
/// # Errors
///
/// Returns the client or output failure.
pub fn activity<C: PullRequestApi, W: Write>(
    client: &C,
    session: &Session,
    id: PullRequestId,
    writer: &mut W,
) -> Result<(), ClientError> {
    let entries =
        client.activity_request(&session.credential, &session.target, id, &session.options)?;
    write_activity(writer, id, &entries)
}

/// Opens a pull request and prints its id.
///
/// # Errors
///
/// Returns the client or output failure.
pub fn create<C: PullRequestApi, W: Write>(
    client: &C,
    session: &Session,
    request: &CreatePullRequest,
    writer: &mut W,
) -> Result<(), ClientError> {
    let id = client.create_request(&session.credential, &session.target, request, &session.options)?;
    write_created(writer, id)
}
