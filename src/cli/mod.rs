//! CLI action handlers.
//!
//! This module contains the implementations for each action:
//! - [`listing`]: List open pull requests with their approvals
//! - [`pull_request`]: Show, approve, unapprove, decline, merge, activity,
//!   and create
//!
//! Output formatting utilities are in [`output`].

use std::io::Write;

use bbpr::bitbucket::{BitbucketClient, CallOptions, PullRequestApi};
use bbpr::config::Action;
use bbpr::{BbprConfig, ClientError, Credential, RepositoryTarget};

pub mod listing;
pub mod output;
pub mod pull_request;

#[cfg(test)]
pub mod test_utils;

/// Resolved inputs shared by every action.
#[derive(Debug, Clone)]
pub struct Session {
    /// Credential sent with every request.
    pub credential: Credential,
    /// Repository the action addresses.
    pub target: RepositoryTarget,
    /// Deadline applied to each request.
    pub options: CallOptions,
}

impl Session {
    /// Resolves credential, target, and call options from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] or [`ClientError::InvalidInput`]
    /// when required values are missing or malformed.
    pub fn from_config(config: &BbprConfig) -> Result<Self, ClientError> {
        let target = config.require_target()?;
        let credential = config.resolve_credential()?;
        let options = config
            .timeout()
            .map_or_else(CallOptions::new, |deadline| {
                CallOptions::new().with_timeout(deadline)
            });
        Ok(Self {
            credential,
            target,
            options,
        })
    }
}

/// Runs the configured action against Bitbucket, writing to `writer`.
///
/// # Errors
///
/// Returns the configuration, client, or output failure that stopped the
/// action.
pub fn run<W: Write>(config: &BbprConfig, writer: &mut W) -> Result<(), ClientError> {
    run_with_client_builder(
        config,
        |settings| BitbucketClient::with_root(settings.api_root()?),
        writer,
    )
}

/// Runs the configured action using a custom client builder.
///
/// This function is exposed for testing with fake clients.
pub fn run_with_client_builder<C, F, W>(
    config: &BbprConfig,
    build_client: F,
    writer: &mut W,
) -> Result<(), ClientError>
where
    C: PullRequestApi,
    F: FnOnce(&BbprConfig) -> Result<C, ClientError>,
    W: Write,
{
    let action = config.action()?;
    let pull_request_id = action
        .needs_id()
        .then(|| config.require_id())
        .transpose()?;
    let session = Session::from_config(config)?;
    let client = build_client(config)?;
    tracing::debug!(%action, repository = %session.target, "running action");

    match (action, pull_request_id) {
        (Action::List, _) => listing::run(config, &client, &session, writer),
        (Action::Create, _) => {
            pull_request::create(&client, &session, &config.create_request()?, writer)
        }
        (Action::Show, Some(id)) => pull_request::show(&client, &session, id, writer),
        (Action::Approve | Action::Unapprove | Action::Decline | Action::Merge, Some(id)) => {
            pull_request::transition(&client, &session, action, id, writer)
        }
        (Action::Activity, Some(id)) => pull_request::activity(&client, &session, id, writer),
        (
            Action::Show
            | Action::Approve
            | Action::Unapprove
            | Action::Decline
            | Action::Merge
            | Action::Activity,
            None,
        ) => Err(ClientError::Configuration {
            message: format!("`{action}` needs a pull request id (use --id or -i)"),
        }),
    }
}
