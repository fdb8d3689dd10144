//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use bbpr::bitbucket::{ActivityEntry, PullRequestDetail, TransportFailureKind};
use bbpr::config::Action;
use bbpr::{ClientError, PullRequestId};

/// How listed pull requests are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStyle {
    /// Ids only.
    Quiet,
    /// One line per pull request.
    OneLine,
    /// Multi-line summary with approvals, optionally with creation time.
    Short {
        /// Include the creation timestamp.
        include_created_on: bool,
    },
}

/// Tells the user the repository has no open pull requests.
///
/// # Errors
///
/// Returns [`ClientError::Io`] when the writer fails.
pub fn write_no_open_requests<W: Write>(writer: &mut W) -> Result<(), ClientError> {
    writeln!(writer, "There are no open pull requests.").map_err(|e| io_error(&e))
}

/// Writes listed pull requests in the requested style.
///
/// # Errors
///
/// Returns [`ClientError::Io`] when the writer fails.
pub fn write_listing<W: Write>(
    writer: &mut W,
    details: &[PullRequestDetail],
    style: ListingStyle,
) -> Result<(), ClientError> {
    for detail in details {
        let rendered = match style {
            ListingStyle::Quiet => detail.summary.id.to_string(),
            ListingStyle::OneLine => detail.one_liner(),
            ListingStyle::Short { include_created_on } => {
                detail.short_description(include_created_on)
            }
        };
        writeln!(writer, "{rendered}").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes the full description of one pull request.
///
/// # Errors
///
/// Returns [`ClientError::Io`] when the writer fails.
pub fn write_detail<W: Write>(writer: &mut W, detail: &PullRequestDetail) -> Result<(), ClientError> {
    writeln!(writer, "{}", detail.full_description()).map_err(|e| io_error(&e))
}

/// Writes the confirmation for a completed state change.
///
/// # Errors
///
/// Returns [`ClientError::Io`] when the writer fails.
pub fn write_transition<W: Write>(
    writer: &mut W,
    action: Action,
    id: PullRequestId,
) -> Result<(), ClientError> {
    let verb = match action {
        Action::Approve => "Approved",
        Action::Unapprove => "Removed approval from",
        Action::Decline => "Declined",
        Action::Merge => "Merged",
        Action::List | Action::Show | Action::Activity | Action::Create => "Updated",
    };
    writeln!(writer, "{verb} pull request #{id}").map_err(|e| io_error(&e))
}

/// Writes one line per activity entry.
///
/// # Errors
///
/// Returns [`ClientError::Io`] when the writer fails.
pub fn write_activity<W: Write>(
    writer: &mut W,
    id: PullRequestId,
    entries: &[ActivityEntry],
) -> Result<(), ClientError> {
    if entries.is_empty() {
        return writeln!(writer, "No activity for pull request #{id}.").map_err(|e| io_error(&e));
    }
    for entry in entries {
        writeln!(writer, "{entry}").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes the identifier of a newly created pull request.
///
/// # Errors
///
/// Returns [`ClientError::Io`] when the writer fails.
pub fn write_created<W: Write>(writer: &mut W, id: PullRequestId) -> Result<(), ClientError> {
    writeln!(writer, "Created pull request #{id}").map_err(|e| io_error(&e))
}

/// Renders an error for the terminal.
///
/// Remote errors are shown verbatim; transport and decode failures get a
/// hint about what the user can do.
#[must_use]
pub fn render_error(error: &ClientError) -> String {
    match error {
        ClientError::Transport {
            kind: TransportFailureKind::Timeout,
            ..
        } => format!("{error}\nBitbucket did not answer in time; try again or raise --timeout-seconds."),
        ClientError::Transport { .. } => {
            format!("{error}\nCould not reach Bitbucket; check your network connection.")
        }
        ClientError::Decode { .. } => format!(
            "{error}\nThe Bitbucket API returned data this client does not understand; \
             bbpr may need updating."
        ),
        ClientError::RemoteApi { .. }
        | ClientError::Cancelled
        | ClientError::InvalidInput { .. }
        | ClientError::Configuration { .. }
        | ClientError::Io { .. } => error.to_string(),
    }
}

/// Converts an I/O error into a [`ClientError::Io`].
pub fn io_error(error: &io::Error) -> ClientError {
    ClientError::Io {
        message: error.to_string(),
    }
}
