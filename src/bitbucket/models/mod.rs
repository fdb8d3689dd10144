//! Domain models for pull requests, participants, and activity.
//!
//! These are the stable shapes handed to callers. The Bitbucket wire format
//! lives in the private `api` module and converts into these types, so
//! irregular JSON (nested branch/commit objects, optional authors,
//! presence-discriminated activity items) never leaks past the decoder.

use std::fmt;

use chrono::{DateTime, Local, Utc};

use super::target::PullRequestId;

pub(crate) mod api;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Bitbucket account as shown on pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Account username (or nickname when the username is withheld).
    pub username: String,
    /// Human-readable display name.
    pub display_name: String,
}

/// Branch name plus the commit it pointed at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchRef {
    /// Branch name.
    pub branch: String,
    /// Commit hash, absent when Bitbucket omits it.
    pub commit: Option<String>,
}

/// Pull request fields returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSummary {
    /// Identifier, stable within the repository.
    pub id: PullRequestId,
    /// Title of the pull request.
    pub title: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_on: DateTime<Utc>,
    /// Author of the pull request.
    pub author: User,
    /// Branch being merged.
    pub source: BranchRef,
    /// Branch receiving the merge.
    pub destination: BranchRef,
    /// Raw description text; empty when none was given.
    pub description: String,
    /// Browser link to the pull request.
    pub web_url: Option<String>,
}

/// Participant of a pull request together with their approval state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reviewer {
    /// Participating account.
    pub user: User,
    /// Whether this participant currently approves the pull request.
    pub approved: bool,
}

/// Pull request summary plus the participant snapshot taken at fetch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDetail {
    /// Fields shared with the listing view.
    pub summary: PullRequestSummary,
    /// Participants in the order Bitbucket returned them.
    pub participants: Vec<Reviewer>,
}

impl PullRequestDetail {
    /// True when a participant with `username` has approved.
    #[must_use]
    pub fn is_approved(&self, username: &str) -> bool {
        self.participants
            .iter()
            .any(|reviewer| reviewer.approved && reviewer.user.username == username)
    }

    /// Participants that currently approve, in participant order.
    pub fn approvers(&self) -> impl Iterator<Item = &User> {
        self.participants
            .iter()
            .filter(|reviewer| reviewer.approved)
            .map(|reviewer| &reviewer.user)
    }

    /// Single line: id, update time, author, title.
    #[must_use]
    pub fn one_liner(&self) -> String {
        let summary = &self.summary;
        format!(
            "{} Updated:{} {} {}",
            summary.id,
            format_local_time(summary.updated_on),
            summary.author.display_name,
            summary.title
        )
    }

    /// Listing block with branches, title, and approvals.
    #[must_use]
    pub fn short_description(&self, include_created_on: bool) -> String {
        let summary = &self.summary;
        let created = if include_created_on {
            format!(" at {}", format_local_time(summary.created_on))
        } else {
            String::new()
        };
        let approvals: String = self
            .approvers()
            .map(|user| format!("\n\tApproved by {}", user.display_name))
            .collect();

        format!(
            "{} Updated:{} Created by:{}{created}\n\t{} -> {}\n\t{}{approvals}",
            summary.id,
            format_local_time(summary.updated_on),
            summary.author.display_name,
            summary.source.branch,
            summary.destination.branch,
            summary.title,
        )
    }

    /// Full block including the description.
    #[must_use]
    pub fn full_description(&self) -> String {
        let summary = &self.summary;
        format!(
            "{} Updated:{} Created by:{} at {}\n\t{} -> {}\n\t{}\n{}",
            summary.id,
            format_local_time(summary.updated_on),
            summary.author.display_name,
            format_local_time(summary.created_on),
            summary.source.branch,
            summary.destination.branch,
            summary.title,
            summary.description
        )
    }
}

/// Source branch update recorded in the activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateActivity {
    /// When the update happened.
    pub date: DateTime<Utc>,
    /// Source branch and commit after the update.
    pub source: BranchRef,
    /// Account that pushed the update.
    pub author: User,
}

/// Comment recorded in the activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentActivity {
    /// Comment author.
    pub author: User,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Last edit timestamp, when Bitbucket reports one.
    pub updated_on: Option<DateTime<Utc>>,
    /// Raw markup of the comment body.
    pub raw: String,
}

/// One event in a pull request's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEntry {
    /// The source branch moved.
    Update(UpdateActivity),
    /// Someone commented.
    Comment(CommentActivity),
}

impl ActivityEntry {
    /// Moment the event happened: the update date or the comment creation.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Update(update) => update.date,
            Self::Comment(comment) => comment.created_on,
        }
    }
}

impl fmt::Display for UpdateActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Commit made by {} ({}): {}",
            self.author.display_name,
            format_local_time(self.date),
            self.source.commit.as_deref().unwrap_or("unknown commit")
        )
    }
}

impl fmt::Display for CommentActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Comment by {} ({}): {}",
            self.author.display_name,
            format_local_time(self.updated_on.unwrap_or(self.created_on)),
            self.raw
        )
    }
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update(update) => update.fmt(f),
            Self::Comment(comment) => comment.fmt(f),
        }
    }
}

/// Payload for opening a new pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePullRequest {
    /// Branch the changes should land on.
    pub destination_branch: String,
    /// Branch carrying the changes.
    pub source_branch: String,
    /// Title of the new pull request.
    pub title: String,
    /// Description text.
    pub description: String,
    /// Usernames requested as reviewers.
    pub reviewers: Vec<String>,
    /// Delete the source branch once merged.
    pub close_source_branch: bool,
}

/// Renders a timestamp in the local zone as `YYYY-MM-DD HH:MM`.
#[must_use]
pub fn format_local_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
