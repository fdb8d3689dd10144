//! Bitbucket wire shapes and their conversion into domain models.
//!
//! Optional fields are modelled leniently: Bitbucket omits or nulls many of
//! them depending on account privacy settings and object age. Conversions
//! fail only where a domain invariant would be broken.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    ActivityEntry, BranchRef, CommentActivity, CreatePullRequest, PullRequestDetail,
    PullRequestSummary, Reviewer, UpdateActivity, User,
};
use crate::bitbucket::target::PullRequestId;

/// One page of a paginated collection.
///
/// `page` and `pagelen` are accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPage<T> {
    pub(crate) size: Option<u64>,
    #[serde(default = "Vec::new")]
    pub(crate) values: Vec<T>,
    pub(crate) next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    username: Option<String>,
    nickname: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ApiBranch {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommit {
    hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEndpoint {
    branch: Option<ApiBranch>,
    commit: Option<ApiCommit>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLinks {
    html: Option<ApiLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLink {
    href: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiParticipant {
    user: Option<ApiUser>,
    #[serde(default)]
    approved: bool,
}

/// Pull request document; participants are only present on the detail view.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    id: u64,
    #[serde(default)]
    title: String,
    created_on: DateTime<Utc>,
    updated_on: DateTime<Utc>,
    author: Option<ApiUser>,
    source: ApiEndpoint,
    destination: ApiEndpoint,
    description: Option<String>,
    links: Option<ApiLinks>,
    #[serde(default)]
    participants: Vec<ApiParticipant>,
}

/// Activity item: at most one of the two sub-objects is expected.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiActivity {
    update: Option<Value>,
    comment: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiUpdate {
    date: DateTime<Utc>,
    source: ApiEndpoint,
    author: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiComment {
    content: Option<ApiContent>,
    created_on: DateTime<Utc>,
    updated_on: Option<DateTime<Utc>>,
    user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiContent {
    #[serde(default)]
    raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ApiBranchSelector {
    branch: ApiBranch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ApiReviewerRef {
    username: String,
}

/// Request body for `POST /pullrequests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ApiCreatePullRequest {
    title: String,
    description: String,
    source: ApiBranchSelector,
    destination: ApiBranchSelector,
    reviewers: Vec<ApiReviewerRef>,
    close_source_branch: bool,
}

/// Minimal view of the created pull request.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCreated {
    pub(crate) id: u64,
}

/// Error document Bitbucket attaches to most non-success responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDocument {
    pub(crate) error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub(crate) message: String,
    pub(crate) detail: Option<String>,
}

impl From<ApiUser> for User {
    fn from(value: ApiUser) -> Self {
        Self {
            username: value.username.or(value.nickname).unwrap_or_default(),
            display_name: value.display_name.unwrap_or_default(),
        }
    }
}

fn user_or_default(user: Option<ApiUser>) -> User {
    user.map(User::from).unwrap_or_default()
}

impl From<ApiEndpoint> for BranchRef {
    fn from(value: ApiEndpoint) -> Self {
        Self {
            branch: value.branch.map(|branch| branch.name).unwrap_or_default(),
            commit: value.commit.map(|commit| commit.hash),
        }
    }
}

impl ApiPullRequest {
    pub(crate) fn into_summary(self) -> Result<PullRequestSummary, String> {
        self.into_detail().map(|detail| detail.summary)
    }

    pub(crate) fn into_detail(self) -> Result<PullRequestDetail, String> {
        let id = PullRequestId::new(self.id).map_err(|error| error.to_string())?;
        let participants = self
            .participants
            .into_iter()
            .map(|participant| Reviewer {
                user: user_or_default(participant.user),
                approved: participant.approved,
            })
            .collect();

        Ok(PullRequestDetail {
            summary: PullRequestSummary {
                id,
                title: self.title,
                created_on: self.created_on,
                updated_on: self.updated_on,
                author: user_or_default(self.author),
                source: self.source.into(),
                destination: self.destination.into(),
                description: self.description.unwrap_or_default(),
                web_url: self.links.and_then(|links| links.html).map(|link| link.href),
            },
            participants,
        })
    }
}

/// Treats `null` and `{}` as absent.
fn populated(value: Option<Value>) -> Option<Value> {
    value.filter(|inner| match inner {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    })
}

impl ApiActivity {
    pub(crate) fn into_entry(self) -> Result<ActivityEntry, String> {
        match (populated(self.update), populated(self.comment)) {
            (Some(update), None) => {
                let parsed: ApiUpdate = serde_json::from_value(update)
                    .map_err(|error| format!("invalid update: {error}"))?;
                Ok(ActivityEntry::Update(UpdateActivity {
                    date: parsed.date,
                    source: parsed.source.into(),
                    author: user_or_default(parsed.author),
                }))
            }
            (None, Some(comment)) => {
                let parsed: ApiComment = serde_json::from_value(comment)
                    .map_err(|error| format!("invalid comment: {error}"))?;
                Ok(ActivityEntry::Comment(CommentActivity {
                    author: user_or_default(parsed.user),
                    created_on: parsed.created_on,
                    updated_on: parsed.updated_on,
                    raw: parsed.content.map(|content| content.raw).unwrap_or_default(),
                }))
            }
            (None, None) => Err("entry has neither an update nor a comment".to_owned()),
            (Some(_), Some(_)) => Err("entry has both an update and a comment".to_owned()),
        }
    }
}

impl From<&CreatePullRequest> for ApiCreatePullRequest {
    fn from(value: &CreatePullRequest) -> Self {
        Self {
            title: value.title.clone(),
            description: value.description.clone(),
            source: ApiBranchSelector {
                branch: ApiBranch {
                    name: value.source_branch.clone(),
                },
            },
            destination: ApiBranchSelector {
                branch: ApiBranch {
                    name: value.destination_branch.clone(),
                },
            },
            reviewers: value
                .reviewers
                .iter()
                .map(|username| ApiReviewerRef {
                    username: username.clone(),
                })
                .collect(),
            close_source_branch: value.close_source_branch,
        }
    }
}

impl From<ApiCreatePullRequest> for CreatePullRequest {
    fn from(value: ApiCreatePullRequest) -> Self {
        Self {
            destination_branch: value.destination.branch.name,
            source_branch: value.source.branch.name,
            title: value.title,
            description: value.description,
            reviewers: value
                .reviewers
                .into_iter()
                .map(|reviewer| reviewer.username)
                .collect(),
            close_source_branch: value.close_source_branch,
        }
    }
}
