//! Test helpers for building Bitbucket JSON documents and domain fixtures.
//!
//! The JSON builders mirror what Bitbucket Cloud returns so that mock servers
//! in unit and behavioural tests stay consistent with each other.
//!
//! # Examples
//!
//! ```
//! use bbpr::bitbucket::models::test_support::{page_json, pull_request_json};
//!
//! let page = page_json(vec![pull_request_json(1, "First", "alice")], 1, 1, Some(2), None);
//! assert_eq!(page["values"][0]["id"], 1);
//! ```

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use super::{BranchRef, PullRequestDetail, PullRequestSummary, Reviewer, User};
use crate::bitbucket::target::PullRequestId;

/// Pull request document as returned by the list and detail endpoints.
#[must_use]
pub fn pull_request_json(id: u64, title: &str, author: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "state": "OPEN",
        "created_on": "2025-01-01T09:00:00.000000+00:00",
        "updated_on": "2025-01-02T09:00:00.000000+00:00",
        "author": { "username": author, "display_name": display_name(author) },
        "source": {
            "branch": { "name": format!("feature/{id}") },
            "commit": { "hash": format!("{id:07x}") }
        },
        "destination": {
            "branch": { "name": "main" },
            "commit": { "hash": "0000000" }
        },
        "description": format!("Description for #{id}"),
        "links": {
            "html": { "href": format!("https://bitbucket.org/team/repo/pull-requests/{id}") }
        }
    })
}

/// Pull request detail document with the given `(username, approved)` participants.
#[must_use]
pub fn pull_request_detail_json(id: u64, title: &str, participants: &[(&str, bool)]) -> Value {
    let mut document = pull_request_json(id, title, "author");
    let rendered: Vec<Value> = participants
        .iter()
        .map(|(username, approved)| {
            json!({
                "user": { "username": username, "display_name": display_name(username) },
                "role": "REVIEWER",
                "approved": approved
            })
        })
        .collect();
    if let Some(object) = document.as_object_mut() {
        object.insert("participants".to_owned(), Value::Array(rendered));
    }
    document
}

/// Paginated envelope around `values`.
#[must_use]
pub fn page_json(
    values: Vec<Value>,
    page: u32,
    pagelen: u32,
    size: Option<u64>,
    next: Option<&str>,
) -> Value {
    let mut document = json!({
        "page": page,
        "pagelen": pagelen,
        "values": values,
    });
    if let Some(object) = document.as_object_mut() {
        if let Some(total) = size {
            object.insert("size".to_owned(), json!(total));
        }
        if let Some(link) = next {
            object.insert("next".to_owned(), json!(link));
        }
    }
    document
}

/// Activity item carrying only an `update` object.
#[must_use]
pub fn update_activity_json(author: &str, commit: &str) -> Value {
    json!({
        "update": {
            "state": "OPEN",
            "date": "2025-01-03T10:00:00+00:00",
            "author": { "username": author, "display_name": display_name(author) },
            "source": { "branch": { "name": "feature/1" }, "commit": { "hash": commit } }
        },
        "pull_request": { "id": 1 }
    })
}

/// Activity item carrying only a `comment` object.
#[must_use]
pub fn comment_activity_json(author: &str, raw: &str) -> Value {
    json!({
        "comment": {
            "id": 99,
            "content": { "raw": raw, "markup": "markdown", "html": format!("<p>{raw}</p>") },
            "created_on": "2025-01-03T11:00:00+00:00",
            "updated_on": "2025-01-03T11:05:00+00:00",
            "user": { "username": author, "display_name": display_name(author) }
        },
        "pull_request": { "id": 1 }
    })
}

/// Domain detail with fixed timestamps and the given participants.
///
/// # Panics
///
/// Panics when `id` is zero.
#[must_use]
pub fn sample_detail(id: u64, title: &str, participants: &[(&str, bool)]) -> PullRequestDetail {
    let timestamp = Utc
        .with_ymd_and_hms(2025, 1, 2, 9, 0, 0)
        .single()
        .unwrap_or_default();
    let pull_request_id =
        PullRequestId::new(id).unwrap_or_else(|error| panic!("invalid fixture id: {error}"));

    PullRequestDetail {
        summary: PullRequestSummary {
            id: pull_request_id,
            title: title.to_owned(),
            created_on: timestamp,
            updated_on: timestamp,
            author: sample_user("author"),
            source: BranchRef {
                branch: format!("feature/{id}"),
                commit: None,
            },
            destination: BranchRef {
                branch: "main".to_owned(),
                commit: None,
            },
            description: String::new(),
            web_url: None,
        },
        participants: participants
            .iter()
            .map(|(username, approved)| Reviewer {
                user: sample_user(username),
                approved: *approved,
            })
            .collect(),
    }
}

/// User whose display name is derived from the username.
#[must_use]
pub fn sample_user(username: &str) -> User {
    User {
        username: username.to_owned(),
        display_name: display_name(username),
    }
}

fn display_name(username: &str) -> String {
    let mut characters = username.chars();
    characters.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(characters).collect()
    })
}
