//! Open pull request listing.

use std::io::Write;

use bbpr::bitbucket::{PullRequestApi, PullRequestDetail, PullRequestSummary};
use bbpr::{BbprConfig, ClientError};

use super::Session;
use super::output::{ListingStyle, write_listing, write_no_open_requests};

/// Lists open pull requests, fetching each one's reviewers.
///
/// # Errors
///
/// Returns [`ClientError::Configuration`] when `hide_current` is set without a
/// username, or the first client or output failure.
pub fn run<C, W>(
    config: &BbprConfig,
    client: &C,
    session: &Session,
    writer: &mut W,
) -> Result<(), ClientError>
where
    C: PullRequestApi,
    W: Write,
{
    let hidden_author = hidden_author(config)?;
    let summaries = client.list_requests(&session.credential, &session.target, &session.options)?;
    tracing::debug!(count = summaries.len(), "listed pull requests");
    if summaries.is_empty() {
        return write_no_open_requests(writer);
    }

    let details = visible(summaries, hidden_author)
        .map(|summary| {
            client.get_request(
                &session.credential,
                &session.target,
                summary.id,
                &session.options,
            )
        })
        .collect::<Result<Vec<PullRequestDetail>, _>>()?;

    write_listing(writer, &details, listing_style(config))
}

fn hidden_author(config: &BbprConfig) -> Result<Option<&str>, ClientError> {
    if !config.hide_current {
        return Ok(None);
    }
    config
        .username
        .as_deref()
        .map(Some)
        .ok_or_else(|| ClientError::Configuration {
            message: "hiding your own pull requests requires a username (use --username or -u)"
                .to_owned(),
        })
}

fn visible(
    summaries: Vec<PullRequestSummary>,
    hidden_author: Option<&str>,
) -> impl Iterator<Item = PullRequestSummary> + '_ {
    summaries
        .into_iter()
        .filter(move |summary| hidden_author != Some(summary.author.username.as_str()))
}

const fn listing_style(config: &BbprConfig) -> ListingStyle {
    if config.quiet {
        ListingStyle::Quiet
    } else if config.oneline {
        ListingStyle::OneLine
    } else {
        ListingStyle::Short {
            include_created_on: config.created_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use bbpr::bitbucket::models::test_support::sample_detail;
    use bbpr::{BbprConfig, ClientError};
    use rstest::{fixture, rstest};

    use super::super::Session;
    use super::super::test_utils::{Call, FakeClient};
    use super::run;

    #[fixture]
    fn config() -> BbprConfig {
        BbprConfig {
            workspace: Some("team".to_owned()),
            repo: Some("widgets".to_owned()),
            token: Some("valid-token".to_owned()),
            ..Default::default()
        }
    }

    fn listed(config: &BbprConfig, client: &FakeClient) -> Result<String, ClientError> {
        let session = Session::from_config(config).expect("session should resolve");
        let mut buffer = Vec::new();
        run(config, client, &session, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("output should be valid UTF-8"))
    }

    #[rstest]
    fn fetches_detail_for_each_listed_pull_request(config: BbprConfig) {
        let client = FakeClient::with_details(vec![
            sample_detail(1, "First", &[]),
            sample_detail(2, "Second", &[("bob", true)]),
        ]);

        let output = listed(&config, &client).expect("listing should succeed");

        assert_eq!(client.calls(), [Call::List, Call::Get(1), Call::Get(2)]);
        assert!(output.contains("Approved by Bob"), "missing approval: {output}");
    }

    #[rstest]
    fn hides_pull_requests_by_current_user(config: BbprConfig) {
        let mut own = sample_detail(1, "Mine", &[]);
        own.summary.author.username = "alice".to_owned();
        let client = FakeClient::with_details(vec![own, sample_detail(2, "Theirs", &[])]);
        let hiding = BbprConfig {
            hide_current: true,
            username: Some("alice".to_owned()),
            quiet: true,
            ..config
        };

        let output = listed(&hiding, &client).expect("listing should succeed");

        assert_eq!(output, "2\n");
        assert_eq!(client.calls(), [Call::List, Call::Get(2)]);
    }

    #[rstest]
    fn empty_repository_reports_no_open_requests(config: BbprConfig) {
        let client = FakeClient::default();

        let output = listed(&config, &client).expect("listing should succeed");

        assert_eq!(output, "There are no open pull requests.\n");
        assert_eq!(client.calls(), [Call::List]);
    }

    #[rstest]
    fn hiding_every_pull_request_prints_nothing(config: BbprConfig) {
        let mut own = sample_detail(1, "Mine", &[]);
        own.summary.author.username = "alice".to_owned();
        let client = FakeClient::with_details(vec![own]);
        let hiding = BbprConfig {
            hide_current: true,
            username: Some("alice".to_owned()),
            ..config
        };

        let output = listed(&hiding, &client).expect("listing should succeed");

        assert!(output.is_empty(), "unexpected output: {output}");
        assert_eq!(client.calls(), [Call::List]);
    }

    #[rstest]
    fn hide_current_without_username_fails(config: BbprConfig) {
        let client = FakeClient::default();
        let hiding = BbprConfig {
            hide_current: true,
            ..config
        };

        let result = listed(&hiding, &client);

        assert!(
            matches!(result, Err(ClientError::Configuration { .. })),
            "expected Configuration, got {result:?}"
        );
        assert!(client.calls().is_empty());
    }

    #[rstest]
    fn stops_at_first_failed_detail(config: BbprConfig) {
        let client = FakeClient::failing(ClientError::RemoteApi {
            status: 503,
            message: "Service Unavailable".to_owned(),
        });

        let result = listed(&config, &client);

        assert_eq!(result.map_err(|error| error.status()), Err(Some(503)));
    }
}
