//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.bbpr.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `BBPR_WORKSPACE`, `BBPR_TOKEN`, or legacy
//!    `BITBUCKET_TOKEN`
//! 4. **Command-line arguments** – `--workspace`/`-w`, `--token`/`-t`, ...
//!
//! # Configuration File
//!
//! ```toml
//! workspace = "team"
//! repo = "widgets"
//! username = "alice"
//! token = "bitbucket-access-token"
//! timeout_seconds = 15
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::bitbucket::error::ClientError;
use crate::bitbucket::models::CreatePullRequest;
use crate::bitbucket::request::{ApiRoot, DEFAULT_API_ROOT};
use crate::bitbucket::target::{Credential, PullRequestId, RepositoryTarget};

/// Environment variable consulted when no token is configured.
pub const LEGACY_TOKEN_VARIABLE: &str = "BITBUCKET_TOKEN";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Pull request action requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List open pull requests.
    List,
    /// Show one pull request in full.
    Show,
    /// Approve a pull request.
    Approve,
    /// Withdraw an approval.
    Unapprove,
    /// Decline a pull request.
    Decline,
    /// Merge a pull request.
    Merge,
    /// Print a pull request's activity feed.
    Activity,
    /// Open a new pull request.
    Create,
}

impl Action {
    /// True for actions addressing one existing pull request.
    #[must_use]
    pub const fn needs_id(self) -> bool {
        !matches!(self, Self::List | Self::Create)
    }

    /// Lowercase name accepted by `--action`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Show => "show",
            Self::Approve => "approve",
            Self::Unapprove => "unapprove",
            Self::Decline => "decline",
            Self::Merge => "merge",
            Self::Activity => "activity",
            Self::Create => "create",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(Self::List),
            "show" | "get" => Ok(Self::Show),
            "approve" => Ok(Self::Approve),
            "unapprove" => Ok(Self::Unapprove),
            "decline" => Ok(Self::Decline),
            "merge" => Ok(Self::Merge),
            "activity" => Ok(Self::Activity),
            "create" => Ok(Self::Create),
            other => Err(configuration(format!(
                "unknown action `{other}` (expected list, show, approve, unapprove, \
                 decline, merge, activity, or create)"
            ))),
        }
    }
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `BBPR_WORKSPACE` or `--workspace`: Bitbucket workspace
/// - `BBPR_REPO` or `--repo`: Repository slug
/// - `BBPR_TOKEN`, `BITBUCKET_TOKEN`, or `--token`: Access token
/// - `BBPR_USERNAME`/`BBPR_PASSWORD`: Legacy app-password credential
/// - `BBPR_ACTION` or `--action`: Action to run (default `list`)
///
/// # Example
///
/// ```no_run
/// use bbpr::BbprConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = BbprConfig::load().expect("failed to load configuration");
/// let target = config.require_target().expect("workspace and repo required");
/// let credential = config.resolve_credential().expect("credential required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "BBPR",
    discovery(
        dotfile_name = ".bbpr.toml",
        config_file_name = "bbpr.toml",
        app_name = "bbpr"
    )
)]
pub struct BbprConfig {
    /// Bitbucket workspace that owns the repository.
    #[ortho_config(cli_short = 'w')]
    pub workspace: Option<String>,

    /// Repository slug within the workspace.
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Account username.
    ///
    /// Used with `password` for the legacy credential and to hide the
    /// account's own pull requests from listings.
    #[ortho_config(cli_short = 'u')]
    pub username: Option<String>,

    /// App password for the legacy basic credential.
    #[ortho_config()]
    pub password: Option<String>,

    /// Access token sent as a bearer credential.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `BBPR_TOKEN` or `BITBUCKET_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// REST API root; defaults to Bitbucket Cloud.
    #[ortho_config()]
    pub api_root: Option<String>,

    /// Deadline applied to each HTTP request, in seconds. Zero disables it.
    #[ortho_config()]
    pub timeout_seconds: u64,

    /// Action to run: list, show, approve, unapprove, decline, merge,
    /// activity, or create.
    #[ortho_config(cli_short = 'A')]
    pub action: Option<String>,

    /// Pull request id for per-request actions.
    #[ortho_config(cli_short = 'i')]
    pub id: Option<u64>,

    /// Print only pull request ids when listing.
    #[ortho_config(cli_short = 'q')]
    pub quiet: bool,

    /// Print one line per pull request when listing.
    #[ortho_config(cli_short = 'o')]
    pub oneline: bool,

    /// Include creation time in listings.
    #[ortho_config(cli_short = 'c')]
    pub created_time: bool,

    /// Hide pull requests authored by `username` when listing.
    #[ortho_config(cli_short = 'x')]
    pub hide_current: bool,

    /// Title of the pull request to create.
    #[ortho_config()]
    pub title: Option<String>,

    /// Source branch of the pull request to create.
    #[ortho_config(cli_short = 's')]
    pub source: Option<String>,

    /// Destination branch of the pull request to create.
    #[ortho_config(cli_short = 'd')]
    pub destination: Option<String>,

    /// Description of the pull request to create.
    #[ortho_config()]
    pub description: Option<String>,

    /// Comma-separated reviewer usernames for the pull request to create.
    #[ortho_config()]
    pub reviewers: Option<String>,

    /// Delete the source branch after the created pull request merges.
    #[ortho_config()]
    pub close_source_branch: bool,
}

impl Default for BbprConfig {
    fn default() -> Self {
        Self {
            workspace: None,
            repo: None,
            username: None,
            password: None,
            token: None,
            api_root: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            action: None,
            id: None,
            quiet: false,
            oneline: false,
            created_time: false,
            hide_current: false,
            title: None,
            source: None,
            destination: None,
            description: None,
            reviewers: None,
            close_source_branch: false,
        }
    }
}

impl BbprConfig {
    /// Resolves the credential to authenticate with.
    ///
    /// A token from configuration wins, then the legacy `BITBUCKET_TOKEN`
    /// environment variable, then the `username` + `password` pair.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when no credential material is
    /// available, or [`ClientError::InvalidInput`] when it is blank.
    pub fn resolve_credential(&self) -> Result<Credential, ClientError> {
        if let Some(token) = self
            .token
            .clone()
            .or_else(|| env::var(LEGACY_TOKEN_VARIABLE).ok())
        {
            return Credential::token(token);
        }

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Credential::basic(username, password),
            _ => Err(configuration(
                "an access token is required (use --token, BBPR_TOKEN, or BITBUCKET_TOKEN)",
            )),
        }
    }

    /// Returns the repository target.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when workspace or repo is
    /// missing, or [`ClientError::InvalidInput`] when either is blank.
    pub fn require_target(&self) -> Result<RepositoryTarget, ClientError> {
        match (&self.workspace, &self.repo) {
            (Some(workspace), Some(repo)) => RepositoryTarget::new(workspace, repo),
            (None, _) => Err(configuration(
                "workspace is required (use --workspace or -w)",
            )),
            (_, None) => Err(configuration(
                "repository is required (use --repo or -r)",
            )),
        }
    }

    /// Parses the requested action, defaulting to [`Action::List`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] for an unknown action name.
    pub fn action(&self) -> Result<Action, ClientError> {
        self.action.as_deref().map_or(Ok(Action::List), Action::from_str)
    }

    /// Returns the pull request id for per-request actions.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when no id is given, or
    /// [`ClientError::InvalidInput`] when it is zero.
    pub fn require_id(&self) -> Result<PullRequestId, ClientError> {
        let id = self
            .id
            .ok_or_else(|| configuration("pull request id is required (use --id or -i)"))?;
        PullRequestId::new(id)
    }

    /// Parses the configured API root, defaulting to Bitbucket Cloud.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] when the value is not an HTTP(S)
    /// URL.
    pub fn api_root(&self) -> Result<ApiRoot, ClientError> {
        ApiRoot::parse(self.api_root.as_deref().unwrap_or(DEFAULT_API_ROOT))
    }

    /// Per-request deadline, or `None` when `timeout_seconds` is zero.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        match self.timeout_seconds {
            0 => None,
            seconds => Some(Duration::from_secs(seconds)),
        }
    }

    /// Assembles the payload for [`Action::Create`].
    ///
    /// The destination defaults to `main` and the description to empty.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when the title or source branch
    /// is missing or blank.
    pub fn create_request(&self) -> Result<CreatePullRequest, ClientError> {
        let title = required_text(self.title.as_deref(), "title is required (use --title)")?;
        let source_branch = required_text(
            self.source.as_deref(),
            "source branch is required (use --source or -s)",
        )?;
        let destination_branch = self
            .destination
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("main")
            .to_owned();

        Ok(CreatePullRequest {
            destination_branch,
            source_branch,
            title,
            description: self.description.clone().unwrap_or_default(),
            reviewers: self.reviewer_usernames(),
            close_source_branch: self.close_source_branch,
        })
    }

    /// Splits `reviewers` on commas, dropping blanks.
    #[must_use]
    pub fn reviewer_usernames(&self) -> Vec<String> {
        self.reviewers
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

fn required_text(value: Option<&str>, message: &str) -> Result<String, ClientError> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| configuration(message))
}

fn configuration(message: impl Into<String>) -> ClientError {
    ClientError::Configuration {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests;
