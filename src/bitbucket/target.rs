//! Identity wrappers for the repository target and caller credential.
//!
//! Every API operation receives both values explicitly. Neither is cached by
//! the client, so one client can serve many repositories and principals.

use std::fmt;

use super::error::ClientError;

/// Workspace (organisation or user account) owning the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace(String);

impl Workspace {
    /// Validates that the workspace identifier is not blank.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, ClientError> {
        non_blank(value, "workspace").map(Self)
    }

    /// Borrow the workspace value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository slug within a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug(String);

impl RepositorySlug {
    /// Validates that the repository slug is not blank.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, ClientError> {
        non_blank(value, "repository").map(Self)
    }

    /// Borrow the repository slug.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Workspace and repository coordinates addressing the pull request resource.
///
/// # Example
///
/// ```
/// use bbpr::RepositoryTarget;
///
/// let target = RepositoryTarget::parse("atlassian/bbql").expect("valid target");
/// assert_eq!(target.workspace().as_str(), "atlassian");
/// assert_eq!(target.repository().as_str(), "bbql");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    workspace: Workspace,
    repository: RepositorySlug,
}

impl RepositoryTarget {
    /// Creates a target from workspace and repository strings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] when either part is blank.
    pub fn new(workspace: &str, repository: &str) -> Result<Self, ClientError> {
        Ok(Self {
            workspace: Workspace::new(workspace)?,
            repository: RepositorySlug::new(repository)?,
        })
    }

    /// Parses a `workspace/repository` full name.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] unless the input has exactly two
    /// non-blank segments.
    pub fn parse(full_name: &str) -> Result<Self, ClientError> {
        let mut parts = full_name.trim().split('/');
        let (Some(workspace), Some(repository), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ClientError::invalid_input(format!(
                "repository must look like <workspace>/<repository>, got `{full_name}`"
            )));
        };
        Self::new(workspace, repository)
    }

    /// Workspace owning the repository.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Repository slug.
    #[must_use]
    pub const fn repository(&self) -> &RepositorySlug {
        &self.repository
    }
}

impl fmt::Display for RepositoryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workspace.as_str(), self.repository.as_str())
    }
}

/// Pull request identifier, unique within a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PullRequestId(u64);

impl PullRequestId {
    /// Validates that the identifier is positive.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] for zero.
    pub fn new(value: u64) -> Result<Self, ClientError> {
        if value == 0 {
            return Err(ClientError::invalid_input(
                "pull request id must be a positive integer",
            ));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// OAuth or repository access token, trimmed and non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ClientError> {
        non_blank(token.as_ref(), "access token").map(Self)
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Authentication material identifying the calling principal.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// OAuth access token sent as a bearer token.
    Token(AccessToken),
    /// Username and app password sent with HTTP basic authentication.
    ///
    /// Kept for older configurations; new setups should use [`Credential::Token`].
    Basic {
        /// Bitbucket username.
        username: String,
        /// App password for the username.
        password: String,
    },
}

impl Credential {
    /// Builds the canonical bearer-token credential.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] when the token is blank.
    pub fn token(token: impl AsRef<str>) -> Result<Self, ClientError> {
        AccessToken::new(token).map(Self::Token)
    }

    /// Builds the legacy username/app-password credential.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] when either value is blank or
    /// the username contains `:`.
    pub fn basic(username: &str, password: &str) -> Result<Self, ClientError> {
        let validated_username = non_blank(username, "username")?;
        if validated_username.contains(':') {
            return Err(ClientError::invalid_input("username must not contain `:`"));
        }
        if password.is_empty() {
            return Err(ClientError::invalid_input("password must not be blank"));
        }
        Ok(Self::Basic {
            username: validated_username,
            password: password.to_owned(),
        })
    }

    /// Username embedded in the credential, when it carries one.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Token(_) => None,
            Self::Basic { username, .. } => Some(username.as_str()),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => f.debug_tuple("Token").field(token).finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

fn non_blank(value: &str, what: &str) -> Result<String, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_input(format!("{what} must not be blank")));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Credential, PullRequestId, RepositoryTarget};
    use crate::bitbucket::error::ClientError;

    #[rstest]
    #[case::blank_workspace("", "repo")]
    #[case::blank_repository("team", "  ")]
    fn target_rejects_blank_parts(#[case] workspace: &str, #[case] repository: &str) {
        let result = RepositoryTarget::new(workspace, repository);
        assert!(
            matches!(result, Err(ClientError::InvalidInput { .. })),
            "expected InvalidInput, got {result:?}"
        );
    }

    #[rstest]
    #[case::single_segment("team")]
    #[case::three_segments("team/repo/extra")]
    #[case::empty_repository("team/")]
    fn parse_rejects_malformed_full_names(#[case] input: &str) {
        assert!(RepositoryTarget::parse(input).is_err(), "{input} should fail");
    }

    #[rstest]
    fn parse_splits_full_name() {
        let target = RepositoryTarget::parse("team/widgets").expect("should parse");
        assert_eq!(target.workspace().as_str(), "team");
        assert_eq!(target.repository().as_str(), "widgets");
        assert_eq!(target.to_string(), "team/widgets");
    }

    #[rstest]
    fn pull_request_id_rejects_zero() {
        assert!(PullRequestId::new(0).is_err());
        assert_eq!(PullRequestId::new(7).map(PullRequestId::get), Ok(7));
    }

    #[rstest]
    fn credential_debug_redacts_secrets() {
        let token = Credential::token("  sekrit-token ").expect("token should be valid");
        let basic = Credential::basic("alice", "app-password").expect("basic should be valid");

        let rendered = format!("{token:?} {basic:?}");
        assert!(!rendered.contains("sekrit"), "token leaked: {rendered}");
        assert!(!rendered.contains("app-password"), "password leaked: {rendered}");
        assert!(rendered.contains("alice"), "username missing: {rendered}");
    }

    #[rstest]
    #[case::embedded("ali:ce")]
    #[case::trailing("alice:")]
    fn basic_rejects_colon_in_username(#[case] username: &str) {
        let result = Credential::basic(username, "pw");
        assert!(
            matches!(&result, Err(ClientError::InvalidInput { message }) if message.contains(':')),
            "unexpected result: {result:?}"
        );
    }

    #[rstest]
    fn basic_allows_colon_in_password() {
        let credential = Credential::basic("alice", "pa:ss").expect("basic should be valid");
        assert_eq!(credential.username(), Some("alice"));
    }

    #[rstest]
    fn credential_username_only_for_basic() {
        let token = Credential::token("abc").expect("token should be valid");
        let basic = Credential::basic("alice", "pw").expect("basic should be valid");
        assert_eq!(token.username(), None);
        assert_eq!(basic.username(), Some("alice"));
    }

    #[rstest]
    fn blank_token_is_rejected() {
        let result = Credential::token("   ");
        assert!(
            matches!(result, Err(ClientError::InvalidInput { .. })),
            "expected InvalidInput, got {result:?}"
        );
    }
}
