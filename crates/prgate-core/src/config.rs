//! The `source` block shared by every invocation of the resource.

use std::fmt;

use serde::{Deserialize, Serialize};

/// API base used when `github_endpoint` is not configured.
pub const DEFAULT_GITHUB_ENDPOINT: &str = "https://api.github.com";

/// Pull-request state selected when `states` is left empty.
pub const DEFAULT_STATE: &str = "open";

/// Resource configuration: connection settings plus the selection policy.
///
/// Every field is optional on the wire. Unknown fields are rejected so that a
/// misspelt policy key fails loudly instead of silently matching everything.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    // ── Connection ──
    /// Accept invalid TLS certificates for API and git traffic.
    #[serde(rename = "skip_ssl")]
    pub skip_ssl_verification: bool,
    /// API base for GitHub Enterprise installations.
    pub github_endpoint: Option<String>,
    /// `owner/name` of the repository to watch.
    pub repository: String,
    pub disable_git_lfs: bool,
    pub access_token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,

    // ── Pull-request selection ──
    pub only_mergeable: bool,
    pub states: Vec<String>,
    pub ignore_states: Vec<String>,
    pub labels: Vec<String>,
    pub ignore_labels: Vec<String>,

    // ── Approvals ──
    pub min_approvals: u32,
    pub approver_comments: Vec<String>,
    pub approver_teams: Vec<String>,

    // ── Reviews ──
    pub min_reviews: u32,
    pub reviewer_comments: Vec<String>,
    pub reviewer_teams: Vec<String>,
    pub review_states: Vec<String>,
}

impl PolicyConfig {
    /// The configured API base, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.github_endpoint
            .as_deref()
            .map(|e| e.trim_end_matches('/'))
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_GITHUB_ENDPOINT)
    }

    /// Every configured team, approver teams first, without duplicates.
    pub fn all_teams(&self) -> Vec<&str> {
        let mut teams: Vec<&str> = Vec::new();
        for team in self.approver_teams.iter().chain(&self.reviewer_teams) {
            if !teams.contains(&team.as_str()) {
                teams.push(team);
            }
        }
        teams
    }
}

impl fmt::Debug for PolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &Option<String>| s.as_ref().map(|_| "<redacted>");
        f.debug_struct("PolicyConfig")
            .field("skip_ssl_verification", &self.skip_ssl_verification)
            .field("github_endpoint", &self.github_endpoint)
            .field("repository", &self.repository)
            .field("disable_git_lfs", &self.disable_git_lfs)
            .field("access_token", &redact(&self.access_token))
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("only_mergeable", &self.only_mergeable)
            .field("states", &self.states)
            .field("ignore_states", &self.ignore_states)
            .field("labels", &self.labels)
            .field("ignore_labels", &self.ignore_labels)
            .field("min_approvals", &self.min_approvals)
            .field("approver_comments", &self.approver_comments)
            .field("approver_teams", &self.approver_teams)
            .field("min_reviews", &self.min_reviews)
            .field("reviewer_comments", &self.reviewer_comments)
            .field("reviewer_teams", &self.reviewer_teams)
            .field("review_states", &self.review_states)
            .finish()
    }
}
