use async_trait::async_trait;
use prgate_core::{Message, PullRequest};
use tracing::debug;

use crate::HostingError;

/// What the resource needs from the code-hosting platform.
///
/// Listings return every page; implementations drain pagination before
/// returning.
#[async_trait]
pub trait HostingClient: Send + Sync {
    /// Every pull request of the repository, in every state.
    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>, HostingError>;

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, HostingError>;

    async fn list_comments(&self, pr: u64) -> Result<Vec<Message>, HostingError>;

    /// Submitted reviews only; pending reviews are skipped.
    async fn list_reviews(&self, pr: u64) -> Result<Vec<Message>, HostingError>;

    async fn get_comment(&self, id: u64) -> Result<Message, HostingError>;

    async fn get_review(&self, pr: u64, id: u64) -> Result<Message, HostingError>;

    async fn user_is_team_member(&self, login: &str, team: &str) -> Result<bool, HostingError>;

    /// Member logins of `team`. Implementations may remember the answer to
    /// speed up later [`user_is_team_member`](Self::user_is_team_member) calls.
    async fn list_team_members(&self, team: &str) -> Result<Vec<String>, HostingError>;
}

/// True when `teams` is empty, or `login` belongs to at least one of them.
pub async fn team_allows<C>(
    client: &C,
    login: &str,
    teams: &[String],
) -> Result<bool, HostingError>
where
    C: HostingClient + ?Sized,
{
    if teams.is_empty() {
        return Ok(true);
    }
    for team in teams {
        if client.user_is_team_member(login, team).await? {
            debug!(login, team = %team, "team membership confirmed");
            return Ok(true);
        }
    }
    Ok(false)
}
