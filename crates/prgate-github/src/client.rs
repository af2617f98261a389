//! GitHub REST client for pull requests, discussions and team membership.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use prgate_core::{Message, PolicyConfig, PullRequest};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::wire::{GhComment, GhMembership, GhPull, GhReview, GhUser};
use crate::{HostingClient, HostingError};

const PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("prgate/", env!("CARGO_PKG_VERSION"));

enum Auth {
    Anonymous,
    Token(String),
    Basic {
        username: String,
        password: Option<String>,
    },
}

/// GitHub REST client bound to a single repository.
///
/// Team lists fetched through [`list_team_members`](HostingClient::list_team_members)
/// are kept for the lifetime of the client and answer later membership checks
/// without another request.
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    owner: String,
    repo: String,
    auth: Auth,
    team_members: Mutex<HashMap<String, HashSet<String>>>,
}

impl GithubClient {
    /// Build a client from the connection half of the resource configuration.
    ///
    /// An access token takes precedence over username/password.
    pub fn new(config: &PolicyConfig) -> Result<Self, HostingError> {
        let (owner, repo) = config
            .repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty() && !r.contains('/'))
            .ok_or_else(|| HostingError::InvalidRepository(config.repository.clone()))?;

        let auth = match (&config.access_token, &config.username) {
            (Some(token), _) if !token.is_empty() => Auth::Token(token.clone()),
            (_, Some(username)) if !username.is_empty() => Auth::Basic {
                username: username.clone(),
                password: config.password.clone(),
            },
            _ => Auth::Anonymous,
        };

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(config.skip_ssl_verification)
            .build()?;

        Ok(Self {
            client,
            base_url: config.endpoint().to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            auth,
            team_members: Mutex::new(HashMap::new()),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}/{path}", self.base_url, self.owner, self.repo)
    }

    /// `org/slug` or a bare slug, which is looked up in the repository owner's org.
    fn team_parts<'a>(&'a self, team: &'a str) -> (&'a str, &'a str) {
        team.split_once('/').unwrap_or((self.owner.as_str(), team))
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let req = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        match &self.auth {
            Auth::Anonymous => req,
            Auth::Token(token) => req.bearer_auth(token),
            Auth::Basic { username, password } => req.basic_auth(username, password.as_ref()),
        }
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, HostingError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(HostingError::Server {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, HostingError> {
        debug!(url = %url, "GET");
        let resp = self.send(self.get(url), url).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Drain every page of a listing endpoint.
    async fn get_all<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, HostingError> {
        let mut items = Vec::new();
        let per_page = PER_PAGE.to_string();
        for page in 1.. {
            let page_str = page.to_string();
            debug!(url = %url, page, "GET page");
            let req = self
                .get(url)
                .query(query)
                .query(&[("per_page", per_page.as_str()), ("page", page_str.as_str())]);
            let bytes = self.send(req, url).await?.bytes().await?;
            let batch: Vec<T> = serde_json::from_slice(&bytes)?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                break;
            }
        }
        Ok(items)
    }

    fn cached_membership(&self, login: &str, team: &str) -> Option<bool> {
        let cache = self.team_members.lock().ok()?;
        cache.get(team).map(|members| members.contains(login))
    }
}

#[async_trait]
impl HostingClient for GithubClient {
    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>, HostingError> {
        let pulls: Vec<GhPull> = self
            .get_all(&self.repo_url("pulls"), &[("state", "all")])
            .await?;
        info!(
            owner = %self.owner,
            repo = %self.repo,
            count = pulls.len(),
            "listed pull requests"
        );
        Ok(pulls.into_iter().map(Into::into).collect())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, HostingError> {
        let pull: GhPull = self.get_json(&self.repo_url(&format!("pulls/{number}"))).await?;
        Ok(pull.into())
    }

    async fn list_comments(&self, pr: u64) -> Result<Vec<Message>, HostingError> {
        let comments: Vec<GhComment> = self
            .get_all(&self.repo_url(&format!("issues/{pr}/comments")), &[])
            .await?;
        Ok(comments.into_iter().map(Into::into).collect())
    }

    async fn list_reviews(&self, pr: u64) -> Result<Vec<Message>, HostingError> {
        let reviews: Vec<GhReview> = self
            .get_all(&self.repo_url(&format!("pulls/{pr}/reviews")), &[])
            .await?;
        Ok(reviews.into_iter().filter_map(GhReview::into_message).collect())
    }

    async fn get_comment(&self, id: u64) -> Result<Message, HostingError> {
        let comment: GhComment = self
            .get_json(&self.repo_url(&format!("issues/comments/{id}")))
            .await?;
        Ok(comment.into())
    }

    async fn get_review(&self, pr: u64, id: u64) -> Result<Message, HostingError> {
        let review: GhReview = self
            .get_json(&self.repo_url(&format!("pulls/{pr}/reviews/{id}")))
            .await?;
        review
            .into_message()
            .ok_or_else(|| HostingError::Other(format!("review {id} on #{pr} is not submitted")))
    }

    async fn user_is_team_member(&self, login: &str, team: &str) -> Result<bool, HostingError> {
        if let Some(member) = self.cached_membership(login, team) {
            return Ok(member);
        }

        let (org, slug) = self.team_parts(team);
        let url = format!(
            "{}/orgs/{org}/teams/{slug}/memberships/{login}",
            self.base_url
        );
        debug!(url = %url, "GET");
        let resp = self.get(&url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(HostingError::Server { status, url, body });
        }
        let membership: GhMembership = serde_json::from_slice(&resp.bytes().await?)?;
        Ok(membership.state == "active")
    }

    async fn list_team_members(&self, team: &str) -> Result<Vec<String>, HostingError> {
        let (org, slug) = self.team_parts(team);
        let url = format!("{}/orgs/{org}/teams/{slug}/members", self.base_url);
        let members: Vec<GhUser> = self.get_all(&url, &[]).await?;
        let logins: Vec<String> = members.into_iter().map(|u| u.login).collect();
        info!(team, count = logins.len(), "listed team members");

        if let Ok(mut cache) = self.team_members.lock() {
            cache.insert(team.to_string(), logins.iter().cloned().collect());
        }
        Ok(logins)
    }
}
