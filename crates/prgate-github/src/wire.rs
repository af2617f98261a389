//! GitHub REST payloads, reduced to the fields the resource reads.

use chrono::{DateTime, Utc};
use prgate_core::{Branch, Message, MessageKind, PullRequest};
use serde::Deserialize;

/// Login reported for deleted accounts.
const GHOST_LOGIN: &str = "ghost";

#[derive(Deserialize)]
pub(crate) struct GhPull {
    number: u64,
    state: String,
    #[serde(default)]
    labels: Vec<GhLabel>,
    #[serde(default)]
    mergeable: Option<bool>,
    #[serde(default)]
    draft: bool,
    head: GhRef,
    base: GhRef,
}

#[derive(Deserialize)]
struct GhLabel {
    name: String,
}

#[derive(Deserialize)]
struct GhRef {
    #[serde(rename = "ref")]
    git_ref: String,
    sha: String,
    /// `null` when the fork behind the head has been deleted.
    repo: Option<GhRepo>,
}

#[derive(Deserialize)]
struct GhRepo {
    clone_url: String,
}

#[derive(Deserialize)]
pub(crate) struct GhUser {
    pub(crate) login: String,
}

#[derive(Deserialize)]
pub(crate) struct GhComment {
    id: u64,
    #[serde(default)]
    body: Option<String>,
    user: Option<GhUser>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    author_association: String,
    #[serde(default)]
    html_url: String,
}

#[derive(Deserialize)]
pub(crate) struct GhReview {
    pub(crate) id: u64,
    #[serde(default)]
    body: Option<String>,
    user: Option<GhUser>,
    state: String,
    /// Absent for pending reviews.
    pub(crate) submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    author_association: String,
    #[serde(default)]
    html_url: String,
}

#[derive(Deserialize)]
pub(crate) struct GhMembership {
    pub(crate) state: String,
}

impl From<GhRef> for Branch {
    fn from(r: GhRef) -> Self {
        Self {
            git_ref: r.git_ref,
            sha: r.sha,
            clone_url: r.repo.map(|repo| repo.clone_url).unwrap_or_default(),
        }
    }
}

impl From<GhPull> for PullRequest {
    fn from(p: GhPull) -> Self {
        Self {
            number: p.number,
            state: p.state,
            labels: p.labels.into_iter().map(|l| l.name).collect(),
            mergeable: p.mergeable,
            draft: p.draft,
            head: p.head.into(),
            base: p.base.into(),
        }
    }
}

fn login(user: Option<GhUser>) -> String {
    user.map_or_else(|| GHOST_LOGIN.to_string(), |u| u.login)
}

impl From<GhComment> for Message {
    fn from(c: GhComment) -> Self {
        Self {
            id: c.id,
            kind: MessageKind::Comment,
            author_login: login(c.user),
            author_association: c.author_association,
            body: c.body.unwrap_or_default(),
            created_at: c.created_at,
            html_url: c.html_url,
        }
    }
}

impl GhReview {
    /// `None` for reviews that have not been submitted yet.
    pub(crate) fn into_message(self) -> Option<Message> {
        let submitted_at = self.submitted_at?;
        Some(Message {
            id: self.id,
            kind: MessageKind::Review { state: self.state },
            author_login: login(self.user),
            author_association: self.author_association,
            body: self.body.unwrap_or_default(),
            created_at: submitted_at,
            html_url: self.html_url,
        })
    }
}
