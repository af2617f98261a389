//! In-memory collaborators for the check and in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use prgate_core::{Branch, Message, MessageKind, PullRequest};
use prgate_git::{GitError, WorkingCopy};
use prgate_github::{HostingClient, HostingError};

pub fn pull(number: u64) -> PullRequest {
    PullRequest {
        number,
        state: "open".into(),
        labels: Vec::new(),
        mergeable: Some(true),
        draft: false,
        head: Branch {
            git_ref: format!("feature-{number}"),
            sha: format!("head{number}"),
            clone_url: "https://github.com/unikraft/app.git".into(),
        },
        base: Branch {
            git_ref: "main".into(),
            sha: format!("base{number}"),
            clone_url: "https://github.com/unikraft/app.git".into(),
        },
    }
}

pub fn comment(id: u64, author: &str, body: &str, at: i64) -> Message {
    Message {
        id,
        kind: MessageKind::Comment,
        author_login: author.into(),
        author_association: "CONTRIBUTOR".into(),
        body: body.into(),
        created_at: Utc.timestamp_opt(at, 0).unwrap(),
        html_url: format!("https://github.com/unikraft/app/pull/1#issuecomment-{id}"),
    }
}

pub fn review(id: u64, author: &str, state: &str, body: &str, at: i64) -> Message {
    Message {
        kind: MessageKind::Review {
            state: state.into(),
        },
        html_url: format!("https://github.com/unikraft/app/pull/1#pullrequestreview-{id}"),
        ..comment(id, author, body, at)
    }
}

/// Hosting platform backed by plain maps. Every call is logged.
#[derive(Default)]
pub struct FakeHosting {
    pub pulls: Vec<PullRequest>,
    /// Detail view overrides; falls back to the listing.
    pub details: HashMap<u64, PullRequest>,
    pub comments: HashMap<u64, Vec<Message>>,
    pub reviews: HashMap<u64, Vec<Message>>,
    pub teams: HashMap<String, Vec<String>>,
    pub fail_on: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeHosting {
    fn record(&self, call: String) -> Result<(), HostingError> {
        let failing = self.fail_on.as_deref() == Some(call.as_str());
        self.calls.lock().unwrap().push(call.clone());
        if failing {
            return Err(HostingError::Server {
                status: 502,
                url: call,
                body: "bad gateway".into(),
            });
        }
        Ok(())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn not_found(what: String) -> HostingError {
        HostingError::Server {
            status: 404,
            url: what,
            body: "Not Found".into(),
        }
    }
}

#[async_trait]
impl HostingClient for FakeHosting {
    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>, HostingError> {
        self.record("list_pull_requests".into())?;
        Ok(self.pulls.clone())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, HostingError> {
        self.record(format!("get_pull_request {number}"))?;
        self.details
            .get(&number)
            .or_else(|| self.pulls.iter().find(|p| p.number == number))
            .cloned()
            .ok_or_else(|| Self::not_found(format!("pull {number}")))
    }

    async fn list_comments(&self, pr: u64) -> Result<Vec<Message>, HostingError> {
        self.record(format!("list_comments {pr}"))?;
        Ok(self.comments.get(&pr).cloned().unwrap_or_default())
    }

    async fn list_reviews(&self, pr: u64) -> Result<Vec<Message>, HostingError> {
        self.record(format!("list_reviews {pr}"))?;
        Ok(self.reviews.get(&pr).cloned().unwrap_or_default())
    }

    async fn get_comment(&self, id: u64) -> Result<Message, HostingError> {
        self.record(format!("get_comment {id}"))?;
        self.comments
            .values()
            .flatten()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(format!("comment {id}")))
    }

    async fn get_review(&self, pr: u64, id: u64) -> Result<Message, HostingError> {
        self.record(format!("get_review {pr} {id}"))?;
        self.reviews
            .get(&pr)
            .and_then(|reviews| reviews.iter().find(|m| m.id == id))
            .cloned()
            .ok_or_else(|| Self::not_found(format!("review {id}")))
    }

    async fn user_is_team_member(&self, login: &str, team: &str) -> Result<bool, HostingError> {
        self.record(format!("user_is_team_member {login} {team}"))?;
        Ok(self
            .teams
            .get(team)
            .is_some_and(|members| members.iter().any(|m| m == login)))
    }

    async fn list_team_members(&self, team: &str) -> Result<Vec<String>, HostingError> {
        self.record(format!("list_team_members {team}"))?;
        Ok(self.teams.get(team).cloned().unwrap_or_default())
    }
}

/// Working copy that only records the operations it was asked to perform.
#[derive(Clone, Default)]
pub struct RecordingWorkingCopy {
    pub ops: Rc<RefCell<Vec<String>>>,
}

impl RecordingWorkingCopy {
    pub fn ops(&self) -> Vec<String> {
        self.ops.borrow().clone()
    }

    fn push(&self, op: String) -> Result<(), GitError> {
        self.ops.borrow_mut().push(op);
        Ok(())
    }
}

impl WorkingCopy for RecordingWorkingCopy {
    fn init(&self, base_ref: &str) -> Result<(), GitError> {
        self.push(format!("init {base_ref}"))
    }

    fn pull(
        &self,
        url: &str,
        git_ref: &str,
        depth: u32,
        submodules: bool,
        fetch_tags: bool,
    ) -> Result<(), GitError> {
        self.push(format!("pull {url} {git_ref} {depth} {submodules} {fetch_tags}"))
    }

    fn fetch(
        &self,
        url: &str,
        pr_number: u64,
        depth: u32,
        submodules: bool,
    ) -> Result<(), GitError> {
        self.push(format!("fetch {url} {pr_number} {depth} {submodules}"))
    }

    fn rebase(&self, base_ref: &str, head_sha: &str, submodules: bool) -> Result<(), GitError> {
        self.push(format!("rebase {base_ref} {head_sha} {submodules}"))
    }

    fn merge(&self, head_sha: &str, submodules: bool) -> Result<(), GitError> {
        self.push(format!("merge {head_sha} {submodules}"))
    }

    fn checkout(&self, head_ref: &str, head_sha: &str, submodules: bool) -> Result<(), GitError> {
        self.push(format!("checkout {head_ref} {head_sha} {submodules}"))
    }
}
