//! Hosting-platform objects as seen by the policy engine.

use chrono::{DateTime, Utc};

use crate::metadata::Record;
use crate::version::{MessageRef, Response};

/// One side (head or base) of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branch {
    pub git_ref: String,
    pub sha: String,
    pub clone_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub state: String,
    pub labels: Vec<String>,
    /// `None` when the platform has not computed mergeability yet, or when the
    /// pull request came from a listing that does not carry the flag.
    pub mergeable: Option<bool>,
    pub draft: bool,
    pub head: Branch,
    pub base: Branch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Comment,
    Review { state: String },
}

/// A discussion comment or a submitted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub kind: MessageKind,
    pub author_login: String,
    pub author_association: String,
    pub body: String,
    /// Creation time for comments, submission time for reviews.
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

impl Message {
    pub fn review_state(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Review { state } => Some(state),
            MessageKind::Comment => None,
        }
    }

    pub fn message_ref(&self) -> MessageRef {
        match self.kind {
            MessageKind::Comment => MessageRef::Comment(self.id),
            MessageKind::Review { .. } => MessageRef::Review(self.id),
        }
    }

    /// The persisted reference to this message.
    pub fn response(&self) -> Response {
        Response {
            target: self.message_ref(),
            created_at: self.created_at.timestamp(),
        }
    }
}

impl Record for Message {
    fn fields(&self) -> Vec<(&'static str, String)> {
        let kind = match self.kind {
            MessageKind::Comment => "comment",
            MessageKind::Review { .. } => "review",
        };
        let mut fields = vec![
            ("id", self.id.to_string()),
            ("kind", kind.to_string()),
            ("body", self.body.clone()),
            ("created_at", self.created_at.to_rfc3339()),
            ("author_association", self.author_association.clone()),
            ("html_url", self.html_url.clone()),
            ("user_login", self.author_login.clone()),
        ];
        if let Some(state) = self.review_state() {
            fields.push(("review_state", state.to_string()));
        }
        fields
    }
}
