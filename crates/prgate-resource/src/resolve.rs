//! The `in` step: turn one version back into metadata and a working copy.
//!
//! The version is the only input. Messages are re-fetched by id and the
//! configured patterns re-applied to recover their named captures, so the
//! result does not depend on anything the check step held in memory.

use std::path::Path;

use prgate_core::{
    Captures, IntegrationTool, Message, MessageRef, Metadata, Policy, PullRequest, Record,
    Response, Version,
};
use prgate_git::{GitError, WorkingCopy};
use prgate_github::HostingClient;
use tracing::info;

use crate::request::{InParams, InResponse};
use crate::{ResourceError, artifacts};

/// Which list a response was accumulated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Approval,
    Review,
}

/// A re-fetched message together with the captures of its role's patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedMessage {
    pub message: Message,
    pub captures: Captures,
}

/// Fixed part of the metadata, in reporting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullMetadata {
    pub pr_id: u64,
    pub head_ref: String,
    pub head_sha: String,
    pub base_ref: String,
    pub base_sha: String,
    pub total_approvals: usize,
    pub total_reviews: usize,
}

impl Record for PullMetadata {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pr_id", self.pr_id.to_string()),
            ("pr_head_ref", self.head_ref.clone()),
            ("pr_head_sha", self.head_sha.clone()),
            ("pr_base_ref", self.base_ref.clone()),
            ("pr_base_sha", self.base_sha.clone()),
            ("total_approvals", self.total_approvals.to_string()),
            ("total_reviews", self.total_reviews.to_string()),
        ]
    }
}

/// Everything recovered from a version.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub pull: PullRequest,
    pub approvals: Vec<MatchedMessage>,
    pub reviews: Vec<MatchedMessage>,
    pub metadata: Metadata,
}

/// Re-fetch the pull request and every referenced message, and build the
/// metadata. Performs no filesystem or working-copy side effects.
pub async fn resolve<C>(
    client: &C,
    policy: &Policy,
    version: &Version,
) -> Result<Resolved, ResourceError>
where
    C: HostingClient + ?Sized,
{
    let pr = version.pr_number()?;
    let pull = client.get_pull_request(pr).await?;

    let approvals = version.approvals()?;
    let reviews = version.reviews()?;

    let approvals = load_messages(client, policy, pr, &approvals, Role::Approval).await?;
    let reviews = load_messages(client, policy, pr, &reviews, Role::Review).await?;

    let mut metadata = Metadata::from_record(&PullMetadata {
        pr_id: pr,
        head_ref: pull.head.git_ref.clone(),
        head_sha: pull.head.sha.clone(),
        base_ref: pull.base.git_ref.clone(),
        base_sha: pull.base.sha.clone(),
        total_approvals: approvals.len(),
        total_reviews: reviews.len(),
    });
    for list in [&approvals, &reviews] {
        for (i, matched) in list.iter().enumerate() {
            for (name, value) in &matched.captures {
                metadata.add(format!("{name}_{}", i + 1), value.as_str());
            }
        }
    }

    info!(
        pr,
        approvals = approvals.len(),
        reviews = reviews.len(),
        fields = metadata.len(),
        "resolved version"
    );
    Ok(Resolved {
        pull,
        approvals,
        reviews,
        metadata,
    })
}

async fn load_messages<C>(
    client: &C,
    policy: &Policy,
    pr: u64,
    responses: &[Response],
    role: Role,
) -> Result<Vec<MatchedMessage>, ResourceError>
where
    C: HostingClient + ?Sized,
{
    let mut out = Vec::with_capacity(responses.len());
    for response in responses {
        let message = match response.target {
            MessageRef::Review(id) => client.get_review(pr, id).await?,
            MessageRef::Comment(id) => client.get_comment(id).await?,
        };
        let captures = match role {
            Role::Approval => policy.approver_captures(&message.body),
            Role::Review => policy.reviewer_captures(&message.body),
        };
        out.push(MatchedMessage { message, captures });
    }
    Ok(out)
}

/// Check out the pull request with the selected integration tool.
pub fn materialize<W: WorkingCopy>(
    working_copy: &W,
    pull: &PullRequest,
    params: &InParams,
    tool: IntegrationTool,
) -> Result<(), GitError> {
    working_copy.init(&pull.base.git_ref)?;
    working_copy.pull(
        &pull.base.clone_url,
        &pull.base.git_ref,
        params.git_depth,
        params.submodules,
        params.fetch_tags,
    )?;
    working_copy.fetch(
        &pull.base.clone_url,
        pull.number,
        params.git_depth,
        params.submodules,
    )?;

    info!(pr = pull.number, tool = %tool, "integrating pull request");
    match tool {
        IntegrationTool::Rebase => {
            working_copy.rebase(&pull.base.git_ref, &pull.head.sha, params.submodules)
        }
        IntegrationTool::Merge => working_copy.merge(&pull.head.sha, params.submodules),
        IntegrationTool::Checkout => {
            working_copy.checkout(&pull.head.git_ref, &pull.head.sha, params.submodules)
        }
    }
}

/// Run the whole `in` step into `output_dir`.
///
/// `open_working_copy` is only called when a download is requested, with the
/// directory the working copy must live in.
pub async fn fetch_version<C, W, F>(
    client: &C,
    policy: &Policy,
    version: &Version,
    params: &InParams,
    output_dir: &Path,
    open_working_copy: F,
) -> Result<InResponse, ResourceError>
where
    C: HostingClient + ?Sized,
    W: WorkingCopy,
    F: FnOnce(&Path) -> Result<W, GitError>,
{
    // Reject a bad tool before anything is fetched or written.
    let tool: IntegrationTool = params.integration_tool.parse()?;

    let resolved = resolve(client, policy, version).await?;
    artifacts::write_all(output_dir, version, &resolved, params.map_metadata)?;

    if params.skip_download {
        info!(pr = resolved.pull.number, "download skipped");
    } else {
        let source_dir = output_dir.join(params.source_path());
        let working_copy = open_working_copy(&source_dir)?;
        materialize(&working_copy, &resolved.pull, params, tool)?;
    }

    Ok(InResponse {
        version: version.clone(),
        metadata: resolved.metadata,
    })
}
