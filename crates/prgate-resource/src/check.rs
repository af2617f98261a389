//! The `check` step: scan every pull request and report the qualifying ones.
//!
//! Each call is a full rescan of the repository. Nothing is carried over from
//! a previous check; the orchestrator deduplicates versions it has seen.

use prgate_core::{Message, Policy, PullRequest, Response, Version, last_activity};
use prgate_github::{HostingClient, HostingError, team_allows};
use tracing::{debug, info};

use crate::ResourceError;

/// How a single message counts towards a pull request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub approval: bool,
    pub review: bool,
}

/// Classify a comment or review against the approver and reviewer rules.
///
/// The two rules are evaluated independently, so one message may count as
/// both. Reviews must additionally be in an allowed state to count as a
/// review; approvals are never gated on review state.
pub async fn classify<C>(
    client: &C,
    policy: &Policy,
    message: &Message,
) -> Result<Classification, HostingError>
where
    C: HostingClient + ?Sized,
{
    let config = policy.config();

    let approval = policy.approver_regex_matches(&message.body)
        && team_allows(client, &message.author_login, &config.approver_teams).await?;

    let state_ok = message
        .review_state()
        .is_none_or(|state| policy.review_state_matches(state));
    let review = state_ok
        && policy.reviewer_regex_matches(&message.body)
        && team_allows(client, &message.author_login, &config.reviewer_teams).await?;

    Ok(Classification { approval, review })
}

/// Responses accumulated for one pull request.
#[derive(Debug, Default)]
struct Tally {
    approvals: Vec<Response>,
    reviews: Vec<Response>,
}

impl Tally {
    fn record(&mut self, message: &Message, class: Classification) {
        if class.approval {
            self.approvals.push(message.response());
        }
        if class.review {
            self.reviews.push(message.response());
        }
    }
}

/// Run the check step and return the qualifying versions, oldest activity first.
pub async fn check<C>(client: &C, policy: &Policy) -> Result<Vec<Version>, ResourceError>
where
    C: HostingClient + ?Sized,
{
    let pulls = client.list_pull_requests().await?;

    if !pulls.is_empty() {
        for team in policy.config().all_teams() {
            client.list_team_members(team).await?;
        }
    }

    let mut found: Vec<(i64, Version)> = Vec::new();
    for pull in &pulls {
        if !is_selected(client, policy, pull).await? {
            continue;
        }

        let mut tally = Tally::default();
        for comment in client.list_comments(pull.number).await? {
            let class = classify(client, policy, &comment).await?;
            tally.record(&comment, class);
        }
        for review in client.list_reviews(pull.number).await? {
            let class = classify(client, policy, &review).await?;
            tally.record(&review, class);
        }

        if !policy.has_min_approvals(tally.approvals.len())
            || !policy.has_min_reviews(tally.reviews.len())
        {
            debug!(
                pr = pull.number,
                approvals = tally.approvals.len(),
                reviews = tally.reviews.len(),
                "below threshold"
            );
            continue;
        }

        let updated = last_activity(&tally.approvals, &tally.reviews);
        let version = Version::new(pull.number, &tally.approvals, &tally.reviews)?;
        info!(
            pr = pull.number,
            approvals = tally.approvals.len(),
            reviews = tally.reviews.len(),
            "pull request qualifies"
        );
        found.push((updated, version));
    }

    // Stable: ties keep listing order.
    found.sort_by_key(|(updated, _)| *updated);

    info!(scanned = pulls.len(), qualifying = found.len(), "check complete");
    Ok(found.into_iter().map(|(_, version)| version).collect())
}

/// Pull-request level filters. Mergeability is checked last since it may
/// cost a detail request.
async fn is_selected<C>(
    client: &C,
    policy: &Policy,
    pull: &PullRequest,
) -> Result<bool, HostingError>
where
    C: HostingClient + ?Sized,
{
    if !policy.state_matches(&pull.state) {
        debug!(pr = pull.number, state = %pull.state, "state not selected");
        return Ok(false);
    }
    if !policy.labels_match(&pull.labels) {
        debug!(pr = pull.number, "labels not selected");
        return Ok(false);
    }
    if pull.draft {
        debug!(pr = pull.number, "draft");
        return Ok(false);
    }
    if policy.config().only_mergeable {
        let mergeable = match pull.mergeable {
            Some(known) => known,
            None => client
                .get_pull_request(pull.number)
                .await?
                .mergeable
                .unwrap_or(false),
        };
        if !mergeable {
            debug!(pr = pull.number, "not mergeable");
            return Ok(false);
        }
    }
    Ok(true)
}
