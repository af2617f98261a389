//! Selection predicates over pull requests and their messages.
//!
//! Two attribute classes (state, labels) follow the same rule: an empty
//! inclusion list matches everything, and a hit in the exclusion list always
//! wins. Comment patterns are unanchored searches; an empty pattern list is a
//! wildcard.
//!
//! Team membership needs the hosting platform and is answered by
//! `prgate_github::team_allows`.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::debug;

use crate::config::DEFAULT_STATE;
use crate::{CoreError, PolicyConfig};

/// Named capture groups extracted from one message body.
pub type Captures = BTreeMap<String, String>;

/// `count >= max(1, min)`. The floor of one cannot be configured away.
pub fn minimum_satisfied(count: usize, min: u32) -> bool {
    count >= (min.max(1) as usize)
}

/// A [`PolicyConfig`] with its comment patterns compiled.
#[derive(Debug, Clone)]
pub struct Policy {
    config: PolicyConfig,
    approver_patterns: Vec<Regex>,
    reviewer_patterns: Vec<Regex>,
}

impl Policy {
    /// Compile every configured pattern. Fails on the first malformed one.
    pub fn compile(config: PolicyConfig) -> Result<Self, CoreError> {
        let approver_patterns = compile_all("approver_comments", &config.approver_comments)?;
        let reviewer_patterns = compile_all("reviewer_comments", &config.reviewer_comments)?;
        debug!(
            approver_patterns = approver_patterns.len(),
            reviewer_patterns = reviewer_patterns.len(),
            "compiled policy"
        );
        Ok(Self {
            config,
            approver_patterns,
            reviewer_patterns,
        })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    // ── Pull-request filters ──

    pub fn state_matches(&self, state: &str) -> bool {
        let included = if self.config.states.is_empty() {
            state == DEFAULT_STATE
        } else {
            self.config.states.iter().any(|s| s == state)
        };
        included && !self.config.ignore_states.iter().any(|s| s == state)
    }

    pub fn labels_match<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        let has = |wanted: &String| labels.iter().any(|l| l.as_ref() == wanted);
        let included = self.config.labels.is_empty() || self.config.labels.iter().any(has);
        included && !self.config.ignore_labels.iter().any(has)
    }

    // ── Message filters ──

    /// Case-insensitive membership in `review_states`.
    pub fn review_state_matches(&self, state: &str) -> bool {
        self.config
            .review_states
            .iter()
            .any(|s| s.eq_ignore_ascii_case(state))
    }

    pub fn approver_regex_matches(&self, body: &str) -> bool {
        any_match(&self.approver_patterns, body)
    }

    pub fn reviewer_regex_matches(&self, body: &str) -> bool {
        any_match(&self.reviewer_patterns, body)
    }

    // ── Thresholds ──

    pub fn has_min_approvals(&self, count: usize) -> bool {
        minimum_satisfied(count, self.config.min_approvals)
    }

    pub fn has_min_reviews(&self, count: usize) -> bool {
        minimum_satisfied(count, self.config.min_reviews)
    }

    // ── Capture extraction ──

    pub fn approver_captures(&self, body: &str) -> Captures {
        extract_captures(&self.approver_patterns, body)
    }

    pub fn reviewer_captures(&self, body: &str) -> Captures {
        extract_captures(&self.reviewer_patterns, body)
    }
}

fn compile_all(list: &'static str, patterns: &[String]) -> Result<Vec<Regex>, CoreError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| CoreError::InvalidPattern {
                list,
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

fn any_match(patterns: &[Regex], body: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|re| re.is_match(body))
}

/// Merge the named groups of every matching pattern; later patterns overwrite
/// earlier ones. A named group that did not participate in a match yields an
/// empty value.
fn extract_captures(patterns: &[Regex], body: &str) -> Captures {
    let mut captures = Captures::new();
    for re in patterns {
        let Some(caps) = re.captures(body) else {
            continue;
        };
        for name in re.capture_names().flatten() {
            let value = caps.name(name).map(|m| m.as_str()).unwrap_or_default();
            captures.insert(name.to_string(), value.to_string());
        }
    }
    captures
}
