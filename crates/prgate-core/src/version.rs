//! Version tokens exchanged with the CI orchestrator.
//!
//! A [`Version`] is the only state that survives between a `check` and a
//! later `in`. It is deliberately flat: the matched responses are stored as
//! JSON-encoded strings so that the orchestrator can treat every field as an
//! opaque string.
//!
//! Response wire shape (all values are strings, the unused id is `""`):
//!
//! ```json
//! [{"review_id":"","comment_id":"681234","created_at":"1598961600"}]
//! ```

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Which message a [`Response`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRef {
    Comment(u64),
    Review(u64),
}

/// Minimal reference to a matched comment or review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResponseWire", into = "ResponseWire")]
pub struct Response {
    pub target: MessageRef,
    /// Unix seconds.
    pub created_at: i64,
}

#[derive(Serialize, Deserialize)]
struct ResponseWire {
    #[serde(default)]
    review_id: String,
    #[serde(default)]
    comment_id: String,
    #[serde(default)]
    created_at: String,
}

impl From<Response> for ResponseWire {
    fn from(r: Response) -> Self {
        let (review_id, comment_id) = match r.target {
            MessageRef::Review(id) => (id.to_string(), String::new()),
            MessageRef::Comment(id) => (String::new(), id.to_string()),
        };
        Self {
            review_id,
            comment_id,
            created_at: r.created_at.to_string(),
        }
    }
}

impl TryFrom<ResponseWire> for Response {
    type Error = CoreError;

    fn try_from(wire: ResponseWire) -> Result<Self, Self::Error> {
        let review_id = parse_id("review_id", &wire.review_id)?;
        let comment_id = parse_id("comment_id", &wire.comment_id)?;
        let target = match (review_id, comment_id) {
            (Some(id), None) => MessageRef::Review(id),
            (None, Some(id)) => MessageRef::Comment(id),
            (None, None) => {
                return Err(CoreError::InvalidResponse(
                    "no comment or review id".to_string(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(CoreError::InvalidResponse(
                    "both a comment and a review id".to_string(),
                ));
            }
        };

        let created_at = match wire.created_at.trim() {
            "" => 0,
            ts => ts.parse().map_err(|_| {
                CoreError::InvalidResponse(format!("created_at is not a timestamp: {ts:?}"))
            })?,
        };

        Ok(Self { target, created_at })
    }
}

/// Empty and zero ids count as absent.
fn parse_id(field: &str, raw: &str) -> Result<Option<u64>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let id: u64 = raw
        .parse()
        .map_err(|_| CoreError::InvalidResponse(format!("{field} is not numeric: {raw:?}")))?;
    Ok((id > 0).then_some(id))
}

/// Encode an ordered response list into its compact string form.
pub fn encode_responses(responses: &[Response]) -> Result<String, CoreError> {
    serde_json::to_string(responses).map_err(CoreError::EncodeResponses)
}

/// Decode a response list produced by [`encode_responses`].
///
/// A JSON `null` decodes as an empty list.
pub fn decode_responses(encoded: &str) -> Result<Vec<Response>, CoreError> {
    let list: Option<Vec<Response>> = serde_json::from_str(encoded)?;
    Ok(list.unwrap_or_default())
}

/// Latest timestamp across both response lists, `0` when both are empty.
pub fn last_activity(approvals: &[Response], reviews: &[Response]) -> i64 {
    approvals
        .iter()
        .chain(reviews)
        .map(|r| r.created_at)
        .max()
        .unwrap_or(0)
}

/// Opaque token describing one qualifying pull-request state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Version {
    pub pr_id: String,
    #[serde(default)]
    pub approved_by: String,
    #[serde(default)]
    pub reviewed_by: String,
}

impl Version {
    pub fn new(
        pr_number: u64,
        approvals: &[Response],
        reviews: &[Response],
    ) -> Result<Self, CoreError> {
        Ok(Self {
            pr_id: pr_number.to_string(),
            approved_by: encode_responses(approvals)?,
            reviewed_by: encode_responses(reviews)?,
        })
    }

    pub fn pr_number(&self) -> Result<u64, CoreError> {
        self.pr_id
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidPrId(self.pr_id.clone()))
    }

    pub fn approvals(&self) -> Result<Vec<Response>, CoreError> {
        decode_responses(&self.approved_by)
    }

    pub fn reviews(&self) -> Result<Vec<Response>, CoreError> {
        decode_responses(&self.reviewed_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Response> {
        vec![
            Response {
                target: MessageRef::Comment(681234),
                created_at: 1_598_961_600,
            },
            Response {
                target: MessageRef::Review(4412),
                created_at: 1_598_961_000,
            },
            Response {
                target: MessageRef::Comment(681300),
                created_at: 1_598_970_000,
            },
        ]
    }

    #[test]
    fn encode_matches_wire_shape() {
        let encoded = encode_responses(&sample()[..1]).unwrap();
        assert_eq!(
            encoded,
            r#"[{"review_id":"","comment_id":"681234","created_at":"1598961600"}]"#
        );
    }

    #[test]
    fn encode_decode_preserves_order_and_values() {
        let responses = sample();
        let decoded = decode_responses(&encode_responses(&responses).unwrap()).unwrap();
        assert_eq!(decoded, responses);
    }

    #[test]
    fn null_decodes_as_empty() {
        assert!(decode_responses("null").unwrap().is_empty());
        assert!(decode_responses("[]").unwrap().is_empty());
    }

    #[test]
    fn zero_id_counts_as_absent() {
        let decoded =
            decode_responses(r#"[{"review_id":"0","comment_id":"12","created_at":"5"}]"#).unwrap();
        assert_eq!(decoded[0].target, MessageRef::Comment(12));
    }

    #[test]
    fn neither_id_is_rejected() {
        let err = decode_responses(r#"[{"review_id":"","comment_id":"","created_at":"5"}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("no comment or review id"));
        assert!(!err.is_config());
    }

    #[test]
    fn both_ids_are_rejected() {
        let err = decode_responses(r#"[{"review_id":"1","comment_id":"2","created_at":"5"}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("both a comment and a review id"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_responses("").is_err());
        assert!(decode_responses("{}").is_err());
        assert!(decode_responses(r#"[{"comment_id":"abc"}]"#).is_err());
    }

    #[test]
    fn version_wire_shape() {
        let version = Version::new(5, &sample()[..1], &[]).unwrap();
        let json = serde_json::to_value(&version).unwrap();
        assert_eq!(json["pr_id"], "5");
        assert_eq!(json["reviewed_by"], "[]");
        assert_eq!(version.pr_number().unwrap(), 5);
        assert_eq!(version.approvals().unwrap(), sample()[..1].to_vec());
    }

    #[test]
    fn version_rejects_non_numeric_pr() {
        let version = Version {
            pr_id: "five".into(),
            ..Default::default()
        };
        assert!(matches!(
            version.pr_number(),
            Err(CoreError::InvalidPrId(id)) if id == "five"
        ));
    }

    #[test]
    fn last_activity_is_max_across_lists() {
        let all = sample();
        assert_eq!(last_activity(&all[..2], &all[2..]), 1_598_970_000);
        assert_eq!(last_activity(&[], &[]), 0);
    }
}
