//! JSON documents exchanged with the orchestrator over stdin/stdout.

use prgate_core::{Metadata, PolicyConfig, Version};
use serde::{Deserialize, Serialize};

/// Default working-copy directory below the output directory.
pub const DEFAULT_SOURCE_PATH: &str = "source";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckRequest {
    pub source: PolicyConfig,
    /// Last version seen by the orchestrator. Every check is a full rescan,
    /// so this is accepted and ignored.
    #[serde(default)]
    pub version: Option<Version>,
}

pub type CheckResponse = Vec<Version>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InParams {
    /// Working-copy directory relative to the output directory.
    pub source_path: String,
    /// Zero fetches full history.
    pub git_depth: u32,
    pub submodules: bool,
    pub fetch_tags: bool,
    /// `rebase` (default), `merge` or `checkout`.
    pub integration_tool: String,
    pub skip_download: bool,
    /// Also write one directory per matched message.
    pub map_metadata: bool,
}

impl InParams {
    pub fn source_path(&self) -> &str {
        if self.source_path.is_empty() {
            DEFAULT_SOURCE_PATH
        } else {
            &self.source_path
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InRequest {
    pub source: PolicyConfig,
    pub version: Version,
    #[serde(default)]
    pub params: InParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InResponse {
    pub version: Version,
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_check_has_null_version() {
        let req: CheckRequest =
            serde_json::from_str(r#"{"source": {"repository": "o/r"}, "version": null}"#).unwrap();
        assert!(req.version.is_none());

        let req: CheckRequest = serde_json::from_str(r#"{"source": {}}"#).unwrap();
        assert!(req.version.is_none());
    }

    #[test]
    fn in_request_params_default() {
        let req: InRequest = serde_json::from_str(
            r#"{"source": {"repository": "o/r"}, "version": {"pr_id": "5", "approved_by": "[]", "reviewed_by": "[]"}}"#,
        )
        .unwrap();
        assert_eq!(req.params, InParams::default());
        assert_eq!(req.params.source_path(), "source");
        assert_eq!(req.version.pr_id, "5");
    }

    #[test]
    fn in_request_rejects_unknown_params() {
        let result: Result<InRequest, _> = serde_json::from_str(
            r#"{"source": {}, "version": {"pr_id": "5"}, "params": {"depth": 1}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn in_response_shape() {
        let mut metadata = Metadata::new();
        metadata.add("pr_id", "5");
        let resp = InResponse {
            version: Version {
                pr_id: "5".into(),
                approved_by: "[]".into(),
                reviewed_by: "[]".into(),
            },
            metadata,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["version"]["pr_id"], "5");
        assert_eq!(json["metadata"][0]["name"], "pr_id");
        assert_eq!(json["metadata"][0]["value"], "5");
    }
}
