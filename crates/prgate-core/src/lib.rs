pub mod config;
pub mod error;
pub mod integration;
pub mod metadata;
pub mod model;
pub mod policy;
pub mod version;

pub use config::PolicyConfig;
pub use error::CoreError;
pub use integration::IntegrationTool;
pub use metadata::{Metadata, MetadataField, Record};
pub use model::{Branch, Message, MessageKind, PullRequest};
pub use policy::{Captures, Policy, minimum_satisfied};
pub use version::{
    MessageRef, Response, Version, decode_responses, encode_responses, last_activity,
};
