//! The two steps of the resource.
//!
//! [`check`] scans every pull request and emits the versions that satisfy
//! the policy. [`fetch_version`] takes one of those versions back, rebuilds
//! its metadata, writes it to disk and prepares the working copy.

pub mod artifacts;
mod check;
mod error;
pub mod request;
mod resolve;

#[cfg(test)]
mod testing;

pub use check::{Classification, check, classify};
pub use error::ResourceError;
pub use request::{CheckRequest, CheckResponse, InParams, InRequest, InResponse};
pub use resolve::{
    MatchedMessage, PullMetadata, Resolved, Role, fetch_version, materialize, resolve,
};
