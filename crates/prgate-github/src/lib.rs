//! Hosting layer: the capability the scanner and resolver need from the
//! code-hosting platform, and its GitHub REST implementation.

mod client;
mod error;
mod hosting;
mod wire;

pub use client::GithubClient;
pub use error::HostingError;
pub use hosting::{HostingClient, team_allows};
