//! Working-copy layer: materialises a pull request on disk.

mod client;
mod error;

pub use client::{GitClient, WorkingCopy};
pub use error::GitError;
