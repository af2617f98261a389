//! Files written into the `in` output directory.
//!
//! ```text
//! <out>/version.json
//! <out>/metadata.json
//! <out>/<field>              one per metadata field
//! <out>/approval/<i>/<name>  with map_metadata: message fields and captures
//! <out>/review/<i>/<name>
//! ```

use std::fs;
use std::path::Path;

use prgate_core::{Metadata, Record, Version};
use serde::Serialize;
use tracing::debug;

use crate::ResourceError;
use crate::resolve::{MatchedMessage, Resolved};

pub const VERSION_FILE: &str = "version.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Write every artifact for a resolved version. Nothing is rolled back if a
/// later write fails.
pub fn write_all(
    dir: &Path,
    version: &Version,
    resolved: &Resolved,
    map_metadata: bool,
) -> Result<(), ResourceError> {
    create_dir(dir)?;
    write_json(dir, VERSION_FILE, "version", version)?;
    write_json(dir, METADATA_FILE, "metadata", &resolved.metadata)?;
    write_fields(dir, &resolved.metadata)?;

    if map_metadata {
        write_map(&dir.join("approval"), &resolved.approvals)?;
        write_map(&dir.join("review"), &resolved.reviews)?;
    }
    Ok(())
}

/// One file per field. Repeated names overwrite, so the last value wins.
fn write_fields(dir: &Path, metadata: &Metadata) -> Result<(), ResourceError> {
    for field in metadata {
        write_text(&dir.join(&field.name), &field.value)?;
    }
    debug!(dir = %dir.display(), count = metadata.len(), "wrote metadata fields");
    Ok(())
}

/// `<parent>/<i>/` for each message, numbered from 1.
fn write_map(parent: &Path, messages: &[MatchedMessage]) -> Result<(), ResourceError> {
    for (i, matched) in messages.iter().enumerate() {
        let dir = parent.join((i + 1).to_string());
        create_dir(&dir)?;
        for (name, value) in matched.message.fields() {
            write_text(&dir.join(name), &value)?;
        }
        for (name, value) in &matched.captures {
            write_text(&dir.join(name), value)?;
        }
    }
    Ok(())
}

fn write_json<T: Serialize>(
    dir: &Path,
    file: &str,
    what: &'static str,
    value: &T,
) -> Result<(), ResourceError> {
    let bytes =
        serde_json::to_vec(value).map_err(|source| ResourceError::Encode { what, source })?;
    let path = dir.join(file);
    fs::write(&path, bytes).map_err(|source| ResourceError::Io { path, source })
}

fn write_text(path: &Path, text: &str) -> Result<(), ResourceError> {
    fs::write(path, text).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(dir: &Path) -> Result<(), ResourceError> {
    fs::create_dir_all(dir).map_err(|source| ResourceError::Io {
        path: dir.to_path_buf(),
        source,
    })
}
