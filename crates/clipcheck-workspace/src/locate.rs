//! `locate(source) -> EpisodeRef`: normalize a source reference to a stable
//! episode label, without touching disk.

use clipcheck_models::{EpisodeId, EpisodeRef};
use sha2::{Digest, Sha256};

use crate::error::{WorkspaceError, WorkspaceResult};

/// Derives a filesystem-safe episode label from a source reference.
///
/// Remote references (parseable as a URL) are normalized to `host-path`
/// slug form. Local paths use the file stem. Anything left that still
/// contains characters unsafe for a directory name is replaced with `_`,
/// and a short content hash is appended so two distinct sources that slugify
/// to the same text do not collide.
pub fn locate(source: &str) -> WorkspaceResult<EpisodeRef> {
    if source.trim().is_empty() {
        return Err(WorkspaceError::invalid_source("source reference is empty"));
    }

    let raw_label = if let Ok(url) = url::Url::parse(source) {
        let host = url.host_str().unwrap_or("local");
        let path = url.path().trim_matches('/');
        if path.is_empty() {
            host.to_string()
        } else {
            format!("{host}-{path}")
        }
    } else {
        std::path::Path::new(source)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(source)
            .to_string()
    };

    let slug = slugify(&raw_label);
    let suffix = short_hash(source);
    let label = format!("{slug}-{suffix}");

    Ok(EpisodeRef::new(EpisodeId::from_label(label), source))
}

fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "episode".to_string()
    } else {
        trimmed.chars().take(64).collect()
    }
}

fn short_hash(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    hex_prefix(&digest, 8)
}

fn hex_prefix(bytes: &[u8], n: usize) -> String {
    bytes.iter().take(n).map(|b| format!("{b:02x}")).collect()
}
