//! Stage Cache (C3): per-stage read/write, invalidation on schema failure,
//! atomic writes via the workspace.

use clipcheck_workspace::{LogicalName, Workspace};
use serde::Serialize;
use tracing::warn;

use crate::error::CacheResult;
use crate::schema::{validate, Artifact, SchemaName};

/// Reads `logical_name` from the workspace and validates it against
/// `schema`. Returns `None` on a cache miss *or* a validation failure —
/// the two are indistinguishable to the caller by design, since either
/// means "re-run the stage". On validation failure the bad artifact is
/// quarantined so it cannot be mistaken for a valid hit again.
pub async fn get(
    workspace: &Workspace,
    logical_name: &LogicalName,
    schema: SchemaName,
) -> Option<Artifact> {
    if !workspace.exists(logical_name).await {
        return None;
    }

    let path = workspace.path_of(logical_name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read cached artifact");
            return None;
        },
    };

    match validate(&bytes, schema) {
        Ok(artifact) => Some(artifact),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cached artifact failed validation, quarantining");
            if let Err(quarantine_err) = workspace.quarantine(logical_name).await {
                warn!(error = %quarantine_err, "failed to quarantine invalid artifact");
            }
            None
        },
    }
}

/// Validates `bytes` against `schema`, then writes it atomically. Producer-
/// side validation per C2 policy: a stage never persists output it
/// wouldn't accept back from [`get`].
pub async fn put(
    workspace: &Workspace,
    logical_name: &LogicalName,
    bytes: &[u8],
    schema: SchemaName,
) -> CacheResult<()> {
    validate(bytes, schema)?;
    workspace.write_atomic(logical_name, bytes).await?;
    Ok(())
}

/// Convenience wrapper for producers that hold a typed, already-serializable
/// value rather than raw bytes.
pub async fn put_value<T: Serialize>(
    workspace: &Workspace,
    logical_name: &LogicalName,
    value: &T,
    schema: SchemaName,
) -> CacheResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    put(workspace, logical_name, &bytes, schema).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcheck_models::{Transcript, TranscriptSegment};

    async fn workspace() -> (tempfile::TempDir, Workspace) {
        let tmp = tempfile::tempdir().unwrap();
        let episode = clipcheck_workspace::locate("https://example.com/ep").unwrap();
        let ws = Workspace::ensure(tmp.path(), episode).await.unwrap();
        (tmp, ws)
    }

    #[tokio::test]
    async fn get_returns_none_on_miss() {
        let (_tmp, ws) = workspace().await;
        let result = get(&ws, &LogicalName::Transcript, SchemaName::Transcript).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let (_tmp, ws) = workspace().await;
        let transcript = Transcript {
            language: "en".into(),
            model_name: "m".into(),
            segments: vec![TranscriptSegment { id: 0, speaker: "a".into(), text: "hi".into(), start: 0.0, end: 1.0 }],
        };
        put_value(&ws, &LogicalName::Transcript, &transcript, SchemaName::Transcript).await.unwrap();

        let fetched = get(&ws, &LogicalName::Transcript, SchemaName::Transcript).await.unwrap();
        assert_eq!(fetched.as_transcript().unwrap(), &transcript);
    }

    #[tokio::test]
    async fn corrupted_cache_entry_is_quarantined_and_misses() {
        let (_tmp, ws) = workspace().await;
        ws.write_atomic(&LogicalName::Pass2Filtered, b"{}").await.unwrap();

        let result = get(&ws, &LogicalName::Pass2Filtered, SchemaName::Pass2Filtered).await;
        // `{}` fails to deserialize (missing `segments`), so this is a miss...
        assert!(result.is_none());
        // ...and the artifact no longer exists at its canonical path.
        assert!(!ws.exists(&LogicalName::Pass2Filtered).await);
    }

    #[tokio::test]
    async fn put_rejects_invariant_violation_before_writing() {
        let (_tmp, ws) = workspace().await;
        let bad = br#"{"language":"en","model_name":"m","segments":[{"id":0,"speaker":"a","text":"hi","start":2.0,"end":1.0}]}"#;
        let result = put(&ws, &LogicalName::Transcript, bad, SchemaName::Transcript).await;
        assert!(result.is_err());
        assert!(!ws.exists(&LogicalName::Transcript).await);
    }
}
