//! `ensure`, `pathOf`, `exists`/`stat`, and `writeAtomic` (§4.1).

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use clipcheck_models::EpisodeRef;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::layout::LogicalName;
use crate::lock::WorkspaceLock;

#[derive(Debug, Clone, Copy)]
pub struct ArtifactStat {
    pub size: u64,
    pub mtime: SystemTime,
}

/// A workspace directory rooted at `content_root/<episode_id>`, holding the
/// non-blocking lock acquired by [`ensure`] for as long as it stays in
/// scope.
pub struct Workspace {
    root: PathBuf,
    episode: EpisodeRef,
    _lock: WorkspaceLock,
}

impl Workspace {
    /// Create the directory skeleton if missing and acquire the workspace
    /// lock. Fails fast with [`WorkspaceError::Busy`] if another run
    /// already holds it.
    pub async fn ensure(content_root: &Path, episode: EpisodeRef) -> WorkspaceResult<Self> {
        let root = content_root.join(episode.id.as_str());
        fs::create_dir_all(&root).await?;
        for dir in LogicalName::directories() {
            fs::create_dir_all(root.join(dir)).await?;
        }

        let lock = WorkspaceLock::acquire(&root).await?;

        debug!(episode = %episode.id, root = %root.display(), "workspace ready");
        Ok(Self { root, episode, _lock: lock })
    }

    pub fn episode(&self) -> &EpisodeRef {
        &self.episode
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, logical_name: &LogicalName) -> PathBuf {
        self.root.join(logical_name.relative_path())
    }

    pub async fn exists(&self, logical_name: &LogicalName) -> bool {
        fs::metadata(self.path_of(logical_name)).await.is_ok()
    }

    pub async fn stat(&self, logical_name: &LogicalName) -> WorkspaceResult<ArtifactStat> {
        let meta = fs::metadata(self.path_of(logical_name)).await?;
        Ok(ArtifactStat { size: meta.len(), mtime: meta.modified()? })
    }

    /// Write to a temp file in the same directory, fsync, then rename over
    /// the destination. A reader never observes a partially written file.
    pub async fn write_atomic(&self, logical_name: &LogicalName, bytes: &[u8]) -> WorkspaceResult<()> {
        let dest = self.path_of(logical_name);
        let dir = dest.parent().ok_or_else(|| {
            WorkspaceError::invalid_source(format!("{} has no parent directory", dest.display()))
        })?;
        fs::create_dir_all(dir).await?;

        let tmp_name = format!(
            ".{}.tmp.{}",
            dest.file_name().and_then(|n| n.to_str()).unwrap_or("artifact"),
            uuid::Uuid::new_v4()
        );
        let tmp_path = dir.join(tmp_name);

        let mut file = File::create(&tmp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&tmp_path, &dest).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    /// Rename a cached artifact that failed validation aside so it cannot
    /// be mistaken for a valid cache hit on the next read (C3 policy).
    pub async fn quarantine(&self, logical_name: &LogicalName) -> WorkspaceResult<PathBuf> {
        let path = self.path_of(logical_name);
        let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let quarantined = path.with_extension(format!("invalid.{timestamp}"));
        fs::rename(&path, &quarantined).await?;
        warn!(path = %path.display(), quarantined = %quarantined.display(), "quarantined invalid artifact");
        Ok(quarantined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_creates_directory_skeleton() {
        let tmp = tempfile::tempdir().unwrap();
        let episode = crate::locate::locate("https://example.com/ep").unwrap();
        let ws = Workspace::ensure(tmp.path(), episode).await.unwrap();

        assert!(ws.root().join("Input").is_dir());
        assert!(ws.root().join("Processing").is_dir());
        assert!(ws.root().join("Output/Audio").is_dir());
        assert!(ws.root().join("Output/Video").is_dir());
        assert!(ws.root().join("Output/Final").is_dir());
    }

    #[tokio::test]
    async fn write_atomic_is_visible_after_rename_only() {
        let tmp = tempfile::tempdir().unwrap();
        let episode = crate::locate::locate("https://example.com/ep").unwrap();
        let ws = Workspace::ensure(tmp.path(), episode).await.unwrap();

        assert!(!ws.exists(&LogicalName::Transcript).await);
        ws.write_atomic(&LogicalName::Transcript, b"{}").await.unwrap();
        assert!(ws.exists(&LogicalName::Transcript).await);

        let bytes = fs::read(ws.path_of(&LogicalName::Transcript)).await.unwrap();
        assert_eq!(bytes, b"{}");
    }

    #[tokio::test]
    async fn quarantine_renames_with_invalid_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let episode = crate::locate::locate("https://example.com/ep").unwrap();
        let ws = Workspace::ensure(tmp.path(), episode).await.unwrap();
        ws.write_atomic(&LogicalName::Pass2Filtered, b"{}").await.unwrap();

        let quarantined = ws.quarantine(&LogicalName::Pass2Filtered).await.unwrap();
        assert!(!ws.exists(&LogicalName::Pass2Filtered).await);
        assert!(quarantined.to_string_lossy().contains("invalid"));
    }

    #[tokio::test]
    async fn second_ensure_on_same_episode_fails_busy() {
        let tmp = tempfile::tempdir().unwrap();
        let episode_a = crate::locate::locate("https://example.com/ep").unwrap();
        let episode_b = crate::locate::locate("https://example.com/ep").unwrap();
        let _first = Workspace::ensure(tmp.path(), episode_a).await.unwrap();

        let second = Workspace::ensure(tmp.path(), episode_b).await;
        assert!(matches!(second, Err(WorkspaceError::Busy(_))));
    }
}
