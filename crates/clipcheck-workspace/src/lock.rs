//! Workspace lock: at most one run may hold a given episode workspace at a
//! time (§5 "Shared-resource policy").

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{WorkspaceError, WorkspaceResult};

/// RAII guard around an advisory, non-blocking exclusive file lock. The
/// lock is released when this value is dropped (orchestrator exit) or when
/// the process dies, whichever comes first.
pub struct WorkspaceLock {
    path: PathBuf,
    file: File,
}

impl WorkspaceLock {
    pub async fn acquire(workspace_root: &Path) -> WorkspaceResult<Self> {
        let path = workspace_root.join("lock");
        let root = workspace_root.to_path_buf();
        tokio::task::spawn_blocking(move || Self::acquire_blocking(&root, &path))
            .await
            .expect("lock acquisition task did not panic")
    }

    fn acquire_blocking(workspace_root: &Path, path: &Path) -> WorkspaceResult<Self> {
        let file = OpenOptions::new().create(true).write(true).truncate(false).open(path)?;
        file.try_lock_exclusive().map_err(|_| {
            WorkspaceError::Busy(workspace_root.display().to_string())
        })?;
        Ok(Self { path: path.to_path_buf(), file })
    }
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = &self.path;
    }
}
