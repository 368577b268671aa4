//! Episode Workspace (C1): on-disk content-addressed layout, logical-name
//! path resolution, atomic writes, and the workspace lock.

pub mod error;
pub mod layout;
pub mod lock;
pub mod locate;
pub mod workspace;

pub use error::{WorkspaceError, WorkspaceResult};
pub use layout::LogicalName;
pub use locate::locate;
pub use workspace::{ArtifactStat, Workspace};
