//! # Workspace
//!
//! Owns the [`ContextGraph`](crate::semantic::ContextGraph) of every file
//! behind one reader/writer lock. Searches run under a read guard and may
//! run concurrently; building or tearing down contexts takes the write
//! guard.

mod lock;

pub use lock::{Workspace, WorkspaceReadGuard, WorkspaceWriteGuard};
