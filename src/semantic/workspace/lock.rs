use std::time::Duration;

use parking_lot::{RwLock, RwLockReadGuard, RwLockUpgradableReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

use crate::semantic::graphs::{ContextGraph, GraphConfig};

pub type WorkspaceReadGuard<'a> = RwLockReadGuard<'a, ContextGraph>;
pub type WorkspaceWriteGuard<'a> = RwLockWriteGuard<'a, ContextGraph>;

/// The graph shared by every indexing and query thread.
///
/// The lock is not re-entrant: a thread holding a read guard must not ask
/// for the write guard. Use [`upgradable_read`](Self::upgradable_read) when
/// a reader may need to write.
pub struct Workspace {
    graph: RwLock<ContextGraph>,
}

impl Workspace {
    /// Creates an empty workspace with default limits
    pub fn new() -> Self {
        Self::with_graph(ContextGraph::new())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self::with_graph(ContextGraph::with_config(config))
    }

    pub fn with_graph(graph: ContextGraph) -> Self {
        Self {
            graph: RwLock::new(graph),
        }
    }

    pub fn read(&self) -> WorkspaceReadGuard<'_> {
        self.graph.read()
    }

    pub fn write(&self) -> WorkspaceWriteGuard<'_> {
        self.graph.write()
    }

    pub fn upgradable_read(&self) -> RwLockUpgradableReadGuard<'_, ContextGraph> {
        self.graph.upgradable_read()
    }

    /// Read guard, or `None` if a writer holds the lock for longer than
    /// `timeout`.
    pub fn try_read_for(&self, timeout: Duration) -> Option<WorkspaceReadGuard<'_>> {
        let guard = self.graph.try_read_for(timeout);
        if guard.is_none() {
            warn!(?timeout, "timed out waiting for workspace read lock");
        }
        guard
    }

    pub fn try_write_for(&self, timeout: Duration) -> Option<WorkspaceWriteGuard<'_>> {
        let guard = self.graph.try_write_for(timeout);
        if guard.is_none() {
            warn!(?timeout, "timed out waiting for workspace write lock");
        }
        guard
    }

    /// Run `f` under the write guard.
    pub fn update<R>(&self, f: impl FnOnce(&mut ContextGraph) -> R) -> R {
        let mut graph = self.graph.write();
        debug!("workspace write lock acquired");
        f(&mut graph)
    }

    pub fn into_inner(self) -> ContextGraph {
        self.graph.into_inner()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
