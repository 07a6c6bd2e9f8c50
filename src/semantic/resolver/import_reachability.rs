//! Transitive import reachability between top contexts.
//!
//! `hops[S][T] = Some(N)` records that `S` reaches `T` through its direct
//! import `N`; `None` records that `S` does not reach `T`. The cache lives
//! behind its own mutex so concurrent readers of the graph share it.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{trace, warn};

use crate::base::Position;
use crate::semantic::graphs::{ContextGraph, ContextId, TopContextId};

#[derive(Debug, Default)]
pub(crate) struct ImportsCache {
    hops: FxHashMap<TopContextId, FxHashMap<TopContextId, Option<TopContextId>>>,
    /// Tops whose walk is on the current stack.
    searching: FxHashSet<TopContextId>,
}

impl ImportsCache {
    fn cached(&self, from: TopContextId, target: TopContextId) -> Option<Option<TopContextId>> {
        self.hops.get(&from)?.get(&target).copied()
    }

    fn store(&mut self, from: TopContextId, target: TopContextId, hop: Option<TopContextId>) {
        self.hops.entry(from).or_default().insert(target, hop);
    }

    fn forget_source(&mut self, from: TopContextId) {
        self.hops.remove(&from);
    }

    fn forget_top(&mut self, top: TopContextId) {
        self.hops.remove(&top);
        for answers in self.hops.values_mut() {
            answers.retain(|target, hop| *target != top && *hop != Some(top));
        }
    }
}

/// One step of an import chain: a top context on the path and the position
/// at which it imports the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTraceItem {
    pub context: TopContextId,
    pub position: Option<Position>,
}

/// Result of one reachability walk.
#[derive(Debug, Clone, Copy)]
struct Reach {
    found: bool,
    /// The answer does not depend on a walk still in progress or on the
    /// depth ceiling, so it may be cached.
    complete: bool,
}

impl ContextGraph {
    /// Whether `top` imports `target`, directly or transitively.
    ///
    /// A top context does not import itself unless an import cycle leads
    /// back to it.
    pub fn imports_top(&self, top: TopContextId, target: TopContextId) -> bool {
        let mut cache = self.imports_cache.lock();
        self.reachable(&mut cache, top, target, 0).found
    }

    fn reachable(
        &self,
        cache: &mut ImportsCache,
        from: TopContextId,
        target: TopContextId,
        depth: usize,
    ) -> Reach {
        if let Some(hop) = cache.cached(from, target) {
            return Reach {
                found: hop.is_some(),
                complete: true,
            };
        }
        if depth >= self.config.max_import_depth {
            warn!(?from, ?target, depth, "import structure too deep");
            return Reach {
                found: false,
                complete: false,
            };
        }

        cache.searching.insert(from);
        let (hop, complete) = self.search_hop(cache, from, target, depth);
        cache.searching.remove(&from);

        if hop.is_some() || complete {
            cache.store(from, target, hop);
        }
        Reach {
            found: hop.is_some(),
            complete: hop.is_some() || complete,
        }
    }

    fn search_hop(
        &self,
        cache: &mut ImportsCache,
        from: TopContextId,
        target: TopContextId,
        depth: usize,
    ) -> (Option<TopContextId>, bool) {
        let Some(data) = self.contexts.get(from.context()) else {
            warn!(?from, "imported context was invalidated");
            return (None, true);
        };

        let mut complete = true;
        for import in &data.imports {
            let Some(next) = self.as_top_context(import.context) else {
                if self.contexts.contains(import.context) {
                    warn!(?from, imported = ?import.context, "non-top context imported into top context");
                } else {
                    warn!(?from, imported = ?import.context, "imported context was invalidated");
                }
                continue;
            };
            if next == target {
                return (Some(next), true);
            }
            if cache.searching.contains(&next) {
                complete = false;
                continue;
            }
            let reach = self.reachable(cache, next, target, depth + 1);
            if reach.found {
                return (Some(next), true);
            }
            complete &= reach.complete;
        }
        (None, complete)
    }

    /// The cached answer for `top -> target`, without computing one.
    ///
    /// `Some(Some(hop))` is a positive answer through `hop`, `Some(None)` a
    /// cached negative one.
    pub fn cached_import_hop(&self, top: TopContextId, target: TopContextId) -> Option<Option<TopContextId>> {
        self.imports_cache.lock().cached(top, target)
    }

    /// The chain of direct imports leading from `top` to `target`.
    ///
    /// For `A -> B -> C` this is `[(A, where A imports B), (B, where B
    /// imports C)]`. Empty when `target` is not reachable.
    pub fn import_trace(&self, top: TopContextId, target: TopContextId) -> Vec<ImportTraceItem> {
        let mut cache = self.imports_cache.lock();
        if !self.reachable(&mut cache, top, target, 0).found {
            return Vec::new();
        }

        let mut trace = Vec::new();
        let mut visited = FxHashSet::default();
        let mut current = top;
        loop {
            if !visited.insert(current) {
                warn!(?top, ?target, "inconsistent import structure");
                return Vec::new();
            }
            let hop = match cache.cached(current, target) {
                Some(Some(hop)) => hop,
                _ => {
                    // Entries below a cycle may be uncached; walk again from here.
                    if !self.reachable(&mut cache, current, target, 0).found {
                        warn!(?top, ?target, "inconsistent import structure");
                        return Vec::new();
                    }
                    match cache.cached(current, target) {
                        Some(Some(hop)) => hop,
                        _ => {
                            warn!(?top, ?target, "inconsistent import structure");
                            return Vec::new();
                        }
                    }
                }
            };
            trace.push(ImportTraceItem {
                context: current,
                position: self.import_position(current.context(), hop.context()),
            });
            if hop == target {
                return trace;
            }
            current = hop;
        }
    }

    /// Whether `context` imports `origin`.
    ///
    /// Between top contexts this is the cached transitive walk. Otherwise
    /// the importers of `origin` are followed until `context` is met; a
    /// context counts as importing itself.
    pub fn imports(&self, context: ContextId, origin: ContextId) -> bool {
        match (self.as_top_context(context), self.as_top_context(origin)) {
            (Some(top), Some(target)) => return self.imports_top(top, target),
            (Some(top), None) => {
                warn!(?top, ?origin, "non-top context imported into top context");
            }
            _ => {}
        }

        let mut queue = VecDeque::from([origin]);
        let mut visited = FxHashSet::default();
        visited.insert(origin);
        while let Some(current) = queue.pop_front() {
            if current == context {
                return true;
            }
            let Some(data) = self.contexts.get(current) else {
                continue;
            };
            for importer in &data.imported_children {
                if visited.insert(*importer) {
                    queue.push_back(*importer);
                }
            }
        }
        false
    }

    /// Drop cached answers of `changed` and of every top context that
    /// reaches it through imports.
    pub(crate) fn invalidate_import_cache(&mut self, changed: ContextId) {
        let mut cache = self.imports_cache.lock();
        let mut queue = VecDeque::from([changed]);
        let mut visited = FxHashSet::default();
        visited.insert(changed);
        while let Some(current) = queue.pop_front() {
            if let Some(top) = self.as_top_context(current) {
                trace!(?top, "invalidating import cache");
                cache.forget_source(top);
            }
            let Some(data) = self.contexts.get(current) else {
                continue;
            };
            for importer in &data.imported_children {
                if visited.insert(*importer) {
                    queue.push_back(*importer);
                }
            }
        }
    }

    /// Drop every cached answer mentioning a deleted top context.
    pub(crate) fn purge_import_cache(&mut self, top: TopContextId) {
        self.imports_cache.get_mut().forget_top(top);
    }
}
