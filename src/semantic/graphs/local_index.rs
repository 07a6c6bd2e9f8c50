//! Per-context declaration storage and its lock set.
//!
//! Every context keeps its declarations twice: in source order, and in an
//! identifier multimap that also carries declarations propagated up from
//! children with `propagate_declarations` set. Both live behind one mutex so
//! a reader never sees them disagree.

use indexmap::IndexMap;
use parking_lot::{Mutex, MutexGuard};
use rustc_hash::{FxBuildHasher, FxHashMap};

use super::arena::{Arena, ContextId, DeclId};
use super::context::ContextData;
use crate::base::{Identifier, Position};

#[derive(Default)]
pub(crate) struct LocalDeclarations {
    ordered: Vec<DeclId>,
    index: IndexMap<Identifier, Vec<DeclId>, FxBuildHasher>,
}

impl LocalDeclarations {
    pub(crate) fn ordered(&self) -> &[DeclId] {
        &self.ordered
    }

    pub(crate) fn lookup(&self, identifier: &Identifier) -> &[DeclId] {
        self.index
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every entry of the identifier index, own and propagated.
    pub(crate) fn indexed(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.index.values().flatten().copied()
    }

    pub(crate) fn indexed_pairs(&self) -> Vec<(Identifier, DeclId)> {
        self.index
            .iter()
            .flat_map(|(identifier, decls)| decls.iter().map(move |decl| (identifier.clone(), *decl)))
            .collect()
    }

    pub(crate) fn insert_ordered(&mut self, decl: DeclId, start: Position, start_of: impl Fn(DeclId) -> Position) {
        insert_by_start(&mut self.ordered, decl, start, start_of);
    }

    pub(crate) fn remove_ordered(&mut self, decl: DeclId) -> bool {
        match self.ordered.iter().position(|d| *d == decl) {
            Some(at) => {
                self.ordered.remove(at);
                true
            }
            None => false,
        }
    }

    pub(crate) fn index_insert(&mut self, identifier: Identifier, decl: DeclId) {
        self.index.entry(identifier).or_default().push(decl);
    }

    pub(crate) fn index_remove(&mut self, identifier: &Identifier, decl: DeclId) -> bool {
        let Some(entries) = self.index.get_mut(identifier) else {
            return false;
        };
        let Some(at) = entries.iter().position(|d| *d == decl) else {
            return false;
        };
        entries.remove(at);
        if entries.is_empty() {
            self.index.shift_remove(identifier);
        }
        true
    }
}

/// Insert `item` keeping `items` sorted by start position.
///
/// Appending is O(1) when the new start is not before the last element's,
/// which is the normal case while a parser walks a file. Otherwise the
/// insertion point is found by scanning back from the end. Equal starts keep
/// insertion order.
pub(crate) fn insert_by_start<T: Copy>(
    items: &mut Vec<T>,
    item: T,
    start: Position,
    start_of: impl Fn(T) -> Position,
) {
    match items.last() {
        None => items.push(item),
        Some(&last) if start_of(last) <= start => items.push(item),
        Some(_) => {
            let mut at = 0;
            for i in (0..items.len()).rev() {
                if start_of(items[i]) <= start {
                    at = i + 1;
                    break;
                }
            }
            items.insert(at, item);
        }
    }
}

/// The set of declaration-index locks held by one mutation.
///
/// A mutation that touches several contexts (propagating a declaration into
/// its ancestors, or a rename seen by all of them) acquires each context's
/// lock once through this set and keeps it until the set is dropped.
/// Re-entering a context that is already held is a lookup, never a second
/// lock.
pub(crate) struct IndexGuardSet<'a> {
    contexts: &'a Arena<ContextId, ContextData>,
    held: FxHashMap<ContextId, MutexGuard<'a, LocalDeclarations>>,
}

impl<'a> IndexGuardSet<'a> {
    pub(crate) fn new(contexts: &'a Arena<ContextId, ContextData>) -> Self {
        Self {
            contexts,
            held: FxHashMap::default(),
        }
    }

    pub(crate) fn acquire(&mut self, context: ContextId) -> Option<&mut LocalDeclarations> {
        if !self.held.contains_key(&context) {
            let data = self.contexts.get(context)?;
            self.held.insert(context, data.local.lock());
        }
        self.held.get_mut(&context).map(|guard| &mut **guard)
    }

    /// Add `identifier -> decl` to the index of `context` and of every
    /// ancestor reached through `propagate_declarations`.
    pub(crate) fn index_insert_propagated(&mut self, context: ContextId, identifier: &Identifier, decl: DeclId) {
        for target in propagation_chain(self.contexts, context) {
            if let Some(local) = self.acquire(target) {
                local.index_insert(identifier.clone(), decl);
            }
        }
    }

    pub(crate) fn index_remove_propagated(&mut self, context: ContextId, identifier: &Identifier, decl: DeclId) {
        for target in propagation_chain(self.contexts, context) {
            if let Some(local) = self.acquire(target) {
                local.index_remove(identifier, decl);
            }
        }
    }
}

/// `context` followed by the ancestors its declarations are mirrored into.
pub(crate) fn propagation_chain(contexts: &Arena<ContextId, ContextData>, context: ContextId) -> Vec<ContextId> {
    let mut chain = Vec::new();
    let mut current = Some(context);
    while let Some(id) = current {
        let Some(data) = contexts.get(id) else {
            break;
        };
        if chain.contains(&id) {
            break;
        }
        chain.push(id);
        current = if data.propagate_declarations {
            data.parent
        } else {
            None
        };
    }
    chain
}

pub(crate) fn new_local_mutex() -> Mutex<LocalDeclarations> {
    Mutex::new(LocalDeclarations::default())
}
