use rustc_hash::FxHashMap;

use crate::base::QualifiedIdentifier;
use crate::semantic::graphs::{ContextId, DeclId};

/// The collaborator the graph reports visibility changes to.
///
/// A declaration or context is added when it becomes part of a registered
/// top context and removed when it leaves. Lookups must return every entry
/// stored under a key, in insertion order.
pub trait SymbolTable: Send + Sync {
    fn add_declaration(&mut self, identifier: &QualifiedIdentifier, decl: DeclId);

    /// Returns `false` if the entry was not present.
    fn remove_declaration(&mut self, identifier: &QualifiedIdentifier, decl: DeclId) -> bool;

    fn find_declarations(&self, identifier: &QualifiedIdentifier) -> Vec<DeclId>;

    fn add_context(&mut self, identifier: &QualifiedIdentifier, context: ContextId);

    fn remove_context(&mut self, identifier: &QualifiedIdentifier, context: ContextId) -> bool;

    fn find_contexts(&self, identifier: &QualifiedIdentifier) -> Vec<ContextId>;
}

/// Hash-based [`SymbolTable`] keyed by qualified identifier.
#[derive(Debug, Default)]
pub struct IndexedSymbolTable {
    declarations: FxHashMap<QualifiedIdentifier, Vec<DeclId>>,
    contexts: FxHashMap<QualifiedIdentifier, Vec<ContextId>>,
}

impl IndexedSymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declaration_key_count(&self) -> usize {
        self.declarations.len()
    }

    pub fn context_key_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.contexts.is_empty()
    }
}

fn remove_entry<T: PartialEq>(
    map: &mut FxHashMap<QualifiedIdentifier, Vec<T>>,
    identifier: &QualifiedIdentifier,
    value: T,
) -> bool {
    let Some(entries) = map.get_mut(identifier) else {
        return false;
    };
    let Some(at) = entries.iter().position(|entry| *entry == value) else {
        return false;
    };
    entries.remove(at);
    if entries.is_empty() {
        map.remove(identifier);
    }
    true
}

impl SymbolTable for IndexedSymbolTable {
    fn add_declaration(&mut self, identifier: &QualifiedIdentifier, decl: DeclId) {
        let entries = self.declarations.entry(identifier.clone()).or_default();
        if !entries.contains(&decl) {
            entries.push(decl);
        }
    }

    fn remove_declaration(&mut self, identifier: &QualifiedIdentifier, decl: DeclId) -> bool {
        remove_entry(&mut self.declarations, identifier, decl)
    }

    fn find_declarations(&self, identifier: &QualifiedIdentifier) -> Vec<DeclId> {
        self.declarations
            .get(identifier)
            .cloned()
            .unwrap_or_default()
    }

    fn add_context(&mut self, identifier: &QualifiedIdentifier, context: ContextId) {
        let entries = self.contexts.entry(identifier.clone()).or_default();
        if !entries.contains(&context) {
            entries.push(context);
        }
    }

    fn remove_context(&mut self, identifier: &QualifiedIdentifier, context: ContextId) -> bool {
        remove_entry(&mut self.contexts, identifier, context)
    }

    fn find_contexts(&self, identifier: &QualifiedIdentifier) -> Vec<ContextId> {
        self.contexts.get(identifier).cloned().unwrap_or_default()
    }
}
