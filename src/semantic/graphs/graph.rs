use parking_lot::Mutex;
use tracing::warn;

use super::arena::{Arena, ContextId, DeclId};
use super::context::ContextData;
use super::declaration::DeclarationData;
use super::top_context::TopContextId;
use crate::base::limits::{MAX_ALIAS_DEPTH, MAX_IMPORT_DEPTH};
use crate::semantic::resolver::ImportsCache;
use crate::semantic::symbol_table::{IndexedSymbolTable, SymbolTable};
use crate::semantic::types::{SemanticError, SemanticResult};

/// Tunable ceilings of a [`ContextGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphConfig {
    /// Recursion ceiling of the transitive import walk between top contexts.
    pub max_import_depth: usize,
    /// Ceiling for alias-chain following and namespace-alias expansion.
    pub max_alias_depth: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_import_depth: MAX_IMPORT_DEPTH,
            max_alias_depth: MAX_ALIAS_DEPTH,
        }
    }
}

/// The scope/declaration graph of every parsed file.
///
/// Reading operations take `&self` and mutations `&mut self`, so whoever
/// holds a [`Workspace`](crate::semantic::Workspace) guard holds the right
/// kind of access for the call it makes.
pub struct ContextGraph {
    pub(crate) contexts: Arena<ContextId, ContextData>,
    pub(crate) declarations: Arena<DeclId, DeclarationData>,
    pub(crate) symbol_table: Box<dyn SymbolTable>,
    pub(crate) imports_cache: Mutex<ImportsCache>,
    pub(crate) config: GraphConfig,
}

impl ContextGraph {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self::with_symbol_table(config, Box::new(IndexedSymbolTable::new()))
    }

    /// Build a graph that reports registrations to a caller-provided table.
    pub fn with_symbol_table(config: GraphConfig, symbol_table: Box<dyn SymbolTable>) -> Self {
        Self {
            contexts: Arena::new(),
            declarations: Arena::new(),
            symbol_table,
            imports_cache: Mutex::new(ImportsCache::default()),
            config,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn symbol_table(&self) -> &dyn SymbolTable {
        self.symbol_table.as_ref()
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }

    pub fn contains_context(&self, context: ContextId) -> bool {
        self.contexts.contains(context)
    }

    pub fn contains_declaration(&self, decl: DeclId) -> bool {
        self.declarations.contains(decl)
    }

    /// All live top contexts, in creation-slot order.
    pub fn top_contexts(&self) -> Vec<TopContextId> {
        self.contexts
            .iter()
            .filter(|(_, data)| data.top.is_some())
            .map(|(id, _)| TopContextId::new(id))
            .collect()
    }

    /// `context` as a top context handle, if it is one.
    pub fn as_top_context(&self, context: ContextId) -> Option<TopContextId> {
        self.contexts
            .get(context)
            .filter(|data| data.top.is_some())
            .map(|_| TopContextId::new(context))
    }

    // ------------------------------------------------------------------
    // Internal accessors
    // ------------------------------------------------------------------

    pub(crate) fn ctx(&self, context: ContextId) -> SemanticResult<&ContextData> {
        self.contexts
            .get(context)
            .ok_or(SemanticError::StaleContext(context))
    }

    pub(crate) fn ctx_mut(&mut self, context: ContextId) -> SemanticResult<&mut ContextData> {
        self.contexts
            .get_mut(context)
            .ok_or(SemanticError::StaleContext(context))
    }

    pub(crate) fn decl(&self, decl: DeclId) -> SemanticResult<&DeclarationData> {
        self.declarations
            .get(decl)
            .ok_or(SemanticError::StaleDeclaration(decl))
    }

    pub(crate) fn decl_mut(&mut self, decl: DeclId) -> SemanticResult<&mut DeclarationData> {
        self.declarations
            .get_mut(decl)
            .ok_or(SemanticError::StaleDeclaration(decl))
    }

    /// Declaration data for a search; stale entries are logged and skipped.
    pub(crate) fn live_decl(&self, decl: DeclId) -> Option<&DeclarationData> {
        let data = self.declarations.get(decl);
        if data.is_none() {
            warn!(?decl, "stale declaration in local index");
        }
        data
    }
}

impl Default for ContextGraph {
    fn default() -> Self {
        Self::new()
    }
}
