//! Deleting contexts and declarations.
//!
//! A context owns its child contexts and its local declarations, so deleting
//! it deletes them too. Import edges and owner links are associations: both
//! ends are detached before the slot is freed.

use rustc_hash::FxHashSet;
use tracing::debug;

use super::arena::{ContextId, DeclId};
use super::graph::ContextGraph;
use super::top_context::TopContextId;
use crate::semantic::types::SemanticResult;

/// Either kind of graph node, for sets mixing both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphNode {
    Context(ContextId),
    Declaration(DeclId),
}

impl From<ContextId> for GraphNode {
    fn from(context: ContextId) -> Self {
        GraphNode::Context(context)
    }
}

impl From<DeclId> for GraphNode {
    fn from(decl: DeclId) -> Self {
        GraphNode::Declaration(decl)
    }
}

impl ContextGraph {
    /// Delete `context` with its whole child tree and all declarations in it.
    pub fn delete_context(&mut self, context: ContextId) -> SemanticResult<()> {
        let data = self.ctx_mut(context)?;
        if let Some(top) = data.top.as_deref_mut() {
            top.deleting = true;
        }
        let is_top = data.top.is_some();
        let owner = data.owner.take();
        let symbol_key = data.symbol_key.take();
        data.in_symbol_table = false;

        if let Some(owner) = owner {
            if let Some(decl) = self.declarations.get_mut(owner) {
                if decl.internal_context == Some(context) {
                    decl.internal_context = None;
                }
            }
        }
        if let Some(key) = symbol_key {
            self.symbol_table.remove_context(&key, context);
        }

        let importers = self.ctx(context)?.imported_children.clone();
        for importer in importers {
            if self.contexts.contains(importer) {
                self.remove_import(importer, context)?;
            }
        }
        self.clear_imports(context)?;

        let children = self.ctx(context)?.children.clone();
        for child in children {
            if self.contexts.contains(child) {
                self.delete_context(child)?;
            }
        }

        self.ctx_mut(context)?.uses.clear();

        for decl in self.local_declarations(context) {
            if self.declarations.contains(decl) {
                self.delete_declaration(decl)?;
            }
        }

        let data = self.ctx(context)?;
        if let (Some(parent), false) = (data.parent, data.anonymous) {
            self.unlink_child(parent, context);
        }

        if is_top {
            self.purge_import_cache(TopContextId::new(context));
        }
        self.contexts.remove(context);
        debug!(?context, "deleted context");
        Ok(())
    }

    /// Delete a declaration, detaching it from its context, the symbol table
    /// and the context it opens.
    pub fn delete_declaration(&mut self, decl: DeclId) -> SemanticResult<()> {
        let data = self.decl(decl)?;
        let context = data.context;
        let internal = data.internal_context;
        let top = context.and_then(|context| self.top_context(context));

        if let Some(context) = context {
            self.detach_declaration(context, decl);
        }
        if let Some(key) = self.decl_mut(decl)?.symbol_key.take() {
            self.symbol_table.remove_declaration(&key, decl);
        }
        if let Some(internal) = internal {
            if let Some(data) = self.contexts.get_mut(internal) {
                if data.owner == Some(decl) {
                    data.owner = None;
                }
            }
        }
        if let Some(top) = top {
            if let Ok(data) = self.top_data_mut(top) {
                data.forget_declaration(decl);
            }
        }
        self.declarations.remove(decl);
        Ok(())
    }

    /// Detach every local declaration of `context` without deleting them.
    pub fn clear_local_declarations(&mut self, context: ContextId) -> SemanticResult<Vec<DeclId>> {
        let detached = self.local_declarations(context);
        for decl in &detached {
            self.remove_local_declaration(context, *decl)?;
        }
        Ok(detached)
    }

    /// Delete the local declarations and child contexts of `context` that
    /// are not in `encountered`. Used after re-parsing a file in place.
    pub fn clean_if_not_encountered(
        &mut self,
        context: ContextId,
        encountered: &FxHashSet<GraphNode>,
    ) -> SemanticResult<()> {
        for decl in self.local_declarations(context) {
            if !encountered.contains(&GraphNode::Declaration(decl)) {
                self.delete_declaration(decl)?;
            }
        }
        let children = self.ctx(context)?.children.clone();
        for child in children {
            if !encountered.contains(&GraphNode::Context(child)) {
                self.delete_context(child)?;
            }
        }
        Ok(())
    }
}
