//! Keeping the symbol table in step with the graph.
//!
//! Each node remembers the key it is registered under. After any change that
//! can move a node in or out of the table, or change its qualified name, the
//! node is re-synced: the wanted key is recomputed and, if it differs from
//! the stored one, the old entry is removed and the new one added.

use tracing::debug;

use crate::base::QualifiedIdentifier;
use crate::semantic::graphs::{ContextGraph, ContextId, DeclId, TopContextId};
use crate::semantic::types::SemanticResult;

impl ContextGraph {
    /// Make a top context and its non-anonymous subtree visible to the
    /// cross-file search.
    pub fn register_top_context(&mut self, top: TopContextId) -> SemanticResult<()> {
        self.top_data(top)?;
        debug!(?top, "registering top context");
        self.set_subtree_in_symbol_table(top.context(), true);
        Ok(())
    }

    /// Remove a top context and its subtree from the symbol table.
    pub fn unregister_top_context(&mut self, top: TopContextId) -> SemanticResult<()> {
        self.top_data(top)?;
        debug!(?top, "unregistering top context");
        self.set_subtree_in_symbol_table(top.context(), false);
        Ok(())
    }

    pub fn is_top_context_registered(&self, top: TopContextId) -> bool {
        self.top_data(top).is_ok() && self.is_in_symbol_table(top.context())
    }

    pub(crate) fn set_subtree_in_symbol_table(&mut self, root: ContextId, in_table: bool) {
        let mut stack = vec![root];
        while let Some(context) = stack.pop() {
            let Some(data) = self.contexts.get_mut(context) else {
                continue;
            };
            data.in_symbol_table = in_table && !data.anonymous;
            stack.extend(data.children.iter().copied());
        }
        self.sync_context_registration(root, true);
    }

    /// Re-sync `context` and its own declarations; with `recursive`, the
    /// whole child tree too.
    pub(crate) fn sync_context_registration(&mut self, root: ContextId, recursive: bool) {
        let mut stack = vec![root];
        while let Some(context) = stack.pop() {
            let Some(data) = self.contexts.get(context) else {
                continue;
            };
            let wanted = (data.in_symbol_table
                && !data.anonymous
                && !data.local_scope_identifier.is_empty())
            .then(|| self.scope_identifier(context, true));
            if recursive {
                stack.extend(data.children.iter().copied());
            }

            self.sync_context_key(context, wanted);
            for decl in self.local_declarations(context) {
                self.sync_declaration_registration(decl);
            }
        }
    }

    pub(crate) fn sync_declaration_registration(&mut self, decl: DeclId) {
        let Some(data) = self.declarations.get(decl) else {
            return;
        };
        let registered_context = data
            .context
            .and_then(|context| self.contexts.get(context))
            .is_some_and(|context| {
                context.in_symbol_table && context.context_type.registers_declarations()
            });
        let wanted = if registered_context {
            self.qualified_identifier(decl)
        } else {
            None
        };

        let Some(data) = self.declarations.get_mut(decl) else {
            return;
        };
        if data.symbol_key == wanted {
            return;
        }
        let previous = std::mem::replace(&mut data.symbol_key, wanted.clone());
        if let Some(previous) = previous {
            self.symbol_table.remove_declaration(&previous, decl);
        }
        if let Some(wanted) = wanted {
            self.symbol_table.add_declaration(&wanted, decl);
        }
    }

    fn sync_context_key(&mut self, context: ContextId, wanted: Option<QualifiedIdentifier>) {
        let Some(data) = self.contexts.get_mut(context) else {
            return;
        };
        if data.symbol_key == wanted {
            return;
        }
        let previous = std::mem::replace(&mut data.symbol_key, wanted.clone());
        if let Some(previous) = previous {
            self.symbol_table.remove_context(&previous, context);
        }
        if let Some(wanted) = wanted {
            self.symbol_table.add_context(&wanted, context);
        }
    }
}
