//! Search for scope contexts (namespaces, classes) by qualified name.
//!
//! Walks the same route as declaration search but tests the contexts
//! themselves, and collects every match instead of stopping at the first
//! level that produced one.

use std::sync::Arc;

use tracing::{trace, warn};

use super::alias_resolver::is_after;
use super::name_resolver::dedup_preserving_order;
use super::search_item::SearchItem;
use crate::base::{Position, QualifiedIdentifier};
use crate::semantic::graphs::{ContextGraph, ContextId, TopContextId};
use crate::semantic::types::{ContextType, SearchFlags};

impl ContextGraph {
    /// Contexts of `context_type` whose scope identifier is `identifier`,
    /// visible from `context` at `position`.
    pub fn find_contexts(
        &self,
        context: ContextId,
        context_type: ContextType,
        identifier: &QualifiedIdentifier,
        position: Option<Position>,
        flags: SearchFlags,
    ) -> Vec<ContextId> {
        if !self.contexts.contains(context) {
            warn!(?context, "search from stale context");
            return Vec::new();
        }
        trace!("[FIND_CONTEXTS] {} '{}' from {:?}", context_type, identifier, context);

        let items = vec![Arc::new(SearchItem::new(identifier))];
        let mut found = Vec::new();
        self.find_contexts_internal(context, context_type, &items, position, &mut found, flags, 0);
        dedup_preserving_order(&mut found);
        found
    }

    #[allow(clippy::too_many_arguments)]
    fn find_contexts_internal(
        &self,
        context: ContextId,
        context_type: ContextType,
        items: &[Arc<SearchItem>],
        position: Option<Position>,
        found: &mut Vec<ContextId>,
        flags: SearchFlags,
        import_depth: usize,
    ) {
        let Some(data) = self.contexts.get(context) else {
            warn!(?context, "stale context reached during search");
            return;
        };

        if data.top.is_some() && data.in_symbol_table {
            self.find_contexts_in_top(TopContextId::new(context), context_type, items, position, found);
            return;
        }

        if data.context_type == context_type {
            let scope = self.scope_identifier(context, true);
            let is_root = data.parent.is_none();
            if items
                .iter()
                .any(|item| item.matches(&scope) && (is_root || !item.explicitly_global))
            {
                found.push(context);
            }
        }

        let aliased = self.apply_aliases(context, items, position, context_type == ContextType::Namespace);

        if !data.imports.is_empty() {
            let non_global: Vec<_> = aliased
                .iter()
                .filter(|item| !item.explicitly_global)
                .cloned()
                .collect();
            if !non_global.is_empty() {
                if import_depth >= self.config.max_import_depth {
                    warn!(?context, import_depth, "import structure too deep");
                } else {
                    let file = self.file(context);
                    for import in data.imports.iter().rev() {
                        let Some(target) = self.contexts.get(import.context) else {
                            warn!(?context, imported = ?import.context, "imported context was invalidated");
                            continue;
                        };
                        if let (Some(position), Some(import_position)) = (position, import.position) {
                            if position < import_position {
                                continue;
                            }
                        }
                        let target_position = if file == self.file(import.context) {
                            position
                        } else {
                            Some(target.range.end)
                        };
                        self.find_contexts_internal(
                            import.context,
                            context_type,
                            &non_global,
                            target_position,
                            found,
                            flags | SearchFlags::IN_IMPORTED_PARENT_CONTEXT,
                            import_depth + 1,
                        );
                    }
                }
            }
        }

        if flags.intersects(SearchFlags::DONT_SEARCH_IN_PARENT | SearchFlags::IN_IMPORTED_PARENT_CONTEXT) {
            return;
        }
        let Some(parent) = data.parent else {
            return;
        };
        let mut upward = aliased;
        self.apply_upwards_aliases(context, &mut upward);
        self.find_contexts_internal(parent, context_type, &upward, position, found, flags, import_depth);
    }

    fn find_contexts_in_top(
        &self,
        top: TopContextId,
        context_type: ContextType,
        items: &[Arc<SearchItem>],
        position: Option<Position>,
        found: &mut Vec<ContextId>,
    ) {
        let names: Vec<QualifiedIdentifier> = items.iter().flat_map(|item| item.to_list()).collect();
        let names = self.apply_global_aliases(top, names, position, context_type == ContextType::Namespace);

        for name in names {
            trace!("[FIND_CONTEXTS] symbol table lookup '{}'", name);
            let candidates = self.symbol_table.find_contexts(&name);
            found.extend(self.check_contexts(top, context_type, candidates, position));
        }
    }

    /// Keep the symbol-table contexts of `context_type` that `top` can see.
    fn check_contexts(
        &self,
        top: TopContextId,
        context_type: ContextType,
        candidates: Vec<ContextId>,
        position: Option<Position>,
    ) -> Vec<ContextId> {
        candidates
            .into_iter()
            .filter(|candidate| {
                let Some(data) = self.contexts.get(*candidate) else {
                    warn!(context = ?candidate, "stale context in symbol table");
                    return false;
                };
                if data.context_type != context_type {
                    return false;
                }
                let Some(candidate_top) = self.top_context(*candidate) else {
                    return false;
                };
                if candidate_top != top {
                    return self.imports_top(top, candidate_top);
                }
                if is_after(data.range.start, position) {
                    return data
                        .parent
                        .and_then(|parent| self.context_type(parent))
                        .is_some_and(|parent_type| parent_type == ContextType::Class);
                }
                true
            })
            .collect()
    }
}
