//! Qualified-name search for declarations.
//!
//! From a context the search runs, in order:
//!
//! 1. the context's own index (skipped for namespaces, whose members are
//!    reached through the symbol table)
//! 2. its imports, most recent first, after applying local aliases
//! 3. its parent, after adding the namespace-qualified branch
//!
//! and stops at the first level that produced a result. A registered top
//! context answers through the symbol table instead, filtered by import
//! reachability.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{trace, warn};

use super::alias_resolver::is_after;
use super::search_item::SearchItem;
use crate::base::limits::NAMESPACE_DEPTH_WEIGHT;
use crate::base::{Identifier, Position, QualifiedIdentifier};
use crate::semantic::graphs::{ContextGraph, ContextId, DeclId, TopContextId, TypeHandle};
use crate::semantic::types::{ContextType, SearchFlags};

/// A declaration starting at `start` is visible at `position`.
pub(super) fn is_visible_at(start: Position, position: Option<Position>) -> bool {
    position.is_none_or(|position| start <= position)
}

pub(super) fn dedup_preserving_order<T: Copy + Eq + std::hash::Hash>(items: &mut Vec<T>) {
    let mut seen = FxHashSet::default();
    items.retain(|item| seen.insert(*item));
}

// ============================================================================
// Primary search API
// ============================================================================

impl ContextGraph {
    /// Declarations named `identifier` visible from `context` at `position`.
    ///
    /// `None` for `position` means "everywhere". Aliases are reported as the
    /// declaration they stand for and namespace aliases are never reported.
    /// `data_type` keeps only declarations of that type.
    pub fn find_declarations(
        &self,
        context: ContextId,
        identifier: &QualifiedIdentifier,
        position: Option<Position>,
        data_type: Option<TypeHandle>,
        flags: SearchFlags,
    ) -> Vec<DeclId> {
        if !self.contexts.contains(context) {
            warn!(?context, "search from stale context");
            return Vec::new();
        }
        trace!("[FIND_DECLARATIONS] '{}' from {:?}", identifier, context);

        let items = vec![Arc::new(SearchItem::new(identifier))];
        let mut found = Vec::new();
        self.find_declarations_internal(context, &items, position, data_type, &mut found, flags, 0);
        dedup_preserving_order(&mut found);
        found
    }

    /// Declarations named `identifier` in the index of `context` only,
    /// including those propagated from its children.
    pub fn find_local_declarations(
        &self,
        context: ContextId,
        identifier: &Identifier,
        position: Option<Position>,
        data_type: Option<TypeHandle>,
        flags: SearchFlags,
    ) -> Vec<DeclId> {
        let mut found = Vec::new();
        self.find_local_declarations_internal(context, identifier, position, data_type, &mut found, flags);
        dedup_preserving_order(&mut found);
        found
    }

    /// Every declaration visible from `context` at `position`, paired with
    /// a depth used to rank it: own declarations first, then imports and
    /// parents. Entering a namespace or global scope adds
    /// [`NAMESPACE_DEPTH_WEIGHT`] once, so local names always rank first.
    pub fn all_declarations(
        &self,
        context: ContextId,
        position: Option<Position>,
        search_in_parents: bool,
    ) -> Vec<(DeclId, u32)> {
        let mut out = Vec::new();
        let mut visited = FxHashSet::default();
        self.merge_declarations(context, position, &mut visited, search_in_parents, 0, &mut out);
        out
    }
}

// ============================================================================
// Internal search
// ============================================================================

impl ContextGraph {
    fn find_local_declarations_internal(
        &self,
        context: ContextId,
        identifier: &Identifier,
        position: Option<Position>,
        data_type: Option<TypeHandle>,
        found: &mut Vec<DeclId>,
        flags: SearchFlags,
    ) {
        let Some(data) = self.contexts.get(context) else {
            return;
        };
        let hits = data.local.lock().lookup(identifier).to_vec();
        let ignores_order = data.context_type.ignores_declaration_order();

        for hit in hits {
            let Some(decl) = self.resolve_alias(hit) else {
                continue;
            };
            let Some(decl_data) = self.declarations.get(decl) else {
                continue;
            };
            if decl_data.kind.is_namespace_alias() {
                continue;
            }
            if flags.contains(SearchFlags::ONLY_FUNCTIONS) && !decl_data.kind.is_function() {
                continue;
            }
            if data_type.is_some() && decl_data.declaration_type != data_type {
                continue;
            }
            // Checked on the index hit: an alias is visible where it is written.
            let hit_start = self.declarations.get(hit).map_or(decl_data.range.start, |hit| hit.range.start);
            if ignores_order || is_visible_at(hit_start, position) {
                found.push(decl);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn find_declarations_internal(
        &self,
        context: ContextId,
        items: &[Arc<SearchItem>],
        position: Option<Position>,
        data_type: Option<TypeHandle>,
        found: &mut Vec<DeclId>,
        flags: SearchFlags,
        import_depth: usize,
    ) {
        let Some(data) = self.contexts.get(context) else {
            warn!(?context, "stale context reached during search");
            return;
        };

        if data.top.is_some() && data.in_symbol_table {
            self.find_declarations_in_top(TopContextId::new(context), items, position, data_type, found, flags);
            return;
        }

        if data.context_type != ContextType::Namespace {
            for item in items {
                if !item.explicitly_global && !item.has_next() {
                    self.find_local_declarations_internal(
                        context,
                        &item.identifier,
                        position,
                        data_type,
                        found,
                        flags,
                    );
                }
            }
            if !found.is_empty() {
                trace!("[FIND_DECLARATIONS] found {} locally in {:?}", found.len(), context);
                return;
            }
        }

        let aliased = self.apply_aliases(context, items, position, false);

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
                        self.find_declarations_internal(
                            import.context,
                            &non_global,
                            target_position,
                            data_type,
                            found,
                            flags | SearchFlags::IN_IMPORTED_PARENT_CONTEXT,
                            import_depth + 1,
                        );
                    }
                }
            }
        }

        if !found.is_empty() {
            return;
        }

        if flags.intersects(SearchFlags::DONT_SEARCH_IN_PARENT | SearchFlags::IN_IMPORTED_PARENT_CONTEXT) {
            return;
        }
        let Some(parent) = data.parent else {
            return;
        };
        let mut upward = aliased;
        self.apply_upwards_aliases(context, &mut upward);
        self.find_declarations_internal(parent, &upward, position, data_type, found, flags, import_depth);
    }

    fn find_declarations_in_top(
        &self,
        top: TopContextId,
        items: &[Arc<SearchItem>],
        position: Option<Position>,
        data_type: Option<TypeHandle>,
        found: &mut Vec<DeclId>,
        flags: SearchFlags,
    ) {
        let names: Vec<QualifiedIdentifier> = items.iter().flat_map(|item| item.to_list()).collect();
        let names = self.apply_global_aliases(top, names, position, false);

        for name in names {
            trace!("[FIND_DECLARATIONS] symbol table lookup '{}'", name);
            let candidates = self.symbol_table.find_declarations(&name);
            for decl in self.check_declarations(top, candidates, position, data_type, flags) {
                let is_namespace_alias = self
                    .declarations
                    .get(decl)
                    .is_some_and(|data| data.kind.is_namespace_alias());
                if !is_namespace_alias {
                    found.push(decl);
                }
            }
        }
    }

    /// Keep the symbol-table hits that `top` can see at `position`.
    ///
    /// A hit in another top context must be reachable through imports. A
    /// hit in `top` itself must start before `position`, unless it is a
    /// class member. Surviving aliases are resolved before the type and
    /// function filters apply.
    pub(crate) fn check_declarations(
        &self,
        top: TopContextId,
        candidates: Vec<DeclId>,
        position: Option<Position>,
        data_type: Option<TypeHandle>,
        flags: SearchFlags,
    ) -> Vec<DeclId> {
        let mut accepted = Vec::new();
        for candidate in candidates {
            let Some(data) = self.live_decl(candidate) else {
                continue;
            };
            let Some(candidate_top) = data.context.and_then(|context| self.top_context(context)) else {
                continue;
            };
            if candidate_top != top {
                if !self.imports_top(top, candidate_top) {
                    continue;
                }
            } else if is_after(data.range.start, position) {
                let in_class = data
                    .context
                    .and_then(|context| self.context_type(context))
                    .is_some_and(|context_type| context_type == ContextType::Class);
                if !in_class {
                    continue;
                }
            }

            let Some(decl) = self.resolve_alias(candidate) else {
                continue;
            };
            let Some(decl_data) = self.declarations.get(decl) else {
                continue;
            };
            if flags.contains(SearchFlags::ONLY_FUNCTIONS) && !decl_data.kind.is_function() {
                continue;
            }
            if data_type.is_some() && decl_data.declaration_type != data_type {
                continue;
            }
            accepted.push(decl);
        }
        accepted
    }

    fn merge_declarations(
        &self,
        context: ContextId,
        position: Option<Position>,
        visited: &mut FxHashSet<ContextId>,
        search_in_parents: bool,
        depth: u32,
        out: &mut Vec<(DeclId, u32)>,
    ) {
        if !visited.insert(context) {
            return;
        }
        let Some(data) = self.contexts.get(context) else {
            return;
        };

        let mut depth = depth;
        if data.context_type.is_namespace_like() && depth < NAMESPACE_DEPTH_WEIGHT {
            depth += NAMESPACE_DEPTH_WEIGHT;
        }

        {
            let local = data.local.lock();
            for decl in local.indexed() {
                let Some(decl_data) = self.declarations.get(decl) else {
                    continue;
                };
                if is_visible_at(decl_data.range.start, position) {
                    out.push((decl, depth));
                }
            }
        }

        for import in data.imports.iter().rev() {
            if !self.contexts.contains(import.context) {
                continue;
            }
            if let (Some(position), Some(import_position)) = (position, import.position) {
                if position < import_position {
                    continue;
                }
            }
            self.merge_declarations(import.context, None, visited, false, depth + 1, out);
        }

        if search_in_parents {
            if let Some(parent) = data.parent {
                self.merge_declarations(parent, position, visited, true, depth + 1, out);
            }
        }
    }
}
