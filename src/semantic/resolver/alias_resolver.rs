//! Alias following and namespace-alias expansion.
//!
//! Two declaration kinds change what a name means:
//!
//! - `Alias` stands for another declaration (`using A::f;`). Search results
//!   report the terminal declaration of the chain.
//! - `NamespaceAlias` rewrites a name prefix. Under the reserved
//!   global-import identifier it imports a whole namespace
//!   (`using namespace N;`); under any other identifier it renames one
//!   (`namespace F = N::M;`).

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{trace, warn};

use super::search_item::{SearchItem, SearchItemList};
use crate::base::{Identifier, Position, QualifiedIdentifier};
use crate::semantic::graphs::{ContextGraph, ContextId, DeclId, DeclarationKind, TopContextId};
use crate::semantic::types::{ContextType, SearchFlags};

/// `end` lies after the search position, so the alias is not yet in effect.
pub(super) fn is_after(end: Position, position: Option<Position>) -> bool {
    position.is_some_and(|position| end > position)
}

impl ContextGraph {
    /// Follow `Alias` declarations from `decl` to the declaration they stand
    /// for. Non-alias declarations resolve to themselves.
    ///
    /// Returns `None` for a stale handle, an alias that lost its target, or
    /// a chain longer than the configured alias depth (cycles included).
    pub fn resolve_alias(&self, decl: DeclId) -> Option<DeclId> {
        let mut current = decl;
        let mut followed = 0;
        loop {
            let data = self.live_decl(current)?;
            let DeclarationKind::Alias { aliased } = data.kind else {
                return Some(current);
            };
            let Some(target) = aliased else {
                warn!(alias = ?current, "lost aliased declaration");
                return None;
            };
            followed += 1;
            if followed > self.config.max_alias_depth {
                warn!(?decl, "alias chain too long or cyclic");
                return None;
            }
            current = target;
        }
    }

    /// Rewrite `items` with the namespace aliases declared directly in
    /// `context` before `position`.
    ///
    /// Every namespace import adds `import::item` next to the item. A
    /// renaming alias replaces the item's first segment; the bare name is
    /// only replaced when it has further segments or `can_be_namespace`
    /// is set.
    pub(crate) fn apply_aliases(
        &self,
        context: ContextId,
        items: &[Arc<SearchItem>],
        position: Option<Position>,
        can_be_namespace: bool,
    ) -> SearchItemList {
        let imports = self.all_local_declarations(context, &Identifier::global_import());
        let mut out = Vec::with_capacity(items.len());

        for item in items {
            let mut add_unmodified = true;

            if !item.explicitly_global {
                for import in &imports {
                    let Some(data) = self.live_decl(*import) else {
                        continue;
                    };
                    if is_after(data.range.end, position) {
                        continue;
                    }
                    let Some(import_identifier) = data.kind.import_identifier() else {
                        continue;
                    };
                    out.push(Arc::new(SearchItem::with_next(import_identifier, item.clone())));
                }

                if !item.is_empty() && (item.has_next() || can_be_namespace) {
                    for alias in self.all_local_declarations(context, &item.identifier) {
                        let Some(data) = self.live_decl(alias) else {
                            continue;
                        };
                        if is_after(data.range.end, position) {
                            continue;
                        }
                        let Some(import_identifier) = data.kind.import_identifier() else {
                            continue;
                        };
                        add_unmodified = false;
                        out.push(Arc::new(SearchItem::with_next_list(
                            import_identifier,
                            item.next.clone(),
                        )));
                    }
                }
            }

            if add_unmodified {
                out.push(item.clone());
            }
        }
        out
    }

    /// Before searching the parent of a namespace, add a branch qualified by
    /// the namespace itself, so members of the namespace stay reachable once
    /// the search has left it (the namespace may continue in another file).
    pub(crate) fn apply_upwards_aliases(&self, context: ContextId, items: &mut SearchItemList) {
        let Some(data) = self.contexts.get(context) else {
            return;
        };
        if data.context_type != ContextType::Namespace || data.local_scope_identifier.is_empty() {
            return;
        }

        let mut item = SearchItem::new(&data.local_scope_identifier);
        item.add_to_each_node(items);
        if !item.has_next() {
            return;
        }

        let mut parent = data.parent;
        while let Some(current) = parent {
            let Some(parent_data) = self.contexts.get(current) else {
                break;
            };
            item = SearchItem::with_next(&parent_data.local_scope_identifier, Arc::new(item));
            parent = parent_data.parent;
        }
        item.explicitly_global = true;
        items.insert(0, Arc::new(item));
    }

    /// Symbol-table variant of [`apply_aliases`](Self::apply_aliases) used
    /// when searching from a registered top context.
    ///
    /// For each prefix length `p` of each name, the namespace imports
    /// registered as `name[..p]::<global import>` and the renaming aliases
    /// registered as `name[..=p]` that are accessible from `top` are applied,
    /// recursively, to the remainder of the name.
    pub(crate) fn apply_global_aliases(
        &self,
        top: TopContextId,
        identifiers: Vec<QualifiedIdentifier>,
        position: Option<Position>,
        can_be_namespace: bool,
    ) -> Vec<QualifiedIdentifier> {
        let mut expanded = Vec::new();
        self.expand_global_aliases(
            top,
            identifiers,
            &mut expanded,
            position,
            can_be_namespace,
            (0, None),
            0,
        );
        dedup_identifiers(expanded)
    }

    #[allow(clippy::too_many_arguments)]
    fn expand_global_aliases(
        &self,
        top: TopContextId,
        identifiers: Vec<QualifiedIdentifier>,
        expanded: &mut Vec<QualifiedIdentifier>,
        position: Option<Position>,
        can_be_namespace: bool,
        (start, end): (usize, Option<usize>),
        depth: usize,
    ) {
        if depth > self.config.max_alias_depth {
            warn!(?top, depth, "namespace alias expansion too deep");
            expanded.extend(identifiers);
            return;
        }

        let mut current = identifiers;
        let mut offset = start;
        let mut ready = false;
        while !ready && end.is_none_or(|end| offset < end) {
            ready = true;
            let mut next_round = Vec::new();

            for identifier in current {
                let mut add_unmodified = true;

                if identifier.len() > offset {
                    ready = false;
                    let scope_import = identifier
                        .mid(0, Some(offset))
                        .with_identifier(Identifier::global_import());
                    let imports = self.check_declarations(
                        top,
                        self.symbol_table.find_declarations(&scope_import),
                        position,
                        None,
                        SearchFlags::empty(),
                    );
                    for import in imports {
                        let Some(data) = self.declarations.get(import) else {
                            continue;
                        };
                        let Some(import_identifier) = data.kind.import_identifier() else {
                            continue;
                        };
                        if import_identifier.is_empty() {
                            warn!(?import, "namespace import without target");
                            continue;
                        }
                        let in_import = import_identifier.join(&identifier.mid(offset, None));
                        self.expand_global_aliases(
                            top,
                            vec![in_import],
                            &mut next_round,
                            Some(data.range.start),
                            can_be_namespace,
                            (import_identifier.len(), Some(offset + 1)),
                            depth + 1,
                        );
                    }
                }

                let threshold = if can_be_namespace { offset } else { offset + 1 };
                if identifier.len() > threshold {
                    ready = false;
                    let aliases = self.check_declarations(
                        top,
                        self.symbol_table
                            .find_declarations(&identifier.mid(0, Some(offset + 1))),
                        position,
                        None,
                        SearchFlags::empty(),
                    );
                    for alias in aliases {
                        let Some(data) = self.declarations.get(alias) else {
                            continue;
                        };
                        let Some(import_identifier) = data.kind.import_identifier() else {
                            continue;
                        };
                        if is_after(data.range.end, position) {
                            continue;
                        }
                        add_unmodified = false;
                        if import_identifier.is_empty() {
                            warn!(?alias, "namespace alias without target");
                            continue;
                        }
                        trace!(%identifier, target = %import_identifier, "applying namespace alias");
                        let replaced = import_identifier.join(&identifier.mid(offset + 1, None));
                        self.expand_global_aliases(
                            top,
                            vec![replaced],
                            &mut next_round,
                            Some(data.range.start),
                            can_be_namespace,
                            (import_identifier.len(), Some(offset + 1)),
                            depth + 1,
                        );
                    }
                }

                if add_unmodified {
                    next_round.push(identifier);
                }
            }

            current = dedup_identifiers(next_round);
            offset += 1;
        }
        expanded.extend(current);
    }
}

fn dedup_identifiers(identifiers: Vec<QualifiedIdentifier>) -> Vec<QualifiedIdentifier> {
    let mut seen = FxHashSet::default();
    identifiers
        .into_iter()
        .filter(|identifier| seen.insert(identifier.clone()))
        .collect()
}
