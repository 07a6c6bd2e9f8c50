//! Context (scope) nodes: construction, membership edges and queries.

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::arena::{ContextId, DeclId};
use super::graph::ContextGraph;
use super::local_index::{IndexGuardSet, LocalDeclarations, insert_by_start, new_local_mutex};
use super::top_context::{TopContextData, TopContextId};
use super::uses::Use;
use crate::base::{FileId, Identifier, Position, QualifiedIdentifier, Span};
use crate::semantic::types::{ContextType, SemanticError, SemanticResult};

/// An import edge: the imported context and the position from which its
/// members become visible. `None` means visible everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Import {
    pub context: ContextId,
    pub position: Option<Position>,
}

pub(crate) struct ContextData {
    pub(crate) range: Span,
    pub(crate) context_type: ContextType,
    pub(crate) local_scope_identifier: QualifiedIdentifier,
    pub(crate) owner: Option<DeclId>,
    pub(crate) parent: Option<ContextId>,
    pub(crate) anonymous: bool,
    pub(crate) children: Vec<ContextId>,
    pub(crate) local: Mutex<LocalDeclarations>,
    /// Insertion order; never re-sorted.
    pub(crate) imports: Vec<Import>,
    pub(crate) imported_children: Vec<ContextId>,
    pub(crate) propagate_declarations: bool,
    pub(crate) in_symbol_table: bool,
    /// Key this context is registered under, if it is.
    pub(crate) symbol_key: Option<QualifiedIdentifier>,
    pub(crate) uses: Vec<Use>,
    pub(crate) top: Option<Box<TopContextData>>,
}

impl ContextData {
    fn new(range: Span) -> Self {
        Self {
            range,
            context_type: ContextType::Other,
            local_scope_identifier: QualifiedIdentifier::new(),
            owner: None,
            parent: None,
            anonymous: false,
            children: Vec::new(),
            local: new_local_mutex(),
            imports: Vec::new(),
            imported_children: Vec::new(),
            propagate_declarations: false,
            in_symbol_table: false,
            symbol_key: None,
            uses: Vec::new(),
            top: None,
        }
    }
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl ContextGraph {
    /// Create the root context of a file. Its type is `Global`.
    ///
    /// The new top context is not yet visible in the symbol table; see
    /// [`ContextGraph::register_top_context`].
    pub fn create_top_context(&mut self, file: FileId, range: Span) -> TopContextId {
        let mut data = ContextData::new(range);
        data.context_type = ContextType::Global;
        data.top = Some(Box::new(TopContextData::new(file)));
        let id = self.contexts.insert(data);
        debug!(?id, %file, "created top context");
        TopContextId::new(id)
    }

    /// Create a context and add it to `parent`'s children.
    pub fn create_context(&mut self, parent: ContextId, range: Span) -> SemanticResult<ContextId> {
        self.ctx(parent)?;
        let id = self.contexts.insert(ContextData::new(range));
        self.add_child_context(parent, id)?;
        Ok(id)
    }

    /// Create a context that knows its parent but is not one of its
    /// children and never enters the symbol table.
    pub fn create_anonymous_context(&mut self, parent: ContextId, range: Span) -> SemanticResult<ContextId> {
        self.ctx(parent)?;
        let mut data = ContextData::new(range);
        data.parent = Some(parent);
        data.anonymous = true;
        Ok(self.contexts.insert(data))
    }
}

// ============================================================================
// MUTATORS
// ============================================================================

impl ContextGraph {
    pub fn set_context_type(&mut self, context: ContextId, context_type: ContextType) -> SemanticResult<()> {
        let data = self.ctx_mut(context)?;
        if data.context_type == context_type {
            return Ok(());
        }
        data.context_type = context_type;
        self.sync_context_registration(context, false);
        Ok(())
    }

    /// Change the name segment this context adds to qualified names.
    ///
    /// Everything below the context is re-registered under its new name.
    pub fn set_local_scope_identifier(
        &mut self,
        context: ContextId,
        identifier: QualifiedIdentifier,
    ) -> SemanticResult<()> {
        let data = self.ctx_mut(context)?;
        let changed = data.local_scope_identifier != identifier;
        data.local_scope_identifier = identifier;
        if changed {
            self.sync_context_registration(context, true);
        }
        Ok(())
    }

    /// Make `owner` the declaration that opens this context, or clear it.
    pub fn set_owner(&mut self, context: ContextId, owner: Option<DeclId>) -> SemanticResult<()> {
        match owner {
            Some(decl) => self.set_internal_context(decl, Some(context)),
            None => {
                let current = self.ctx(context)?.owner;
                match current {
                    Some(decl) if self.declarations.contains(decl) => self.set_internal_context(decl, None),
                    _ => {
                        self.ctx_mut(context)?.owner = None;
                        Ok(())
                    }
                }
            }
        }
    }

    /// Toggle mirroring of this context's declarations into its parent's index.
    pub fn set_propagate_declarations(&mut self, context: ContextId, propagate: bool) -> SemanticResult<()> {
        let data = self.ctx(context)?;
        if data.propagate_declarations == propagate {
            return Ok(());
        }
        if !propagate {
            self.mirror_into_parent(context, false);
        }
        self.ctx_mut(context)?.propagate_declarations = propagate;
        if propagate {
            self.mirror_into_parent(context, true);
        }
        Ok(())
    }

    /// Add an existing declaration to `context`, moving it out of its
    /// previous context. Returns `false` if it already was a member.
    pub fn add_local_declaration(&mut self, context: ContextId, decl: DeclId) -> SemanticResult<bool> {
        self.ctx(context)?;
        let previous = self.decl(decl)?.context;
        if previous == Some(context) {
            return Ok(false);
        }
        if let Some(previous) = previous {
            self.detach_declaration(previous, decl);
        }
        self.attach_declaration(context, decl);
        self.decl_mut(decl)?.context = Some(context);
        self.sync_declaration_registration(decl);
        Ok(true)
    }

    /// Detach a declaration from `context` without deleting it.
    /// Returns `false` if it was not a member.
    pub fn remove_local_declaration(&mut self, context: ContextId, decl: DeclId) -> SemanticResult<bool> {
        self.ctx(context)?;
        if self.decl(decl)?.context != Some(context) {
            return Ok(false);
        }
        self.detach_declaration(context, decl);
        self.decl_mut(decl)?.context = None;
        self.sync_declaration_registration(decl);
        Ok(true)
    }

    /// Make `child` a child of `parent`, detaching it from any previous parent.
    ///
    /// Returns `false` if it already was a child, or if adding it would make
    /// a context its own ancestor.
    pub fn add_child_context(&mut self, parent: ContextId, child: ContextId) -> SemanticResult<bool> {
        let parent_data = self.ctx(parent)?;
        let parent_in_table = parent_data.in_symbol_table;
        let already_listed = parent_data.children.contains(&child);
        let child_data = self.ctx(child)?;
        if child_data.anonymous {
            return Err(SemanticError::AnonymousContext(child));
        }
        let previous = child_data.parent;
        let start = child_data.range.start;
        if previous == Some(parent) && already_listed {
            return Ok(false);
        }
        if self.is_ancestor_or_self(child, parent) {
            warn!(?parent, ?child, "child context would become its own ancestor");
            return Ok(false);
        }
        if !parent_data.range.contains_span(&child_data.range) {
            warn!(?parent, ?child, "child context range outside its parent's range");
        }

        if let Some(previous) = previous {
            self.unlink_child(previous, child);
        }

        let mut children = std::mem::take(&mut self.ctx_mut(parent)?.children);
        insert_by_start(&mut children, child, start, |id| {
            self.contexts
                .get(id)
                .map(|data| data.range.start)
                .unwrap_or_default()
        });
        self.ctx_mut(parent)?.children = children;
        self.ctx_mut(child)?.parent = Some(parent);
        self.mirror_into_parent(child, true);

        self.set_subtree_in_symbol_table(child, parent_in_table);
        Ok(true)
    }

    /// Remove `child` from `parent`'s children. The child stays alive,
    /// without a parent, until it is deleted or re-attached.
    pub fn remove_child_context(&mut self, parent: ContextId, child: ContextId) -> SemanticResult<bool> {
        self.ctx(parent)?;
        if !self.ctx(parent)?.children.contains(&child) {
            return Ok(false);
        }
        self.unlink_child(parent, child);
        if self.contexts.contains(child) {
            self.set_subtree_in_symbol_table(child, false);
        }
        Ok(true)
    }

    /// Add an import edge, or move the position of an existing one.
    ///
    /// Returns `true` when a new edge was created. Importing a context into
    /// itself is refused.
    pub fn add_import(
        &mut self,
        context: ContextId,
        target: ContextId,
        position: Option<Position>,
    ) -> SemanticResult<bool> {
        self.ctx(context)?;
        self.ctx(target)?;
        if context == target {
            warn!(?context, "tried to import self");
            return Ok(false);
        }

        let data = self.ctx_mut(context)?;
        if let Some(existing) = data.imports.iter_mut().find(|import| import.context == target) {
            existing.position = position;
            return Ok(false);
        }
        data.imports.push(Import {
            context: target,
            position,
        });
        let importer_is_top = data.top.is_some();
        self.ctx_mut(target)?.imported_children.push(context);

        if importer_is_top {
            if self.as_top_context(target).is_none() {
                warn!(?context, ?target, "non-top context imported into top context");
            }
            self.invalidate_import_cache(context);
        }
        Ok(true)
    }

    /// Remove the import edge to `target`. Returns `false` if there was none.
    pub fn remove_import(&mut self, context: ContextId, target: ContextId) -> SemanticResult<bool> {
        let data = self.ctx_mut(context)?;
        let Some(at) = data.imports.iter().position(|import| import.context == target) else {
            return Ok(false);
        };
        data.imports.remove(at);
        let importer_is_top = data.top.is_some();
        if let Some(target_data) = self.contexts.get_mut(target) {
            target_data.imported_children.retain(|id| *id != context);
        }
        if importer_is_top {
            self.invalidate_import_cache(context);
        }
        Ok(true)
    }

    /// Remove every import edge of `context`. Returns how many were removed.
    pub fn clear_imports(&mut self, context: ContextId) -> SemanticResult<usize> {
        let targets: Vec<ContextId> = self.ctx(context)?.imports.iter().map(|import| import.context).collect();
        let mut removed = 0;
        for target in targets {
            if self.remove_import(context, target)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Internal edge maintenance
    // ------------------------------------------------------------------

    /// Insert into the ordered list and the (propagated) index.
    pub(crate) fn attach_declaration(&mut self, context: ContextId, decl: DeclId) {
        let Some(data) = self.declarations.get(decl) else {
            return;
        };
        let identifier = data.identifier.clone();
        let start = data.range.start;
        let declarations = &self.declarations;
        let mut guards = IndexGuardSet::new(&self.contexts);
        if let Some(local) = guards.acquire(context) {
            local.insert_ordered(decl, start, |id| {
                declarations
                    .get(id)
                    .map(|data| data.range.start)
                    .unwrap_or_default()
            });
        }
        guards.index_insert_propagated(context, &identifier, decl);
    }

    pub(crate) fn detach_declaration(&mut self, context: ContextId, decl: DeclId) -> bool {
        let Some(identifier) = self.declarations.get(decl).map(|data| data.identifier.clone()) else {
            return false;
        };
        let mut guards = IndexGuardSet::new(&self.contexts);
        let removed = guards
            .acquire(context)
            .map(|local| local.remove_ordered(decl))
            .unwrap_or(false);
        guards.index_remove_propagated(context, &identifier, decl);
        removed
    }

    /// Copy (or withdraw) every index entry of `context` into its parent
    /// chain, if the context propagates its declarations.
    pub(crate) fn mirror_into_parent(&mut self, context: ContextId, insert: bool) {
        let Some(data) = self.contexts.get(context) else {
            return;
        };
        if !data.propagate_declarations {
            return;
        }
        let Some(parent) = data.parent else {
            return;
        };
        let entries = data.local.lock().indexed_pairs();
        let mut guards = IndexGuardSet::new(&self.contexts);
        for (identifier, decl) in entries {
            if insert {
                guards.index_insert_propagated(parent, &identifier, decl);
            } else {
                guards.index_remove_propagated(parent, &identifier, decl);
            }
        }
    }

    pub(crate) fn unlink_child(&mut self, parent: ContextId, child: ContextId) {
        self.mirror_into_parent(child, false);
        if let Some(parent_data) = self.contexts.get_mut(parent) {
            parent_data.children.retain(|id| *id != child);
        }
        if let Some(child_data) = self.contexts.get_mut(child) {
            if child_data.parent == Some(parent) {
                child_data.parent = None;
            }
        }
    }

    fn is_ancestor_or_self(&self, ancestor: ContextId, context: ContextId) -> bool {
        let mut current = Some(context);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.contexts.get(id).and_then(|data| data.parent);
        }
        false
    }
}

// ============================================================================
// QUERIES
// ============================================================================

impl ContextGraph {
    pub fn context_type(&self, context: ContextId) -> Option<ContextType> {
        self.contexts.get(context).map(|data| data.context_type)
    }

    pub fn context_range(&self, context: ContextId) -> Option<Span> {
        self.contexts.get(context).map(|data| data.range)
    }

    pub fn parent_context(&self, context: ContextId) -> Option<ContextId> {
        self.contexts.get(context).and_then(|data| data.parent)
    }

    /// The top context this context belongs to (itself, for a top context).
    pub fn top_context(&self, context: ContextId) -> Option<TopContextId> {
        let mut current = context;
        loop {
            let data = self.contexts.get(current)?;
            if data.top.is_some() {
                return Some(TopContextId::new(current));
            }
            current = data.parent?;
        }
    }

    /// File of the top context `context` belongs to.
    pub fn file(&self, context: ContextId) -> Option<FileId> {
        let top = self.top_context(context)?;
        self.contexts
            .get(top.context())
            .and_then(|data| data.top.as_ref())
            .map(|top| top.file)
    }

    pub fn child_contexts(&self, context: ContextId) -> &[ContextId] {
        self.contexts
            .get(context)
            .map(|data| data.children.as_slice())
            .unwrap_or_default()
    }

    /// Own declarations in source order.
    pub fn local_declarations(&self, context: ContextId) -> Vec<DeclId> {
        self.contexts
            .get(context)
            .map(|data| data.local.lock().ordered().to_vec())
            .unwrap_or_default()
    }

    /// Raw index hits for `identifier`, including declarations propagated
    /// from child contexts. No alias resolution or visibility filtering.
    pub fn all_local_declarations(&self, context: ContextId, identifier: &Identifier) -> Vec<DeclId> {
        self.contexts
            .get(context)
            .map(|data| data.local.lock().lookup(identifier).to_vec())
            .unwrap_or_default()
    }

    pub fn imported_parent_contexts(&self, context: ContextId) -> &[Import] {
        self.contexts
            .get(context)
            .map(|data| data.imports.as_slice())
            .unwrap_or_default()
    }

    pub fn imported_child_contexts(&self, context: ContextId) -> &[ContextId] {
        self.contexts
            .get(context)
            .map(|data| data.imported_children.as_slice())
            .unwrap_or_default()
    }

    /// Position recorded on the import edge `context -> target`.
    pub fn import_position(&self, context: ContextId, target: ContextId) -> Option<Position> {
        self.contexts
            .get(context)?
            .imports
            .iter()
            .find(|import| import.context == target)
            .and_then(|import| import.position)
    }

    pub fn owner(&self, context: ContextId) -> Option<DeclId> {
        self.contexts.get(context).and_then(|data| data.owner)
    }

    pub fn is_anonymous(&self, context: ContextId) -> bool {
        self.contexts.get(context).is_some_and(|data| data.anonymous)
    }

    pub fn propagates_declarations(&self, context: ContextId) -> bool {
        self.contexts
            .get(context)
            .is_some_and(|data| data.propagate_declarations)
    }

    pub fn is_in_symbol_table(&self, context: ContextId) -> bool {
        self.contexts.get(context).is_some_and(|data| data.in_symbol_table)
    }

    /// Number of parent hops up to the root.
    pub fn depth(&self, context: ContextId) -> usize {
        let mut depth = 0;
        let mut current = self.parent_context(context);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent_context(parent);
        }
        depth
    }

    pub fn local_scope_identifier(&self, context: ContextId) -> Option<&QualifiedIdentifier> {
        self.contexts
            .get(context)
            .map(|data| &data.local_scope_identifier)
    }

    /// Concatenated local scope identifiers from the root down to `context`.
    /// Class scopes are skipped unless `include_classes` is set.
    pub fn scope_identifier(&self, context: ContextId, include_classes: bool) -> QualifiedIdentifier {
        let mut chain = Vec::new();
        let mut current = Some(context);
        while let Some(id) = current {
            let Some(data) = self.contexts.get(id) else {
                break;
            };
            chain.push(data);
            current = data.parent;
        }

        let mut scope = QualifiedIdentifier::new();
        for data in chain.into_iter().rev() {
            if include_classes || data.context_type != ContextType::Class {
                scope.push_all(&data.local_scope_identifier);
            }
        }
        scope
    }

    /// Whether both contexts have the same local scope identifier at every
    /// level up to the root.
    pub fn equal_scope_identifier(&self, left: ContextId, right: ContextId) -> bool {
        let mut left = Some(left);
        let mut right = Some(right);
        loop {
            match (left, right) {
                (None, None) => return true,
                (Some(l), Some(r)) => {
                    let (Some(l_data), Some(r_data)) = (self.contexts.get(l), self.contexts.get(r)) else {
                        return false;
                    };
                    if l_data.local_scope_identifier != r_data.local_scope_identifier {
                        return false;
                    }
                    left = l_data.parent;
                    right = r_data.parent;
                }
                _ => return false,
            }
        }
    }

    /// The innermost context below (or equal to) `context` containing
    /// `position`.
    pub fn find_context_at(&self, context: ContextId, position: Position) -> Option<ContextId> {
        let data = self.contexts.get(context)?;
        if !data.range.contains(position) {
            return None;
        }
        for child in &data.children {
            if let Some(specific) = self.find_context_at(*child, position) {
                return Some(specific);
            }
        }
        Some(context)
    }

    /// The innermost context below (or equal to) `context` whose range
    /// contains all of `span`.
    pub fn find_context_including(&self, context: ContextId, span: Span) -> Option<ContextId> {
        let data = self.contexts.get(context)?;
        if !data.range.contains_span(&span) {
            return None;
        }
        for child in &data.children {
            if let Some(specific) = self.find_context_including(*child, span) {
                return Some(specific);
            }
        }
        Some(context)
    }

    /// Whether `other` is `context` or lies in its child tree.
    pub fn parent_context_of(&self, context: ContextId, other: ContextId) -> bool {
        if context == other {
            return true;
        }
        self.child_contexts(context)
            .iter()
            .any(|child| self.parent_context_of(*child, other))
    }
}
