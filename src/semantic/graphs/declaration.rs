//! Declaration nodes.

use tracing::warn;

use super::arena::{ContextId, DeclId};
use super::graph::ContextGraph;
use super::local_index::IndexGuardSet;
use crate::base::{Identifier, QualifiedIdentifier, Span};
use crate::semantic::types::SemanticResult;

/// Opaque handle of a semantic type. The graph only compares handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub u32);

/// What a declaration is, with the data specific to that kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeclarationKind {
    #[default]
    Ordinary,
    Function,
    /// Stands in for another declaration (e.g. a using-declaration).
    Alias { aliased: Option<DeclId> },
    /// Redirects a qualifier prefix (`namespace fs = std::filesystem`), or,
    /// under the identifier [`Identifier::global_import`], imports a whole
    /// namespace (`using namespace std`).
    NamespaceAlias { import_identifier: QualifiedIdentifier },
}

impl DeclarationKind {
    pub fn alias(target: DeclId) -> Self {
        DeclarationKind::Alias {
            aliased: Some(target),
        }
    }

    pub fn namespace_alias(import_identifier: QualifiedIdentifier) -> Self {
        DeclarationKind::NamespaceAlias { import_identifier }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, DeclarationKind::Function)
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, DeclarationKind::Alias { .. })
    }

    pub fn is_namespace_alias(&self) -> bool {
        matches!(self, DeclarationKind::NamespaceAlias { .. })
    }

    pub fn aliased_declaration(&self) -> Option<DeclId> {
        match self {
            DeclarationKind::Alias { aliased } => *aliased,
            _ => None,
        }
    }

    pub fn import_identifier(&self) -> Option<&QualifiedIdentifier> {
        match self {
            DeclarationKind::NamespaceAlias { import_identifier } => Some(import_identifier),
            _ => None,
        }
    }
}

pub(crate) struct DeclarationData {
    pub(crate) identifier: Identifier,
    pub(crate) range: Span,
    pub(crate) context: Option<ContextId>,
    pub(crate) kind: DeclarationKind,
    pub(crate) declaration_type: Option<TypeHandle>,
    pub(crate) internal_context: Option<ContextId>,
    /// Key this declaration is registered under, if it is.
    pub(crate) symbol_key: Option<QualifiedIdentifier>,
}

impl ContextGraph {
    /// Create a declaration inside `context`.
    ///
    /// A namespace import (`using namespace N`) is a
    /// [`DeclarationKind::NamespaceAlias`] named [`Identifier::global_import`].
    pub fn create_declaration(
        &mut self,
        context: ContextId,
        identifier: Identifier,
        range: Span,
        kind: DeclarationKind,
    ) -> SemanticResult<DeclId> {
        self.ctx(context)?;
        let decl = self.declarations.insert(DeclarationData {
            identifier,
            range,
            context: None,
            kind,
            declaration_type: None,
            internal_context: None,
            symbol_key: None,
        });
        self.add_local_declaration(context, decl)?;
        Ok(decl)
    }

    /// Rename a declaration.
    ///
    /// The old index entry is removed and the new one inserted while every
    /// affected index lock is held, so a reader sees either name but never
    /// both or neither.
    pub fn set_identifier(&mut self, decl: DeclId, identifier: Identifier) -> SemanticResult<()> {
        let data = self.decl(decl)?;
        if data.identifier == identifier {
            return Ok(());
        }
        let old = data.identifier.clone();
        let context = data.context;

        {
            let mut guards = IndexGuardSet::new(&self.contexts);
            if let Some(context) = context {
                guards.index_remove_propagated(context, &old, decl);
                guards.index_insert_propagated(context, &identifier, decl);
            }
            if let Some(data) = self.declarations.get_mut(decl) {
                data.identifier = identifier;
            }
        }

        self.sync_declaration_registration(decl);
        Ok(())
    }

    /// Move a declaration; keeps its context's declaration order.
    pub fn set_declaration_range(&mut self, decl: DeclId, range: Span) -> SemanticResult<()> {
        let data = self.decl_mut(decl)?;
        if data.range == range {
            return Ok(());
        }
        let moved = data.range.start != range.start;
        data.range = range;
        let context = data.context;

        if let (true, Some(context)) = (moved, context) {
            let declarations = &self.declarations;
            let mut guards = IndexGuardSet::new(&self.contexts);
            if let Some(local) = guards.acquire(context) {
                if local.remove_ordered(decl) {
                    local.insert_ordered(decl, range.start, |id| {
                        declarations
                            .get(id)
                            .map(|data| data.range.start)
                            .unwrap_or_default()
                    });
                }
            }
        }
        Ok(())
    }

    pub fn set_declaration_type(&mut self, decl: DeclId, declaration_type: Option<TypeHandle>) -> SemanticResult<()> {
        self.decl_mut(decl)?.declaration_type = declaration_type;
        Ok(())
    }

    /// Move the declaration into `context`, or detach it with `None`.
    pub fn set_declaration_context(&mut self, decl: DeclId, context: Option<ContextId>) -> SemanticResult<()> {
        match context {
            Some(context) => {
                self.add_local_declaration(context, decl)?;
            }
            None => {
                if let Some(current) = self.decl(decl)?.context {
                    self.remove_local_declaration(current, decl)?;
                }
            }
        }
        Ok(())
    }

    /// Set the context this declaration opens. Keeps [`ContextGraph::owner`]
    /// of both the old and the new context in agreement.
    pub fn set_internal_context(&mut self, decl: DeclId, context: Option<ContextId>) -> SemanticResult<()> {
        let previous = self.decl(decl)?.internal_context;
        if let Some(context) = context {
            self.ctx(context)?;
        }
        if previous == context {
            return Ok(());
        }

        if let Some(previous) = previous {
            if let Some(data) = self.contexts.get_mut(previous) {
                if data.owner == Some(decl) {
                    data.owner = None;
                }
            }
        }

        if let Some(context) = context {
            let displaced = self.ctx(context)?.owner;
            if let Some(displaced) = displaced.filter(|owner| *owner != decl) {
                if let Some(data) = self.declarations.get_mut(displaced) {
                    if data.internal_context == Some(context) {
                        data.internal_context = None;
                    }
                }
            }
            self.ctx_mut(context)?.owner = Some(decl);
        }

        self.decl_mut(decl)?.internal_context = context;
        Ok(())
    }

    /// Point an alias at a new target. Returns `false` if `decl` is not an
    /// alias.
    pub fn set_aliased_declaration(&mut self, decl: DeclId, target: Option<DeclId>) -> SemanticResult<bool> {
        match &mut self.decl_mut(decl)?.kind {
            DeclarationKind::Alias { aliased } => {
                *aliased = target;
                Ok(true)
            }
            _ => {
                warn!(?decl, "aliased declaration set on a non-alias");
                Ok(false)
            }
        }
    }

    /// Change the qualifier a namespace alias resolves to. Returns `false`
    /// if `decl` is not a namespace alias.
    pub fn set_import_identifier(
        &mut self,
        decl: DeclId,
        identifier: QualifiedIdentifier,
    ) -> SemanticResult<bool> {
        match &mut self.decl_mut(decl)?.kind {
            DeclarationKind::NamespaceAlias { import_identifier } => {
                *import_identifier = identifier;
                Ok(true)
            }
            _ => {
                warn!(?decl, "import identifier set on a non-namespace-alias");
                Ok(false)
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn identifier(&self, decl: DeclId) -> Option<&Identifier> {
        self.declarations.get(decl).map(|data| &data.identifier)
    }

    /// Scope identifier of the declaration's context (classes included)
    /// followed by its own identifier.
    pub fn qualified_identifier(&self, decl: DeclId) -> Option<QualifiedIdentifier> {
        let data = self.declarations.get(decl)?;
        let mut qualified = match data.context {
            Some(context) => self.scope_identifier(context, true),
            None => QualifiedIdentifier::new(),
        };
        qualified.push(data.identifier.clone());
        Some(qualified)
    }

    pub fn declaration_range(&self, decl: DeclId) -> Option<Span> {
        self.declarations.get(decl).map(|data| data.range)
    }

    pub fn declaration_context(&self, decl: DeclId) -> Option<ContextId> {
        self.declarations.get(decl).and_then(|data| data.context)
    }

    pub fn kind(&self, decl: DeclId) -> Option<&DeclarationKind> {
        self.declarations.get(decl).map(|data| &data.kind)
    }

    pub fn declaration_type(&self, decl: DeclId) -> Option<TypeHandle> {
        self.declarations
            .get(decl)
            .and_then(|data| data.declaration_type)
    }

    pub fn internal_context(&self, decl: DeclId) -> Option<ContextId> {
        self.declarations
            .get(decl)
            .and_then(|data| data.internal_context)
    }

    pub fn is_function_declaration(&self, decl: DeclId) -> bool {
        self.declarations
            .get(decl)
            .is_some_and(|data| data.kind.is_function())
    }

    pub fn is_declaration_in_symbol_table(&self, decl: DeclId) -> bool {
        self.declarations
            .get(decl)
            .is_some_and(|data| data.symbol_key.is_some())
    }
}
