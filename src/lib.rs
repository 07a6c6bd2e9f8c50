//! # declchain
//!
//! Scope/declaration graph with cross-file qualified-name resolution, the
//! core of a source-code indexer.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic  → Context graph, symbol table, name search, workspace lock
//!   ↓
//! base      → Primitives (FileId, Identifier, Position/Span, limits)
//! ```

// ============================================================================
// MODULES (dependency order: base → semantic)
// ============================================================================

/// Foundation types: FileId, identifiers, source positions
pub mod base;

/// Semantic model: contexts, declarations, search
pub mod semantic;

// Re-export foundation types
pub use base::{FileId, FileIdentity, Identifier, Position, QualifiedIdentifier, Span};

// Re-export the semantic entry points
pub use semantic::{
    ContextGraph, ContextId, ContextType, DeclId, DeclarationKind, GraphConfig, SearchFlags, SemanticError,
    SemanticResult, SymbolTable, TopContextId, Workspace,
};
