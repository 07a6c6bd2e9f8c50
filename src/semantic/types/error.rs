//! Error types for graph construction.
//!
//! Only builder entry points fail, and only when a handle no longer refers to
//! a live node. Searches never fail: absence is an empty result.

use thiserror::Error;

use crate::semantic::graphs::{ContextId, DeclId};

/// Errors reported by graph mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// The context was deleted (or never belonged to this graph).
    #[error("stale context handle: {0:?}")]
    StaleContext(ContextId),

    /// The declaration was deleted (or never belonged to this graph).
    #[error("stale declaration handle: {0:?}")]
    StaleDeclaration(DeclId),

    /// A top-context operation was called on an ordinary context.
    #[error("{0:?} is not a top context")]
    NotATopContext(ContextId),

    /// Anonymous contexts cannot be listed as children.
    #[error("{0:?} is anonymous and cannot be added to a child list")]
    AnonymousContext(ContextId),
}

pub type SemanticResult<T> = Result<T, SemanticError>;
