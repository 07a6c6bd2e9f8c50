//! # Context graph
//!
//! Arena-backed graph of scopes ("contexts") and the declarations they own.
//!
//! Owning edges (parent to child, context to local declaration) are plain
//! lists inside the owner. Import edges, importer back-edges and the owner
//! link between a context and the declaration opening it are associations
//! that teardown detaches on both ends.

mod arena;
mod context;
mod declaration;
mod graph;
mod local_index;
mod teardown;
mod top_context;
mod uses;

pub use arena::{ContextId, DeclId};
pub use context::Import;
pub use declaration::{DeclarationKind, TypeHandle};
pub use graph::{ContextGraph, GraphConfig};
pub use teardown::GraphNode;
pub use top_context::TopContextId;
pub use uses::Use;

#[cfg(test)]
mod tests;
