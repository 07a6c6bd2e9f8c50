//! # Semantic Model
//!
//! The scope/declaration graph of every indexed file and the name search
//! over it.
//!
//! - [`graphs`]: contexts, declarations, imports and uses
//! - [`symbol_table`]: cross-file registry by qualified name
//! - [`resolver`]: declaration and context search, import reachability
//! - [`workspace`]: the lock shared by indexing and query threads

pub mod graphs;
pub mod resolver;
pub mod symbol_table;
pub mod types;
pub mod workspace;

pub use graphs::{
    ContextGraph, ContextId, DeclId, DeclarationKind, GraphConfig, GraphNode, Import, TopContextId, TypeHandle, Use,
};
pub use resolver::{ImportTraceItem, SearchItem, SearchItemList};
pub use symbol_table::{IndexedSymbolTable, SymbolTable};
pub use types::{
    ContextType, Problem, ProblemSource, SearchFlags, SemanticError, SemanticResult, Severity, TopContextFlags,
};
pub use workspace::{Workspace, WorkspaceReadGuard, WorkspaceWriteGuard};
