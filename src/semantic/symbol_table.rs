//! Cross-file registry of declarations and scope contexts by qualified name.
mod registration;
mod table;

pub use table::{IndexedSymbolTable, SymbolTable};
