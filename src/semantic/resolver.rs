//! Name search over the context graph.
//!
//! - [`SearchItem`]: the alternative-name trie built by alias expansion
//! - declaration search, local and cross-file
//! - context (scope) search by qualified name
//! - transitive import reachability between top contexts
mod alias_resolver;
mod context_finder;
mod import_reachability;
mod name_resolver;
mod search_item;

pub use import_reachability::ImportTraceItem;
pub use search_item::{SearchItem, SearchItemList};

pub(crate) use import_reachability::ImportsCache;

#[cfg(test)]
mod tests;
