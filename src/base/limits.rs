//! Recursion ceilings and weights shared by the search algorithms.
//!
//! These are the defaults for [`GraphConfig`](crate::semantic::GraphConfig);
//! a graph built with a custom config uses its own values instead.

/// Maximum depth of the transitive import walk between top contexts.
///
/// A walk reaching this depth is reported as "import structure too deep"
/// and answers "not reachable".
pub const MAX_IMPORT_DEPTH: usize = 100;

/// Maximum nesting of alias expansion, and maximum length of an
/// `Alias -> Alias -> ...` chain that is followed before giving up.
pub const MAX_ALIAS_DEPTH: usize = 32;

/// Weight added once when a completion walk enters a namespace or global
/// scope, so local declarations always sort before namespace members.
pub const NAMESPACE_DEPTH_WEIGHT: u32 = 1000;
