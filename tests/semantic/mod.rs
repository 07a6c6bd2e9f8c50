//! Semantic layer tests
//!
//! Scenarios built the way an indexer would build them:
//! - Shadowing and position visibility
//! - Imports, reachability and its cache
//! - Aliases and namespace aliases
//! - Context search, completion listing
//! - Teardown and concurrent access through the workspace lock

pub mod tests_aliases;
pub mod tests_completion;
pub mod tests_contexts;
pub mod tests_imports;
pub mod tests_reachability;
pub mod tests_workspace;
