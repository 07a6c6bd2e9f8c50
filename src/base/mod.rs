//! Foundation types for the declaration chain.
//!
//! This module provides the primitives every other layer builds on:
//! - [`FileId`], [`FileIdentity`] - Translation unit handles
//! - [`Position`], [`Span`] - Line/column positions and half-open ranges
//! - [`Identifier`], [`QualifiedIdentifier`] - Name segments and scoped names
//! - [`limits`] - Recursion ceilings used by the search algorithms
//!
//! This module has NO dependencies on other declchain modules.

mod file_id;
mod identifier;
pub mod limits;
mod position;

pub use file_id::{FileId, FileIdentity};
pub use identifier::{Identifier, QualifiedIdentifier};
pub use position::{Position, Span};
