//! Shared builders for graph tests.

#![allow(dead_code)]


pub use graph_builders::*;
