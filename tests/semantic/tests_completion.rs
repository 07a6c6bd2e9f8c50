//! Listing every visible declaration with its ranking depth.

#![allow(clippy::unwrap_used)]

use declchain::base::limits::NAMESPACE_DEPTH_WEIGHT;
use declchain::semantic::ContextGraph;

use crate::helpers::*;

#[test]
fn test_locals_rank_before_global_scope() {
    let mut graph = ContextGraph::new();
    let top = file(&mut graph, 1);
    let g = declare(&mut graph, top.context(), "g", 1);
    let body = function_body(&mut graph, top.context(), "f", (5, 20));
    let x = declare(&mut graph, body, "x", 6);
    declare(&mut graph, body, "later", 12);

    let listed = graph.all_declarations(body, at(10), true);
    assert_eq!(listed, vec![(x, 0), (g, 1 + NAMESPACE_DEPTH_WEIGHT)]);
}

#[test]
fn test_namespace_weight_added_once() {
    let mut graph = ContextGraph::new();
    let top = file(&mut graph, 1);
    let g = declare(&mut graph, top.context(), "g", 1);
    let ns = namespace(&mut graph, top.context(), "N", (2, 50));
    let n = declare(&mut graph, ns, "n", 3);
    let body = function_body(&mut graph, ns, "f", (5, 20));

    let listed = graph.all_declarations(body, at(10), true);
    assert_eq!(
        listed,
        vec![(n, 1 + NAMESPACE_DEPTH_WEIGHT), (g, 2 + NAMESPACE_DEPTH_WEIGHT)]
    );
}

#[test]
fn test_without_parents_lists_own_scope() {
    let mut graph = ContextGraph::new();
    let top = file(&mut graph, 1);
    declare(&mut graph, top.context(), "g", 1);
    let body = function_body(&mut graph, top.context(), "f", (5, 20));
    let x = declare(&mut graph, body, "x", 6);

    assert_eq!(graph.all_declarations(body, None, false), vec![(x, 0)]);
}

#[test]
fn test_imports_listed_after_their_position() {
    let mut graph = ContextGraph::new();
    let library = file(&mut graph, 1);
    let late = declare(&mut graph, library.context(), "late", 900);
    let user = file(&mut graph, 2);
    graph.add_import(user.context(), library.context(), at(3)).unwrap();

    // Everything in an imported file is visible, whatever its position.
    let listed = graph.all_declarations(user.context(), at(10), false);
    assert_eq!(listed, vec![(late, 1 + NAMESPACE_DEPTH_WEIGHT)]);

    assert!(graph.all_declarations(user.context(), at(2), false).is_empty());
}

#[test]
fn test_shared_import_listed_once() {
    let mut graph = ContextGraph::new();
    let base = file(&mut graph, 1);
    let shared = declare(&mut graph, base.context(), "shared", 1);
    let left = file(&mut graph, 2);
    let right = file(&mut graph, 3);
    let user = file(&mut graph, 4);
    graph.add_import(left.context(), base.context(), None).unwrap();
    graph.add_import(right.context(), base.context(), None).unwrap();
    graph.add_import(user.context(), left.context(), None).unwrap();
    graph.add_import(user.context(), right.context(), None).unwrap();

    let listed = graph.all_declarations(user.context(), None, false);
    let hits = listed.iter().filter(|(decl, _)| *decl == shared).count();
    assert_eq!(hits, 1);
}
