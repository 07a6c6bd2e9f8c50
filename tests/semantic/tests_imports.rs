//! Import edges during declaration search.

#![allow(clippy::unwrap_used)]

use declchain::Position;
use declchain::semantic::{ContextGraph, ContextType};
use rstest::rstest;

use crate::helpers::*;

#[test]
fn test_later_import_is_searched_first() {
    let mut graph = ContextGraph::new();
    let main = file(&mut graph, 1);
    let first = file(&mut graph, 2);
    let second = file(&mut graph, 3);
    let y1 = declare(&mut graph, first.context(), "y", 1);
    let y2 = declare(&mut graph, second.context(), "y", 1);
    let body = scope(&mut graph, main.context(), ContextType::Other, "", (1, 100));
    graph.add_import(body, first.context(), at(2)).unwrap();
    graph.add_import(body, second.context(), at(3)).unwrap();

    assert_eq!(find(&graph, body, "y", at(50)), vec![y2, y1]);
}

#[rstest]
#[case::before_both(1, vec![])]
#[case::after_first(2, vec![0])]
#[case::after_both(3, vec![1, 0])]
fn test_import_position_is_respected(#[case] line: u32, #[case] expected: Vec<usize>) {
    let mut graph = ContextGraph::new();
    let main = file(&mut graph, 1);
    let imported = [file(&mut graph, 2), file(&mut graph, 3)];
    let ys = [
        declare(&mut graph, imported[0].context(), "y", 1),
        declare(&mut graph, imported[1].context(), "y", 1),
    ];
    let body = scope(&mut graph, main.context(), ContextType::Other, "", (1, 100));
    graph.add_import(body, imported[0].context(), at(2)).unwrap();
    graph.add_import(body, imported[1].context(), at(3)).unwrap();

    let expected: Vec<_> = expected.into_iter().map(|i| ys[i]).collect();
    assert_eq!(find(&graph, body, "y", at(line)), expected);
}

#[test]
fn test_local_declaration_wins_over_imports() {
    let mut graph = ContextGraph::new();
    let main = file(&mut graph, 1);
    let other = file(&mut graph, 2);
    declare(&mut graph, other.context(), "y", 1);
    let body = scope(&mut graph, main.context(), ContextType::Other, "", (1, 100));
    let local = declare(&mut graph, body, "y", 5);
    graph.add_import(body, other.context(), None).unwrap();

    assert_eq!(find(&graph, body, "y", at(10)), vec![local]);
}

#[test]
fn test_imported_context_parents_are_not_searched() {
    let mut graph = ContextGraph::new();
    let main = file(&mut graph, 1);
    let other = file(&mut graph, 2);
    declare(&mut graph, other.context(), "hidden", 1);
    let imported = scope(&mut graph, other.context(), ContextType::Other, "", (5, 10));
    let visible = declare(&mut graph, imported, "shown", 6);

    let body = scope(&mut graph, main.context(), ContextType::Other, "", (1, 100));
    graph.add_import(body, imported, None).unwrap();

    assert_eq!(find(&graph, body, "shown", at(50)), vec![visible]);
    assert!(find(&graph, body, "hidden", at(50)).is_empty());
}

#[test]
fn test_same_file_import_keeps_query_position() {
    let mut graph = ContextGraph::new();
    let main = file(&mut graph, 1);
    let helper = scope(&mut graph, main.context(), ContextType::Other, "", (1, 40));
    let early = declare(&mut graph, helper, "h", 2);
    let late = declare(&mut graph, helper, "k", 30);
    let body = scope(&mut graph, main.context(), ContextType::Other, "", (50, 90));
    graph.add_import(body, helper, None).unwrap();

    assert_eq!(find(&graph, body, "h", at(60)), vec![early]);
    assert_eq!(find(&graph, body, "k", at(60)), vec![late]);
    // Queried from before the imported declaration, it is not visible yet.
    assert!(find(&graph, body, "k", Some(Position::new(20, 0))).is_empty());
}

#[test]
fn test_cross_file_namespace_needs_import() {
    init_tracing();
    let mut graph = ContextGraph::new();
    let library = registered_file(&mut graph, 1);
    let library_ns = namespace(&mut graph, library.context(), "N", (1, 50));
    let g = declare(&mut graph, library_ns, "g", 2);

    let user = registered_file(&mut graph, 2);
    let user_ns = namespace(&mut graph, user.context(), "N", (1, 50));
    let body = function_body(&mut graph, user_ns, "f", (10, 20));

    assert!(find(&graph, body, "g", at(15)).is_empty());

    graph
        .add_import(user.context(), library.context(), None)
        .unwrap();
    assert_eq!(find(&graph, body, "g", at(15)), vec![g]);
    assert_eq!(find(&graph, user.context(), "N::g", at(15)), vec![g]);
    assert_eq!(find(&graph, user.context(), "::N::g", at(15)), vec![g]);
}

#[test]
fn test_import_cycle_between_contexts_terminates() {
    let mut graph = ContextGraph::new();
    let main = file(&mut graph, 1);
    let a = scope(&mut graph, main.context(), ContextType::Other, "", (1, 10));
    let b = scope(&mut graph, main.context(), ContextType::Other, "", (11, 20));
    graph.add_import(a, b, None).unwrap();
    graph.add_import(b, a, None).unwrap();

    assert!(find(&graph, a, "missing", None).is_empty());
}
