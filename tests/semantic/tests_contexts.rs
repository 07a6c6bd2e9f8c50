//! Searching for namespace and class contexts by name.

#![allow(clippy::unwrap_used)]

use declchain::semantic::{ContextGraph, ContextType, SearchFlags};

use crate::helpers::*;

#[test]
fn test_enclosing_class_found_by_qualified_name() {
    let mut graph = ContextGraph::new();
    let top = file(&mut graph, 1);
    let ns = namespace(&mut graph, top.context(), "N", (1, 50));
    let class = scope(&mut graph, ns, ContextType::Class, "C", (2, 40));
    let method = function_body(&mut graph, class, "m", (5, 10));

    let found = graph.find_contexts(method, ContextType::Class, &qid("N::C"), at(6), SearchFlags::empty());
    assert_eq!(found, vec![class]);

    let wrong_type = graph.find_contexts(method, ContextType::Namespace, &qid("N::C"), at(6), SearchFlags::empty());
    assert!(wrong_type.is_empty());
}

#[test]
fn test_class_in_other_file_requires_import() {
    let mut graph = ContextGraph::new();
    let library = registered_file(&mut graph, 1);
    let ns = namespace(&mut graph, library.context(), "N", (1, 50));
    let class = scope(&mut graph, ns, ContextType::Class, "C", (2, 10));
    let user = registered_file(&mut graph, 2);

    let search = |graph: &ContextGraph| {
        graph.find_contexts(user.context(), ContextType::Class, &qid("N::C"), at(5), SearchFlags::empty())
    };
    assert!(search(&graph).is_empty());

    graph.add_import(user.context(), library.context(), None).unwrap();
    assert_eq!(search(&graph), vec![class]);
}

#[test]
fn test_namespace_later_in_same_file_not_visible() {
    let mut graph = ContextGraph::new();
    let library = registered_file(&mut graph, 1);
    let imported = namespace(&mut graph, library.context(), "N", (1, 50));
    let user = registered_file(&mut graph, 2);
    graph.add_import(user.context(), library.context(), None).unwrap();
    let later = namespace(&mut graph, user.context(), "N", (200, 300));

    let found = graph.find_contexts(user.context(), ContextType::Namespace, &qid("N"), at(100), SearchFlags::empty());
    assert_eq!(found, vec![imported]);

    let found = graph.find_contexts(user.context(), ContextType::Namespace, &qid("N"), at(250), SearchFlags::empty());
    assert_eq!(found.len(), 2);
    assert!(found.contains(&imported) && found.contains(&later));
}

#[test]
fn test_nested_class_visible_before_its_position() {
    let mut graph = ContextGraph::new();
    let top = registered_file(&mut graph, 1);
    let outer = scope(&mut graph, top.context(), ContextType::Class, "C", (1, 50));
    let inner = scope(&mut graph, outer, ContextType::Class, "D", (20, 30));

    let found = graph.find_contexts(top.context(), ContextType::Class, &qid("C::D"), at(5), SearchFlags::empty());
    assert_eq!(found, vec![inner]);
}

#[test]
fn test_namespace_found_through_rename() {
    let mut graph = ContextGraph::new();
    let library = registered_file(&mut graph, 1);
    let ns = namespace(&mut graph, library.context(), "N", (1, 50));
    let user = registered_file(&mut graph, 2);
    graph.add_import(user.context(), library.context(), None).unwrap();
    namespace_alias(&mut graph, user.context(), "F", "N", 1);

    let found = graph.find_contexts(user.context(), ContextType::Namespace, &qid("F"), at(5), SearchFlags::empty());
    assert_eq!(found, vec![ns]);
}

/// `imported` (lines 10..20) renames `N` as `F` on line 15 and imports the
/// namespace `N` (lines 30..40).
fn renaming_scope(graph: &mut ContextGraph, top: declchain::ContextId) -> (declchain::ContextId, declchain::ContextId) {
    let imported = scope(graph, top, ContextType::Other, "", (10, 20));
    let ns = namespace(graph, top, "N", (30, 40));
    namespace_alias(graph, imported, "F", "N", 15);
    graph.add_import(imported, ns, None).unwrap();
    (imported, ns)
}

#[test]
fn test_same_file_import_keeps_query_position() {
    let mut graph = ContextGraph::new();
    let top = file(&mut graph, 1);
    let caller = function_body(&mut graph, top.context(), "f", (1, 9));
    let (imported, ns) = renaming_scope(&mut graph, top.context());
    graph.add_import(caller, imported, None).unwrap();

    let early = graph.find_contexts(caller, ContextType::Namespace, &qid("F"), at(5), SearchFlags::empty());
    assert!(early.is_empty());

    let anywhere = graph.find_contexts(caller, ContextType::Namespace, &qid("F"), None, SearchFlags::empty());
    assert_eq!(anywhere, vec![ns]);
}

#[test]
fn test_cross_file_import_searched_as_of_its_end() {
    let mut graph = ContextGraph::new();
    let library = file(&mut graph, 1);
    let (imported, ns) = renaming_scope(&mut graph, library.context());
    let user = file(&mut graph, 2);
    let caller = function_body(&mut graph, user.context(), "f", (1, 9));
    graph.add_import(caller, imported, None).unwrap();

    // Line 5 of the user's file says nothing about the library's line 15.
    let found = graph.find_contexts(caller, ContextType::Namespace, &qid("F"), at(5), SearchFlags::empty());
    assert_eq!(found, vec![ns]);
}
