//! Aliases, namespace imports and namespace renames during search.

#![allow(clippy::unwrap_used)]

use declchain::semantic::{ContextGraph, DeclarationKind};
use declchain::Identifier;
use rstest::rstest;

use crate::helpers::*;

#[test]
fn test_alias_chain_resolves_to_terminal_declaration() {
    let mut graph = ContextGraph::new();
    let top = file(&mut graph, 1);
    let c = declare(&mut graph, top.context(), "c", 1);
    let b = declare_kind(&mut graph, top.context(), Identifier::new("b"), 2, DeclarationKind::alias(c));
    declare_kind(&mut graph, top.context(), Identifier::new("a"), 3, DeclarationKind::alias(b));

    assert_eq!(find(&graph, top.context(), "a", None), find(&graph, top.context(), "c", None));
    assert_eq!(find(&graph, top.context(), "a", None), vec![c]);
}

#[test]
fn test_self_referential_alias_terminates() {
    init_tracing();
    let mut graph = ContextGraph::new();
    let top = file(&mut graph, 1);
    let me = declare_kind(
        &mut graph,
        top.context(),
        Identifier::new("me"),
        1,
        DeclarationKind::Alias { aliased: None },
    );
    graph.set_aliased_declaration(me, Some(me)).unwrap();

    assert!(find(&graph, top.context(), "me", None).is_empty());
}

#[test]
fn test_namespace_alias_is_not_a_search_result() {
    let mut graph = ContextGraph::new();
    let top = registered_file(&mut graph, 1);
    namespace_alias(&mut graph, top.context(), "F", "N", 1);
    let body = function_body(&mut graph, top.context(), "f", (5, 20));
    namespace_alias(&mut graph, body, "G", "N", 6);

    assert!(find(&graph, body, "G", at(10)).is_empty());
    assert!(find(&graph, body, "F", at(10)).is_empty());
}

/// `library` declares `namespace N { z }`; `user` imports it and runs
/// queries from inside `f` (lines 10..20).
struct UsingFixture {
    graph: ContextGraph,
    user: declchain::TopContextId,
    body: declchain::ContextId,
    z: declchain::DeclId,
}

fn using_fixture() -> UsingFixture {
    let mut graph = ContextGraph::new();
    let library = registered_file(&mut graph, 1);
    let ns = namespace(&mut graph, library.context(), "N", (1, 50));
    let z = declare(&mut graph, ns, "z", 2);

    let user = registered_file(&mut graph, 2);
    graph.add_import(user.context(), library.context(), None).unwrap();
    let body = function_body(&mut graph, user.context(), "f", (10, 20));
    UsingFixture { graph, user, body, z }
}

#[rstest]
#[case::before_query(8, true)]
#[case::after_query(30, false)]
fn test_global_using_directive(#[case] directive_line: u32, #[case] visible: bool) {
    let mut fixture = using_fixture();
    using_namespace(&mut fixture.graph, fixture.user.context(), "N", directive_line);

    let found = find(&fixture.graph, fixture.body, "z", at(15));
    if visible {
        assert_eq!(found, vec![fixture.z]);
    } else {
        assert!(found.is_empty());
    }
}

#[test]
fn test_local_using_directive_respects_position() {
    let mut fixture = using_fixture();
    using_namespace(&mut fixture.graph, fixture.body, "N", 12);

    assert_eq!(find(&fixture.graph, fixture.body, "z", at(15)), vec![fixture.z]);
    assert!(find(&fixture.graph, fixture.body, "z", at(11)).is_empty());
}

#[test]
fn test_namespace_rename_at_top_level() {
    let mut fixture = using_fixture();
    namespace_alias(&mut fixture.graph, fixture.user.context(), "F", "N", 1);

    assert_eq!(find(&fixture.graph, fixture.body, "F::z", at(15)), vec![fixture.z]);
    assert_eq!(find(&fixture.graph, fixture.body, "N::z", at(15)), vec![fixture.z]);
}

#[test]
fn test_namespace_rename_inside_function() {
    let mut fixture = using_fixture();
    namespace_alias(&mut fixture.graph, fixture.body, "F", "N", 11);

    assert_eq!(find(&fixture.graph, fixture.body, "F::z", at(15)), vec![fixture.z]);
}

#[test]
fn test_using_declaration_alias_across_files() {
    let mut fixture = using_fixture();
    let alias = declare_kind(
        &mut fixture.graph,
        fixture.user.context(),
        Identifier::new("zz"),
        3,
        DeclarationKind::alias(fixture.z),
    );

    assert_eq!(find(&fixture.graph, fixture.body, "zz", at(15)), vec![fixture.z]);
    assert_eq!(
        fixture.graph.kind(alias).and_then(DeclarationKind::aliased_declaration),
        Some(fixture.z)
    );
}
