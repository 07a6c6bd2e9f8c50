//! The graph shared behind the workspace lock.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::thread;

use declchain::semantic::{ContextType, DeclarationKind};
use declchain::{Identifier, Workspace};

use crate::helpers::*;

#[test]
fn test_concurrent_readers_see_same_answers() {
    init_tracing();
    let workspace = Arc::new(Workspace::new());
    let (user, body, z) = workspace.update(|graph| {
        let library = registered_file(graph, 1);
        let ns = namespace(graph, library.context(), "N", (1, 50));
        let z = declare(graph, ns, "z", 2);
        let user = registered_file(graph, 2);
        graph.add_import(user.context(), library.context(), None).unwrap();
        using_namespace(graph, user.context(), "N", 3);
        let body = function_body(graph, user.context(), "f", (10, 20));
        (user, body, z)
    });

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let workspace = Arc::clone(&workspace);
            thread::spawn(move || {
                let graph = workspace.read();
                (0..50)
                    .map(|_| find(&graph, body, "z", at(15)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for reader in readers {
        for found in reader.join().unwrap() {
            assert_eq!(found, vec![z]);
        }
    }
    assert!(workspace.read().contains_context(user.context()));
}

#[test]
fn test_deleting_file_through_write_guard() {
    let workspace = Workspace::new();
    let (library, user, class_decl, class) = workspace.update(|graph| {
        let library = registered_file(graph, 1);
        let class_decl = declare_kind(
            graph,
            library.context(),
            Identifier::new("C"),
            1,
            DeclarationKind::Ordinary,
        );
        let class = scope(graph, library.context(), ContextType::Class, "C", (1, 10));
        graph.set_internal_context(class_decl, Some(class)).unwrap();
        let user = registered_file(graph, 2);
        graph.add_import(user.context(), library.context(), None).unwrap();
        (library, user, class_decl, class)
    });

    {
        let graph = workspace.read();
        assert_eq!(graph.owner(class), Some(class_decl));
        assert!(graph.imports_top(user, library));
    }

    workspace.update(|graph| graph.delete_context(library.context())).unwrap();

    let graph = workspace.read();
    assert!(!graph.contains_context(class));
    assert!(!graph.contains_declaration(class_decl));
    assert!(graph.imported_parent_contexts(user.context()).is_empty());
    assert!(!graph.imports_top(user, library));
    assert!(find(&graph, user.context(), "C", None).is_empty());
}

#[test]
fn test_deleting_owned_context_clears_internal_context() {
    let workspace = Workspace::new();
    let (decl, class) = workspace.update(|graph| {
        let top = file(graph, 1);
        let decl = declare(graph, top.context(), "C", 1);
        let class = scope(graph, top.context(), ContextType::Class, "C", (1, 10));
        graph.set_internal_context(decl, Some(class)).unwrap();
        (decl, class)
    });

    workspace.update(|graph| graph.delete_context(class)).unwrap();

    let graph = workspace.read();
    assert!(graph.contains_declaration(decl));
    assert_eq!(graph.internal_context(decl), None);
}
