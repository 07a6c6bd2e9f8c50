//! Transitive imports between top contexts and the reachability cache.

#![allow(clippy::unwrap_used)]

use declchain::semantic::{ContextGraph, GraphConfig, ImportTraceItem};
use rstest::rstest;

use crate::helpers::*;

#[test]
fn test_transitive_import_and_trace() {
    let mut graph = ContextGraph::new();
    let a = file(&mut graph, 1);
    let b = file(&mut graph, 2);
    let c = file(&mut graph, 3);
    graph.add_import(a.context(), b.context(), at(1)).unwrap();
    graph.add_import(b.context(), c.context(), at(4)).unwrap();

    assert!(graph.imports_top(a, c));
    assert!(!graph.imports_top(c, a));
    assert_eq!(graph.cached_import_hop(a, c), Some(Some(b)));
    assert_eq!(
        graph.import_trace(a, c),
        vec![
            ImportTraceItem {
                context: a,
                position: at(1),
            },
            ImportTraceItem {
                context: b,
                position: at(4),
            },
        ]
    );
    assert!(graph.import_trace(c, a).is_empty());
}

#[test]
fn test_removing_import_invalidates_cached_answer() {
    let mut graph = ContextGraph::new();
    let a = file(&mut graph, 1);
    let b = file(&mut graph, 2);
    let c = file(&mut graph, 3);
    graph.add_import(a.context(), b.context(), None).unwrap();
    graph.add_import(b.context(), c.context(), None).unwrap();
    assert!(graph.imports_top(a, c));

    graph.remove_import(a.context(), b.context()).unwrap();
    assert_eq!(graph.cached_import_hop(a, c), None);
    assert!(!graph.imports_top(a, c));
    assert_eq!(graph.cached_import_hop(a, c), Some(None));
}

#[test]
fn test_new_import_deep_in_chain_invalidates_importers() {
    let mut graph = ContextGraph::new();
    let a = file(&mut graph, 1);
    let b = file(&mut graph, 2);
    let c = file(&mut graph, 3);
    let d = file(&mut graph, 4);
    graph.add_import(a.context(), b.context(), None).unwrap();
    graph.add_import(b.context(), c.context(), None).unwrap();
    assert!(!graph.imports_top(a, d));
    assert_eq!(graph.cached_import_hop(a, d), Some(None));

    graph.add_import(c.context(), d.context(), None).unwrap();
    assert_eq!(graph.cached_import_hop(a, d), None);
    assert!(graph.imports_top(a, d));
}

#[test]
fn test_import_cycle_terminates_deterministically() {
    init_tracing();
    let mut graph = ContextGraph::new();
    let a = file(&mut graph, 1);
    let b = file(&mut graph, 2);
    let isolated = file(&mut graph, 3);
    graph.add_import(a.context(), b.context(), None).unwrap();
    graph.add_import(b.context(), a.context(), None).unwrap();

    assert!(graph.imports_top(a, a));
    assert!(graph.imports_top(b, a));
    for _ in 0..3 {
        assert!(!graph.imports_top(a, isolated));
    }
}

#[test]
fn test_negative_answer_inside_cycle_is_not_cached() {
    let mut graph = ContextGraph::new();
    let a = file(&mut graph, 1);
    let b = file(&mut graph, 2);
    let target = file(&mut graph, 3);
    graph.add_import(a.context(), b.context(), None).unwrap();
    graph.add_import(b.context(), a.context(), None).unwrap();

    assert!(!graph.imports_top(a, target));
    // b's walk skipped a while a was still being searched, so neither
    // answer is final.
    assert_eq!(graph.cached_import_hop(b, target), None);
    assert_eq!(graph.cached_import_hop(a, target), None);

    graph.add_import(b.context(), target.context(), None).unwrap();
    assert!(graph.imports_top(a, target));
}

#[rstest]
#[case::within_limit(10, true)]
#[case::too_deep(2, false)]
fn test_depth_ceiling(#[case] max_import_depth: usize, #[case] reachable: bool) {
    let mut graph = ContextGraph::with_config(GraphConfig {
        max_import_depth,
        ..GraphConfig::default()
    });
    let chain: Vec<_> = (0..5).map(|id| file(&mut graph, id)).collect();
    for pair in chain.windows(2) {
        graph
            .add_import(pair[0].context(), pair[1].context(), None)
            .unwrap();
    }

    assert_eq!(graph.imports_top(chain[0], chain[4]), reachable);
}

#[test]
fn test_generic_imports_between_inner_contexts() {
    let mut graph = ContextGraph::new();
    let top = file(&mut graph, 1);
    let a = scope(&mut graph, top.context(), declchain::ContextType::Other, "", (1, 10));
    let b = scope(&mut graph, top.context(), declchain::ContextType::Other, "", (11, 20));
    let c = scope(&mut graph, top.context(), declchain::ContextType::Other, "", (21, 30));
    graph.add_import(a, b, None).unwrap();
    graph.add_import(b, c, None).unwrap();

    assert!(graph.imports(a, c));
    assert!(graph.imports(a, a));
    assert!(!graph.imports(c, a));
}

#[test]
fn test_deleting_imported_top_purges_cache() {
    let mut graph = ContextGraph::new();
    let a = file(&mut graph, 1);
    let b = file(&mut graph, 2);
    graph.add_import(a.context(), b.context(), None).unwrap();
    assert!(graph.imports_top(a, b));

    graph.delete_context(b.context()).unwrap();
    assert!(graph.imported_parent_contexts(a.context()).is_empty());
    assert_eq!(graph.cached_import_hop(a, b), None);
    assert!(!graph.imports_top(a, b));
}
