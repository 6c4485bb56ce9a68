//! Call depth scenarios over small call graphs: direct calls, parallel call
//! sites, shortcuts, recursion and isolated functions.

use calltree::{CallGraph, EdgeHandle, GraphError, VertexHandle};
use std::collections::HashMap;

/// Helper: graph with one function per name, handles in creation order.
fn functions(names: &[&str]) -> (CallGraph, Vec<VertexHandle>) {
    let mut graph = CallGraph::new();
    let handles = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            graph.add_function_node(*name, format!("{}.c", name), 10 * i as u32, "a.out", vec![])
        })
        .collect();
    (graph, handles)
}

fn call(graph: &mut CallGraph, from: VertexHandle, to: VertexHandle, weight: f64) -> EdgeHandle {
    let e = graph.add_call_edge(from, to, "", vec![]).unwrap();
    graph.set_edge_weights(HashMap::from([(e, weight)]));
    e
}

fn export(graph: &CallGraph) -> Vec<u8> {
    let mut out = Vec::new();
    graph.export_graph(&mut out).unwrap();
    out
}

#[test]
fn single_edge_depth_equals_weight() {
    let (mut graph, v) = functions(&["main", "solve"]);
    call(&mut graph, v[0], v[1], 2.75);

    let depths = graph.generate_call_depths();
    assert_eq!(depths.get(v[0], v[1]), Some(2.75));
    assert_eq!(depths.len(), 1);
}

#[test]
fn unknown_handle_leaves_graph_untouched() {
    let (mut graph, v) = functions(&["main", "solve"]);
    call(&mut graph, v[0], v[1], 1.0);
    let before = export(&graph);

    let never_issued = VertexHandle::from_raw(1000);
    let result = graph.add_call_edge(v[0], never_issued, "bogus", vec![]);
    assert!(matches!(result, Err(GraphError::InvalidHandle { .. })));
    let result = graph.add_call_edge(never_issued, v[1], "bogus", vec![]);
    assert!(matches!(result, Err(GraphError::InvalidHandle { .. })));

    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(export(&graph), before);
}

#[test]
fn parallel_edges_take_the_minimum() {
    let (mut graph, v) = functions(&["main", "solve"]);
    call(&mut graph, v[0], v[1], 5.0);
    call(&mut graph, v[0], v[1], 2.0);

    let depths = graph.generate_call_depths();
    assert_eq!(depths.get(v[0], v[1]), Some(2.0));
}

#[test]
fn triangle_prefers_direct_edge() {
    let (mut graph, v) = functions(&["a", "b", "c"]);
    assert_eq!(v.iter().map(|h| h.raw()).collect::<Vec<_>>(), vec![0, 1, 2]);
    graph.add_call_edge(v[0], v[1], "", vec![]).unwrap();
    graph.add_call_edge(v[1], v[2], "", vec![]).unwrap();
    graph.add_call_edge(v[0], v[2], "", vec![]).unwrap();

    let depths: Vec<((u64, u64), f64)> = graph
        .generate_call_depths()
        .into_iter()
        .map(|((a, b), d)| ((a.raw(), b.raw()), d))
        .collect();
    assert_eq!(depths, vec![((0, 1), 1.0), ((0, 2), 1.0), ((1, 2), 1.0)]);
}

#[test]
fn cycle_terminates_without_self_pairs() {
    let (mut graph, v) = functions(&["a", "b"]);
    graph.add_call_edge(v[0], v[1], "", vec![]).unwrap();
    graph.add_call_edge(v[1], v[0], "", vec![]).unwrap();

    let depths = graph.generate_call_depths();
    assert_eq!(depths.get(v[0], v[1]), Some(1.0));
    assert_eq!(depths.get(v[1], v[0]), Some(1.0));
    assert_eq!(depths.get(v[0], v[0]), None);
    assert_eq!(depths.get(v[1], v[1]), None);
    assert_eq!(depths.len(), 2);
}

#[test]
fn self_recursion_does_not_produce_entries() {
    let (mut graph, v) = functions(&["fib"]);
    graph.add_call_edge(v[0], v[0], "fib.c:4", vec![]).unwrap();
    assert!(graph.generate_call_depths().is_empty());
}

#[test]
fn isolated_function_has_no_depths() {
    let (mut graph, v) = functions(&["a", "b", "c"]);
    graph.add_call_edge(v[0], v[1], "", vec![]).unwrap();
    graph.add_call_edge(v[1], v[2], "", vec![]).unwrap();
    graph.add_call_edge(v[0], v[2], "", vec![]).unwrap();
    let d = graph.add_function_node("d", "d.c", 0, "a.out", vec![]);
    assert_eq!(d.raw(), 3);

    let depths = graph.generate_call_depths();
    assert!(depths.iter().all(|((a, b), _)| a != d && b != d));
    assert_eq!(depths.len(), 3);
}

#[test]
fn weights_only_follow_matching_handles() {
    let (mut graph, v) = functions(&["a", "b", "c"]);
    let ab = graph.add_call_edge(v[0], v[1], "", vec![]).unwrap();
    let bc = graph.add_call_edge(v[1], v[2], "", vec![]).unwrap();

    let mut weights = HashMap::new();
    weights.insert(ab, 4.0);
    weights.insert(EdgeHandle::from_raw(77), 0.5);
    weights.insert(EdgeHandle::from_raw(78), 0.5);
    graph.set_edge_weights(weights);

    assert_eq!(graph.edge_weight(ab), Some(4.0));
    assert_eq!(graph.edge_weight(bc), Some(1.0));
    assert_eq!(graph.generate_call_depths().get(v[0], v[2]), Some(5.0));
}

#[test]
fn weights_can_be_revised_between_runs() {
    let (mut graph, v) = functions(&["a", "b", "c"]);
    call(&mut graph, v[0], v[1], 1.0);
    call(&mut graph, v[1], v[2], 1.0);
    let shortcut = call(&mut graph, v[0], v[2], 3.0);

    assert_eq!(graph.generate_call_depths().get(v[0], v[2]), Some(2.0));
    graph.set_edge_weights([(shortcut, 0.5)]);
    assert_eq!(graph.generate_call_depths().get(v[0], v[2]), Some(0.5));
}
