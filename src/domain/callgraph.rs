// Call graph store for profiling views.
// Functions and call sites live in a petgraph StableGraph; callers only ever
// see stable handles, resolved through registries to graph indices.

use crate::domain::error::{GraphError, GraphResult, HandleRole};
use crate::domain::handle::{EdgeHandle, HandleRegistry, VertexHandle};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use tracing::{debug, warn};

/// Default weight of a freshly created call edge.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Ordered `(name, value)` metric annotations, kept verbatim.
pub type MetricValues = Vec<(String, String)>;

/// A function discovered while walking the profiling data.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub handle: VertexHandle,
    pub function_name: String,
    pub source_filename: String,
    pub line_number: u32,
    pub linked_object_name: String, // binary or shared library
    pub metric_values: MetricValues,
}

/// A directed caller -> callee relation observed at one call site.
#[derive(Debug, Clone, PartialEq)]
pub struct CallEdge {
    pub handle: EdgeHandle,
    pub caller: VertexHandle,
    pub callee: VertexHandle,
    pub weight: f64,
    pub label: String,
    pub metric_values: MetricValues,
}

/// The call graph itself.
///
/// Cycles and parallel edges are allowed. Entities are never removed; a view
/// that needs a different graph builds a fresh instance.
#[derive(Debug, Default)]
pub struct CallGraph {
    graph: StableDiGraph<FunctionNode, CallEdge>,
    vertex_handles: HandleRegistry<VertexHandle, NodeIndex>,
    edge_handles: HandleRegistry<EdgeHandle, EdgeIndex>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function vertex. Always succeeds.
    pub fn add_function_node(
        &mut self,
        function_name: impl Into<String>,
        source_filename: impl Into<String>,
        line_number: u32,
        linked_object_name: impl Into<String>,
        metric_values: MetricValues,
    ) -> VertexHandle {
        let graph = &mut self.graph;
        let handle = self.vertex_handles.issue_with(|handle| {
            graph.add_node(FunctionNode {
                handle,
                function_name: function_name.into(),
                source_filename: source_filename.into(),
                line_number,
                linked_object_name: linked_object_name.into(),
                metric_values,
            })
        });
        debug!(%handle, "added function node");
        handle
    }

    /// Add a call edge with the default weight.
    ///
    /// Both endpoints are validated before anything is touched, so a failed
    /// call leaves the graph exactly as it was.
    pub fn add_call_edge(
        &mut self,
        caller: VertexHandle,
        callee: VertexHandle,
        label: impl Into<String>,
        metric_values: MetricValues,
    ) -> GraphResult<EdgeHandle> {
        let from = self.vertex_handles.resolve(caller).ok_or_else(|| {
            warn!(%caller, "rejected call edge from unknown caller");
            GraphError::InvalidHandle {
                role: HandleRole::Caller,
                handle: caller,
            }
        })?;
        let to = self.vertex_handles.resolve(callee).ok_or_else(|| {
            warn!(%callee, "rejected call edge to unknown callee");
            GraphError::InvalidHandle {
                role: HandleRole::Callee,
                handle: callee,
            }
        })?;

        let graph = &mut self.graph;
        let handle = self.edge_handles.issue_with(|handle| {
            graph.add_edge(
                from,
                to,
                CallEdge {
                    handle,
                    caller,
                    callee,
                    weight: DEFAULT_EDGE_WEIGHT,
                    label: label.into(),
                    metric_values,
                },
            )
        });
        debug!(%handle, %caller, %callee, "added call edge");
        Ok(handle)
    }

    /// Overwrite the weight of every edge whose handle appears in `weights`.
    ///
    /// Edges missing from the input keep their weight; handles that belong to
    /// no edge of this graph are skipped.
    pub fn set_edge_weights<I>(&mut self, weights: I)
    where
        I: IntoIterator<Item = (EdgeHandle, f64)>,
    {
        let mut applied = 0usize;
        let mut ignored = 0usize;
        for (handle, weight) in weights {
            let edge = self
                .edge_handles
                .resolve(handle)
                .and_then(|index| self.graph.edge_weight_mut(index));
            match edge {
                Some(edge) => {
                    edge.weight = weight;
                    applied += 1;
                }
                None => ignored += 1,
            }
        }
        debug!(applied, ignored, "updated edge weights");
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_vertex(&self, handle: VertexHandle) -> bool {
        self.vertex_handles.contains(handle)
    }

    pub fn contains_edge(&self, handle: EdgeHandle) -> bool {
        self.edge_handles.contains(handle)
    }

    pub fn function(&self, handle: VertexHandle) -> Option<&FunctionNode> {
        self.vertex_handles
            .resolve(handle)
            .and_then(|index| self.graph.node_weight(index))
    }

    pub fn call_edge(&self, handle: EdgeHandle) -> Option<&CallEdge> {
        self.edge_handles
            .resolve(handle)
            .and_then(|index| self.graph.edge_weight(index))
    }

    pub fn edge_weight(&self, handle: EdgeHandle) -> Option<f64> {
        self.call_edge(handle).map(|e| e.weight)
    }

    /// Functions in creation order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionNode> {
        self.graph.node_indices().map(move |index| &self.graph[index])
    }

    /// Call edges in creation order.
    pub fn call_edges(&self) -> impl Iterator<Item = &CallEdge> {
        self.graph.edge_indices().map(move |index| &self.graph[index])
    }

    /// Outgoing edges of `caller` in creation order. Empty for unknown handles.
    pub fn callees_of(&self, caller: VertexHandle) -> impl Iterator<Item = &CallEdge> {
        let mut out: Vec<&CallEdge> = match self.vertex_handles.resolve(caller) {
            Some(index) => self.graph.edges(index).map(|e| e.weight()).collect(),
            None => Vec::new(),
        };
        // petgraph walks adjacency lists newest-first
        out.sort_by_key(|e| e.handle);
        out.into_iter()
    }

    /// The underlying graph, for the algorithms in this crate.
    pub(crate) fn inner(&self) -> &StableDiGraph<FunctionNode, CallEdge> {
        &self.graph
    }
}
