//! Call depth computation.
//!
//! Call depth between two functions is the minimum total edge weight over
//! all directed paths connecting them. Depths for every ordered pair come
//! from petgraph's Johnson implementation: Bellman-Ford potentials make every
//! edge weight non-negative, then one Dijkstra pass runs per source vertex.

use crate::domain::callgraph::CallGraph;
use crate::domain::handle::VertexHandle;
use petgraph::algo::{johnson, parallel_johnson, NegativeCycle};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

/// Finite edge weights, each node carrying its function's handle.
type WeightGraph = StableDiGraph<VertexHandle, f64>;

/// Depths keyed by `(caller, callee)`.
///
/// Only pairs connected by at least one path are present; a missing entry
/// means "unreachable", never zero. Self pairs are always excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallDepthMap {
    depths: BTreeMap<(VertexHandle, VertexHandle), f64>,
}

impl CallDepthMap {
    pub fn get(&self, caller: VertexHandle, callee: VertexHandle) -> Option<f64> {
        self.depths.get(&(caller, callee)).copied()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// All entries ordered by `(caller, callee)`.
    pub fn iter(&self) -> impl Iterator<Item = ((VertexHandle, VertexHandle), f64)> + '_ {
        self.depths.iter().map(|(&pair, &depth)| (pair, depth))
    }

    /// Entries whose caller is `caller`, ordered by callee.
    pub fn depths_from(&self, caller: VertexHandle) -> impl Iterator<Item = (VertexHandle, f64)> + '_ {
        let lo = (caller, VertexHandle::from_raw(0));
        let hi = (caller, VertexHandle::from_raw(u64::MAX));
        self.depths
            .range(lo..=hi)
            .map(|(&(_, callee), &depth)| (callee, depth))
    }

    /// The deepest callee reachable from `caller`, if any.
    pub fn max_depth_from(&self, caller: VertexHandle) -> Option<(VertexHandle, f64)> {
        self.depths_from(caller)
            .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
    }
}

impl IntoIterator for CallDepthMap {
    type Item = ((VertexHandle, VertexHandle), f64);
    type IntoIter = std::collections::btree_map::IntoIter<(VertexHandle, VertexHandle), f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.depths.into_iter()
    }
}

impl CallGraph {
    /// Compute call depths for all connected pairs, one source at a time.
    pub fn generate_call_depths(&self) -> CallDepthMap {
        self.run_johnson("sequential", |weights| johnson(weights, |e| *e.weight()))
    }

    /// Same result as [`CallGraph::generate_call_depths`], with the
    /// per-source passes spread over `pool`.
    pub fn generate_call_depths_parallel(&self, pool: &rayon::ThreadPool) -> CallDepthMap {
        self.run_johnson("parallel", |weights| {
            pool.install(|| parallel_johnson(weights, |e| *e.weight()))
        })
    }

    fn run_johnson<F, R>(&self, mode: &str, solve: F) -> CallDepthMap
    where
        F: Fn(&WeightGraph) -> Result<R, NegativeCycle>,
        R: IntoIterator<Item = ((NodeIndex, NodeIndex), f64)> + Default,
    {
        let started = Instant::now();
        let mut weights = self.weight_graph();
        let raw = match solve(&weights) {
            Ok(raw) => raw,
            Err(_) => {
                warn!("negative weight cycle in call graph; clamping negative weights to zero");
                weights = weights.map(|_, &handle| handle, |_, &w| w.max(0.0));
                solve(&weights).unwrap_or_default()
            }
        };

        let mut depths = BTreeMap::new();
        for ((from, to), depth) in raw {
            if from == to {
                continue;
            }
            depths.insert((weights[from], weights[to]), saturate(depth));
        }
        let map = CallDepthMap { depths };

        debug!(
            mode,
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            pairs = map.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "computed call depths"
        );
        map
    }

    /// Snapshot of the usable edge weights. NaN and infinite weights never
    /// contribute a path, so those edges are left out.
    fn weight_graph(&self) -> WeightGraph {
        self.inner().filter_map(
            |_, node| Some(node.handle),
            |_, edge| edge.weight.is_finite().then_some(edge.weight),
        )
    }
}

/// A reachable pair whose path sum overflowed keeps its entry, pinned to the
/// largest finite magnitude.
fn saturate(depth: f64) -> f64 {
    if depth.is_finite() {
        depth
    } else if depth < 0.0 {
        f64::MIN
    } else {
        f64::MAX
    }
}
