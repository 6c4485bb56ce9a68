// Core call graph engine: storage, handles, weights and depths.

pub mod callgraph;
pub mod depth;
pub mod error;
pub mod handle;

pub use callgraph::{CallEdge, CallGraph, FunctionNode, MetricValues, DEFAULT_EDGE_WEIGHT};
pub use depth::CallDepthMap;
pub use error::{GraphError, GraphResult, HandleRole};
pub use handle::{EdgeHandle, Handle, HandleRegistry, VertexHandle};
