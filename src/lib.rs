// Main library entry point for calltree.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{
    CallDepthMap, CallEdge, CallGraph, EdgeHandle, FunctionNode, GraphError, GraphResult,
    HandleRole, VertexHandle,
};
pub use ports::{DotExporter, DotStyle, GraphExporter};
