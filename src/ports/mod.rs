use crate::domain::callgraph::CallGraph;
use crate::domain::error::GraphResult;
use std::io::Write;

pub mod dot_exporter;

pub use dot_exporter::{DotExporter, DotStyle};

/// Serializes a call graph for an external consumer. Never mutates the graph.
pub trait GraphExporter {
    fn export(&self, graph: &CallGraph, sink: &mut dyn Write) -> GraphResult<()>;
}
