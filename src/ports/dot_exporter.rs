//! DOT Exporter
//!
//! Serializes a CallGraph as Graphviz DOT for the external layout tool.
//! Vertices and edges are written in creation order, so an unchanged graph
//! always produces the same bytes.

use crate::domain::callgraph::{CallEdge, CallGraph, FunctionNode};
use crate::domain::error::GraphResult;
use crate::ports::GraphExporter;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Layout defaults written into the DOT header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotStyle {
    pub graph_name: String,
    pub rankdir: String,
    pub font: String,
    pub node_shape: String,
    /// Also emit each edge's call label and metrics as attributes.
    pub rich_edge_labels: bool,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            graph_name: "CallTree".to_string(),
            rankdir: "TB".to_string(),
            font: "Helvetica".to_string(),
            node_shape: "box".to_string(),
            rich_edge_labels: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DotExporter {
    pub style: DotStyle,
}

impl DotExporter {
    pub fn new(style: DotStyle) -> Self {
        Self { style }
    }

    /// Write the DOT description to a file at `path`.
    pub fn export_to_path(&self, graph: &CallGraph, path: impl AsRef<Path>) -> GraphResult<()> {
        let mut file = std::fs::File::create(path)?;
        self.export(graph, &mut file)
    }

    /// Convert a CallGraph to a DOT string.
    pub fn to_dot(&self, graph: &CallGraph) -> String {
        let mut lines = Vec::new();

        lines.push(format!("digraph \"{}\" {{", escape(&self.style.graph_name)));
        lines.push(format!("    {};", attr("rankdir", &self.style.rankdir)));
        lines.push(format!(
            "    node [{}, fontsize=12, {}];",
            attr("fontname", &self.style.font),
            attr("shape", &self.style.node_shape)
        ));
        lines.push(format!("    edge [{}, fontsize=10];", attr("fontname", &self.style.font)));
        lines.push(String::new());

        for node in graph.functions() {
            lines.push(Self::node_line(node));
        }

        lines.push(String::new());

        for edge in graph.call_edges() {
            lines.push(self.edge_line(edge));
        }

        lines.push("}".to_string());

        let mut dot = lines.join("\n");
        dot.push('\n');
        dot
    }

    fn node_line(node: &FunctionNode) -> String {
        let mut attrs = vec![
            attr("label", &node.function_name),
            attr("source_file", &node.source_filename),
            attr("line_number", &node.line_number.to_string()),
            attr("linked_object", &node.linked_object_name),
        ];
        attrs.extend(metric_attrs(&node.metric_values));
        format!("    \"{}\" [{}];", node.handle, attrs.join(", "))
    }

    fn edge_line(&self, edge: &CallEdge) -> String {
        let mut attrs = vec![
            attr("id", &edge.handle.to_string()),
            attr("label", &edge.weight.to_string()),
        ];
        if self.style.rich_edge_labels {
            attrs.push(attr("call_label", &edge.label));
            attrs.extend(metric_attrs(&edge.metric_values));
        }
        format!(
            "    \"{}\" -> \"{}\" [{}];",
            edge.caller,
            edge.callee,
            attrs.join(", ")
        )
    }
}

impl GraphExporter for DotExporter {
    fn export(&self, graph: &CallGraph, sink: &mut dyn Write) -> GraphResult<()> {
        sink.write_all(self.to_dot(graph).as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}

impl CallGraph {
    /// Write the graph as DOT using the default style.
    pub fn export_graph<W: Write>(&self, sink: &mut W) -> GraphResult<()> {
        DotExporter::default().export(self, sink)
    }
}

fn attr(key: &str, value: &str) -> String {
    format!("{}=\"{}\"", key, escape(value))
}

fn metric_attrs(metrics: &[(String, String)]) -> impl Iterator<Item = String> + '_ {
    metrics
        .iter()
        .map(|(name, value)| format!("\"metric:{}\"=\"{}\"", escape(name), escape(value)))
}

fn escape(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
