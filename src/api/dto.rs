use crate::domain::callgraph::CallGraph;
use crate::domain::depth::CallDepthMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Functions and call sites discovered by a profiling traversal.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProfileDto {
    pub functions: Vec<FunctionDto>,
    #[serde(default)]
    pub calls: Vec<CallDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FunctionDto {
    pub id: String,
    pub function: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub linked_object: String,
    #[serde(default)]
    pub metrics: Vec<(String, String)>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallDto {
    pub id: String,
    pub caller: String,
    pub callee: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub metrics: Vec<(String, String)>,
}

/// Externally computed weights keyed by call id.
pub type WeightsDto = BTreeMap<String, f64>;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DepthEntryDto {
    pub caller: u64,
    pub callee: u64,
    pub caller_function: String,
    pub callee_function: String,
    pub depth: f64,
}

impl DepthEntryDto {
    pub fn from_depths(graph: &CallGraph, depths: &CallDepthMap) -> Vec<Self> {
        depths
            .iter()
            .map(|((caller, callee), depth)| DepthEntryDto {
                caller: caller.raw(),
                callee: callee.raw(),
                caller_function: function_name(graph, caller),
                callee_function: function_name(graph, callee),
                depth,
            })
            .collect()
    }
}

fn function_name(graph: &CallGraph, handle: crate::domain::handle::VertexHandle) -> String {
    graph
        .function(handle)
        .map(|f| f.function_name.clone())
        .unwrap_or_default()
}
