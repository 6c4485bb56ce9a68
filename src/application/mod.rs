// Use cases wiring the graph engine to its consumers.

use crate::api::dto::DepthEntryDto;
use crate::domain::callgraph::CallGraph;
use crate::domain::depth::CallDepthMap;
use crate::infrastructure::concurrency::build_depth_pool;
use crate::infrastructure::config::DepthConfig;
use crate::ports::GraphExporter;
use anyhow::Result;
use std::io::Write;

pub struct AnalyzeUsecase<'a> {
    pub exporter: &'a dyn GraphExporter,
    pub depth: DepthConfig,
}

impl<'a> AnalyzeUsecase<'a> {
    pub fn export(&self, graph: &CallGraph, sink: &mut dyn Write) -> Result<()> {
        self.exporter.export(graph, sink)?;
        Ok(())
    }

    pub fn depths(&self, graph: &CallGraph) -> Result<CallDepthMap> {
        if self.depth.parallel {
            let pool = build_depth_pool(self.depth.jobs)?;
            Ok(graph.generate_call_depths_parallel(&pool))
        } else {
            Ok(graph.generate_call_depths())
        }
    }

    /// Compute depths and write them as pretty JSON.
    pub fn write_depths(&self, graph: &CallGraph, sink: &mut dyn Write) -> Result<()> {
        let depths = self.depths(graph)?;
        let entries = DepthEntryDto::from_depths(graph, &depths);
        serde_json::to_writer_pretty(&mut *sink, &entries)?;
        writeln!(sink)?;
        Ok(())
    }
}
