use crate::api::dto::{ProfileDto, WeightsDto};
use crate::domain::callgraph::CallGraph;
use crate::domain::handle::{EdgeHandle, VertexHandle};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A graph built from a profile description, plus the key -> handle maps
/// needed to address its entities later.
#[derive(Debug, Default)]
pub struct LoadedProfile {
    pub graph: CallGraph,
    pub functions: HashMap<String, VertexHandle>,
    pub calls: HashMap<String, EdgeHandle>,
}

pub struct ProfileLoader;

impl ProfileLoader {
    /// Load a JSON profile description from disk.
    pub fn load_path(path: &Path) -> Result<LoadedProfile> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        let profile: ProfileDto = serde_json::from_str(&content)
            .with_context(|| format!("Invalid profile JSON in {}", path.display()))?;
        let loaded = Self::build(profile)?;
        info!(
            path = %path.display(),
            functions = loaded.graph.vertex_count(),
            calls = loaded.graph.edge_count(),
            "loaded profile"
        );
        Ok(loaded)
    }

    /// Feed every discovered function and call site into a fresh graph.
    pub fn build(profile: ProfileDto) -> Result<LoadedProfile> {
        let mut loaded = LoadedProfile::default();

        for f in profile.functions {
            if loaded.functions.contains_key(&f.id) {
                bail!("Duplicate function id '{}'", f.id);
            }
            let handle = loaded
                .graph
                .add_function_node(f.function, f.file, f.line, f.linked_object, f.metrics);
            loaded.functions.insert(f.id, handle);
        }

        for c in profile.calls {
            if loaded.calls.contains_key(&c.id) {
                bail!("Duplicate call id '{}'", c.id);
            }
            let caller = Self::lookup(&loaded.functions, &c.caller, &c.id)?;
            let callee = Self::lookup(&loaded.functions, &c.callee, &c.id)?;
            let handle = loaded
                .graph
                .add_call_edge(caller, callee, c.label, c.metrics)
                .with_context(|| format!("Failed to add call '{}'", c.id))?;
            loaded.calls.insert(c.id, handle);
        }

        Ok(loaded)
    }

    fn lookup(
        functions: &HashMap<String, VertexHandle>,
        key: &str,
        call_id: &str,
    ) -> Result<VertexHandle> {
        match functions.get(key) {
            Some(&handle) => Ok(handle),
            None => bail!("Call '{}' references unknown function '{}'", call_id, key),
        }
    }
}

impl LoadedProfile {
    /// Read a JSON weights file and apply it. Keys that name no call are skipped.
    pub fn apply_weights_path(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read weights {}", path.display()))?;
        let weights: WeightsDto = serde_json::from_str(&content)
            .with_context(|| format!("Invalid weights JSON in {}", path.display()))?;
        self.apply_weights(&weights);
        Ok(())
    }

    pub fn apply_weights(&mut self, weights: &WeightsDto) {
        let by_handle: HashMap<EdgeHandle, f64> = weights
            .iter()
            .filter_map(|(key, &w)| self.calls.get(key).map(|&h| (h, w)))
            .collect();
        debug!(supplied = weights.len(), matched = by_handle.len(), "applying weights");
        self.graph.set_edge_weights(by_handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PROFILE: &str = r#"{
        "functions": [
            { "id": "main", "function": "main", "file": "main.c", "line": 3, "linked_object": "a.out",
              "metrics": [["Exclusive Time", "0.1"]] },
            { "id": "solve", "function": "solve", "file": "solve.c", "line": 20, "linked_object": "a.out" }
        ],
        "calls": [
            { "id": "c1", "caller": "main", "callee": "solve", "label": "main.c:8" }
        ]
    }"#;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_profile_and_weights() {
        let profile = write_temp(PROFILE);
        let mut loaded = ProfileLoader::load_path(profile.path()).unwrap();
        assert_eq!(loaded.graph.vertex_count(), 2);
        assert_eq!(loaded.graph.edge_count(), 1);

        let weights = write_temp(r#"{ "c1": 0.4, "elsewhere": 9.0 }"#);
        loaded.apply_weights_path(weights.path()).unwrap();
        let c1 = loaded.calls["c1"];
        assert_eq!(loaded.graph.edge_weight(c1), Some(0.4));
    }

    #[test]
    fn test_unknown_callee_is_rejected() {
        let json = r#"{
            "functions": [ { "id": "main", "function": "main" } ],
            "calls": [ { "id": "c1", "caller": "main", "callee": "nowhere" } ]
        }"#;
        let profile: ProfileDto = serde_json::from_str(json).unwrap();
        let err = ProfileLoader::build(profile).unwrap_err();
        assert!(err.to_string().contains("unknown function 'nowhere'"));
    }

    #[test]
    fn test_duplicate_function_id_is_rejected() {
        let json = r#"{ "functions": [ { "id": "f", "function": "a" }, { "id": "f", "function": "b" } ] }"#;
        let profile: ProfileDto = serde_json::from_str(json).unwrap();
        assert!(ProfileLoader::build(profile).is_err());
    }
}
