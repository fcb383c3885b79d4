//! `package.json` dependency sorting.

use std::path::Path;

use serde_json::{Map, Value};

use trellis_core::{
    application::{ApplicationError, ports::DependencySorter},
    error::TrellisResult,
};

/// Keys whose object values are sorted.
pub const DEPENDENCY_KEYS: [&str; 2] = ["dependencies", "devDependencies"];

/// Sorts dependency maps by key; every other key keeps its position.
///
/// Output is two-space pretty JSON with a trailing newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDependencySorter;

impl JsonDependencySorter {
    pub fn new() -> Self {
        Self
    }
}

impl DependencySorter for JsonDependencySorter {
    fn sort(&self, path: &Path, manifest: &str) -> TrellisResult<String> {
        let invalid = |e: serde_json::Error| ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {e}"),
        };
        let mut root: Value = serde_json::from_str(manifest).map_err(invalid)?;

        if let Value::Object(object) = &mut root {
            for key in DEPENDENCY_KEYS {
                if let Some(Value::Object(deps)) = object.get_mut(key) {
                    let mut entries: Vec<(String, Value)> =
                        std::mem::take(deps).into_iter().collect();
                    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
                    *deps = entries.into_iter().collect::<Map<_, _>>();
                }
            }
        }

        let mut out = serde_json::to_string_pretty(&root).map_err(invalid)?;
        out.push('\n');
        Ok(out)
    }
}
