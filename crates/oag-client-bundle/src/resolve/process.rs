use std::path::{Path, PathBuf};
use std::process::Command;

use super::ModuleResolver;
use crate::error::ResolveError;
use crate::source_root::normalize_path;

/// Resolves through `require.resolve`, anchored at `argv[1]`.
const RESOLVE_SCRIPT: &str = "const { createRequire } = require('node:module');\
process.stdout.write(createRequire(process.argv[1]).resolve(process.argv[2]));";

/// Resolver that delegates to a Node.js executable.
#[derive(Debug, Clone)]
pub struct NodeProcessResolver {
    node: PathBuf,
    base_dir: PathBuf,
}

impl NodeProcessResolver {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            node: PathBuf::from("node"),
            base_dir: base_dir.to_path_buf(),
        }
    }

    /// Use a specific `node` binary instead of the one on `PATH`.
    pub fn with_node(mut self, node: impl Into<PathBuf>) -> Self {
        self.node = node.into();
        self
    }
}

impl ModuleResolver for NodeProcessResolver {
    fn resolve(&self, id: &str) -> Result<PathBuf, ResolveError> {
        // createRequire only needs a filename inside the directory.
        let anchor = self.base_dir.join("noop.js");
        let output = Command::new(&self.node)
            .arg("-e")
            .arg(RESOLVE_SCRIPT)
            .arg(&anchor)
            .arg(id)
            .current_dir(&self.base_dir)
            .output()
            .map_err(|e| ResolveError::Host {
                id: id.to_string(),
                message: format!("failed to run {}: {e}", self.node.display()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr
                .lines()
                .find(|line| line.starts_with("Error"))
                .unwrap_or_else(|| stderr.trim())
                .to_string();
            return Err(ResolveError::Host {
                id: id.to_string(),
                message,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let resolved = stdout.trim();
        if resolved.is_empty() {
            return Err(ResolveError::Host {
                id: id.to_string(),
                message: "node printed no path".to_string(),
            });
        }
        Ok(normalize_path(Path::new(resolved)))
    }
}
