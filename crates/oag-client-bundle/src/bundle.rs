use std::path::{Path, PathBuf};

use oag_core::OagConfig;

use crate::CLIENT_DIR;
use crate::decision::should_bundle;
use crate::error::BundleError;
use crate::materialize::{copy_client_files, ensure_dir};
use crate::resolve::ModuleResolver;
use crate::source_root::derive_source_root;

/// Result of a [`generate_client`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutcome {
    /// Bundling is disabled; nothing was touched.
    Skipped,
    Bundled { dir: PathBuf, files: Vec<PathBuf> },
}

/// Copy the client package `module` into `<output>/client`.
///
/// A no-op unless the config asks for a bundled standalone client. Callers
/// must not run two calls against the same `output` concurrently.
pub fn generate_client(
    config: &OagConfig,
    output: &Path,
    module: &str,
    resolver: &dyn ModuleResolver,
) -> Result<BundleOutcome, BundleError> {
    if !should_bundle(config) {
        log::debug!("client bundling disabled, skipping");
        return Ok(BundleOutcome::Skipped);
    }

    let entry = resolver.resolve(module)?;
    log::debug!("resolved '{module}' to {}", entry.display());
    let source_root = derive_source_root(&entry)?;

    let dir = output.join(CLIENT_DIR);
    ensure_dir(&dir)?;
    let files = copy_client_files(&source_root, &dir)?;
    log::info!(
        "bundled {} client files from {} into {}",
        files.len(),
        source_root.display(),
        dir.display()
    );

    Ok(BundleOutcome::Bundled { dir, files })
}
