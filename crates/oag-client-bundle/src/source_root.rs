use std::path::{Component, Path, PathBuf};

use crate::error::BundleError;

/// Directory client packages publish their build output to.
pub const BUILD_DIR: &str = "dist";

/// Directory holding the client package's TypeScript sources.
pub const SOURCE_DIR: &str = "src";

/// Map a resolved entry file (`<pkg>/dist/index.js`) to the package source root (`<pkg>/src`).
pub fn derive_source_root(resolved: &Path) -> Result<PathBuf, BundleError> {
    replace_segment(resolved, BUILD_DIR, SOURCE_DIR)
}

/// Truncate `path` at its last `marker` segment and append `replacement`.
///
/// - (`/pkgs/acme/dist/esm/index.js`, `dist`, `src`) → `/pkgs/acme/src`
/// - (`/dist/app/node_modules/acme/dist/index.js`, `dist`, `src`) → `/dist/app/node_modules/acme/src`
///
/// Fails with [`BundleError::MarkerNotFound`] if no segment equals `marker`.
pub fn replace_segment(
    path: &Path,
    marker: &str,
    replacement: &str,
) -> Result<PathBuf, BundleError> {
    let normalized = normalize_path(path);
    let components: Vec<Component<'_>> = normalized.components().collect();
    let index = components
        .iter()
        .rposition(|c| matches!(c, Component::Normal(name) if *name == marker))
        .ok_or_else(|| BundleError::MarkerNotFound {
            path: path.to_path_buf(),
            marker: marker.to_string(),
        })?;

    let mut root: PathBuf = components[..index].iter().collect();
    root.push(replacement);
    Ok(root)
}

/// Lexically normalize a path: drop `.` segments and fold `..` into its parent.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
