use std::fs;
use std::path::{Path, PathBuf};

use crate::CLIENT_FILES;
use crate::error::BundleError;

/// Create `path` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(path: &Path) -> Result<(), BundleError> {
    fs::create_dir_all(path).map_err(|source| BundleError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy the client modules from `source_root` into `dest`.
pub fn copy_client_files(source_root: &Path, dest: &Path) -> Result<Vec<PathBuf>, BundleError> {
    copy_files(source_root, dest, &CLIENT_FILES)
}

/// Copy `files` one by one, overwriting existing files in `dest`.
///
/// Stops at the first failure; files copied before it are left in place.
pub fn copy_files(
    source_root: &Path,
    dest: &Path,
    files: &[&str],
) -> Result<Vec<PathBuf>, BundleError> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let from = source_root.join(file);
        let to = dest.join(file);
        fs::copy(&from, &to).map_err(|source| BundleError::Copy {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        log::debug!("copied {} -> {}", from.display(), to.display());
        written.push(to);
    }
    Ok(written)
}
