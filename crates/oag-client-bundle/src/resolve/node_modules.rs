use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::manifest::{InvalidTarget, read_manifest};
use super::{ModuleResolver, REQUIRE_CONDITIONS};
use crate::error::ResolveError;
use crate::source_root::normalize_path;

/// Extensions tried when a specifier names a file without one.
const EXTENSIONS: [&str; 3] = ["js", "json", "node"];

/// Built-in resolver following Node's `node_modules` lookup.
///
/// Like `require.resolve`, the returned path has symlinks resolved.
#[derive(Debug, Clone)]
pub struct NodeModulesResolver {
    base_dir: PathBuf,
}

impl NodeModulesResolver {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: normalize_path(base_dir),
        }
    }

    fn not_found(&self, id: &str) -> ResolveError {
        ResolveError::NotFound {
            id: id.to_string(),
            base: self.base_dir.clone(),
        }
    }

    fn resolve_package(
        &self,
        package_dir: &Path,
        subpath: &str,
        id: &str,
    ) -> Result<PathBuf, ResolveError> {
        let manifest_path = package_dir.join("package.json");
        let manifest = read_manifest(&manifest_path)?.unwrap_or_default();

        if let Some(exports) = &manifest.exports {
            let target = exports
                .resolve(subpath, REQUIRE_CONDITIONS)
                .map_err(|InvalidTarget(target)| ResolveError::InvalidTarget {
                    target,
                    manifest: manifest_path.clone(),
                })?
                .ok_or_else(|| ResolveError::ExportNotFound {
                    subpath: subpath.to_string(),
                    manifest: manifest_path.clone(),
                })?;
            let path = package_dir.join(&target);
            // Exported targets are exact; no extension probing.
            if path.is_file() {
                return real_path(&path);
            }
            return Err(self.not_found(id));
        }

        let resolved = if subpath == "." {
            match &manifest.main {
                Some(main) => match load_as_file_or_directory(&package_dir.join(main))? {
                    Some(path) => Some(path),
                    None => load_index(package_dir),
                },
                None => load_index(package_dir),
            }
        } else {
            load_as_file_or_directory(&package_dir.join(&subpath[2..]))?
        };
        match resolved {
            Some(path) => real_path(&path),
            None => Err(self.not_found(id)),
        }
    }
}

impl ModuleResolver for NodeModulesResolver {
    fn resolve(&self, id: &str) -> Result<PathBuf, ResolveError> {
        if is_path_specifier(id) {
            let target = normalize_path(&self.base_dir.join(id));
            return match load_as_file_or_directory(&target)? {
                Some(path) => real_path(&path),
                None => Err(self.not_found(id)),
            };
        }

        let (package, subpath) = split_specifier(id).ok_or_else(|| self.not_found(id))?;
        for dir in self.base_dir.ancestors() {
            if dir.file_name().is_some_and(|name| name == "node_modules") {
                continue;
            }
            let package_dir = dir.join("node_modules").join(package);
            if package_dir.is_dir() {
                log::debug!("found '{package}' at {}", package_dir.display());
                return self.resolve_package(&package_dir, &subpath, id);
            }
        }
        Err(self.not_found(id))
    }
}

/// Resolve symlinks, as Node does unless `--preserve-symlinks` is set.
fn real_path(path: &Path) -> Result<PathBuf, ResolveError> {
    dunce::canonicalize(path).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_path_specifier(id: &str) -> bool {
    id == "."
        || id == ".."
        || id.starts_with("./")
        || id.starts_with("../")
        || Path::new(id).is_absolute()
}

/// Split a bare specifier into package name and `exports` subpath.
///
/// - `acme-client` → (`acme-client`, `.`)
/// - `@acme/client/utils` → (`@acme/client`, `./utils`)
fn split_specifier(id: &str) -> Option<(&str, String)> {
    let name_len = if id.starts_with('@') {
        let slash = id.find('/')?;
        let rest = &id[slash + 1..];
        if rest.is_empty() {
            return None;
        }
        slash + 1 + rest.find('/').unwrap_or(rest.len())
    } else {
        id.find('/').unwrap_or(id.len())
    };
    if name_len == 0 {
        return None;
    }
    let (package, rest) = id.split_at(name_len);
    let subpath = if rest.is_empty() {
        ".".to_string()
    } else {
        format!(".{rest}")
    };
    Some((package, subpath))
}

fn with_extension_appended(path: &Path, ext: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

fn load_as_file(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    EXTENSIONS
        .iter()
        .map(|ext| with_extension_appended(path, ext))
        .find(|candidate| candidate.is_file())
}

fn load_index(dir: &Path) -> Option<PathBuf> {
    let index = dir.join("index");
    EXTENSIONS
        .iter()
        .map(|ext| with_extension_appended(&index, ext))
        .find(|candidate| candidate.is_file())
}

fn load_as_file_or_directory(path: &Path) -> Result<Option<PathBuf>, ResolveError> {
    if let Some(file) = load_as_file(path) {
        return Ok(Some(file));
    }
    if !path.is_dir() {
        return Ok(None);
    }
    if let Some(manifest) = read_manifest(&path.join("package.json"))? {
        if let Some(main) = manifest.main {
            let main_path = path.join(main);
            if let Some(file) = load_as_file(&main_path).or_else(|| load_index(&main_path)) {
                return Ok(Some(file));
            }
        }
    }
    Ok(load_index(path))
}
