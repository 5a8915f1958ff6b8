use std::fs;
use std::io;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ResolveError;

/// The `package.json` fields that take part in resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    pub main: Option<String>,
    pub exports: Option<ExportsField>,
}

/// A node of the `exports` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExportsField {
    Null,
    Target(String),
    Fallbacks(Vec<ExportsField>),
    /// Either subpath keys (`"."`, `"./utils"`) or condition names, in manifest order.
    Map(IndexMap<String, ExportsField>),
}

/// Read `package.json` at `path`. Returns `None` if the file doesn't exist.
pub fn read_manifest(path: &Path) -> Result<Option<PackageManifest>, ResolveError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ResolveError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let manifest = serde_json::from_str(&content).map_err(|source| ResolveError::InvalidManifest {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(manifest))
}

/// A non-relative target in `exports`, which Node rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTarget(pub String);

/// Outcome of matching one `exports` node.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Matched {
    Target(String),
    /// Explicit `null`: the subpath is blocked.
    Null,
    /// No condition applied.
    Unmatched,
}

impl ExportsField {
    /// Resolve `subpath` (`"."` or `"./..."`) against this `exports` field.
    ///
    /// Returns the package-relative target, or `None` when the subpath is not
    /// exported under `conditions` or is blocked with `null`.
    pub fn resolve(
        &self,
        subpath: &str,
        conditions: &[&str],
    ) -> Result<Option<String>, InvalidTarget> {
        let subpaths = match self {
            ExportsField::Map(map) if map.keys().next().is_some_and(|k| k.starts_with('.')) => map,
            // Sugar for `{ ".": <exports> }`
            other => {
                if subpath != "." {
                    return Ok(None);
                }
                return other.resolve_target(conditions, None).map(Matched::into_target);
            }
        };

        if let Some(target) = subpaths.get(subpath) {
            return target
                .resolve_target(conditions, None)
                .map(Matched::into_target);
        }

        // Longest matching `./prefix/*suffix` pattern wins.
        let mut best: Option<(&str, &ExportsField, &str)> = None;
        for (key, target) in subpaths {
            let Some((prefix, suffix)) = key.split_once('*') else {
                continue;
            };
            if subpath.len() < prefix.len() + suffix.len()
                || !subpath.starts_with(prefix)
                || !subpath.ends_with(suffix)
            {
                continue;
            }
            if best.is_some_and(|(p, _, _)| p.len() >= prefix.len()) {
                continue;
            }
            let star = &subpath[prefix.len()..subpath.len() - suffix.len()];
            best = Some((prefix, target, star));
        }
        let Some((_, target, star)) = best else {
            return Ok(None);
        };
        target
            .resolve_target(conditions, Some(star))
            .map(Matched::into_target)
    }

    fn resolve_target(
        &self,
        conditions: &[&str],
        star: Option<&str>,
    ) -> Result<Matched, InvalidTarget> {
        match self {
            ExportsField::Null => Ok(Matched::Null),
            ExportsField::Target(target) => {
                if !target.starts_with("./") {
                    return Err(InvalidTarget(target.clone()));
                }
                Ok(Matched::Target(match star {
                    Some(star) => target.replace('*', star),
                    None => target.clone(),
                }))
            }
            ExportsField::Fallbacks(targets) => {
                // Invalid or null entries fall through to the next one; the
                // last of them decides the outcome if nothing matches.
                let mut last = Ok(if targets.is_empty() {
                    Matched::Null
                } else {
                    Matched::Unmatched
                });
                for target in targets {
                    match target.resolve_target(conditions, star) {
                        Ok(Matched::Target(found)) => return Ok(Matched::Target(found)),
                        Ok(Matched::Unmatched) => {}
                        other => last = other,
                    }
                }
                last
            }
            ExportsField::Map(map) => {
                for (condition, target) in map {
                    if condition != "default" && !conditions.contains(&condition.as_str()) {
                        continue;
                    }
                    match target.resolve_target(conditions, star)? {
                        Matched::Unmatched => continue,
                        matched => return Ok(matched),
                    }
                }
                Ok(Matched::Unmatched)
            }
        }
    }
}

impl Matched {
    fn into_target(self) -> Option<String> {
        match self {
            Matched::Target(target) => Some(target),
            Matched::Null | Matched::Unmatched => None,
        }
    }
}
