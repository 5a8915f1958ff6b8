//! Locating a client package's entry file on disk.
//!
//! Resolution is exposed as a single [`ModuleResolver`] capability. Which
//! backend implements it is decided once, by [`select_resolver`], when the
//! process starts.

pub mod manifest;
pub mod node_modules;
pub mod process;

use std::path::{Path, PathBuf};

use oag_core::ResolverKind;

use crate::error::ResolveError;

pub use node_modules::NodeModulesResolver;
pub use process::NodeProcessResolver;

/// Conditions matched against `exports` maps. Resolution always goes through
/// a CommonJS `require`, whatever module system the project itself uses.
pub const REQUIRE_CONDITIONS: &[&str] = &["node", "require", "default"];

/// Resolves a module identifier to the absolute path of its entry file.
pub trait ModuleResolver {
    fn resolve(&self, id: &str) -> Result<PathBuf, ResolveError>;
}

impl<F> ModuleResolver for F
where
    F: Fn(&str) -> Result<PathBuf, ResolveError>,
{
    fn resolve(&self, id: &str) -> Result<PathBuf, ResolveError> {
        self(id)
    }
}

/// Tries `primary`, then `fallback`. If both fail, the primary error is returned.
pub struct FallbackResolver {
    primary: Box<dyn ModuleResolver>,
    fallback: Box<dyn ModuleResolver>,
}

impl FallbackResolver {
    pub fn new(primary: Box<dyn ModuleResolver>, fallback: Box<dyn ModuleResolver>) -> Self {
        Self { primary, fallback }
    }
}

impl ModuleResolver for FallbackResolver {
    fn resolve(&self, id: &str) -> Result<PathBuf, ResolveError> {
        let primary_err = match self.primary.resolve(id) {
            Ok(path) => return Ok(path),
            Err(e) => e,
        };
        log::debug!("built-in resolution of '{id}' failed ({primary_err}), trying fallback");
        self.fallback.resolve(id).map_err(|fallback_err| {
            log::debug!("fallback resolution of '{id}' failed: {fallback_err}");
            primary_err
        })
    }
}

/// Pick the resolver backend for modules imported from `base_dir`.
pub fn select_resolver(kind: ResolverKind, base_dir: &Path) -> Box<dyn ModuleResolver> {
    log::debug!("using {kind} resolver from {}", base_dir.display());
    match kind {
        ResolverKind::Auto => Box::new(FallbackResolver::new(
            Box::new(NodeModulesResolver::new(base_dir)),
            Box::new(NodeProcessResolver::new(base_dir)),
        )),
        ResolverKind::Native => Box::new(NodeModulesResolver::new(base_dir)),
        ResolverKind::Node => Box::new(NodeProcessResolver::new(base_dir)),
    }
}
