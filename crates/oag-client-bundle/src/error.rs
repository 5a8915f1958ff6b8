use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot find module '{id}' from {}", .base.display())]
    NotFound { id: String, base: PathBuf },

    #[error("invalid package manifest {}: {source}", .path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("package subpath '{subpath}' is not exported by {}", .manifest.display())]
    ExportNotFound { subpath: String, manifest: PathBuf },

    #[error("invalid exports target '{target}' in {}", .manifest.display())]
    InvalidTarget { target: String, manifest: PathBuf },

    #[error("host resolver failed for '{id}': {message}")]
    Host { id: String, message: String },

    #[error("I/O error while resolving {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("'{marker}' segment not found in resolved path {}", .path.display())]
    MarkerNotFound { path: PathBuf, marker: String },

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
