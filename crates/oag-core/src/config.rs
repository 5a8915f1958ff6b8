use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.urmzd.oag.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OagConfig {
    pub output: String,
    /// Generate a standalone client instead of an inline one.
    pub standalone: bool,
    pub client: ClientConfig,
}

impl Default for OagConfig {
    fn default() -> Self {
        Self {
            output: "src/generated".to_string(),
            standalone: true,
            client: ClientConfig::default(),
        }
    }
}

impl OagConfig {
    /// Whether the generator runs in standalone-client mode.
    pub fn is_standalone_client(&self) -> bool {
        self.standalone
    }
}

/// Client generation options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Module identifier of the client package.
    pub name: String,
    /// Copy the client package sources into the output instead of importing it.
    pub bundle: bool,
    pub resolver: ResolverKind,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CLIENT_NAME.to_string(),
            bundle: false,
            resolver: ResolverKind::Auto,
        }
    }
}

/// Which module resolution backend locates the client package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    /// Built-in resolver, falling back to `node` when it fails.
    #[default]
    Auto,
    /// Built-in resolver only.
    Native,
    /// Delegate to the `node` executable on `PATH`.
    Node,
}

impl std::fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResolverKind::Auto => "auto",
            ResolverKind::Native => "native",
            ResolverKind::Node => "node",
        };
        f.write_str(s)
    }
}

/// Default client package.
pub const DEFAULT_CLIENT_NAME: &str = "@oag/client-fetch";

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".urmzd.oag.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OagConfig>, ConfigError> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: OagConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oag configuration — https://github.com/urmzd/openapi-generator
output: src/generated
standalone: true

client:
  name: "@oag/client-fetch"
  bundle: false         # copy the client sources into <output>/client
  resolver: auto        # auto (built-in, then node) | native | node
"#
}
