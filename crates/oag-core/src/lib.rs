pub mod config;
pub mod error;

pub use config::{ClientConfig, OagConfig, ResolverKind};
pub use error::ConfigError;
