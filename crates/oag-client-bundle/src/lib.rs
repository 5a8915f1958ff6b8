pub mod bundle;
pub mod decision;
pub mod error;
pub mod materialize;
pub mod resolve;
pub mod source_root;

pub use bundle::{BundleOutcome, generate_client};
pub use decision::{client_module_path, client_options_type_name, should_bundle};
pub use error::{BundleError, ResolveError};
pub use resolve::{ModuleResolver, select_resolver};

/// Directory under the output path that receives the bundled client.
pub const CLIENT_DIR: &str = "client";

/// Client modules copied from the package source root, in copy order.
pub const CLIENT_FILES: [&str; 3] = ["index.ts", "types.ts", "utils.ts"];
