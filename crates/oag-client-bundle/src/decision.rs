use oag_core::OagConfig;

/// Whether the client package should be copied into the generated output.
///
/// Only standalone clients with `client.bundle` enabled are bundled.
pub fn should_bundle(config: &OagConfig) -> bool {
    config.is_standalone_client() && config.client.bundle
}

/// Module specifier generated code should import the client from.
pub fn client_module_path(config: &OagConfig) -> &str {
    if config.client.bundle {
        "./client"
    } else {
        &config.client.name
    }
}

/// Name of the request options type exported by every client package.
pub fn client_options_type_name() -> &'static str {
    "Options"
}
