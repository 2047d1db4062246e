/// Application name
pub const APP_NAME: &str = "extapi";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core API version handed to `extended_resources`
pub const API_VERSION: &str = "1.0";

/// Separator between directories of an extensions path
pub const EXTENSIONS_PATH_SEPARATOR: char = ':';

/// Default bound for extension discovery at startup
pub const DEFAULT_EXTENSION_LOAD_TIMEOUT_SECS: u64 = 30;

/// Collection name of the built-in resource listing loaded extensions
pub const EXTENSIONS_COLLECTION: &str = "extensions";

/// Service name used when resources are built for the core plugin
pub const CORE: &str = "CORE";

/// Service name of the VNF manager plugin
pub const VNFM: &str = "VNFM";

/// Service name of the NFV orchestrator plugin
pub const NFVO: &str = "NFVO";

/// URL prefixes of each known service's resources
pub const COMMON_PREFIXES: &[(&str, &str)] = &[(CORE, ""), (VNFM, ""), (NFVO, "")];

/// Driver namespace of the NFVO VIM drivers
pub const VIM_DRIVER_NAMESPACE: &str = "extapi.nfvo.vim.drivers";

/// Look up the URL prefix registered for a service
pub fn common_prefix(service: &str) -> Option<&'static str> {
    COMMON_PREFIXES
        .iter()
        .find(|(name, _)| *name == service)
        .map(|(_, prefix)| *prefix)
}
