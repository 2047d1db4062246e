//! # Built-in extapi extensions
//!
//! Registers the extensions shipped with extapi and the services and drivers
//! they rely on:
//!
//! - `Vnfm` (`vnfds`, `vnfs`) over the `VNFM` service plugin
//! - `Nfvo` (`vims`) over the `NFVO` service plugin
//! - `Monitoring`, which extends `vnfs` and requires `vnfm`
//! - the `openstack` and `kubernetes` VIM drivers
//!
//! The module manifests naming these classes live in [`BUILTIN_EXTENSIONS_PATH`].
pub mod drivers;
pub mod monitoring;
pub mod nfvo;
pub mod vnfm;

use std::sync::Arc;

use extapi_core::driver::DriverCatalog;
use extapi_core::extension::ExtensionCatalog;
use extapi_core::kernel::bootstrap::Bootstrap;
use extapi_core::kernel::constants;
use extapi_core::service::{InMemoryServicePlugin, ServiceError, ServicePluginRegistry};

pub use drivers::{KubernetesDriver, OpenstackDriver};
pub use monitoring::Monitoring;
pub use nfvo::Nfvo;
pub use vnfm::Vnfm;

/// Directory holding the manifests of the built-in extensions
pub const BUILTIN_EXTENSIONS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/extensions");

pub fn register_extensions(catalog: &mut ExtensionCatalog) {
    catalog
        .register("Vnfm", || Box::new(Vnfm::default()))
        .register("Nfvo", || Box::new(Nfvo))
        .register("Monitoring", || Box::new(Monitoring));
}

pub fn register_drivers(catalog: &mut DriverCatalog) {
    catalog
        .register(constants::VIM_DRIVER_NAMESPACE, "openstack", || Box::new(OpenstackDriver))
        .register(constants::VIM_DRIVER_NAMESPACE, "kubernetes", || Box::new(KubernetesDriver));
}

/// In-memory `VNFM` and `NFVO` plugins, plus `CORE` when missing
pub fn register_services(registry: &mut ServicePluginRegistry) -> Result<(), ServiceError> {
    for plugin_type in [constants::VNFM, constants::NFVO] {
        registry.register(Arc::new(InMemoryServicePlugin::new(plugin_type)))?;
    }
    if !registry.contains(constants::CORE) {
        registry.register(Arc::new(InMemoryServicePlugin::new(constants::CORE)))?;
    }
    Ok(())
}

/// Fill every catalog of `setup` with the built-ins
pub fn register_all(setup: &mut Bootstrap) -> Result<(), ServiceError> {
    register_extensions(&mut setup.extensions);
    register_drivers(&mut setup.drivers);
    register_services(&mut setup.services)?;
    log::debug!(
        "Registered built-in extension classes: {:?}",
        setup.extensions.class_names()
    );
    Ok(())
}
