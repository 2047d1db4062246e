use std::sync::Arc;

use crate::api::{ApiRequest, ApiResponse, Application};
use crate::config::ApiConfig;
use crate::driver::{DriverCatalog, DriverManager};
use crate::extension::{AttributeMap, ExtendReport, ExtensionCatalog, ExtensionManager};
use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::middleware::ExtensionMiddleware;
use crate::service::{ResourceContext, ServicePluginRegistry};

/// Everything the stack is built from
pub struct Bootstrap {
    pub config: ApiConfig,
    /// Directory of the built-in extension modules, searched after the configured ones
    pub builtin_extensions_path: String,
    pub extensions: ExtensionCatalog,
    pub drivers: DriverCatalog,
    pub services: ServicePluginRegistry,
    /// Attributes of the core resources, before extensions extend them
    pub core_attributes: AttributeMap,
}

impl Bootstrap {
    pub fn new(config: ApiConfig, builtin_extensions_path: impl Into<String>) -> Self {
        Self {
            config,
            builtin_extensions_path: builtin_extensions_path.into(),
            extensions: ExtensionCatalog::new(),
            drivers: DriverCatalog::new(),
            services: ServicePluginRegistry::new(),
            core_attributes: AttributeMap::new(),
        }
    }
}

/// The assembled, read-only serving state
pub struct AppState {
    pub context: ResourceContext,
    pub manager: Arc<ExtensionManager>,
    /// Core attributes with every extension's contribution merged in
    pub attributes: Arc<AttributeMap>,
    pub extend_report: ExtendReport,
    pub drivers: Arc<DriverManager>,
    pub middleware: Arc<ExtensionMiddleware>,
}

impl AppState {
    /// Load extensions, merge their attributes, load the VIM drivers and build
    /// the middleware around `application`.
    pub async fn bootstrap(setup: Bootstrap, application: Arc<dyn Application>) -> Result<Self> {
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);
        let Bootstrap {
            config,
            builtin_extensions_path,
            extensions,
            drivers,
            services,
            core_attributes,
        } = setup;

        let manager = Arc::new(
            ExtensionManager::from_config(&config, &builtin_extensions_path, &extensions).await?,
        );
        log::info!("Loaded {} extension(s)", manager.len());

        let mut attributes = core_attributes;
        let extend_report = manager.extend_resources(&config.api_version, &mut attributes);

        let drivers = Arc::new(DriverManager::new(
            constants::VIM_DRIVER_NAMESPACE,
            &config.vim_drivers,
            &drivers,
        )?);

        let context = ResourceContext::new(Arc::new(services), Arc::new(config));
        let middleware = Arc::new(ExtensionMiddleware::new(
            application,
            Arc::clone(&manager),
            &context,
        )?);
        log::debug!("Middleware ready with {} route(s)", middleware.mapper().len());

        Ok(Self {
            context,
            manager,
            attributes: Arc::new(attributes),
            extend_report,
            drivers,
            middleware,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.context.config
    }

    /// Serve one request through the middleware
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        self.middleware.call(request).await
    }
}
