use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::config::ApiConfig;
use crate::extension::attributes::AttributeMap;
use crate::extension::catalog::ExtensionCatalog;
use crate::extension::controller::ExtensionController;
use crate::extension::error::ExtensionError;
use crate::extension::loader::ExtensionLoader;
use crate::extension::records::{ActionExtension, RequestExtension, ResourceExtension};
use crate::extension::traits::ExtensionDescriptor;
use crate::kernel::constants;
use crate::service::ResourceContext;

static INSTANCE: OnceCell<Arc<ExtensionManager>> = OnceCell::const_new();

/// Outcome of [`ExtensionManager::extend_resources`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendReport {
    /// Aliases whose attributes were merged, in merge order
    pub processed: Vec<String>,
    /// Aliases left out because their requirements were never met
    pub unprocessed: Vec<String>,
}

/// Await `discovery`, failing with `LoadTimeout` once `timeout` elapses
pub(crate) async fn within_load_timeout<F>(timeout: Duration, discovery: F) -> Result<(), ExtensionError>
where
    F: Future<Output = Result<(), ExtensionError>>,
{
    match tokio::time::timeout(timeout, discovery).await {
        Ok(result) => result,
        Err(_) => Err(ExtensionError::LoadTimeout { timeout }),
    }
}

/// Loads extensions from the extensions path and aggregates what they declare
pub struct ExtensionManager {
    path: String,
    extensions: HashMap<String, Arc<dyn ExtensionDescriptor>>,
    /// Aliases in registration order
    load_order: Vec<String>,
}

impl ExtensionManager {
    /// A manager with no extensions for `path`; nothing is read from disk
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extensions: HashMap::new(),
            load_order: Vec::new(),
        }
    }

    /// Discover and register every extension on `path`.
    ///
    /// Fails on a duplicate alias or when discovery exceeds `timeout`.
    pub async fn new(
        path: impl Into<String>,
        catalog: &ExtensionCatalog,
        timeout: Duration,
    ) -> Result<Self, ExtensionError> {
        log::info!("Initializing extension manager.");
        let mut manager = Self::empty(path);
        within_load_timeout(timeout, manager.load_all_extensions(catalog)).await?;
        Ok(manager)
    }

    /// Build a manager for the configured search path plus `builtin`
    pub async fn from_config(
        config: &ApiConfig,
        builtin: &str,
        catalog: &ExtensionCatalog,
    ) -> Result<Self, ExtensionError> {
        Self::new(
            config.extensions_path(builtin),
            catalog,
            config.extension_load_timeout(),
        )
        .await
    }

    /// The process-wide manager, built by the first caller
    pub async fn get_instance(
        config: &ApiConfig,
        builtin: &str,
        catalog: &ExtensionCatalog,
    ) -> Result<Arc<Self>, ExtensionError> {
        INSTANCE
            .get_or_try_init(|| async {
                Self::from_config(config, builtin, catalog).await.map(Arc::new)
            })
            .await
            .map(Arc::clone)
    }

    async fn load_all_extensions(&mut self, catalog: &ExtensionCatalog) -> Result<(), ExtensionError> {
        let loader = ExtensionLoader::new(catalog);
        for module in loader.discover(&self.path).await {
            match loader.load(&module).await {
                Ok(extension) => self.add_extension(Arc::from(extension))?,
                Err(e) => log::warn!(
                    "Extension file {} wasn't loaded due to {}",
                    module.path.display(),
                    e
                ),
            }
        }
        Ok(())
    }

    /// Validate and register an extension.
    ///
    /// An extension failing validation is dropped without error. A valid one
    /// whose alias is taken fails with `DuplicatedExtension`.
    pub fn add_extension(&mut self, extension: Arc<dyn ExtensionDescriptor>) -> Result<(), ExtensionError> {
        if !Self::check_extension(extension.as_ref()) {
            return Ok(());
        }

        let alias = extension.alias().to_string();
        log::info!("Loaded extension: {}", alias);

        if self.extensions.contains_key(&alias) {
            return Err(ExtensionError::DuplicatedExtension { alias });
        }
        self.load_order.push(alias.clone());
        self.extensions.insert(alias, extension);
        Ok(())
    }

    fn check_extension(extension: &dyn ExtensionDescriptor) -> bool {
        log::debug!("Ext name: {}", extension.name());
        log::debug!("Ext alias: {}", extension.alias());
        log::debug!("Ext description: {}", extension.description());
        log::debug!("Ext namespace: {}", extension.namespace());
        log::debug!("Ext updated: {}", extension.updated());
        !extension.name().is_empty() && !extension.alias().is_empty()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn get(&self, alias: &str) -> Option<&Arc<dyn ExtensionDescriptor>> {
        self.extensions.get(alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.extensions.contains_key(alias)
    }

    /// Aliases in registration order
    pub fn aliases(&self) -> &[String] {
        &self.load_order
    }

    /// Extensions in registration order
    pub fn extensions(&self) -> impl Iterator<Item = &Arc<dyn ExtensionDescriptor>> {
        self.load_order
            .iter()
            .filter_map(|alias| self.extensions.get(alias))
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// The built-in `extensions` resource followed by every extension's resources
    pub fn get_resources(self: &Arc<Self>, ctx: &ResourceContext) -> Vec<ResourceExtension> {
        let mut resources = vec![ResourceExtension::new(
            constants::EXTENSIONS_COLLECTION,
            Arc::new(ExtensionController::new(Arc::clone(self))),
        )];
        for extension in self.extensions() {
            resources.extend(extension.resources(ctx));
        }
        resources
    }

    pub fn get_actions(&self) -> Vec<ActionExtension> {
        self.extensions().flat_map(|ext| ext.actions()).collect()
    }

    pub fn get_request_extensions(&self) -> Vec<RequestExtension> {
        self.extensions()
            .flat_map(|ext| ext.request_extensions())
            .collect()
    }

    /// Merge every extension's extended attributes into `attr_map`.
    ///
    /// Extensions are merged only after all the aliases they require. Passes
    /// repeat until everything is merged or a pass merges nothing; what is
    /// left is reported as unprocessed. Afterwards every participating
    /// extension sees the final map through `update_attributes_map`.
    pub fn extend_resources(&self, version: &str, attr_map: &mut AttributeMap) -> ExtendReport {
        let mut update_exts: Vec<&Arc<dyn ExtensionDescriptor>> = Vec::new();
        let mut update_seen: HashSet<&str> = HashSet::new();
        let mut processed: Vec<String> = Vec::new();
        let mut processed_set: HashSet<String> = HashSet::new();
        let mut to_process: Vec<&str> = self.load_order.iter().map(String::as_str).collect();

        while !to_process.is_empty() {
            let processed_count = processed.len();
            let mut remaining = Vec::new();

            for alias in to_process {
                let Some(extension) = self.extensions.get(alias) else {
                    continue;
                };
                if !extension.extends_resources() {
                    continue;
                }
                if update_seen.insert(alias) {
                    update_exts.push(extension);
                }

                let required = extension.required_extensions();
                if required.iter().any(|req| !processed_set.contains(req)) {
                    remaining.push(alias);
                    continue;
                }

                match extension.extended_resources(version) {
                    Ok(extended) => attr_map.merge(extended),
                    Err(e) => log::error!(
                        "Error fetching extended attributes for extension '{}': {}",
                        extension.name(),
                        e
                    ),
                }
                processed_set.insert(alias.to_string());
                processed.push(alias.to_string());
            }

            to_process = remaining;
            if processed.len() == processed_count {
                break;
            }
        }

        let unprocessed: Vec<String> = to_process.iter().map(|a| a.to_string()).collect();
        if !unprocessed.is_empty() {
            log::error!(
                "It was impossible to process the following extensions: {} because of missing requirements.",
                unprocessed.join(",")
            );
        }

        for extension in update_exts {
            extension.update_attributes_map(attr_map);
        }

        ExtendReport {
            processed,
            unprocessed,
        }
    }
}
