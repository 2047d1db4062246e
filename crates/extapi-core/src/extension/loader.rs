//! Discovery of extension modules on the extensions search path.
//!
//! A module is a manifest file (`widgets.toml`, `widgets.json`,
//! `widgets.yaml`) listing the extension classes it exports. The class
//! expected from `widgets.*` is `Widgets`; its constructor comes from the
//! [`ExtensionCatalog`].
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;

use crate::config::ConfigFormat;
use crate::extension::catalog::ExtensionCatalog;
use crate::extension::error::ExtensionError;
use crate::extension::traits::ExtensionDescriptor;
use crate::kernel::constants;

/// Parsed content of a module manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtensionModule {
    /// Class names defined by the module
    #[serde(default)]
    pub exports: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExtensionModule {
    pub fn exports_class(&self, class: &str) -> bool {
        self.exports.iter().any(|name| name == class)
    }
}

/// A module file found on the search path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFile {
    pub path: PathBuf,
    /// File name without its suffix
    pub module_name: String,
    pub format: ConfigFormat,
}

impl ModuleFile {
    /// Classify a directory entry; `None` when it is not an extension module
    pub fn from_path(path: &Path) -> Option<Self> {
        let module_name = path.file_stem()?.to_str()?;
        if module_name.is_empty() || module_name.starts_with('_') {
            return None;
        }
        let format = ConfigFormat::from_path(path)?;
        Some(Self {
            path: path.to_path_buf(),
            module_name: module_name.to_string(),
            format,
        })
    }

    /// The class this module is expected to export
    pub fn class_name(&self) -> String {
        expected_class_name(&self.module_name)
    }
}

/// `widgets` → `Widgets`
pub fn expected_class_name(module_name: &str) -> String {
    let mut chars = module_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split a `:`-delimited search path, dropping empty entries
pub fn split_search_path(path: &str) -> Vec<PathBuf> {
    path.split(constants::EXTENSIONS_PATH_SEPARATOR)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Turns module files into extension instances
pub struct ExtensionLoader<'a> {
    catalog: &'a ExtensionCatalog,
}

impl<'a> ExtensionLoader<'a> {
    pub fn new(catalog: &'a ExtensionCatalog) -> Self {
        Self { catalog }
    }

    /// Module files of every existing directory on `search_path`.
    ///
    /// Directories are visited in path order and entries of each directory in
    /// sorted file-name order, so every process loads the same sequence.
    pub async fn discover(&self, search_path: &str) -> Vec<ModuleFile> {
        let mut modules = Vec::new();
        for dir in split_search_path(search_path) {
            let exists = fs::try_exists(&dir).await.unwrap_or(false);
            if !exists {
                log::error!("Extension path '{}' doesn't exist!", dir.display());
                continue;
            }
            match self.scan_directory(&dir).await {
                Ok(mut found) => modules.append(&mut found),
                Err(e) => log::error!("Failed to scan extension path '{}': {}", dir.display(), e),
            }
        }
        modules
    }

    async fn scan_directory(&self, dir: &Path) -> Result<Vec<ModuleFile>, ExtensionError> {
        let io_err = |source: std::io::Error| ExtensionError::Io {
            path: dir.to_path_buf(),
            operation: "read_dir".to_string(),
            source,
        };
        let mut entries = fs::read_dir(dir).await.map_err(io_err)?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            paths.push(entry.path());
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut modules = Vec::new();
        for path in paths {
            log::debug!("Loading extension file: {}", path.display());
            let is_file = fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(module) = ModuleFile::from_path(&path) {
                modules.push(module);
            }
        }
        Ok(modules)
    }

    /// Read and parse a module manifest
    pub async fn read_module(&self, module: &ModuleFile) -> Result<ExtensionModule, ExtensionError> {
        let content = fs::read_to_string(&module.path)
            .await
            .map_err(|source| ExtensionError::Io {
                path: module.path.clone(),
                operation: "read_module".to_string(),
                source,
            })?;
        module
            .format
            .deserialize(&content)
            .map_err(|message| ExtensionError::ModuleParse {
                path: module.path.clone(),
                message,
            })
    }

    /// Load `module` and instantiate the class it is expected to export
    pub async fn load(
        &self,
        module: &ModuleFile,
    ) -> Result<Box<dyn ExtensionDescriptor>, ExtensionError> {
        let manifest = self.read_module(module).await?;
        let class = module.class_name();
        if !manifest.exports_class(&class) {
            return Err(ExtensionError::ClassNotExported {
                class,
                path: module.path.clone(),
            });
        }
        self.catalog.instantiate(&class)
    }
}
