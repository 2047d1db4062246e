//! # extapi Extension Errors
//!
//! Errors raised while discovering, validating and registering extensions.
//!
//! Only [`ExtensionError::DuplicatedExtension`] and
//! [`ExtensionError::LoadTimeout`] escape the manager constructor; the other
//! variants describe a single module and are logged before the module is
//! skipped.
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtensionError {
    /// Two valid extensions share one alias
    #[error("Found duplicate extension: {alias}")]
    DuplicatedExtension { alias: String },

    /// Discovery did not finish within the configured bound
    #[error("Extension loading timed out after {}s", timeout.as_secs())]
    LoadTimeout { timeout: Duration },

    #[error("I/O error during operation '{operation}' on path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// The module manifest could not be parsed
    #[error("Failed to parse extension module '{}': {message}", path.display())]
    ModuleParse { path: PathBuf, message: String },

    /// The module does not export the class its file name implies
    #[error("Did not find expected name \"{class}\" in {}", path.display())]
    ClassNotExported { class: String, path: PathBuf },

    /// The class is exported but no constructor is registered for it
    #[error("Extension class '{class}' is not registered in the catalog")]
    ClassNotRegistered { class: String },

    /// An extension could not produce its extended attributes
    #[error("Extension '{alias}' failed to provide extended resources: {message}")]
    ExtendedResources { alias: String, message: String },
}
