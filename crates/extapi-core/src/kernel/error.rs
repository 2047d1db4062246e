//! # extapi Kernel Errors
//!
//! Defines the top-level error type of the crate.
//!
//! [`Error`] wraps the typed errors of every subsystem (extension loading,
//! middleware construction, service plugins, drivers and configuration) so
//! that startup code can propagate any of them with `?`.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::driver::error::DriverError;
use crate::extension::error::ExtensionError;
use crate::middleware::error::MiddlewareError;
use crate::service::error::ServiceError;

/// Custom error type for the extapi stack
#[derive(Debug, ThisError)]
pub enum Error {
    /// Extension discovery, validation or registration failed
    #[error("Extension error: {0}")]
    Extension(#[from] ExtensionError),

    /// The route table could not be built
    #[error("Middleware error: {0}")]
    Middleware(#[from] MiddlewareError),

    /// Service plugin lookup or resource building failed
    #[error("Service plugin error: {0}")]
    Service(#[from] ServiceError),

    /// Driver loading or invocation failed
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error during operation '{operation}' on path '{}': {source}", path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        operation: String,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Helper to create an I/O error with context
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::Io {
            source,
            operation: operation.into(),
            path,
        }
    }

    /// True when this error is the fatal duplicate-alias condition
    pub fn is_duplicated_extension(&self) -> bool {
        matches!(self, Error::Extension(ExtensionError::DuplicatedExtension { .. }))
    }
}
