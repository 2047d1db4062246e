//! # extapi Configuration Errors
//!
//! [`ConfigError`] covers reading and parsing the API configuration file.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading configuration '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format for '{}'", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Deserialization from '{format}' failed: {message}")]
    Parse { format: String, message: String },
}
