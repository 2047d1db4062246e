//! # extapi Driver Errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    /// Two drivers of one namespace report the same type
    #[error("Driver type '{driver_type}' is already registered")]
    DuplicateType { driver_type: String },

    #[error("Driver type '{0}' is not supported")]
    UnknownType(String),

    #[error("Driver '{driver_type}' does not implement method '{method}'")]
    UnknownMethod { driver_type: String, method: String },

    #[error("Driver '{driver_type}' failed in '{method}': {message}")]
    Invocation {
        driver_type: String,
        method: String,
        message: String,
    },
}
