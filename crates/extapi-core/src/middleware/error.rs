//! # extapi Middleware Errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MiddlewareError {
    /// A route template could not be compiled into a matcher
    #[error("Invalid route template '{template}': {message}")]
    InvalidRoute { template: String, message: String },
}
