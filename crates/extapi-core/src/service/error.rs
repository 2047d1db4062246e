//! # extapi Service Plugin Errors
//!
//! Errors of the service plugin registry and of the resource helper.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Service plugin '{0}' is not registered")]
    UnknownServicePlugin(String),

    #[error("Service plugin '{0}' is already registered")]
    DuplicatePlugin(String),

    #[error("No singular name registered for collection '{0}'")]
    MissingPluralMapping(String),

    #[error("No common prefix registered for service '{0}'")]
    UnknownPrefix(String),
}
