//! # extapi Kernel
//!
//! Process-level plumbing shared by every other module:
//!
//! - **Bootstrapping**: [`AppState`](bootstrap::AppState) builds the extension
//!   manager, merges the attribute map and constructs the middleware once, then
//!   hands the read-only result to the request-serving side.
//! - **Constants**: names, versions, built-in prefixes and defaults in the
//!   `constants` submodule.
//! - **Error Handling**: the top-level [`Error`](error::Error) and its
//!   `Result` alias.
pub mod bootstrap;
pub mod constants;
pub mod error;

pub use bootstrap::AppState;
pub use error::{Error, Result};
