//! Shared error and configuration types used across the pipeline.
//!
//! ## Submodules
//!
//! - [`error`] - Fatal error type and `Result` alias.
//! - [`types`] - Defaults and the geocoding configuration struct.

pub mod error;
pub mod types;

pub use error::{Error, Result};
