//! Parsing and validation of `rivet.toml` configuration files.
//!
//! The file is optional; every table and field has a default. The
//! `[simulation]` table converts into a [`rivet_sim::SimConfig`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_optional, CONFIG_FILE};
pub use types::*;
