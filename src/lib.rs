//! Configuration loader for a JVS arcade cabinet emulation layer
//!
//! The cabinet's key bindings, identity and network settings are read once
//! at startup into an immutable [`Config`] held by a [`ConfigStore`].

#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;

pub use config::{Config, ConfigSource, ConfigStore, FileSource, InlineSource};
pub use error::ConfigError;
