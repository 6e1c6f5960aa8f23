//! Holder for the loaded configuration
//!
//! A `ConfigStore` is built explicitly at startup and handed to whatever
//! needs the settings; there is no global instance. Loading is atomic: the
//! stored record only changes when a whole document has been read and
//! validated, and a successful load replaces the previous record entirely.
//! Consumers that outlive a borrow of the store take an `Arc<Config>`,
//! which stays valid across later reloads.

use std::sync::Arc;
use tracing::{error, info};

use crate::config::settings::Config;
use crate::config::source::ConfigSource;
use crate::error::ConfigError;

#[derive(Debug, Default)]
pub struct ConfigStore {
    current: Option<Arc<Config>>,
}

impl ConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read, validate and install a configuration
    ///
    /// On error the store keeps whatever it held before the call.
    pub fn load(&mut self, source: &impl ConfigSource) -> Result<Arc<Config>, ConfigError> {
        let source_name = source.describe();

        let config = source
            .read()
            .and_then(|contents| Config::from_json(&source_name, &contents))
            .inspect_err(|e| error!(source = %source_name, "Failed to load config: {}", e))?;

        let config = Arc::new(config);
        if self.current.replace(Arc::clone(&config)).is_some() {
            info!(source = %source_name, "Replaced previously loaded config");
        } else {
            info!(
                source = %source_name,
                serial = %config.serial,
                pcb_id = %config.pcb_id,
                "Loaded config"
            );
        }
        Ok(config)
    }

    /// The loaded configuration
    ///
    /// # Panics
    /// Panics if no load has succeeded yet; reading settings before startup
    /// finished loading them is a programming error.
    pub fn get(&self) -> &Config {
        match &self.current {
            Some(config) => config,
            None => panic!("ConfigStore::get called before a configuration was loaded"),
        }
    }

    pub fn try_get(&self) -> Option<&Config> {
        self.current.as_deref()
    }

    /// Shared handle for consumers on other threads
    pub fn shared(&self) -> Option<Arc<Config>> {
        self.current.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }
}
