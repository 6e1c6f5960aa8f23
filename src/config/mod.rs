//! Configuration management
//!
//! Loads the cabinet's settings from a JSON document, validates every field,
//! and holds the result for the rest of the process.

pub mod key_bind;
pub mod network;
pub mod settings;
pub mod source;
pub mod store;

pub use key_bind::{InputCode, InputRole, KeyBind};
pub use network::{HostAddress, ServerEndpoint};
pub use settings::Config;
pub use source::{ConfigSource, FileSource, InlineSource, default_config_path};
pub use store::ConfigStore;
