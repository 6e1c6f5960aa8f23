use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, validating or saving a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration source {source_name} could not be read: {source}")]
    SourceUnavailable {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration source {source_name} is not valid JSON: {source}")]
    Parse {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration source {source_name} has an unexpected layout: {reason}")]
    Layout { source_name: String, reason: String },

    #[error("Field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Required field `{field}` is missing or empty")]
    MissingField { field: &'static str },

    #[error("Field `{field}` has malformed address {value:?}: {reason}")]
    MalformedAddress {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Key binding `{role}` has invalid key code {value}")]
    InvalidKeyBind { role: &'static str, value: String },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write configuration to {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// The configuration field this error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field }
            | Self::MalformedAddress { field, .. }
            | Self::InvalidField { field, .. } => Some(*field),
            Self::InvalidKeyBind { role, .. } => Some(*role),
            _ => None,
        }
    }

    pub(crate) fn malformed(
        field: &'static str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedAddress {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
