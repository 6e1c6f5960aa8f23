//! The cabinet configuration record
//!
//! `Config` is only ever built through [`RawConfig`], which mirrors the
//! on-disk document with every field optional. The conversion checks
//! each field on its own and reports the first failure. Consistency between
//! fields (e.g. gateway inside the local subnet) is not checked.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::key_bind::{KeyBind, RawKeyBind};
use crate::config::network::{parse_ipv4, parse_subnet_mask, HostAddress, ServerEndpoint};
use crate::constants::defaults::{display, template};
use crate::error::ConfigError;

/// On-disk form of [`Config`]
///
/// Field names are snake_case; PascalCase spellings (`SubnetMask`,
/// `PrimaryDNS`, ...) are accepted as aliases. Values are kept as raw JSON
/// so that a value of the wrong type is reported against its field.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawConfig {
    #[serde(default, alias = "KeyBind")]
    key_bind: Option<Value>,
    #[serde(default, alias = "Windowed")]
    windowed: Option<Value>,
    #[serde(default, alias = "UseDirectInput")]
    use_direct_input: Option<Value>,
    #[serde(default, alias = "Serial")]
    serial: Option<Value>,
    #[serde(default, alias = "PcbId")]
    pcb_id: Option<Value>,
    #[serde(default, alias = "TenpoRouter")]
    tenpo_router: Option<Value>,
    #[serde(default, alias = "AuthServerIp")]
    auth_server_ip: Option<Value>,
    #[serde(default, alias = "IpAddress")]
    ip_address: Option<Value>,
    #[serde(default, alias = "SubnetMask")]
    subnet_mask: Option<Value>,
    #[serde(default, alias = "Gateway")]
    gateway: Option<Value>,
    #[serde(default, alias = "PrimaryDNS")]
    primary_dns: Option<Value>,
    #[serde(default, alias = "ServerAddress")]
    server_address: Option<Value>,
}

/// JSON type name for diagnostics
fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn string_field(field: &'static str, value: Option<Value>) -> Result<Option<String>, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ConfigError::InvalidField {
            field,
            reason: format!("expected a string, found {} ({})", kind(&other), other),
        }),
    }
}

fn bool_field(field: &'static str, value: Option<Value>) -> Result<Option<bool>, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(other) => Err(ConfigError::InvalidField {
            field,
            reason: format!("expected true or false, found {} ({})", kind(&other), other),
        }),
    }
}

fn key_bind_field(value: Option<Value>) -> Result<Option<RawKeyBind>, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ConfigError::InvalidField {
                field: "key_bind",
                reason: e.to_string(),
            }),
        Some(other) => Err(ConfigError::InvalidField {
            field: "key_bind",
            reason: format!("expected an object, found {}", kind(&other)),
        }),
    }
}

/// Process-wide cabinet settings, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Physical key for every logical input
    pub key_bind: KeyBind,

    // Display / input flags
    pub windowed: bool,
    /// Read inputs through DirectInput instead of raw keyboard state
    pub use_direct_input: bool,

    // Cabinet identity
    pub serial: String,
    pub pcb_id: String,
    /// Venue routing identifier; may be empty
    pub tenpo_router: String,

    // Server endpoints
    pub auth_server_ip: HostAddress,
    pub server_address: ServerEndpoint,

    // Local network interface presented by the cabinet
    pub ip_address: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub primary_dns: Ipv4Addr,
}

/// Field must be a string; may be empty
fn present(field: &'static str, value: Option<Value>) -> Result<String, ConfigError> {
    string_field(field, value)?.ok_or(ConfigError::MissingField { field })
}

/// Field must be a string holding something other than whitespace
fn required(field: &'static str, value: Option<Value>) -> Result<String, ConfigError> {
    match string_field(field, value)? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingField { field }),
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let serial = required("serial", raw.serial)?;
        let pcb_id = required("pcb_id", raw.pcb_id)?;
        let tenpo_router = present("tenpo_router", raw.tenpo_router)?;

        let auth_server_ip =
            HostAddress::parse("auth_server_ip", &required("auth_server_ip", raw.auth_server_ip)?)?;
        let server_address =
            ServerEndpoint::parse("server_address", &required("server_address", raw.server_address)?)?;

        let ip_address = parse_ipv4("ip_address", &required("ip_address", raw.ip_address)?)?;
        let subnet_mask = parse_subnet_mask("subnet_mask", &present("subnet_mask", raw.subnet_mask)?)?;
        let gateway = parse_ipv4("gateway", &present("gateway", raw.gateway)?)?;
        let primary_dns = parse_ipv4("primary_dns", &present("primary_dns", raw.primary_dns)?)?;

        let windowed = bool_field("windowed", raw.windowed)?;
        let use_direct_input = bool_field("use_direct_input", raw.use_direct_input)?;

        let key_bind = match key_bind_field(raw.key_bind)? {
            Some(raw_binds) => KeyBind::try_from(raw_binds)?,
            None => {
                debug!("No key_bind section, using default bindings");
                KeyBind::default()
            }
        };

        Ok(Self {
            key_bind,
            windowed: windowed.unwrap_or(display::WINDOWED),
            use_direct_input: use_direct_input.unwrap_or(display::USE_DIRECT_INPUT),
            serial,
            pcb_id,
            tenpo_router,
            auth_server_ip,
            server_address,
            ip_address,
            subnet_mask,
            gateway,
            primary_dns,
        })
    }
}

impl Config {
    /// Parse and validate a JSON document. `source_name` only labels errors.
    pub fn from_json(source_name: &str, contents: &str) -> Result<Self, ConfigError> {
        let document: Value =
            serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
                source_name: source_name.to_string(),
                source,
            })?;
        if !document.is_object() {
            return Err(ConfigError::Layout {
                source_name: source_name.to_string(),
                reason: format!("expected an object at the top level, found {}", kind(&document)),
            });
        }
        let raw: RawConfig =
            serde_json::from_value(document).map_err(|e| ConfigError::Layout {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?;
        let config = Config::try_from(raw)?;

        for (code, roles) in config.key_bind.duplicates() {
            let roles: Vec<&str> = roles.iter().map(|r| r.field_name()).collect();
            warn!(
                key = %code.display_name(),
                roles = ?roles,
                "Key is bound to more than one input"
            );
        }

        Ok(config)
    }

    /// Settings written by `cabinet-config init`, to be edited by the operator
    pub fn template() -> Result<Self, ConfigError> {
        let raw = RawConfig {
            serial: Some(Value::from(template::SERIAL)),
            pcb_id: Some(Value::from(template::PCB_ID)),
            tenpo_router: Some(Value::from(template::TENPO_ROUTER)),
            auth_server_ip: Some(Value::from(template::AUTH_SERVER_IP)),
            ip_address: Some(Value::from(template::IP_ADDRESS)),
            subnet_mask: Some(Value::from(template::SUBNET_MASK)),
            gateway: Some(Value::from(template::GATEWAY)),
            primary_dns: Some(Value::from(template::PRIMARY_DNS)),
            server_address: Some(Value::from(template::SERVER_ADDRESS)),
            ..RawConfig::default()
        };
        Config::try_from(raw)
    }

    /// Save configuration to a JSON file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Save {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string).map_err(|source| ConfigError::Save {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Saved config to {:?}", path);
        Ok(())
    }
}
