//! Address values for the cabinet's network identity and server endpoints
//!
//! Local interface fields (`ip_address`, `subnet_mask`, `gateway`,
//! `primary_dns`) must be dotted-quad IPv4. Server fields also accept
//! hostnames. A value whose dot-separated parts are all digits is always
//! treated as an IPv4 address, so `999.1.1.1` is rejected instead of being
//! taken for a hostname.
//!
//! Every accepted value renders back to exactly the text it was parsed from.

use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;

use crate::constants::network::{MAX_HOSTNAME_LEN, MAX_LABEL_LEN};
use crate::error::ConfigError;

/// True when every dot-separated part consists only of ASCII digits
fn is_ipv4_shaped(value: &str) -> bool {
    value
        .split('.')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse a dotted-quad IPv4 address
pub fn parse_ipv4(field: &'static str, value: &str) -> Result<Ipv4Addr, ConfigError> {
    let parts: Vec<&str> = value.split('.').collect();
    if parts.len() != 4 {
        return Err(ConfigError::malformed(
            field,
            value,
            format!("expected 4 octets, found {}", parts.len()),
        ));
    }

    let mut octets = [0u8; 4];
    for (octet, part) in octets.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::malformed(
                field,
                value,
                format!("octet {:?} is not a decimal number", part),
            ));
        }
        if part.len() > 1 && part.starts_with('0') {
            return Err(ConfigError::malformed(
                field,
                value,
                format!("octet {:?} has a leading zero", part),
            ));
        }
        *octet = part.parse().map_err(|_| {
            ConfigError::malformed(field, value, format!("octet {:?} is out of range 0-255", part))
        })?;
    }

    Ok(Ipv4Addr::from(octets))
}

/// Parse an IPv4 netmask; the set bits must be contiguous from the top
pub fn parse_subnet_mask(field: &'static str, value: &str) -> Result<Ipv4Addr, ConfigError> {
    let mask = parse_ipv4(field, value)?;
    let bits = u32::from(mask);
    if bits.leading_ones() + bits.trailing_zeros() != 32 {
        return Err(ConfigError::malformed(
            field,
            value,
            "subnet mask bits are not contiguous",
        ));
    }
    Ok(mask)
}

fn validate_hostname(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.len() > MAX_HOSTNAME_LEN {
        return Err(ConfigError::malformed(
            field,
            value,
            format!("hostname is longer than {} characters", MAX_HOSTNAME_LEN),
        ));
    }

    for label in value.split('.') {
        if label.is_empty() {
            return Err(ConfigError::malformed(field, value, "hostname has an empty label"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(ConfigError::malformed(
                field,
                value,
                format!("hostname label {:?} is longer than {} characters", label, MAX_LABEL_LEN),
            ));
        }
        if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(ConfigError::malformed(
                field,
                value,
                format!("hostname label {:?} contains invalid characters", label),
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ConfigError::malformed(
                field,
                value,
                format!("hostname label {:?} starts or ends with '-'", label),
            ));
        }
    }

    Ok(())
}

/// A server host given as an IPv4 address or a hostname
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAddress {
    Ipv4(Ipv4Addr),
    Hostname(String),
}

impl HostAddress {
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ConfigError> {
        if value.is_empty() {
            return Err(ConfigError::malformed(field, value, "address is empty"));
        }
        if is_ipv4_shaped(value) {
            return parse_ipv4(field, value).map(Self::Ipv4);
        }
        validate_hostname(field, value)?;
        Ok(Self::Hostname(value.to_string()))
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4(addr) => write!(f, "{}", addr),
            Self::Hostname(name) => f.write_str(name),
        }
    }
}

impl Serialize for HostAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Game server endpoint, `host` or `host:port`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub host: HostAddress,
    pub port: Option<u16>,
}

impl ServerEndpoint {
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ConfigError> {
        let Some((host, port)) = value.rsplit_once(':') else {
            return Ok(Self {
                host: HostAddress::parse(field, value)?,
                port: None,
            });
        };

        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::malformed(
                field,
                value,
                format!("port {:?} is not a decimal number", port),
            ));
        }
        // a leading zero would not render back to the same text
        if port.len() > 1 && port.starts_with('0') {
            return Err(ConfigError::malformed(field, value, "port has a leading zero"));
        }
        let port = match port.parse::<u16>() {
            Ok(0) | Err(_) => {
                return Err(ConfigError::malformed(
                    field,
                    value,
                    format!("port {:?} is out of range 1-65535", port),
                ));
            }
            Ok(port) => port,
        };

        Ok(Self {
            host: HostAddress::parse(field, host)?,
            port: Some(port),
        })
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => write!(f, "{}", self.host),
        }
    }
}

impl Serialize for ServerEndpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(err: ConfigError) -> String {
        match err {
            ConfigError::MalformedAddress { reason, .. } => reason,
            other => panic!("expected MalformedAddress, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(
            parse_ipv4("ip_address", "192.168.1.50").unwrap(),
            Ipv4Addr::new(192, 168, 1, 50)
        );
        assert_eq!(parse_ipv4("gateway", "0.0.0.0").unwrap(), Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn test_parse_ipv4_rejects_out_of_range() {
        let err = parse_ipv4("primary_dns", "999.1.1.1").unwrap_err();
        assert_eq!(err.field(), Some("primary_dns"));
        assert!(reason(err).contains("out of range"));
    }

    #[test]
    fn test_parse_ipv4_rejects_bad_shapes() {
        for value in ["1.2.3", "1.2.3.4.5", "a.b.c.d", "1..2.3", "", "192.168.01.1", " 1.2.3.4"] {
            assert!(parse_ipv4("ip_address", value).is_err(), "{:?} accepted", value);
        }
    }

    #[test]
    fn test_subnet_mask_contiguity() {
        assert!(parse_subnet_mask("subnet_mask", "255.255.255.0").is_ok());
        assert!(parse_subnet_mask("subnet_mask", "255.255.240.0").is_ok());
        assert!(parse_subnet_mask("subnet_mask", "0.0.0.0").is_ok());
        assert!(parse_subnet_mask("subnet_mask", "255.255.255.255").is_ok());

        let err = parse_subnet_mask("subnet_mask", "255.0.255.0").unwrap_err();
        assert!(reason(err).contains("contiguous"));
    }

    #[test]
    fn test_host_address() {
        assert_eq!(
            HostAddress::parse("auth_server_ip", "10.0.0.5").unwrap(),
            HostAddress::Ipv4(Ipv4Addr::new(10, 0, 0, 5))
        );
        assert_eq!(
            HostAddress::parse("auth_server_ip", "auth.example-net.jp").unwrap(),
            HostAddress::Hostname("auth.example-net.jp".to_string())
        );
        assert!(HostAddress::parse("auth_server_ip", "localhost").is_ok());
    }

    #[test]
    fn test_host_address_rejects() {
        for value in ["999.1.1.1", "", "bad host", "-lead.example", "trail-.example", "a..b", "under_score"] {
            let err = HostAddress::parse("auth_server_ip", value).unwrap_err();
            assert_eq!(err.field(), Some("auth_server_ip"), "{:?}", value);
        }
        let long_label = "a".repeat(64);
        assert!(HostAddress::parse("auth_server_ip", &long_label).is_err());
    }

    #[test]
    fn test_server_endpoint() {
        let endpoint = ServerEndpoint::parse("server_address", "10.0.0.5:8000").unwrap();
        assert_eq!(endpoint.host, HostAddress::Ipv4(Ipv4Addr::new(10, 0, 0, 5)));
        assert_eq!(endpoint.port, Some(8000));
        assert_eq!(endpoint.to_string(), "10.0.0.5:8000");

        let endpoint = ServerEndpoint::parse("server_address", "game.example").unwrap();
        assert_eq!(endpoint.port, None);
        assert_eq!(endpoint.to_string(), "game.example");
    }

    #[test]
    fn test_server_endpoint_rejects() {
        for value in ["10.0.0.5:0", "10.0.0.5:70000", "10.0.0.5:http", "10.0.0.5:", ":8000", "10.0.0.5:080", "999.0.0.1:80"] {
            assert!(
                ServerEndpoint::parse("server_address", value).is_err(),
                "{:?} accepted",
                value
            );
        }
    }

    #[test]
    fn test_serializes_as_text() {
        let endpoint = ServerEndpoint::parse("server_address", "game.example:5000").unwrap();
        assert_eq!(serde_json::to_string(&endpoint).unwrap(), r#""game.example:5000""#);
        let host = HostAddress::parse("auth_server_ip", "10.0.0.5").unwrap();
        assert_eq!(serde_json::to_string(&host).unwrap(), r#""10.0.0.5""#);
    }
}
