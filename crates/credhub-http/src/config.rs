//! Credhub HTTP configuration types and utilities.
use crate::errors::CredhubHTTPError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 8081;

/// HTTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HTTPConfig {
    /// Host address for server.
    pub host: IpAddr,
    /// Port for server.
    pub port: u16,
    /// Optional JSON file mapping schema IDs to JSON schemas.
    pub schema_path: Option<String>,
}

impl std::fmt::Display for HTTPConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Host: {} | Port: {}", self.host, self.port)?;
        if let Some(path) = &self.schema_path {
            write!(f, " | Schemas: {}", path)?;
        }
        Ok(())
    }
}

impl Default for HTTPConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            schema_path: None,
        }
    }
}

impl HTTPConfig {
    /// Provides `SocketAddr` of server config address.
    pub fn to_socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Reads the `[http]` table of a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CredhubHTTPError> {
        let path = path.as_ref();
        let toml_str = fs::read_to_string(path).map_err(|err| {
            CredhubHTTPError::Config(format!("could not read {}: {}", path.display(), err))
        })?;
        parse_toml(&toml_str)
    }
}

/// Parses the `[http]` table. Other tables are ignored and missing keys take defaults.
pub fn parse_toml(toml_str: &str) -> Result<HTTPConfig, CredhubHTTPError> {
    toml::from_str::<Config>(toml_str)
        .map(|config| config.http)
        .map_err(|err| CredhubHTTPError::Config(err.to_string()))
}

/// Wrapper struct for parsing the `http` config table.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct Config {
    /// HTTP configuration data.
    #[serde(default)]
    http: HTTPConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_deserialize() {
        let config_string = r#"
        [http]
        host = "0.0.0.0"
        port = 9000
        schema_path = "/etc/credhub/schemas.json"

        [non_http]
        key = "value"
        "#;

        let config = parse_toml(config_string).unwrap();
        assert_eq!(
            config,
            HTTPConfig {
                host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                port: 9000,
                schema_path: Some("/etc/credhub/schemas.json".to_string()),
            }
        );
        assert_eq!(config.to_socket_address().to_string(), "0.0.0.0:9000");
    }

    #[test]
    fn test_defaults() {
        let config = parse_toml("[http]\nport = 8090\n").unwrap();
        assert_eq!(
            config,
            HTTPConfig {
                port: 8090,
                ..HTTPConfig::default()
            }
        );
        assert_eq!(parse_toml("").unwrap(), HTTPConfig::default());
        assert_eq!(
            HTTPConfig::default().to_socket_address().to_string(),
            "127.0.0.1:8081"
        );
    }

    #[test]
    fn test_invalid() {
        let err = parse_toml("[http]\nport = \"eighty\"\n").unwrap_err();
        assert!(matches!(err, CredhubHTTPError::Config(_)));
        assert!(HTTPConfig::from_file("/nonexistent/credhub_config.toml").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nhost = \"127.0.0.1\"\nport = 8082").unwrap();
        let config = HTTPConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 8082);
        assert!(config.schema_path.is_none());
    }
}
