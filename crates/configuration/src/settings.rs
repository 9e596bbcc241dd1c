use core_types::StagePolicy;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::net::SocketAddr;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub gateway: GatewaySettings,
    pub log: LogSettings,
    /// The resolved `hana` service binding.
    pub hana: HanaBinding,
}

/// The layered file/environment view before the binding is resolved.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LayeredSettings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub hana: Option<HanaBinding>,
}

/// Where the HTTP server binds.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, crate::ConfigError> {
        format!("{}:{}", self.host, self.port).parse().map_err(|_| {
            crate::ConfigError::ValidationError(format!(
                "invalid server address {}:{}",
                self.host, self.port
            ))
        })
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Settings for the database gateway.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewaySettings {
    /// How stage outcomes are combined into a single result.
    #[serde(default)]
    pub policy: StagePolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

/// Credentials and location of the relational store, as supplied by the
/// `hana` service binding.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct HanaBinding {
    pub host: String,
    #[serde(deserialize_with = "port_from_number_or_string")]
    pub port: u16,
    pub schema: String,
    #[serde(alias = "username")]
    pub user: String,
    pub password: String,
    /// Database name on the server. Defaults to the server's choice for `user`.
    #[serde(default)]
    pub database: Option<String>,
    /// Require TLS for the connection.
    #[serde(default)]
    pub encrypt: bool,
}

impl HanaBinding {
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        for (key, value) in [
            ("host", &self.host),
            ("schema", &self.schema),
            ("user", &self.user),
        ] {
            if value.trim().is_empty() {
                return Err(crate::ConfigError::ValidationError(format!(
                    "hana binding `{}` must not be empty",
                    key
                )));
            }
        }
        if self.port == 0 {
            return Err(crate::ConfigError::ValidationError(
                "hana binding `port` must not be 0".to_string(),
            ));
        }
        Ok(())
    }
}

// Keeps the password out of logs.
impl fmt::Debug for HanaBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HanaBinding")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("schema", &self.schema)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("encrypt", &self.encrypt)
            .finish()
    }
}

/// Bindings publish the port either as a JSON number or as a string.
fn port_from_number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
