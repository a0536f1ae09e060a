use crate::{env_or_default, env_parse_or, ConfigError, FromEnv};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Transport the HTTP listener binds to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListenType {
    #[default]
    Tcp,
    Unix,
}

impl FromStr for ListenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(ListenType::Tcp),
            "unix" | "sock" => Ok(ListenType::Unix),
            other => Err(format!("unknown listen type '{}', expected 'tcp' or 'unix'", other)),
        }
    }
}

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub listen_type: ListenType,
    pub host: String,
    pub port: u16,
    /// Socket path used when `listen_type` is [`ListenType::Unix`]
    pub socket_path: PathBuf,
    /// Upper bound on the time spent serving a single request
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - LISTEN_TYPE: `tcp` (or `unix`)
    /// - HOST: defaults to Ipv4Addr::UNSPECIFIED (0.0.0.0 - all interfaces)
    /// - PORT: defaults to 8080
    /// - LISTEN_SOCKET: defaults to /tmp/rest-api.sock
    /// - REQUEST_TIMEOUT_SECS: defaults to 15
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let listen_type = env_parse_or("LISTEN_TYPE", defaults.listen_type)?;
        let host = env_or_default("HOST", &defaults.host);
        let port = env_parse_or("PORT", defaults.port)?;
        let socket_path = PathBuf::from(env_or_default(
            "LISTEN_SOCKET",
            &defaults.socket_path.to_string_lossy(),
        ));
        let request_timeout = Duration::from_secs(env_parse_or(
            "REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?);

        Ok(Self {
            listen_type,
            host,
            port,
            socket_path,
            request_timeout,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_type: ListenType::Tcp,
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
            socket_path: PathBuf::from("/tmp/rest-api.sock"),
            request_timeout: Duration::from_secs(15),
        }
    }
}
