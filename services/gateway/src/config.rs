//! Gateway configuration
//!
//! Loaded once at startup from a TOML file: listen address, TLS material
//! paths, the initial user list, and queue bounds. Nothing is read from
//! the environment.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Address the TLS listener binds, e.g. "0.0.0.0:12345".
    pub listen_addr: String,
    pub tls: TlsConfig,
    /// Initial credential table; users can only be added here.
    #[serde(default)]
    pub users: Vec<UserCredential>,
    #[serde(default)]
    pub limits: QueueLimits,
}

/// Paths to the PEM-encoded server certificate chain and private key.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCredential {
    pub name: String,
    pub password: String,
}

/// Bounds for the dispatch queue and the per-session outbound channels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueLimits {
    /// Capacity of the order dispatch FIFO.
    pub dispatch_queue: usize,
    /// Per-session fill queue; overflowing it disconnects the session.
    pub session_fill_queue: usize,
    /// Per-session synchronous response queue.
    pub session_response_queue: usize,
}

impl Default for QueueLimits {
    fn default() -> Self {
        Self {
            dispatch_queue: 1024,
            session_fill_queue: 256,
            session_response_queue: 64,
        }
    }
}

impl GatewayConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            listen_addr = "127.0.0.1:12345"

            [tls]
            cert_path = "server.crt"
            key_path = "server.key"

            [[users]]
            name = "alice"
            password = "secret"

            [[users]]
            name = "bob"
            password = "hunter2"

            [limits]
            dispatch_queue = 512
            session_fill_queue = 128
            session_response_queue = 32
        "#;
        let config: GatewayConfig = toml::from_str(raw).unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:12345");
        assert_eq!(config.tls.cert_path, PathBuf::from("server.crt"));
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[1].name, "bob");
        assert_eq!(config.limits.dispatch_queue, 512);
    }

    #[test]
    fn test_users_and_limits_default_to_empty() {
        let raw = r#"
            listen_addr = "0.0.0.0:12345"

            [tls]
            cert_path = "server.crt"
            key_path = "server.key"
        "#;
        let config: GatewayConfig = toml::from_str(raw).unwrap();

        assert!(config.users.is_empty());
        assert_eq!(config.limits.dispatch_queue, 1024);
        assert_eq!(config.limits.session_fill_queue, 256);
    }

    #[test]
    fn test_missing_tls_section_fails() {
        let raw = r#"listen_addr = "0.0.0.0:12345""#;
        assert!(toml::from_str::<GatewayConfig>(raw).is_err());
    }
}
