//! `[admin]` section configuration.
//!
//! Settings for the authenticated admin endpoint served by `shopfeed daemon`.
//!
//! # Example
//!
//! ```toml
//! [admin]
//! interface = "127.0.0.1"     # 127.0.0.1 = localhost only
//! port = 8787
//! token = "change-me"         # or set SHOPFEED_ADMIN_TOKEN
//! ```

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Environment variable overriding `admin.token`.
pub const TOKEN_ENV: &str = "SHOPFEED_ADMIN_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Network interface to bind.
    pub interface: IpAddr,
    /// HTTP port number.
    pub port: u16,
    /// Bearer token required on every request.
    pub token: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8787,
            token: None,
        }
    }
}

impl AdminConfig {
    /// Effective token: the environment wins over the config file.
    /// Blank values count as unset.
    pub fn token(&self) -> Option<String> {
        resolve_token(std::env::var(TOKEN_ENV).ok(), self.token.as_deref())
    }
}

fn resolve_token(env: Option<String>, configured: Option<&str>) -> Option<String> {
    [env.as_deref(), configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_admin_config() {
        let config = test_parse_config(
            "[admin]\ninterface = \"0.0.0.0\"\nport = 9000\ntoken = \"secret\"",
        );
        assert_eq!(config.admin.interface, IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(config.admin.port, 9000);
        assert_eq!(config.admin.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_admin_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.admin.interface, IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(config.admin.port, 8787);
        assert!(config.admin.token.is_none());
    }

    #[test]
    fn test_resolve_token() {
        assert_eq!(resolve_token(None, None), None);
        assert_eq!(resolve_token(None, Some("file")).as_deref(), Some("file"));
        assert_eq!(resolve_token(Some("env".into()), Some("file")).as_deref(), Some("env"));
        assert_eq!(resolve_token(Some("  ".into()), Some("file")).as_deref(), Some("file"));
        assert_eq!(resolve_token(None, Some("")), None);
    }
}
