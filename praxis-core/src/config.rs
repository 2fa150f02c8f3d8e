//! Configuration types for the tool layer
//!
//! Loading is layered with figment: a `praxis.toml` file merged with
//! `PRAXIS_`-prefixed environment variables. The surrounding application
//! owns where the file comes from; this module only parses and validates.

use crate::tools::NAME_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Top-level configuration for the tool layer
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PraxisConfig {
    /// Remote MCP tool servers
    #[serde(default)]
    pub servers: Vec<McpServerConfig>,

    /// Executor defaults
    #[serde(default)]
    pub executor: ExecutorConfig,
}

/// One remote MCP tool server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// Server name; becomes the exposed-name prefix for its tools
    pub name: String,

    /// HTTP endpoint for JSON-RPC requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Whether the server participates in discovery and routing
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Bearer token sent as `Authorization: Bearer <token>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,

    /// TCP connect timeout
    #[serde(with = "humantime_serde", default = "default_connection_timeout")]
    pub connection_timeout: Duration,

    /// Full request timeout (connect + response)
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,
}

impl McpServerConfig {
    /// Create an enabled server config with default timeouts
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: Some(url.into()),
            enabled: true,
            bearer_token: None,
            connection_timeout: default_connection_timeout(),
            request_timeout: default_request_timeout(),
        }
    }

    /// Set the bearer token
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Enable or disable the server
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Whether this server can be called at all
    pub fn is_callable(&self) -> bool {
        self.enabled && self.url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Executor defaults for tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Per-call deadline
    #[serde(with = "humantime_serde", default = "default_tool_timeout")]
    pub tool_timeout: Duration,

    /// Attempt budget including the first call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            tool_timeout: default_tool_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_connection_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_tool_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_attempts() -> usize {
    3
}

impl PraxisConfig {
    /// Load configuration from `praxis.toml` merged with `PRAXIS_`-prefixed
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unreadable or invalid.
    pub fn load() -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Toml},
        };

        let mut figment = Figment::new()
            .merge(Toml::file("praxis.toml"))
            .merge(Env::prefixed("PRAXIS_").split("__"));

        if let Ok(path) = std::env::var("PRAXIS_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        let config: PraxisConfig = figment.extract().map_err(|e| {
            crate::error::PraxisError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Toml},
        };

        let config: PraxisConfig =
            Figment::new()
                .merge(Toml::file(path))
                .extract()
                .map_err(|e| {
                    crate::error::PraxisError::Configuration(format!(
                        "Failed to load configuration file: {}",
                        e
                    ))
                })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate invariants the rest of the crate relies on.
    ///
    /// Server names must be non-empty, unique, and free of the exposed-name
    /// separator (`__`), which would make parsed names ambiguous.
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut seen = HashSet::new();
        for server in &self.servers {
            if server.name.is_empty() {
                return Err(crate::error::PraxisError::Configuration(
                    "Server name must not be empty".to_string(),
                ));
            }
            if server.name.contains(NAME_SEPARATOR) {
                return Err(crate::error::PraxisError::Configuration(format!(
                    "Server name '{}' must not contain '{}'",
                    server.name, NAME_SEPARATOR
                )));
            }
            if !seen.insert(server.name.as_str()) {
                return Err(crate::error::PraxisError::Configuration(format!(
                    "Duplicate server name '{}'",
                    server.name
                )));
            }
        }

        if self.executor.max_attempts == 0 {
            return Err(crate::error::PraxisError::Configuration(
                "executor.max_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PraxisConfig::default();
        assert!(config.servers.is_empty());
        assert_eq!(config.executor.tool_timeout, Duration::from_secs(30));
        assert_eq!(config.executor.max_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_builder() {
        let server = McpServerConfig::new("docs", "http://localhost:3001/rpc")
            .with_bearer_token("secret")
            .with_request_timeout(Duration::from_secs(10));

        assert!(server.is_callable());
        assert_eq!(server.connection_timeout, Duration::from_secs(5));
        assert_eq!(server.request_timeout, Duration::from_secs(10));
        assert_eq!(server.bearer_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_disabled_server_not_callable() {
        let server = McpServerConfig::new("docs", "http://localhost:3001").with_enabled(false);
        assert!(!server.is_callable());
    }

    #[test]
    fn test_validate_rejects_separator_in_name() {
        let config = PraxisConfig {
            servers: vec![McpServerConfig::new("bad__name", "http://x")],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let config = PraxisConfig {
            servers: vec![
                McpServerConfig::new("docs", "http://a"),
                McpServerConfig::new("docs", "http://b"),
            ],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[servers]]
name = "docs"
url = "http://localhost:3001/rpc"
request_timeout = "10s"

[executor]
tool_timeout = "45s"
max_attempts = 2
"#
        )
        .unwrap();

        let config = PraxisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.servers.len(), 1);
        assert_eq!(config.servers[0].name, "docs");
        assert_eq!(config.servers[0].request_timeout, Duration::from_secs(10));
        assert!(config.servers[0].enabled);
        assert_eq!(config.executor.tool_timeout, Duration::from_secs(45));
        assert_eq!(config.executor.max_attempts, 2);
    }
}
