//! Configuration types for AssetDesk.
//!
//! Configuration is loaded from a single YAML file (`assetdesk.yaml`) which may
//! point at an external schema file. Every section has defaults so an empty
//! file is a valid configuration backed by the built-in asset inventory schema.

pub mod audit;
pub mod chat;
pub mod guard;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::{SchemaDefinition, SchemaDescriptor};

pub use audit::AuditConfig;
pub use chat::{ChatConfig, RateLimitConfig};
pub use guard::{GuardConfig, GuardMode};

/// Complete AssetDesk configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssetDeskConfig {
    /// Upstream database connection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat orchestration settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Query guard settings.
    #[serde(default)]
    pub guard: GuardConfig,

    /// Audit logging settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Path to a schema definition file. Relative paths resolve against the
    /// directory of the config file.
    #[serde(default)]
    pub schema_file: Option<PathBuf>,

    /// Schema loaded from `schema_file`.
    #[serde(skip)]
    pub schema_definition: Option<SchemaDefinition>,
}

/// Upstream database connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL. Takes precedence over `url_env`.
    #[serde(default)]
    pub url: Option<String>,

    /// Environment variable holding the connection URL.
    #[serde(default = "default_url_env")]
    pub url_env: String,

    /// Maximum pool connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Per-statement timeout enforced by the database.
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            url_env: default_url_env(),
            max_connections: default_max_connections(),
            statement_timeout_ms: default_statement_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Resolve the connection URL from the config or the environment.
    pub fn resolve_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| std::env::var(&self.url_env).ok())
            .filter(|u| !u.trim().is_empty())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080".
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_url_env() -> String {
    "DATABASE_URL".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_statement_timeout_ms() -> u64 {
    5000
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AssetDeskConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration and resolve the external schema file, if any.
    pub fn load_with_context(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(schema_file) = &config.schema_file {
            let schema_path = if schema_file.is_absolute() {
                schema_file.clone()
            } else {
                base_dir.join(schema_file)
            };

            if !schema_path.exists() {
                return Err(ConfigError::Config(format!(
                    "schema file '{}' does not exist",
                    schema_path.display()
                )));
            }

            let content = fs::read_to_string(&schema_path)?;
            let definition: SchemaDefinition = serde_yaml::from_str(&content)?;
            if definition.tables.is_empty() {
                return Err(ConfigError::Config(format!(
                    "schema file '{}' declares no tables",
                    schema_path.display()
                )));
            }
            config.schema_definition = Some(definition);
        }

        Ok(config)
    }

    /// Build the schema descriptor: the loaded schema file, or the built-in
    /// asset inventory schema.
    pub fn schema(&self) -> SchemaDescriptor {
        match &self.schema_definition {
            Some(definition) => SchemaDescriptor::from_definition(definition.clone()),
            None => SchemaDescriptor::asset_inventory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AssetDeskConfig::from_yaml("").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.chat.max_message_chars, 1000);
        assert_eq!(config.chat.rate_limit.max_requests, 15);
        assert_eq!(config.chat.rate_limit.window_secs, 60);
        assert_eq!(config.guard.mode, GuardMode::Textual);
        assert_eq!(config.database.url_env, "DATABASE_URL");
        assert!(config.schema().is_table_allowed("assets"));
    }

    #[test]
    fn test_partial_config() {
        let yaml = r#"
server:
  bind: "127.0.0.1:9000"
chat:
  rate_limit:
    max_requests: 3
guard:
  mode: strict
audit:
  enabled: false
"#;
        let config = AssetDeskConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.chat.rate_limit.max_requests, 3);
        assert_eq!(config.chat.rate_limit.window_secs, 60);
        assert_eq!(config.guard.mode, GuardMode::Strict);
        assert!(!config.audit.enabled);
    }

    #[test]
    fn test_database_url_prefers_explicit_value() {
        let config = DatabaseConfig {
            url: Some("postgres://localhost/assets".to_string()),
            url_env: "ASSETDESK_TEST_UNSET_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_url().as_deref(),
            Some("postgres://localhost/assets")
        );

        let missing = DatabaseConfig {
            url_env: "ASSETDESK_TEST_UNSET_VAR".to_string(),
            ..Default::default()
        };
        assert!(missing.resolve_url().is_none());
    }

    #[test]
    fn test_load_with_schema_file() {
        let dir = tempfile::tempdir().unwrap();

        let mut schema = fs::File::create(dir.path().join("schema.yaml")).unwrap();
        writeln!(
            schema,
            "tables:\n  - name: devices\n    description: Lab devices\n    columns:\n      - name: id\n        type: INT\nrestricted_columns: [secret]"
        )
        .unwrap();

        let config_path = dir.path().join("assetdesk.yaml");
        fs::write(&config_path, "schema_file: schema.yaml\n").unwrap();

        let config = AssetDeskConfig::load_with_context(&config_path).unwrap();
        let descriptor = config.schema();
        assert!(descriptor.is_table_allowed("devices"));
        assert!(!descriptor.is_table_allowed("assets"));
        assert!(descriptor.restricted_columns().contains("secret"));
    }

    #[test]
    fn test_missing_schema_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("assetdesk.yaml");
        fs::write(&config_path, "schema_file: nope.yaml\n").unwrap();

        let err = AssetDeskConfig::load_with_context(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }
}
