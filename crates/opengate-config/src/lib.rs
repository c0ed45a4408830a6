//! Configuration for the opengate policy service.
//!
//! Settings come from an optional TOML file merged with `OPENGATE`-prefixed
//! environment variables (e.g. `OPENGATE__SERVER__PORT=9090`); the
//! environment wins. All sections have working defaults so a development
//! server starts with no file at all.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Top-level resolved configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Cross-field validation, run once after merge.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if matches!(self.storage.backend, StorageBackend::S3) && self.storage.s3.bucket.is_empty()
        {
            return Err("storage.s3.bucket is required for the s3 backend".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if self.policy.template_path.is_empty() {
            return Err("policy.template_path must not be empty".into());
        }
        if self.policy.active_object_key.is_empty() {
            return Err("policy.active_object_key must not be empty".into());
        }
        if self.policy.query_path.is_empty() {
            return Err("policy.query_path must not be empty".into());
        }
        Ok(())
    }

    /// Socket address the server binds to.
    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Which `PolicyStore` backend serves this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    #[serde(default)]
    pub s3: S3Config,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            s3: S3Config::default(),
        }
    }
}

/// S3 backend settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct S3Config {
    /// Bucket holding policy objects. Required for the s3 backend.
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override for S3-compatible local stacks.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Named credentials profile to load instead of the default chain.
    #[serde(default)]
    pub profile: Option<String>,
    /// Path-style addressing; defaults to on whenever an endpoint override
    /// is configured.
    #[serde(default)]
    pub force_path_style: Option<bool>,
}

impl S3Config {
    /// Effective path-style setting.
    #[must_use]
    pub fn use_path_style(&self) -> bool {
        self.force_path_style
            .unwrap_or(self.endpoint_url.is_some())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Filesystem location of the policy document template.
    #[serde(default = "default_template_path")]
    pub template_path: String,
    /// Store key of the policy consumed at decision time.
    #[serde(default = "default_active_object_key")]
    pub active_object_key: String,
    /// Query evaluated against the compiled policy.
    #[serde(default = "default_query_path")]
    pub query_path: String,
    /// Publish freshly authored documents as the active policy.
    #[serde(default = "default_hot_reload")]
    pub hot_reload: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            active_object_key: default_active_object_key(),
            query_path: default_query_path(),
            hot_reload: default_hot_reload(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit() -> usize {
    1_048_576
}
fn default_backend() -> StorageBackend {
    StorageBackend::S3
}
fn default_template_path() -> String {
    "policies/access_policy.rego.tmpl".to_string()
}
fn default_active_object_key() -> String {
    "policies/active.rego".to_string()
}
fn default_query_path() -> String {
    "data.api.access.allow".to_string()
}
fn default_hot_reload() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Merges the TOML file at `path` (when present) with environment
    /// overrides and validates the result.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                let default_path = PathBuf::from("opengate.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g. OPENGATE__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("OPENGATE")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.backend, StorageBackend::S3);
        assert_eq!(cfg.policy.query_path, "data.api.access.allow");
        assert_eq!(cfg.policy.active_object_key, "policies/active.rego");
        assert!(cfg.policy.hot_reload);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_s3_backend_requires_bucket() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().unwrap_err().contains("storage.s3.bucket"));

        let mut cfg = AppConfig::default();
        cfg.storage.s3.bucket = "policy-bucket".into();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_memory_backend_needs_no_bucket() {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = StorageBackend::Memory;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = StorageBackend::Memory;
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().unwrap_err().contains("logging.level"));
    }

    #[test]
    fn test_path_style_defaults_follow_endpoint() {
        let mut s3 = S3Config::default();
        assert!(!s3.use_path_style());
        s3.endpoint_url = Some("http://localhost:4566".into());
        assert!(s3.use_path_style());
        s3.force_path_style = Some(false);
        assert!(!s3.use_path_style());
    }

    #[test]
    fn test_addr_falls_back_on_bad_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not-an-ip".into();
        assert_eq!(cfg.addr().to_string(), "0.0.0.0:8080");
    }
}
