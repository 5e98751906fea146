//! Application configuration from TOML files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub archive: ArchiveSettings,
    #[serde(default)]
    pub services: ServiceSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Archive backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveSettings {
    /// "bundled" (catalog files under data_dir) or "nea" (live archive)
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Directory with the bundled catalog and model spectra
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// External service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    #[serde(default = "default_tap_endpoint")]
    pub nea_tap_endpoint: String,
    #[serde(default = "default_alias_endpoint")]
    pub nea_alias_endpoint: String,
    /// Pandeia-equivalent calculator endpoint; unset means the synthetic
    /// backend
    #[serde(default)]
    pub pandeia_endpoint: Option<String>,
    #[serde(default = "default_fov")]
    pub esasky_fov_deg: f64,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_backend() -> String {
    "bundled".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_tap_endpoint() -> String {
    "https://exoplanetarchive.ipac.caltech.edu/TAP/sync".to_string()
}

fn default_alias_endpoint() -> String {
    "https://exoplanetarchive.ipac.caltech.edu/cgi-bin/Lookup/nph-aliaslookup.py".to_string()
}

fn default_fov() -> f64 {
    0.25
}

fn default_timeout() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            nea_tap_endpoint: default_tap_endpoint(),
            nea_alias_endpoint: default_alias_endpoint(),
            pandeia_endpoint: None,
            esasky_fov_deg: default_fov(),
            request_timeout_secs: default_timeout(),
        }
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

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.as_ref().display()))
    }

    /// Load configuration from the default locations, falling back to the
    /// built-in defaults when no `gentso.toml` exists.
    ///
    /// Searches `gentso.toml` in the current directory, `backend/`, and the
    /// parent directory.
    pub fn from_default_location() -> anyhow::Result<Self> {
        let search_paths = [
            PathBuf::from("gentso.toml"),
            PathBuf::from("backend/gentso.toml"),
            PathBuf::from("../gentso.toml"),
        ];
        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.archive.backend, "bundled");
        assert_eq!(config.archive.data_dir, PathBuf::from("data"));
        assert!(config.services.pandeia_endpoint.is_none());
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.archive.backend, "bundled");
        assert_eq!(config.services.esasky_fov_deg, 0.25);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[archive]
backend = "nea"
data_dir = "/opt/gentso/data"

[services]
pandeia_endpoint = "http://pandeia.internal:9000"
request_timeout_secs = 60

[server]
host = "127.0.0.1"
port = 9090
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.archive.backend, "nea");
        assert_eq!(config.archive.data_dir, PathBuf::from("/opt/gentso/data"));
        assert_eq!(
            config.services.pandeia_endpoint.as_deref(),
            Some("http://pandeia.internal:9000")
        );
        assert_eq!(config.services.request_timeout_secs, 60);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        file.write_all(b"[archive\nbackend = ").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());
    }
}
