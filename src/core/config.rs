use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Seconds between reference data reloads; `0` loads once per process.
    #[serde(default)]
    pub reload_interval_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            reload_interval_secs: 0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Read rows straight from a CSV file.
    Csv { path: PathBuf },
    /// Durable keyspace, seeded from `seed_csv` (or the bundled data) when empty.
    Fjall {
        #[serde(default)]
        data_path: Option<PathBuf>,
        #[serde(default)]
        seed_csv: Option<PathBuf>,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Fjall {
            data_path: None,
            seed_csv: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "cutoff", "cutoff")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "cutoff", "cutoff")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join("reference"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
server:
  host: "0.0.0.0"
  port: 9000
  cors_origins:
    - "https://example.com"
  reload_interval_secs: 300
store:
  kind: csv
  path: "/srv/cutoff/data.csv"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origins, vec!["https://example.com"]);
        assert_eq!(config.server.reload_interval_secs, 300);
        assert_eq!(
            config.store,
            StoreConfig::Csv {
                path: PathBuf::from("/srv/cutoff/data.csv")
            }
        );

        let yaml_str_with_fjall = r#"
store:
  kind: fjall
  data_path: "/var/lib/cutoff"
        "#;
        let config: AppConfig = serde_yaml::from_str(yaml_str_with_fjall).unwrap();
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(
            config.store,
            StoreConfig::Fjall {
                data_path: Some(PathBuf::from("/var/lib/cutoff")),
                seed_csv: None
            }
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.cors_origins, vec!["*"]);
    }

    #[test]
    fn test_unknown_store_kind_fails() {
        let result: Result<AppConfig, _> = serde_yaml::from_str("store:\n  kind: postgres\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let err = AppConfig::load_from_path("/nonexistent/cutoff/config.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
