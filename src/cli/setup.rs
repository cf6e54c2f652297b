use crate::core::config::{AppConfig, StoreConfig};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example configuration to the default location.
pub fn setup(force: bool) -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(path, force)
}

/// Writes the example configuration to `path`. An existing file is only
/// replaced with `force`, and is kept next to it with a `.bak` suffix.
pub fn setup_at_path<P: AsRef<Path>>(path: P, force: bool) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        if !force {
            anyhow::bail!(
                "Cut-off configuration already exists at {}, rerun with --force to replace it",
                path.display()
            );
        }
        let backup = backup_path(path);
        std::fs::rename(path, &backup)
            .with_context(|| format!("Failed to back up {}", path.display()))?;
        info!("Previous configuration moved to {}", backup.display());
    } else if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    let config = AppConfig::load_from_path(path)?;
    let store = match config.store {
        StoreConfig::Csv { .. } => "csv",
        StoreConfig::Fjall { .. } => "fjall",
    };
    info!(
        store,
        port = config.server.port,
        "Created cut-off configuration at {}",
        path.display()
    );
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
