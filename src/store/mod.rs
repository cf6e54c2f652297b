//! Reference stores holding the raw cut-off rows

pub mod disk;
pub mod file;
pub mod memory;

use crate::core::config::{AppConfig, StoreConfig};
use crate::core::table::{CutOffTable, RawRow};
use anyhow::{Context, Result};
use async_trait::async_trait;
use disk::FjallStore;
use file::CsvStore;
use std::sync::Arc;
use tracing::info;

/// Source of truth for the reference rows.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn load_rows(&self) -> Result<Vec<RawRow>>;
}

/// Opens the store described by the configuration. An empty fjall store is
/// seeded before it is returned.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn ReferenceStore>> {
    match config {
        StoreConfig::Csv { path } => {
            info!("Using CSV reference store at {}", path.display());
            Ok(Arc::new(CsvStore::from_path(path)))
        }
        StoreConfig::Fjall {
            data_path,
            seed_csv,
        } => {
            let path = match data_path {
                Some(path) => path.clone(),
                None => AppConfig::default_data_path()?,
            };
            info!("Using fjall reference store at {}", path.display());
            let store = FjallStore::open(&path)?;
            if store.is_empty()? {
                let seed = match seed_csv {
                    Some(seed) => CsvStore::from_path(seed),
                    None => CsvStore::bundled(),
                };
                store.seed(&seed.read_rows()?)?;
            }
            Ok(Arc::new(store))
        }
    }
}

/// Reads every row once and builds the lookup table from them.
pub async fn build_table(store: &dyn ReferenceStore) -> Result<CutOffTable> {
    let rows = store
        .load_rows()
        .await
        .context("Failed to load reference rows")?;
    let row_count = rows.len();
    let table = CutOffTable::build(rows).context("Reference data is invalid")?;
    info!(
        rows = row_count,
        currencies = table.len(),
        "Loaded cut-off reference data"
    );
    Ok(table)
}
