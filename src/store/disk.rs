use super::ReferenceStore;
use crate::core::reading::CutOffReading;
use crate::core::table::{CutOffTable, RawRow};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::{debug, info};

const PARTITION: &str = "cut_off_times";

/// Durable reference table, one JSON-encoded row per ISO code.
pub struct FjallStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open cut-off partition")?;
        Ok(Self {
            keyspace,
            partition,
        })
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.partition.is_empty()?)
    }

    /// Writes `rows` in one batch. The rows are validated as a complete table
    /// first, so a bad seed leaves the store untouched.
    pub fn seed(&self, rows: &[RawRow]) -> Result<()> {
        CutOffTable::build(rows.iter().cloned()).context("Refusing to seed invalid reference data")?;

        let mut batch = self.keyspace.batch();
        for row in rows {
            let row = normalize(row)?;
            batch.insert(&self.partition, row.iso.as_str(), serde_json::to_vec(&row)?);
        }
        batch.commit()?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        info!("Seeded reference store with {} rows", rows.len());
        Ok(())
    }
}

/// Rewrites readings to their compact store tokens.
fn normalize(row: &RawRow) -> Result<RawRow> {
    let token = |value: &str| -> Result<String> { Ok(value.parse::<CutOffReading>()?.to_token()) };
    Ok(RawRow {
        iso: row.iso.clone(),
        country: row.country.clone(),
        today: token(&row.today)?,
        tomorrow: token(&row.tomorrow)?,
        after_tomorrow: token(&row.after_tomorrow)?,
    })
}

#[async_trait]
impl ReferenceStore for FjallStore {
    async fn load_rows(&self) -> Result<Vec<RawRow>> {
        let mut rows = Vec::new();
        for item in self.partition.iter() {
            let (key, value) = item?;
            let row: RawRow = serde_json::from_slice(&value).with_context(|| {
                format!("Corrupt row for key {}", String::from_utf8_lossy(&key))
            })?;
            rows.push(row);
        }
        debug!("Read {} rows from fjall", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DayBucket;
    use crate::core::table::tests::row;
    use crate::store::build_table;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_seed_and_load() {
        let dir = tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();
        assert!(store.is_empty().unwrap());

        store
            .seed(&[
                row("USD", "21.00", "Always possible", "21.00"),
                row("EUR", "16.00", "16.00", "Never possible"),
            ])
            .unwrap();
        assert!(!store.is_empty().unwrap());

        let rows = store.load_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        // Keyed by ISO code, so rows come back sorted
        assert_eq!(rows[0].iso, "EUR");
        assert_eq!(rows[0].today, "16");
        assert_eq!(rows[0].after_tomorrow, "n");
        assert_eq!(rows[1].tomorrow, "a");
    }

    #[tokio::test]
    async fn test_rows_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = FjallStore::open(dir.path()).unwrap();
            store.seed(&[row("EUR", "16.00", "16.00", "16.00")]).unwrap();
        }

        let store = FjallStore::open(dir.path()).unwrap();
        let rows = store.load_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country, "Country of EUR");
    }

    #[tokio::test]
    async fn test_seeded_readings_keep_precision() {
        let dir = tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();
        store.seed(&[row("EUR", "23.999", "9.125", "16.00")]).unwrap();

        let rows = store.load_rows().await.unwrap();
        assert_eq!(rows[0].today, "23.999");
        assert_eq!(rows[0].tomorrow, "9.125");

        let table = build_table(&store).await.unwrap();
        let eur = table.get("EUR").unwrap();
        assert_eq!(eur.readings.get(DayBucket::Today), CutOffReading::Finite(23.999));
        assert_eq!(eur.readings.get(DayBucket::Tomorrow), CutOffReading::Finite(9.125));
    }

    #[test]
    fn test_invalid_seed_is_not_written() {
        let dir = tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();

        let result = store.seed(&[
            row("EUR", "16.00", "16.00", "16.00"),
            row("EUR", "15.00", "15.00", "15.00"),
        ]);
        assert!(result.is_err());
        assert!(store.is_empty().unwrap());

        let result = store.seed(&[row("GBP", "soon", "16.00", "16.00")]);
        assert!(result.is_err());
        assert!(store.is_empty().unwrap());
    }
}
