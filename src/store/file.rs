use super::ReferenceStore;
use crate::core::table::RawRow;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

const BUNDLED_DATA: &str = include_str!("../../data/cut_off_times.csv");

enum Source {
    Path(PathBuf),
    Bundled,
}

/// Reference rows kept in a CSV file with an
/// `ISO,Country,Today,Tomorrow,After Tomorrow` header.
pub struct CsvStore {
    source: Source,
}

impl CsvStore {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source: Source::Path(path.as_ref().to_path_buf()),
        }
    }

    /// The dataset shipped with the binary.
    pub fn bundled() -> Self {
        Self {
            source: Source::Bundled,
        }
    }

    pub fn read_rows(&self) -> Result<Vec<RawRow>> {
        match &self.source {
            Source::Path(path) => {
                let file = std::fs::File::open(path)
                    .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
                read_csv(file)
                    .with_context(|| format!("Failed to parse CSV file: {}", path.display()))
            }
            Source::Bundled => read_csv(BUNDLED_DATA.as_bytes()).context("Failed to parse bundled data"),
        }
    }
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<RawRow>().enumerate() {
        let row = record.with_context(|| format!("Invalid CSV row {}", index + 1))?;
        rows.push(row);
    }
    debug!("Read {} rows from CSV", rows.len());
    Ok(rows)
}

#[async_trait]
impl ReferenceStore for CsvStore {
    async fn load_rows(&self) -> Result<Vec<RawRow>> {
        self.read_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_read_csv_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            "ISO,Country,Today,Tomorrow,After Tomorrow\n\
             EUR,Euro Area,16.00,16.00,16.00\n\
             JPY,Japan, Never possible ,8.00,Always possible\n",
        )
        .unwrap();

        let rows = CsvStore::from_path(file.path()).load_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].iso, "EUR");
        assert_eq!(rows[0].country, "Euro Area");
        assert_eq!(rows[1].today, "Never possible");
        assert_eq!(rows[1].after_tomorrow, "Always possible");
    }

    #[test]
    fn test_missing_column_fails() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "ISO,Country,Today\nEUR,Euro Area,16.00\n").unwrap();

        let result = CsvStore::from_path(file.path()).read_rows();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_fails() {
        let err = CsvStore::from_path("/nonexistent/cut_off_times.csv")
            .read_rows()
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }

    #[test]
    fn test_bundled_data_is_readable() {
        let rows = CsvStore::bundled().read_rows().unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().any(|r| r.iso == "EUR"));
    }
}
