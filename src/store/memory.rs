use super::ReferenceStore;
use crate::core::table::RawRow;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Fixed in-memory rows
pub struct MemoryStore {
    rows: Vec<RawRow>,
}

impl MemoryStore {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl ReferenceStore for MemoryStore {
    async fn load_rows(&self) -> Result<Vec<RawRow>> {
        debug!("Read {} rows from memory", self.rows.len());
        Ok(self.rows.clone())
    }
}
