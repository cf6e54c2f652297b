//! Cut-off resolution for a pair of currencies

use super::bucket::DayBucket;
use super::table::{CurrencyEntry, CutOffTable};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt::Display;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Currency {which} ({code}) not found.")]
    CurrencyNotFound { which: Side, code: String },
    #[error("Invalid date: ({date}) is in the past.")]
    PastDate { date: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyInfo {
    pub iso: String,
    pub country: String,
}

impl From<&CurrencyEntry> for CurrencyInfo {
    fn from(entry: &CurrencyEntry) -> Self {
        CurrencyInfo {
            iso: entry.code.clone(),
            country: entry.country.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutOffResult {
    pub currency_a: CurrencyInfo,
    pub currency_b: CurrencyInfo,
    pub cut_off_time: String,
    #[serde(skip)]
    pub bucket: DayBucket,
}

/// Answers cut-off queries from a fully built table.
///
/// The table is only ever replaced as a whole through [`Resolver::publish`],
/// so a query sees either the previous or the next table, never a mix.
pub struct Resolver {
    table: RwLock<Arc<CutOffTable>>,
}

impl Resolver {
    pub fn new(table: CutOffTable) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
        }
    }

    /// Current table. Cheap, the lock is only held to clone the `Arc`.
    pub fn snapshot(&self) -> Arc<CutOffTable> {
        let guard = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replaces the whole table.
    pub fn publish(&self, table: CutOffTable) {
        let table = Arc::new(table);
        let mut guard = self.table.write().unwrap_or_else(PoisonError::into_inner);
        info!("Publishing cut-off table with {} currencies", table.len());
        *guard = table;
    }

    /// Resolves against the server-local current date.
    pub fn resolve(
        &self,
        code_a: &str,
        code_b: &str,
        requested: NaiveDate,
    ) -> Result<CutOffResult, LookupError> {
        self.resolve_on(code_a, code_b, requested, Local::now().date_naive())
    }

    pub fn resolve_on(
        &self,
        code_a: &str,
        code_b: &str,
        requested: NaiveDate,
        current: NaiveDate,
    ) -> Result<CutOffResult, LookupError> {
        let table = self.snapshot();
        let entry_a = table
            .get(code_a)
            .ok_or_else(|| LookupError::CurrencyNotFound {
                which: Side::A,
                code: code_a.to_string(),
            })?;
        let entry_b = table
            .get(code_b)
            .ok_or_else(|| LookupError::CurrencyNotFound {
                which: Side::B,
                code: code_b.to_string(),
            })?;

        if requested < current {
            return Err(LookupError::PastDate { date: requested });
        }

        let bucket = DayBucket::select(requested, current);
        let reading_a = entry_a.readings.get(bucket);
        let reading_b = entry_b.readings.get(bucket);
        let cut_off = reading_a.earlier(reading_b);
        debug!(%code_a, %code_b, %requested, %bucket, %cut_off, "Resolved cut-off");

        Ok(CutOffResult {
            currency_a: entry_a.into(),
            currency_b: entry_b.into(),
            cut_off_time: cut_off.to_string(),
            bucket,
        })
    }
}
