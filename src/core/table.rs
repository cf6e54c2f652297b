//! In-memory cut-off table built from reference rows

use super::bucket::DayBucket;
use super::reading::{CutOffReading, ReadingParseError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;
use tracing::debug;

/// A reference row as held by a store. Readings are still raw tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(rename = "ISO")]
    pub iso: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Today")]
    pub today: String,
    #[serde(rename = "Tomorrow")]
    pub tomorrow: String,
    #[serde(rename = "After Tomorrow")]
    pub after_tomorrow: String,
}

impl RawRow {
    fn raw_reading(&self, bucket: DayBucket) -> &str {
        match bucket {
            DayBucket::Today => &self.today,
            DayBucket::Tomorrow => &self.tomorrow,
            DayBucket::AfterTomorrow => &self.after_tomorrow,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayReadings {
    pub today: CutOffReading,
    pub tomorrow: CutOffReading,
    pub after_tomorrow: CutOffReading,
}

impl DayReadings {
    pub fn get(&self, bucket: DayBucket) -> CutOffReading {
        match bucket {
            DayBucket::Today => self.today,
            DayBucket::Tomorrow => self.tomorrow,
            DayBucket::AfterTomorrow => self.after_tomorrow,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyEntry {
    pub code: String,
    pub country: String,
    pub readings: DayReadings,
}

impl CurrencyEntry {
    fn from_row(row: RawRow) -> Result<Self, BuildError> {
        if !is_currency_code(&row.iso) {
            return Err(BuildError::InvalidCode(row.iso));
        }

        let parse = |bucket: DayBucket| -> Result<CutOffReading, BuildError> {
            let value = row.raw_reading(bucket);
            value.parse().map_err(|source| BuildError::InvalidReading {
                code: row.iso.clone(),
                bucket,
                value: value.to_string(),
                source,
            })
        };
        let readings = DayReadings {
            today: parse(DayBucket::Today)?,
            tomorrow: parse(DayBucket::Tomorrow)?,
            after_tomorrow: parse(DayBucket::AfterTomorrow)?,
        };

        Ok(CurrencyEntry {
            code: row.iso,
            country: row.country,
            readings,
        })
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid currency code '{0}', expected 3 uppercase letters")]
    InvalidCode(String),
    #[error("duplicate currency code '{0}' in reference data")]
    DuplicateCode(String),
    #[error("invalid {bucket} reading '{value}' for {code}")]
    InvalidReading {
        code: String,
        bucket: DayBucket,
        value: String,
        #[source]
        source: ReadingParseError,
    },
}

/// Exact shape of a currency code: three ASCII uppercase letters.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Immutable mapping from currency code to its entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutOffTable {
    entries: HashMap<String, CurrencyEntry>,
}

impl CutOffTable {
    /// Builds the table from store rows. Any malformed row or repeated code
    /// fails the whole build.
    pub fn build<I>(rows: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut entries = HashMap::new();
        for row in rows {
            let entry = CurrencyEntry::from_row(row)?;
            match entries.entry(entry.code.clone()) {
                Entry::Occupied(_) => return Err(BuildError::DuplicateCode(entry.code)),
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
            }
        }
        debug!("Built cut-off table with {} currencies", entries.len());
        Ok(Self { entries })
    }

    pub fn get(&self, code: &str) -> Option<&CurrencyEntry> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by currency code.
    pub fn entries(&self) -> Vec<&CurrencyEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries
    }
}
