//! Core cut-off lookup types and configuration

pub mod bucket;
pub mod config;
pub mod log;
pub mod reading;
pub mod resolver;
pub mod table;

// Re-export main types for cleaner imports
pub use bucket::DayBucket;
pub use reading::CutOffReading;
pub use resolver::{CurrencyInfo, CutOffResult, LookupError, Resolver, Side};
pub use table::{BuildError, CurrencyEntry, CutOffTable, RawRow};
