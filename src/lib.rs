// Donation Analytics - Core Library
// Repeat-donor statistics over a stream of individual contributions

pub mod order_statistics; // Order-statistics tree (rank / select)
pub mod group;            // Per-group percentile, total, count
pub mod store;            // (recipient, region, year) → group
pub mod donors;           // Repeat-donor classification
pub mod record;           // Validated record + keys
pub mod parser;           // Pipe-delimited input parsing
pub mod config;           // Percentile + run settings
pub mod analyzer;         // Classify → aggregate → emit
pub mod error;

// Re-export commonly used types
pub use order_statistics::OrderStatisticTree;
pub use group::{AggregationGroup, GroupStatistics};
pub use store::GroupedAggregationStore;
pub use donors::{DonorIdentityTracker, RepeatPolicy};
pub use record::{DonationRecord, DonorIdentity, GroupKey};
pub use parser::{parse_line, parse_record, RecordError};
pub use config::{read_percentile, AnalyzerConfig, Percentile, PercentileError};
pub use analyzer::{analyze_files, DonationAnalyzer, RepeatDonationStats, RunSummary};
pub use error::EngineError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
