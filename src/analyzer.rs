// 🔁 Donation Analyzer - classify, aggregate, emit
//
// For every valid record:
//   1. ask the donor tracker whether this is a repeat donor
//   2. if so, insert the amount into its (recipient, region, year) group
//   3. report percentile / running total / count for that group
//
// First-time donations only update the tracker; they never reach the store.

use crate::config::{AnalyzerConfig, Percentile};
use crate::donors::DonorIdentityTracker;
use crate::error::EngineError;
use crate::parser::{contribution_reader, parse_record};
use crate::record::{DonationRecord, GroupKey};
use crate::store::GroupedAggregationStore;
use anyhow::{Context, Result};
use log::{debug, info, trace};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

// ============================================================================
// OUTPUT
// ============================================================================

/// Statistics emitted for one repeat donation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatDonationStats {
    pub key: GroupKey,
    pub percentile: i64,
    pub total: i64,
    pub count: usize,
}

impl fmt::Display for RepeatDonationStats {
    /// `recipient|region|year|percentile|total|count`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}|{}", self.key, self.percentile, self.total, self.count)
    }
}

/// Counters for one run over an input stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub records_read: usize,
    pub invalid_records: usize,
    pub first_time_donations: usize,
    pub repeat_donations: usize,
    pub groups: usize,
    pub donors: usize,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} records read, {} invalid, {} first-time, {} repeat across {} groups",
            self.records_read,
            self.invalid_records,
            self.first_time_donations,
            self.repeat_donations,
            self.groups
        )
    }
}

// ============================================================================
// ANALYZER
// ============================================================================

pub struct DonationAnalyzer {
    percentile: Percentile,
    donors: DonorIdentityTracker,
    groups: GroupedAggregationStore,
}

impl DonationAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        DonationAnalyzer {
            percentile: config.percentile,
            donors: DonorIdentityTracker::new(config.repeat_policy),
            groups: GroupedAggregationStore::new(),
        }
    }

    pub fn donors(&self) -> &DonorIdentityTracker {
        &self.donors
    }

    pub fn groups(&self) -> &GroupedAggregationStore {
        &self.groups
    }

    /// Process one validated record.
    ///
    /// Returns `Ok(None)` for a first-time donation. Errors only if the
    /// store breaks its insert-then-query contract.
    pub fn process(
        &mut self,
        record: &DonationRecord,
    ) -> Result<Option<RepeatDonationStats>, EngineError> {
        if !self.donors.observe(&record.donor(), record.date) {
            return Ok(None);
        }

        let key = record.group_key();
        let stats = self
            .groups
            .insert(key.clone(), record.amount)
            .statistics(self.percentile)?;

        Ok(Some(RepeatDonationStats {
            key,
            percentile: stats.percentile,
            total: stats.total,
            count: stats.count,
        }))
    }

    /// Stream pipe-delimited records from `input`, writing one line per
    /// repeat donation to `output`. Invalid records are skipped.
    pub fn run<R: Read, W: Write>(&mut self, input: R, mut output: W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut reader = contribution_reader(input);

        for (index, result) in reader.records().enumerate() {
            let line_number = index + 1;
            summary.records_read += 1;

            let raw = match result {
                Ok(raw) => raw,
                Err(err) if matches!(err.kind(), csv::ErrorKind::Utf8 { .. }) => {
                    debug!("line {}: skipped, not valid UTF-8", line_number);
                    summary.invalid_records += 1;
                    continue;
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("Failed to read input line {}", line_number));
                }
            };

            let record = match parse_record(&raw) {
                Ok(record) => record,
                Err(reason) => {
                    debug!("line {}: skipped, {}", line_number, reason);
                    summary.invalid_records += 1;
                    continue;
                }
            };

            match self.process(&record)? {
                Some(stats) => {
                    trace!("line {}: repeat donation -> {}", line_number, stats);
                    writeln!(output, "{}", stats).context("Failed to write output")?;
                    summary.repeat_donations += 1;
                }
                None => summary.first_time_donations += 1,
            }
        }

        output.flush().context("Failed to flush output")?;

        summary.groups = self.groups.len();
        summary.donors = self.donors.len();
        Ok(summary)
    }
}

/// Run a fresh analyzer over `input_path`, writing results to `output_path`
pub fn analyze_files(
    config: AnalyzerConfig,
    input_path: &Path,
    output_path: &Path,
) -> Result<RunSummary> {
    let input = File::open(input_path)
        .with_context(|| format!("Failed to open input file: {}", input_path.display()))?;
    let output = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;

    info!(
        "analyzing {} (percentile {}, {:?} policy)",
        input_path.display(),
        config.percentile.value(),
        config.repeat_policy
    );

    let summary =
        DonationAnalyzer::new(config).run(BufReader::new(input), BufWriter::new(output))?;

    info!("{}", summary.summary());
    Ok(summary)
}

// ============================================================================
// TESTS
// ============================================================================
