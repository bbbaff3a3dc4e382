// 🏗️ Contribution Parser - FEC pipe-delimited lines → DonationRecord
//
// Input format (individual contributions, no header, no quoting):
//   CMTE_ID|AMNDT_IND|RPT_TP|TRANSACTION_PGI|IMAGE_NUM|TRANSACTION_TP|ENTITY_TP|NAME|
//   CITY|STATE|ZIP_CODE|EMPLOYER|OCCUPATION|TRANSACTION_DT|TRANSACTION_AMT|OTHER_ID|
//   TRAN_ID|FILE_NUM|MEMO_CD|MEMO_TEXT|SUB_ID
//
// Only six fields matter. A line failing any check is rejected with the
// first RecordError found; the caller decides whether to skip it.

use crate::record::DonationRecord;
use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, StringRecord};
use std::io::Read;
use thiserror::Error;

pub const FIELD_COUNT: usize = 21;
pub const REGION_LENGTH: usize = 5;

const RECIPIENT_POSITION: usize = 0;
const NAME_POSITION: usize = 7;
const ZIP_CODE_POSITION: usize = 10;
const DATE_POSITION: usize = 13;
const AMOUNT_POSITION: usize = 14;
const OTHER_ID_POSITION: usize = 15;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("expected 21 fields, found {0}")]
    FieldCount(usize),

    #[error("OTHER_ID is set, contribution is not from an individual")]
    NotIndividual,

    #[error("recipient id is empty")]
    MissingRecipient,

    #[error("invalid donor name: {0:?}")]
    InvalidName(String),

    #[error("invalid zip code: {0:?}")]
    InvalidZipCode(String),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("invalid date: {0:?}")]
    InvalidDate(String),
}

/// Reader configured for the pipe-delimited contribution format
pub fn contribution_reader<R: Read>(input: R) -> Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(input)
}

/// Parse one raw line (without trailing newline)
pub fn parse_line(line: &str) -> Result<DonationRecord, RecordError> {
    parse_record(&StringRecord::from(line.split('|').collect::<Vec<_>>()))
}

/// Validate a split record and extract the fields the engine needs
pub fn parse_record(record: &StringRecord) -> Result<DonationRecord, RecordError> {
    if record.len() != FIELD_COUNT {
        return Err(RecordError::FieldCount(record.len()));
    }
    let field = |pos: usize| record.get(pos).unwrap_or("");

    if !field(OTHER_ID_POSITION).is_empty() {
        return Err(RecordError::NotIndividual);
    }

    let recipient = field(RECIPIENT_POSITION);
    if recipient.is_empty() {
        return Err(RecordError::MissingRecipient);
    }

    let donor_name = field(NAME_POSITION);
    if !is_valid_name(donor_name) {
        return Err(RecordError::InvalidName(donor_name.to_string()));
    }

    let region = parse_region(field(ZIP_CODE_POSITION))?;
    let amount = parse_amount(field(AMOUNT_POSITION))?;
    let date = parse_date(field(DATE_POSITION))?;

    Ok(DonationRecord {
        recipient: recipient.to_string(),
        donor_name: donor_name.to_string(),
        region: region.to_string(),
        date,
        amount,
    })
}

// ============================================================================
// FIELD CHECKS
// ============================================================================

/// "LAST, FIRST": one ", " separator, each side made of letter-only words
/// separated by single spaces
fn is_valid_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split(", ").collect();
    if parts.len() != 2 {
        return false;
    }

    parts.iter().all(|part| {
        part.split(' ')
            .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic()))
    })
}

/// First five characters, all digits
fn parse_region(zip: &str) -> Result<&str, RecordError> {
    match zip.get(..REGION_LENGTH) {
        Some(region) if region.chars().all(|c| c.is_ascii_digit()) => Ok(region),
        _ => Err(RecordError::InvalidZipCode(zip.to_string())),
    }
}

fn parse_amount(amount: &str) -> Result<f64, RecordError> {
    match amount.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(RecordError::InvalidAmount(amount.to_string())),
    }
}

/// MMDDYYYY, must be a real calendar date
fn parse_date(date: &str) -> Result<NaiveDate, RecordError> {
    let invalid = || RecordError::InvalidDate(date.to_string());

    if date.len() != 8 || !date.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let month: u32 = date[0..2].parse().map_err(|_| invalid())?;
    let day: u32 = date[2..4].parse().map_err(|_| invalid())?;
    let year: i32 = date[4..8].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
