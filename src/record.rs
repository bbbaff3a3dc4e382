// 🧾 Donation Records - validated input values and the keys derived from them
//
// A DonationRecord is produced by the parser and never mutated afterwards.
// GroupKey and DonorIdentity are the two lookup keys the engine uses.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// DONATION RECORD
// ============================================================================

/// One validated individual contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRecord {
    /// Recipient committee identifier (CMTE_ID), opaque and non-empty
    pub recipient: String,

    /// Donor name as "LAST, FIRST"
    pub donor_name: String,

    /// First five digits of the donor's zip code
    pub region: String,

    /// Date of the contribution
    pub date: NaiveDate,

    /// Contribution amount, non-negative
    pub amount: f64,
}

impl DonationRecord {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Key of the (recipient, region, year) group this donation belongs to
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            recipient: self.recipient.clone(),
            region: self.region.clone(),
            year: self.year(),
        }
    }

    /// Identity used to decide whether the donor has given before
    pub fn donor(&self) -> DonorIdentity {
        DonorIdentity {
            name: self.donor_name.clone(),
            region: self.region.clone(),
        }
    }
}

// ============================================================================
// KEYS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub recipient: String,
    pub region: String,
    pub year: i32,
}

impl GroupKey {
    pub fn new(recipient: impl Into<String>, region: impl Into<String>, year: i32) -> Self {
        GroupKey {
            recipient: recipient.into(),
            region: region.into(),
            year,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.recipient, self.region, self.year)
    }
}

/// A donor is identified by name and zip region together
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DonorIdentity {
    pub name: String,
    pub region: String,
}

impl DonorIdentity {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        DonorIdentity {
            name: name.into(),
            region: region.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DonationRecord {
        DonationRecord {
            recipient: "C00384516".to_string(),
            donor_name: "SABOURIN, JAMES".to_string(),
            region: "02895".to_string(),
            date: NaiveDate::from_ymd_opt(2018, 1, 31).unwrap(),
            amount: 384.0,
        }
    }

    #[test]
    fn test_derived_keys() {
        let record = sample();

        assert_eq!(record.year(), 2018);
        assert_eq!(record.group_key(), GroupKey::new("C00384516", "02895", 2018));
        assert_eq!(record.donor(), DonorIdentity::new("SABOURIN, JAMES", "02895"));
    }

    #[test]
    fn test_group_key_display() {
        let key = GroupKey::new("C00384516", "02895", 2018);
        assert_eq!(key.to_string(), "C00384516|02895|2018");
    }
}
