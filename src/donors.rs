// 🧑 Donor Identity Tracker - "has this donor given before?"
//
// Maps (name, region) to the most recently stored donation date and
// classifies each new donation as repeat or first-time. Entries are only
// ever added or overwritten, never removed.

use crate::record::DonorIdentity;
use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// REPEAT POLICY
// ============================================================================

/// How a donation is compared against the donor's stored date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatPolicy {
    /// Repeat when the stored year is the same or earlier than this one.
    /// A donation from an earlier year replaces the stored date.
    #[default]
    YearForward,

    /// Repeat when the stored date is the same day or earlier.
    /// A donation on an earlier day replaces the stored date.
    EarlierDate,
}

impl RepeatPolicy {
    /// True when a donation on `date` counts as a repeat of one on `stored`
    fn is_repeat(self, stored: NaiveDate, date: NaiveDate) -> bool {
        match self {
            RepeatPolicy::YearForward => stored.year() <= date.year(),
            RepeatPolicy::EarlierDate => stored <= date,
        }
    }
}

// ============================================================================
// TRACKER
// ============================================================================

#[derive(Debug, Default)]
pub struct DonorIdentityTracker {
    policy: RepeatPolicy,
    donors: HashMap<DonorIdentity, NaiveDate>,
}

impl DonorIdentityTracker {
    pub fn new(policy: RepeatPolicy) -> Self {
        DonorIdentityTracker {
            policy,
            donors: HashMap::new(),
        }
    }

    pub fn policy(&self) -> RepeatPolicy {
        self.policy
    }

    /// Classify a donation and update the stored date.
    ///
    /// Returns `true` for a repeat donor. A first sighting stores `date` and
    /// returns `false`; so does a sighting that the policy places before the
    /// stored date, which also overwrites it.
    pub fn observe(&mut self, identity: &DonorIdentity, date: NaiveDate) -> bool {
        if let Some(stored) = self.donors.get_mut(identity) {
            if self.policy.is_repeat(*stored, date) {
                return true;
            }
            *stored = date;
            return false;
        }

        self.donors.insert(identity.clone(), date);
        false
    }

    /// Date currently stored for `identity`, if any
    pub fn last_seen(&self, identity: &DonorIdentity) -> Option<NaiveDate> {
        self.donors.get(identity).copied()
    }

    /// Number of distinct donors seen
    pub fn len(&self) -> usize {
        self.donors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn smith() -> DonorIdentity {
        DonorIdentity::new("Smith, John", "10001")
    }

    #[test]
    fn test_default_policy_is_year_forward() {
        assert_eq!(DonorIdentityTracker::default().policy(), RepeatPolicy::YearForward);
    }

    #[test]
    fn test_year_forward_classification() {
        let mut tracker = DonorIdentityTracker::new(RepeatPolicy::YearForward);

        assert!(!tracker.observe(&smith(), date(2017, 6, 1)));
        assert_eq!(tracker.last_seen(&smith()), Some(date(2017, 6, 1)));

        // Same year, even an earlier day, is a repeat
        assert!(tracker.observe(&smith(), date(2017, 1, 15)));
        assert!(tracker.observe(&smith(), date(2018, 3, 2)));
        assert_eq!(tracker.last_seen(&smith()), Some(date(2017, 6, 1)));

        // Earlier year: not a repeat, stored date moves back
        assert!(!tracker.observe(&smith(), date(2016, 11, 30)));
        assert_eq!(tracker.last_seen(&smith()), Some(date(2016, 11, 30)));

        assert!(tracker.observe(&smith(), date(2016, 1, 1)));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_earlier_date_classification() {
        let mut tracker = DonorIdentityTracker::new(RepeatPolicy::EarlierDate);

        assert!(!tracker.observe(&smith(), date(2017, 6, 1)));
        assert!(tracker.observe(&smith(), date(2017, 6, 1)));
        assert!(tracker.observe(&smith(), date(2017, 6, 2)));

        // Earlier day in the same year is not a repeat under this policy
        assert!(!tracker.observe(&smith(), date(2017, 1, 15)));
        assert_eq!(tracker.last_seen(&smith()), Some(date(2017, 1, 15)));

        assert!(tracker.observe(&smith(), date(2017, 6, 1)));
        assert_eq!(tracker.last_seen(&smith()), Some(date(2017, 1, 15)));
    }

    #[test]
    fn test_identity_includes_region() {
        let mut tracker = DonorIdentityTracker::default();
        let elsewhere = DonorIdentity::new("Smith, John", "94105");

        assert!(!tracker.observe(&smith(), date(2017, 6, 1)));
        assert!(!tracker.observe(&elsewhere, date(2018, 6, 1)));
        assert!(tracker.observe(&elsewhere, date(2018, 7, 1)));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&RepeatPolicy::EarlierDate).unwrap();
        assert_eq!(json, "\"earlier-date\"");

        let policy: RepeatPolicy = serde_json::from_str("\"year-forward\"").unwrap();
        assert_eq!(policy, RepeatPolicy::YearForward);
    }
}
