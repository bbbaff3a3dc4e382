// 🗂️ Grouped Aggregation Store - GroupKey → AggregationGroup
//
// One flat map keyed by the composite (recipient, region, year) key.
// Groups are created on first insert and never removed.

use crate::config::Percentile;
use crate::error::EngineError;
use crate::group::AggregationGroup;
use crate::record::GroupKey;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct GroupedAggregationStore {
    groups: HashMap<GroupKey, AggregationGroup>,
}

impl GroupedAggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `amount` under `key`, creating the group if needed.
    ///
    /// Returns the updated group so callers can query it without a second
    /// lookup.
    pub fn insert(&mut self, key: GroupKey, amount: f64) -> &AggregationGroup {
        let group = self.groups.entry(key).or_default();
        group.record_donation(amount);
        group
    }

    pub fn get(&self, key: &GroupKey) -> Option<&AggregationGroup> {
        self.groups.get(key)
    }

    pub fn percentile(&self, key: &GroupKey, p: Percentile) -> Result<i64, EngineError> {
        self.group(key)?.percentile(p)
    }

    pub fn cumulative_sum(&self, key: &GroupKey) -> Result<i64, EngineError> {
        Ok(self.group(key)?.cumulative_sum())
    }

    pub fn transaction_count(&self, key: &GroupKey) -> Result<usize, EngineError> {
        Ok(self.group(key)?.transaction_count())
    }

    /// Number of distinct groups seen so far
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    // A key that was never inserted is a group with no donations.
    fn group(&self, key: &GroupKey) -> Result<&AggregationGroup, EngineError> {
        self.groups.get(key).ok_or(EngineError::EmptyGroup)
    }
}
