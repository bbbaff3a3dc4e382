// 📊 Aggregation Group - per (recipient, region, year) statistics
//
// Holds every amount in an order-statistics tree plus a running total.
// The count is the tree size, so the two can never drift apart.

use crate::config::Percentile;
use crate::error::EngineError;
use crate::order_statistics::OrderStatisticTree;

#[derive(Debug, Clone, Default)]
pub struct AggregationGroup {
    amounts: OrderStatisticTree,
    /// Sum of all recorded amounts, accumulated in insertion order
    total: f64,
}

impl AggregationGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_donation(&mut self, amount: f64) {
        self.amounts.insert(amount);
        self.total += amount;
    }

    /// Nearest-rank percentile, rounded half away from zero.
    ///
    /// `rank = ceil(p * n / 100)` is computed in integers, then the value at
    /// 1-indexed `rank` is selected from the tree.
    pub fn percentile(&self, p: Percentile) -> Result<i64, EngineError> {
        let n = self.amounts.len();
        if n == 0 {
            return Err(EngineError::EmptyGroup);
        }

        let rank = (usize::from(p.value()) * n).div_ceil(100);
        let value = self.amounts.select_kth_smallest(rank - 1)?;
        Ok(round_amount(value))
    }

    pub fn cumulative_sum(&self) -> i64 {
        round_amount(self.total)
    }

    pub fn transaction_count(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// All three statistics at once. Fails only for an empty group.
    pub fn statistics(&self, p: Percentile) -> Result<GroupStatistics, EngineError> {
        Ok(GroupStatistics {
            percentile: self.percentile(p)?,
            total: self.cumulative_sum(),
            count: self.transaction_count(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupStatistics {
    pub percentile: i64,
    pub total: i64,
    pub count: usize,
}

/// Single rounding rule for everything the engine reports
pub fn round_amount(value: f64) -> i64 {
    value.round() as i64
}
