// ⚠️ Engine Errors - contract violations raised by the aggregation core
//
// Both variants mean the caller broke the insert-then-query discipline.
// They are not retryable: the engine is a pure computation over its state.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Rank requested outside `[0, len)`
    #[error("rank {index} out of range for tree of size {len}")]
    OutOfRange { index: usize, len: usize },

    /// Statistics requested for a group with no donations
    #[error("group has no recorded donations")]
    EmptyGroup,
}
