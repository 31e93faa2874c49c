//! Error types for use-def arena operations
//!
//! Only arena-level operations (erasing values, bulk rewrites, verification)
//! report errors. Caller contract violations on the hot path, such as an
//! out-of-range result number or stepping past the end of a use list, panic.

use crate::ir::{Value, ValueId};
use thiserror::Error;

/// Use-def errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Erasing a value that is still used
    ///
    /// **Triggered by:** `erase_value` while some consumer still holds an edge to it
    /// **Prevention:** Release or retarget the consumers' operands first
    #[error("Value {value} still has {uses} use(s)")]
    ValueHasUses {
        /// The value being erased
        value: ValueId,
        /// Number of edges still linked
        uses: usize,
    },

    /// Value was already erased
    #[error("Value {value} was already erased")]
    ValueErased {
        /// The erased value
        value: ValueId,
    },

    /// A rewrite was asked to target the invalid handle
    #[error("Invalid replacement value: {0}")]
    InvalidValue(Value),

    /// Bulk replacement target declares too few results
    ///
    /// **Triggered by:** `replace_all_uses_of_def` where a use of result `n`
    /// of `from` has no counterpart on `to`
    #[error("Cannot replace {from} with {to}: result {result} has no counterpart ({available} result(s) available)")]
    ResultCountMismatch {
        /// Value being replaced
        from: ValueId,
        /// Replacement value
        to: ValueId,
        /// Result number that has no counterpart
        result: u32,
        /// Result count of the replacement
        available: usize,
    },

    /// Use-list integrity check failed
    #[error("Use list verification failed: {0}")]
    VerificationFailed(String),
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The arena is corrupt; continuing is unsound
    Fatal,
    /// The request was rejected and nothing changed
    Recoverable,
}

impl Error {
    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::VerificationFailed(_) => ErrorSeverity::Fatal,
            Error::ValueHasUses { .. }
            | Error::ValueErased { .. }
            | Error::InvalidValue(_)
            | Error::ResultCountMismatch { .. } => ErrorSeverity::Recoverable,
        }
    }
}

/// Result type for use-def operations
pub type Result<T> = std::result::Result<T, Error>;
