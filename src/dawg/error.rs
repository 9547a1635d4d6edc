use thiserror::Error;

/// Result type alias using [`DawgError`].
pub type Result<T> = std::result::Result<T, DawgError>;

/// Errors that can occur when building, packing or decoding a DAWG.
///
/// A key or value that is simply absent is not an error: lookups report it as
/// `Ok(None)`.
#[derive(Error, Debug)]
pub enum DawgError {
    /// Keys were not inserted in strictly ascending order.
    ///
    /// Contains the two keys that were out of order (previous key, current key).
    #[error("OrderError - {previous:?} came before {current:?}")]
    Order {
        /// The previously inserted key.
        previous: Vec<u8>,
        /// The rejected key.
        current: Vec<u8>,
    },

    /// A data value was inserted twice.
    #[error("DuplicateDataError - data value {0} was already inserted")]
    DuplicateData(i64),

    /// The offset fixpoint did not settle within the iteration cap.
    #[error("PackingConvergenceError - no fixpoint after {iterations} passes")]
    PackingConvergence {
        /// Number of passes that were attempted.
        iterations: usize,
    },

    /// Packing options that no layout can start from.
    #[error("invalid pack options: {0}")]
    InvalidOptions(&'static str),

    /// The packed buffer is inconsistent with the format.
    #[error("CorruptDataError at offset {offset}: {reason}")]
    Corrupt {
        /// Byte offset where decoding went wrong.
        offset: usize,
        /// What was wrong.
        reason: &'static str,
    },

    /// I/O error while reading a key list.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of a key list could not be parsed.
    #[error("parse error on line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },
}

impl DawgError {
    /// Creates a corrupt-data error.
    pub(crate) fn corrupt(offset: usize, reason: &'static str) -> Self {
        DawgError::Corrupt { offset, reason }
    }

    /// True if this error reports a damaged or inconsistent packed buffer.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, DawgError::Corrupt { .. })
    }
}
