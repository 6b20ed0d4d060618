//! Error types for range coding.

use thiserror::Error;

/// Error variants for range coder operations.
///
/// The core coder is contract-based; every variant except [`Error::Io`] is
/// raised by validation that runs before any byte is written or read.
#[derive(Debug, Error)]
pub enum Error {
    /// A cumulative frequency table needs at least one symbol (two entries).
    #[error("frequency table needs at least 2 entries, got {0}")]
    TableTooShort(usize),

    /// The first entry of a cumulative frequency table must be zero.
    #[error("frequency table must start at 0, starts at {0}")]
    NonZeroStart(u32),

    /// Entries must be non-decreasing.
    #[error("frequency table decreases at index {index}")]
    Decreasing {
        /// Index of the first entry smaller than its predecessor.
        index: usize,
    },

    /// The table's total is zero, so no symbol can be coded.
    #[error("frequency table has zero resolution")]
    ZeroResolution,

    /// The table's total exceeds the renormalization floor.
    #[error("resolution {total} exceeds the maximum of {max}")]
    ResolutionTooLarge {
        /// Requested resolution.
        total: u64,
        /// Largest accepted resolution.
        max: u32,
    },

    /// The alphabet is larger than the configured maximum.
    #[error("alphabet of {count} symbols exceeds the maximum of {max}")]
    TooManySymbols {
        /// Number of symbols in the table.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A symbol index has no interval in the table.
    #[error("symbol {symbol} is out of range for an alphabet of {alphabet} symbols")]
    SymbolOutOfRange {
        /// Offending symbol index.
        symbol: usize,
        /// Number of symbols in the table.
        alphabet: usize,
    },

    /// A symbol with an empty interval cannot be encoded.
    #[error("cannot encode symbol {symbol}: zero frequency")]
    ZeroFrequency {
        /// Offending symbol index.
        symbol: usize,
    },

    /// Provided probability is invalid (negative or non-finite).
    #[error("invalid probability: {0}")]
    InvalidProbability(f64),

    /// A [`Limits`](crate::config::Limits) value is out of bounds.
    #[error("invalid limits: {0}")]
    InvalidLimits(&'static str),

    /// The stream was already closed.
    #[error("stream is closed")]
    Closed,

    /// An I/O error occurred while writing or reading the byte stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for range coder operations.
pub type Result<T> = std::result::Result<T, Error>;
