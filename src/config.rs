//! Validation limits.

use crate::error::{Error, Result};

/// Renormalization floor: the coder keeps `range >= TOP` between calls.
pub const TOP: u32 = 1 << 24;

/// Largest table resolution the coder accepts.
///
/// `range / total` must stay at least 1, and `range` only ever drops to
/// [`TOP`], so the total may not exceed it.
pub const MAX_RESOLUTION: u32 = TOP;

/// Default bound on the alphabet size accepted by stream objects.
pub const DEFAULT_MAX_SYMBOLS: usize = 1024;

/// Bounds applied when validating frequency tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    max_resolution: u32,
    max_symbols: usize,
}

impl Limits {
    /// Limits with an explicit resolution and alphabet bound.
    ///
    /// # Errors
    /// Returns `Error::InvalidLimits` if `max_resolution` is zero or above
    /// [`MAX_RESOLUTION`], or if `max_symbols` is zero.
    pub fn new(max_resolution: u32, max_symbols: usize) -> Result<Self> {
        if max_resolution == 0 || max_resolution > MAX_RESOLUTION {
            return Err(Error::InvalidLimits("max_resolution must be in 1..=2^24"));
        }
        if max_symbols == 0 {
            return Err(Error::InvalidLimits("max_symbols must be at least 1"));
        }
        Ok(Self {
            max_resolution,
            max_symbols,
        })
    }

    /// Limits with no alphabet bound beyond what memory allows.
    pub const fn unbounded() -> Self {
        Self {
            max_resolution: MAX_RESOLUTION,
            max_symbols: usize::MAX,
        }
    }

    /// Largest accepted table total.
    pub fn max_resolution(&self) -> u32 {
        self.max_resolution
    }

    /// Largest accepted number of symbols.
    pub fn max_symbols(&self) -> usize {
        self.max_symbols
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_resolution: MAX_RESOLUTION,
            max_symbols: DEFAULT_MAX_SYMBOLS,
        }
    }
}
