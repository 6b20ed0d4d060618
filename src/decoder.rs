//! Range decoder.
//!
//! Mirrors [`RangeEncoder`](crate::RangeEncoder): instead of the interval's
//! lower bound the decoder tracks `code`, the offset of the stream value from
//! that bound, so no carry handling is needed.

use crate::config::{MAX_RESOLUTION, TOP};
use crate::error::Result;
use crate::io::ByteSource;
use crate::search::{BinarySearch, Frequency, SymbolSearch};

/// Range decoder reading from a [`ByteSource`].
///
/// Reads past the end of the source decode `0xFF` fill without failing.
#[derive(Debug)]
pub struct RangeDecoder<R, S = BinarySearch<u32>> {
    source: R,
    search: S,
    range: u32,
    code: u32,
}

impl<R: ByteSource, S: SymbolSearch + Default> RangeDecoder<R, S> {
    /// Create a decoder with the default search strategy.
    ///
    /// Reads the first 4 bytes of the stream.
    pub fn new(source: R) -> Result<Self> {
        Self::with_search(source, S::default())
    }
}

impl<R: ByteSource, S: SymbolSearch> RangeDecoder<R, S> {
    /// Create a decoder using `search` to resolve symbols.
    ///
    /// Reads the first 4 bytes of the stream.
    pub fn with_search(mut source: R, search: S) -> Result<Self> {
        let mut code = 0u32;
        for _ in 0..4 {
            code = (code << 8) | u32::from(source.next_byte()?);
        }
        Ok(Self {
            source,
            search,
            range: u32::MAX,
            code,
        })
    }

    /// Decode one symbol.
    ///
    /// `cum_freq` must be the table (with the search's base applied) the
    /// encoder used at this position, and `total` its resolution. Returns the
    /// symbol index. Only source errors are reported.
    pub fn decode(&mut self, total: u32, cum_freq: &[S::Freq]) -> Result<usize> {
        debug_assert!(total > 0 && total <= MAX_RESOLUTION);

        let r = self.range / total;
        let target = (self.code / r).min(total - 1);
        let base = self.search.base();
        let symbol = self
            .search
            .find(cum_freq, S::Freq::from_position(target, base));
        let low = cum_freq[symbol].to_position(base);
        let high = cum_freq[symbol + 1].to_position(base);

        self.code = self.code.wrapping_sub(r * low);
        if high < total {
            self.range = r * (high - low);
        } else {
            self.range -= r * low;
        }

        while self.range < TOP {
            self.range <<= 8;
            self.code = (self.code << 8) | u32::from(self.source.next_byte()?);
        }

        Ok(symbol)
    }

    /// The search strategy in use.
    pub fn search(&self) -> &S {
        &self.search
    }

    /// Return the byte source.
    pub fn into_source(self) -> R {
        self.source
    }
}
