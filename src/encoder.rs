//! Range encoder.
//!
//! The encoder tracks the coding interval `[low, low + range)` as two 32-bit
//! integers. Each symbol narrows the interval to its share of the table; once
//! `range` falls below [`TOP`] the settled top byte of `low` is shifted out.
//!
//! A byte is not final when it is shifted out: a later narrowing can overflow
//! `low` past 2^32, and the carry must ripple into bytes already produced. The
//! encoder therefore holds back one pending byte plus a run of `0xFF` bytes
//! (the only bytes a carry can change beyond the first) until a byte other
//! than `0xFF` settles them.

use log::{debug, trace};

use crate::config::{MAX_RESOLUTION, TOP};
use crate::error::Result;
use crate::io::ByteSink;

/// Range encoder writing to a [`ByteSink`].
///
/// Call [`RangeEncoder::finish`] after the last symbol; dropping the encoder
/// instead loses the held-back bytes and leaves the stream undecodable.
#[derive(Debug)]
pub struct RangeEncoder<W> {
    sink: W,
    low: u32,
    range: u32,
    /// Last settled byte not yet written; may still absorb a carry.
    pending: u8,
    /// Number of `0xFF` bytes held back after `pending`.
    ff_run: u32,
    /// No byte has been produced yet, so `pending` is a placeholder.
    awaiting_first: bool,
    symbols: u64,
}

impl<W: ByteSink> RangeEncoder<W> {
    /// Create an encoder writing to `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            low: 0,
            range: u32::MAX,
            pending: 0,
            ff_run: 0,
            awaiting_first: true,
            symbols: 0,
        }
    }

    /// Encode the interval `[low, high)` of a table with resolution `total`.
    ///
    /// The caller guarantees `low < high <= total <= MAX_RESOLUTION`; the
    /// stream layer validates this before calling. Only sink errors are
    /// reported.
    pub fn encode(&mut self, low: u32, high: u32, total: u32) -> Result<()> {
        debug_assert!(low < high, "empty interval [{low}, {high})");
        debug_assert!(high <= total && total <= MAX_RESOLUTION);

        let r = self.range / total;
        // The top symbol takes the rounding slack.
        if high < total {
            self.range = r * (high - low);
        } else {
            self.range -= r * low;
        }

        let (new_low, carry) = self.low.overflowing_add(r * low);
        if carry {
            trace!(
                "carry into pending byte {:#04x} across {} held 0xFF bytes",
                self.pending,
                self.ff_run
            );
            self.pending = self.pending.wrapping_add(1);
            while self.ff_run > 0 {
                self.sink.put(self.pending)?;
                self.pending = 0;
                self.ff_run -= 1;
            }
        }
        self.low = new_low;

        while self.range < TOP {
            let byte = (self.low >> 24) as u8;
            if self.awaiting_first {
                self.pending = byte;
                self.awaiting_first = false;
            } else if byte == 0xFF {
                self.ff_run += 1;
            } else {
                self.flush_held()?;
                self.pending = byte;
            }
            self.low <<= 8;
            self.range <<= 8;
        }

        self.symbols += 1;
        Ok(())
    }

    /// Number of symbols encoded so far.
    pub fn symbols(&self) -> u64 {
        self.symbols
    }

    /// Flush everything and return the sink.
    ///
    /// Writes the held-back bytes, then the shortest prefix of `low` that
    /// still lies inside the final interval once a decoder pads it with
    /// `0xFF`: bytes of `low` up to and including the first one that differs
    /// from `low + range`.
    pub fn finish(mut self) -> Result<W> {
        if !self.awaiting_first {
            self.flush_held()?;
        }

        let mut low = self.low;
        let mut end = self.low.wrapping_add(self.range);
        // `range` is non-zero, so the two differ within four bytes.
        for _ in 0..4 {
            let byte = (low >> 24) as u8;
            self.sink.put(byte)?;
            if (end >> 24) as u8 != byte {
                break;
            }
            low <<= 8;
            end <<= 8;
        }

        debug!("range encoder finished after {} symbols", self.symbols);
        Ok(self.sink)
    }

    fn flush_held(&mut self) -> Result<()> {
        self.sink.put(self.pending)?;
        while self.ff_run > 0 {
            self.sink.put(0xFF)?;
            self.ff_run -= 1;
        }
        Ok(())
    }
}
