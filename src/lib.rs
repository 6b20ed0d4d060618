//! # Range Coding
//!
//! *Byte-oriented arithmetic coding driven by caller-supplied frequency tables.*
//!
//! ## Intuition First
//!
//! Picture the interval `[0, 1)`. To encode a symbol, cut the interval into
//! slices whose widths match the symbol probabilities and keep the slice of
//! the symbol you saw. After many symbols the remaining sliver is tiny, and
//! any number inside it identifies the whole sequence. Likely symbols shrink
//! the sliver only a little, so they cost few digits.
//!
//! A range coder does this with integers. The interval is a 32-bit `low` and
//! `range`; whenever the range gets small, the top byte of `low` can no longer
//! change (except through a carry) and is written out.
//!
//! ## The Problem
//!
//! Fixed-width integer arithmetic makes the idea practical but creates two
//! traps:
//! - **Carries**: narrowing can push `low` past 2^32 after its top bytes were
//!   already shifted out. Bytes that might still change must be held back.
//! - **Precision**: `range / total` must never reach zero. The coder keeps
//!   `range >= 2^24`, so tables may not exceed a total of 2^24.
//!
//! ## Historical Context
//!
//! ```text
//! 1976  Rissanen    Arithmetic coding with finite precision
//! 1979  Martin      Range encoding: byte-wise output of the interval
//! 1987  Witten      Practical arithmetic coding (Witten, Neal, Cleary)
//! 1998  Schindler   Byte-wise range coder with carry buffering
//! 1999  Subbotin    Carry-less range coder
//! 2006  Okanohara   Compact carry-buffer range coder with SIMD decoding
//! ```
//!
//! ## Mathematical Formulation
//!
//! For symbol `s` with interval `[c_s, c_{s+1})` in a table of total `T`:
//!
//! ```text
//! r      = floor(range / T)
//! low'   = low + r * c_s
//! range' = r * (c_{s+1} - c_s)          if c_{s+1} < T
//!        = range - r * c_s              otherwise
//! ```
//!
//! The decoder recovers `s` from `min(T - 1, floor(code / r))` with a search
//! over the cumulative table, then applies the same update to `code`.
//!
//! ## Complexity Analysis
//!
//! - **Time**: one division per symbol plus an `O(log M)` search, or a
//!   constant number of vector compares for 256-symbol `i16` tables.
//! - **Space**: `O(1)` coder state; tables are borrowed per call.
//!
//! ## Failure Modes
//!
//! 1. **Mismatched models**: decoding with a different table sequence than the
//!    encoder used yields wrong symbols without any error.
//! 2. **Missing flush**: a stream not passed through `finish` lacks its last
//!    bytes and cannot be decoded.
//! 3. **Truncation**: reads past the end produce `0xFF` fill, never an error.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - [`RangeEncoder`] / [`RangeDecoder`]: the unchecked core coder.
//! - [`BinarySearch`] and [`Simd256`]: interchangeable symbol lookups.
//! - [`SymbolEncoder`] / [`SymbolDecoder`]: validating streams over sinks,
//!   sources and files.
//! - [`CumFreqTable`]: validated tables, including quantization of
//!   probability vectors.
//!
//! ```
//! use range_coder::{CumFreqTable, SymbolDecoder, SymbolEncoder};
//!
//! let table = CumFreqTable::new(vec![0, 1, 2]).unwrap();
//! let input = [0, 1, 0, 1, 0, 1, 0, 1];
//!
//! let mut encoder = SymbolEncoder::new(Vec::new());
//! encoder.encode(&input, &table).unwrap();
//! let bytes = encoder.finish().unwrap();
//!
//! let mut decoder = SymbolDecoder::new(&bytes[..]).unwrap();
//! assert_eq!(decoder.decode(input.len(), &table).unwrap(), input);
//! ```
//!
//! ## References
//!
//! - Martin, G. N. N. (1979). "Range encoding: an algorithm for removing redundancy from a digitised message."
//! - Witten, I. H., Neal, R. M., Cleary, J. G. (1987). "Arithmetic coding for data compression."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod io;
pub mod search;
pub mod stream;
pub mod table;

pub use config::{Limits, MAX_RESOLUTION};
pub use decoder::RangeDecoder;
pub use encoder::RangeEncoder;
pub use error::{Error, Result};
pub use io::{ByteSink, ByteSource, ReadSource, END_OF_STREAM_BYTE};
pub use search::{
    pack_i16, BinarySearch, Frequency, Simd256, SimdLevel, SymbolSearch, TableSearch,
};
pub use stream::{SymbolDecoder, SymbolEncoder};
pub use table::CumFreqTable;
