//! Cumulative-frequency to symbol search.
//!
//! The decoder turns a code position into a symbol by finding the unique index
//! `s` with `cum_freq[s] <= pos < cum_freq[s + 1]`. Strategies differ only in
//! speed: every strategy returns the same index for the same table, so the
//! bitstream does not depend on which one a decoder uses.
//!
//! Tables may be stored with a constant `base` added to every entry. This lets
//! a 16-bit signed table cover totals up to 65535 by shifting all entries down
//! by 32768. The decoder maps positions into table space with
//! [`Frequency::from_position`] and back with [`Frequency::to_position`].

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use log::debug;

use crate::error::{Error, Result};
use crate::table::CumFreqTable;

/// Number of symbols handled by [`Simd256`].
pub const SIMD_ALPHABET: usize = 256;

/// Integer type usable as a cumulative frequency table entry.
pub trait Frequency: Copy + Ord + fmt::Debug {
    /// Map a coder position to table space by adding `base`.
    fn from_position(pos: u32, base: i32) -> Self;

    /// Map a table entry back to coder space by subtracting `base`.
    fn to_position(self, base: i32) -> u32;
}

macro_rules! impl_frequency {
    ($($t:ty),*) => {
        $(
            impl Frequency for $t {
                #[inline]
                fn from_position(pos: u32, base: i32) -> Self {
                    (i64::from(pos) + i64::from(base)) as $t
                }

                #[inline]
                fn to_position(self, base: i32) -> u32 {
                    (i64::from(self) - i64::from(base)) as u32
                }
            }
        )*
    };
}

impl_frequency!(u16, u32, i16, i32);

/// A symbol lookup strategy.
pub trait SymbolSearch {
    /// Table entry type.
    type Freq: Frequency;

    /// Offset stored in every table entry.
    fn base(&self) -> i32 {
        0
    }

    /// Return `s` such that `cum_freq[s] <= pos < cum_freq[s + 1]`.
    ///
    /// `pos` must lie in `[cum_freq[0], cum_freq[M])`.
    fn find(&self, cum_freq: &[Self::Freq], pos: Self::Freq) -> usize;
}

/// A search that can prepare its lookup table from a [`CumFreqTable`].
///
/// Used by [`SymbolDecoder`](crate::SymbolDecoder), which accepts validated
/// tables and leaves the storage layout to the strategy.
pub trait TableSearch: SymbolSearch {
    /// The entries of `table` in the layout [`SymbolSearch::find`] expects.
    fn lookup_table<'t>(&self, table: &'t CumFreqTable) -> Result<Cow<'t, [Self::Freq]>>;
}

/// Binary search over tables of any length and entry width.
pub struct BinarySearch<F> {
    base: i32,
    _freq: PhantomData<F>,
}

impl<F> BinarySearch<F> {
    /// Binary search over tables stored without offset.
    pub const fn new() -> Self {
        Self::with_base(0)
    }

    /// Binary search over tables whose entries are stored as `value + base`.
    pub const fn with_base(base: i32) -> Self {
        Self {
            base,
            _freq: PhantomData,
        }
    }
}

impl<F> Default for BinarySearch<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Clone for BinarySearch<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for BinarySearch<F> {}

impl<F> fmt::Debug for BinarySearch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinarySearch")
            .field("base", &self.base)
            .finish()
    }
}

impl<F: Frequency> SymbolSearch for BinarySearch<F> {
    type Freq = F;

    fn base(&self) -> i32 {
        self.base
    }

    #[inline]
    fn find(&self, cum_freq: &[F], pos: F) -> usize {
        // Number of interval ends at or below `pos`.
        cum_freq[1..].partition_point(|&f| f <= pos)
    }
}

impl TableSearch for BinarySearch<u32> {
    fn lookup_table<'t>(&self, table: &'t CumFreqTable) -> Result<Cow<'t, [u32]>> {
        if self.base == 0 {
            return Ok(Cow::Borrowed(table.as_slice()));
        }
        // Unsigned entries cannot hold a negative shift of zero.
        let Ok(base) = u32::try_from(self.base) else {
            return Err(Error::ResolutionTooLarge {
                total: u64::from(table.total()),
                max: 0,
            });
        };
        if table.total().checked_add(base).is_none() {
            return Err(Error::ResolutionTooLarge {
                total: u64::from(table.total()),
                max: u32::MAX - base,
            });
        }
        Ok(Cow::Owned(
            table
                .as_slice()
                .iter()
                .map(|&f| u32::from_position(f, self.base))
                .collect(),
        ))
    }
}

/// Vector capability used by [`Simd256`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdLevel {
    /// Binary search fallback.
    Scalar,
    /// x86_64 SSE2, eight 16-bit lanes per compare.
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    Sse2,
}

/// Search specialized to 256 symbols with `i16` entries.
///
/// Tables must hold at least 257 entries; build them with [`pack_i16`], which
/// pads short alphabets with the total. On x86_64 the search compares 16
/// entries per step with SSE2; elsewhere it falls back to binary search.
#[derive(Debug, Clone, Copy)]
pub struct Simd256 {
    base: i16,
    level: SimdLevel,
}

impl Simd256 {
    /// Detect the best level, with entries stored as `value - 32768`.
    pub fn new() -> Self {
        Self::with_base(i16::MIN)
    }

    /// Detect the best level, with entries stored as `value + base`.
    pub fn with_base(base: i16) -> Self {
        let level = detect_level();
        debug!("256-symbol search using {:?}", level);
        Self { base, level }
    }

    /// Always use the binary search fallback.
    pub fn portable(base: i16) -> Self {
        Self {
            base,
            level: SimdLevel::Scalar,
        }
    }

    /// The level selected at construction.
    pub fn level(&self) -> SimdLevel {
        self.level
    }
}

impl Default for Simd256 {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolSearch for Simd256 {
    type Freq = i16;

    fn base(&self) -> i32 {
        i32::from(self.base)
    }

    #[inline]
    fn find(&self, cum_freq: &[i16], pos: i16) -> usize {
        assert!(
            cum_freq.len() > SIMD_ALPHABET,
            "256-symbol search needs 257 table entries, got {}",
            cum_freq.len()
        );
        match self.level {
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            SimdLevel::Sse2 => {
                // SAFETY: SSE2 is always available on x86_64, and the assert
                // above guarantees the 256 entries read are in bounds.
                unsafe { find_sse2(cum_freq.as_ptr(), pos) }
            }
            SimdLevel::Scalar => cum_freq[1..=SIMD_ALPHABET].partition_point(|&f| f <= pos),
        }
    }
}

impl TableSearch for Simd256 {
    fn lookup_table<'t>(&self, table: &'t CumFreqTable) -> Result<Cow<'t, [i16]>> {
        pack_i16(table, self.base).map(Cow::Owned)
    }
}

fn detect_level() -> SimdLevel {
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("sse2") {
            return SimdLevel::Sse2;
        }
    }

    SimdLevel::Scalar
}

/// Find the first entry greater than `pos`, 16 entries per iteration.
///
/// `cum_freq[0] <= pos` holds for every valid position, so the first
/// crossing is never at index 0. If no entry among the first 256 exceeds
/// `pos`, the answer is the last symbol.
///
/// # Safety
/// Caller must ensure SSE2 is available and that 256 `i16`s are readable
/// from `cum_freq`.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "sse2")]
unsafe fn find_sse2(cum_freq: *const i16, pos: i16) -> usize {
    use std::arch::x86_64::*;

    let needle = _mm_set1_epi16(pos);
    let mut i = 0;
    while i < SIMD_ALPHABET {
        let lo = _mm_loadu_si128(cum_freq.add(i) as *const __m128i);
        let hi = _mm_loadu_si128(cum_freq.add(i + 8) as *const __m128i);
        let lo_gt = _mm_cmplt_epi16(needle, lo);
        let hi_gt = _mm_cmplt_epi16(needle, hi);
        // Two mask bits per 16-bit lane.
        let mask = ((_mm_movemask_epi8(hi_gt) as u32) << 16) | (_mm_movemask_epi8(lo_gt) as u32);
        if mask != 0 {
            return (i + (mask.trailing_zeros() as usize >> 1)).saturating_sub(1);
        }
        i += 16;
    }
    SIMD_ALPHABET - 1
}

/// Pack a table into the 257-entry biased `i16` layout [`Simd256`] expects.
///
/// Entries are stored as `value + base` and padded to 257 with the total.
///
/// # Errors
/// Returns `Error::TooManySymbols` for more than 256 symbols, and
/// `Error::ResolutionTooLarge` if the total does not fit after biasing.
pub fn pack_i16(table: &CumFreqTable, base: i16) -> Result<Vec<i16>> {
    if table.symbols() > SIMD_ALPHABET {
        return Err(Error::TooManySymbols {
            count: table.symbols(),
            max: SIMD_ALPHABET,
        });
    }
    let max = (i32::from(i16::MAX) - i32::from(base)) as u32;
    if table.total() > max {
        return Err(Error::ResolutionTooLarge {
            total: u64::from(table.total()),
            max,
        });
    }
    let base = i32::from(base);
    Ok(table
        .padded(SIMD_ALPHABET + 1)
        .into_iter()
        .map(|f| i16::from_position(f, base))
        .collect())
}
