//! Cumulative frequency tables.
//!
//! A table `cum_freq[0..=M]` starts at zero, never decreases, and ends at the
//! total (the resolution). Symbol `s` owns the half-open interval
//! `[cum_freq[s], cum_freq[s + 1])`; a symbol whose interval is empty has zero
//! probability and can never be encoded.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::warn;

use crate::config::{Limits, MAX_RESOLUTION};
use crate::error::{Error, Result};

/// A validated cumulative frequency table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CumFreqTable {
    cum_freq: Vec<u32>,
}

impl CumFreqTable {
    /// Validate a cumulative frequency table.
    ///
    /// # Errors
    /// - `Error::TableTooShort` if fewer than 2 entries are given.
    /// - `Error::Decreasing` if an entry is smaller than its predecessor.
    /// - `Error::NonZeroStart` if the first entry is not 0.
    /// - `Error::ZeroResolution` if the total is 0.
    /// - `Error::ResolutionTooLarge` if the total exceeds [`MAX_RESOLUTION`].
    pub fn new(cum_freq: Vec<u32>) -> Result<Self> {
        if cum_freq.len() < 2 {
            return Err(Error::TableTooShort(cum_freq.len()));
        }
        if let Some(index) = cum_freq.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::Decreasing { index: index + 1 });
        }
        if cum_freq[0] != 0 {
            return Err(Error::NonZeroStart(cum_freq[0]));
        }
        let total = cum_freq[cum_freq.len() - 1];
        if total == 0 {
            return Err(Error::ZeroResolution);
        }
        if total > MAX_RESOLUTION {
            return Err(Error::ResolutionTooLarge {
                total: u64::from(total),
                max: MAX_RESOLUTION,
            });
        }
        Ok(Self { cum_freq })
    }

    /// Validate a table and check it against `limits`.
    pub fn with_limits(cum_freq: Vec<u32>, limits: &Limits) -> Result<Self> {
        let table = Self::new(cum_freq)?;
        table.check_limits(limits)?;
        Ok(table)
    }

    /// Build a table from per-symbol frequencies.
    ///
    /// # Errors
    /// Same as [`CumFreqTable::new`]; the running sum is checked in 64 bits so
    /// oversized inputs report `Error::ResolutionTooLarge` instead of wrapping.
    pub fn from_frequencies(freqs: &[u32]) -> Result<Self> {
        let mut cum_freq = Vec::with_capacity(freqs.len() + 1);
        cum_freq.push(0);
        let mut acc = 0u64;
        for &f in freqs {
            acc += u64::from(f);
            if acc > u64::from(MAX_RESOLUTION) {
                return Err(Error::ResolutionTooLarge {
                    total: acc,
                    max: MAX_RESOLUTION,
                });
            }
            cum_freq.push(acc as u32);
        }
        Self::new(cum_freq)
    }

    /// Quantize a probability distribution into a table with the given total.
    ///
    /// Counts are handed out one at a time, each to the symbol with the largest
    /// `p / count`, which greedily minimizes the KL divergence to `probs`.
    /// Symbols with positive probability always get a non-zero frequency as
    /// long as there are no more symbols than `resolution`; symbols with
    /// probability zero get none. `probs` need not be normalized.
    ///
    /// # Errors
    /// Returns `Error::InvalidProbability` for negative or non-finite entries
    /// or an all-zero distribution, and the usual table errors otherwise.
    pub fn from_probabilities(probs: &[f64], resolution: u32) -> Result<Self> {
        if probs.is_empty() {
            return Err(Error::TableTooShort(1));
        }
        if resolution == 0 {
            return Err(Error::ZeroResolution);
        }
        if resolution > MAX_RESOLUTION {
            return Err(Error::ResolutionTooLarge {
                total: u64::from(resolution),
                max: MAX_RESOLUTION,
            });
        }
        if let Some(&p) = probs.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(Error::InvalidProbability(p));
        }
        if probs.iter().all(|&p| p == 0.0) {
            return Err(Error::InvalidProbability(0.0));
        }
        if probs.len() > resolution as usize {
            warn!(
                "resolution {} is smaller than the alphabet ({} symbols)",
                resolution,
                probs.len()
            );
        }

        let mut counts = vec![0u32; probs.len()];
        let mut heap: BinaryHeap<Candidate> = probs
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > 0.0)
            .map(|(symbol, &p)| Candidate {
                score: f64::INFINITY,
                symbol,
                prob: p,
            })
            .collect();

        for _ in 0..resolution {
            let Some(mut best) = heap.pop() else { break };
            counts[best.symbol] += 1;
            best.score = best.prob / f64::from(counts[best.symbol]);
            heap.push(best);
        }

        Self::from_frequencies(&counts)
    }

    /// Check the table against alphabet and resolution bounds.
    pub fn check_limits(&self, limits: &Limits) -> Result<()> {
        if self.symbols() > limits.max_symbols() {
            return Err(Error::TooManySymbols {
                count: self.symbols(),
                max: limits.max_symbols(),
            });
        }
        if self.total() > limits.max_resolution() {
            return Err(Error::ResolutionTooLarge {
                total: u64::from(self.total()),
                max: limits.max_resolution(),
            });
        }
        Ok(())
    }

    /// Number of symbols `M`.
    pub fn symbols(&self) -> usize {
        self.cum_freq.len() - 1
    }

    /// The resolution `cum_freq[M]`.
    pub fn total(&self) -> u32 {
        self.cum_freq[self.cum_freq.len() - 1]
    }

    /// The raw entries, `M + 1` long.
    pub fn as_slice(&self) -> &[u32] {
        &self.cum_freq
    }

    /// Frequency of `symbol`, or `None` if it is out of range.
    pub fn frequency(&self, symbol: usize) -> Option<u32> {
        self.interval(symbol).ok().map(|(low, high)| high - low)
    }

    /// The `[low, high)` interval owned by `symbol`.
    ///
    /// # Errors
    /// Returns `Error::SymbolOutOfRange` if `symbol >= M`.
    pub fn interval(&self, symbol: usize) -> Result<(u32, u32)> {
        if symbol >= self.symbols() {
            return Err(Error::SymbolOutOfRange {
                symbol,
                alphabet: self.symbols(),
            });
        }
        Ok((self.cum_freq[symbol], self.cum_freq[symbol + 1]))
    }

    /// Like [`CumFreqTable::interval`], but also rejects empty intervals.
    pub fn encodable_interval(&self, symbol: usize) -> Result<(u32, u32)> {
        let (low, high) = self.interval(symbol)?;
        if low == high {
            return Err(Error::ZeroFrequency { symbol });
        }
        Ok((low, high))
    }

    /// Whether some symbol has an empty interval.
    pub fn has_zero_frequency(&self) -> bool {
        self.cum_freq.windows(2).any(|w| w[0] == w[1])
    }

    /// The entries extended to `len` by repeating the total.
    ///
    /// Every position beyond the supplied symbols then resolves to the last
    /// symbol with a non-empty interval, which is what fixed-width searches
    /// rely on. Tables already `len` entries or longer are returned as is.
    pub fn padded(&self, len: usize) -> Vec<u32> {
        let mut out = self.cum_freq.clone();
        if out.len() < len {
            out.resize(len, self.total());
        }
        out
    }

    /// Per-symbol probabilities `freq / total`.
    pub fn to_probabilities(&self) -> Vec<f64> {
        let total = f64::from(self.total());
        self.cum_freq
            .windows(2)
            .map(|w| f64::from(w[1] - w[0]) / total)
            .collect()
    }
}

impl TryFrom<Vec<u32>> for CumFreqTable {
    type Error = Error;

    fn try_from(cum_freq: Vec<u32>) -> Result<Self> {
        Self::new(cum_freq)
    }
}

impl TryFrom<&[u32]> for CumFreqTable {
    type Error = Error;

    fn try_from(cum_freq: &[u32]) -> Result<Self> {
        Self::new(cum_freq.to_vec())
    }
}

/// Heap entry for greedy quantization; ties go to the lower symbol.
#[derive(Debug)]
struct Candidate {
    score: f64,
    symbol: usize,
    prob: f64,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.symbol.cmp(&self.symbol))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}
