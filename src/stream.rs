//! Validating symbol streams.
//!
//! [`RangeEncoder`] and [`RangeDecoder`] trust their caller: an empty interval
//! or a table with an oversized total silently corrupts the stream. The types
//! here check every table and symbol before touching the byte stream, track
//! whether the stream is closed, and offer file-backed constructors.
//!
//! A sink or source failure part-way through a batch leaves the coder state
//! out of step with the bytes actually transferred, so the stream is closed
//! on any such error and later calls return `Error::Closed`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::{debug, error, warn};

use crate::config::Limits;
use crate::decoder::RangeDecoder;
use crate::encoder::RangeEncoder;
use crate::error::{Error, Result};
use crate::io::{ByteSink, ByteSource, ReadSource};
use crate::search::{BinarySearch, TableSearch};
use crate::table::CumFreqTable;

/// Encodes batches of symbol indices against validated tables.
///
/// The stream is finished by [`SymbolEncoder::close`] or
/// [`SymbolEncoder::finish`]. Dropping an open encoder finishes it too, but
/// errors are then only logged.
#[derive(Debug)]
pub struct SymbolEncoder<W: ByteSink> {
    encoder: Option<RangeEncoder<W>>,
    limits: Limits,
}

impl SymbolEncoder<BufWriter<File>> {
    /// Create (or truncate) a file and encode into it.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!("opened {} for encoding", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: ByteSink> SymbolEncoder<W> {
    /// Encode into `sink` with default [`Limits`].
    pub fn new(sink: W) -> Self {
        Self::with_limits(sink, Limits::default())
    }

    /// Encode into `sink`, rejecting tables outside `limits`.
    pub fn with_limits(sink: W, limits: Limits) -> Self {
        Self {
            encoder: Some(RangeEncoder::new(sink)),
            limits,
        }
    }

    /// Encode `symbols` in order, each against `table`.
    ///
    /// Every symbol is checked before the first one is encoded, so a rejected
    /// call leaves the stream untouched.
    ///
    /// # Errors
    /// - `Error::Closed` after [`SymbolEncoder::close`] or a failed write.
    /// - `Error::TooManySymbols` / `Error::ResolutionTooLarge` if the table is
    ///   outside the limits.
    /// - `Error::SymbolOutOfRange` / `Error::ZeroFrequency` for a symbol with
    ///   no encodable interval.
    /// - `Error::Io` if the sink fails; the stream is then closed.
    pub fn encode(&mut self, symbols: &[usize], table: &CumFreqTable) -> Result<()> {
        let encoder = self.encoder.as_mut().ok_or(Error::Closed)?;
        table.check_limits(&self.limits)?;

        if table.has_zero_frequency() {
            for &symbol in symbols {
                table.encodable_interval(symbol)?;
            }
        } else if let Some(&symbol) = symbols.iter().find(|&&s| s >= table.symbols()) {
            return Err(Error::SymbolOutOfRange {
                symbol,
                alphabet: table.symbols(),
            });
        }

        let cum_freq = table.as_slice();
        let total = table.total();
        let written = symbols
            .iter()
            .try_for_each(|&s| encoder.encode(cum_freq[s], cum_freq[s + 1], total));
        if let Err(e) = &written {
            warn!("closing encoding stream after error: {}", e);
            self.encoder = None;
        }
        written
    }

    /// Number of symbols encoded so far, or `None` once closed.
    pub fn symbols(&self) -> Option<u64> {
        self.encoder.as_ref().map(RangeEncoder::symbols)
    }

    /// Whether the stream has been closed.
    pub fn is_closed(&self) -> bool {
        self.encoder.is_none()
    }

    /// Flush the remaining bytes and close the sink.
    ///
    /// Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(encoder) = self.encoder.take() {
            drop(finish_encoder(encoder)?);
        }
        Ok(())
    }

    /// Flush the remaining bytes and return the sink.
    ///
    /// # Errors
    /// Returns `Error::Closed` if the stream was already closed.
    pub fn finish(mut self) -> Result<W> {
        let encoder = self.encoder.take().ok_or(Error::Closed)?;
        finish_encoder(encoder)
    }
}

impl<W: ByteSink> Drop for SymbolEncoder<W> {
    fn drop(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            warn!("symbol encoder dropped without close; finishing stream");
            if let Err(e) = finish_encoder(encoder) {
                error!("failed to finish dropped symbol encoder: {}", e);
            }
        }
    }
}

fn finish_encoder<W: ByteSink>(encoder: RangeEncoder<W>) -> Result<W> {
    let symbols = encoder.symbols();
    let mut sink = encoder.finish()?;
    sink.flush()?;
    debug!("closed encoding stream after {} symbols", symbols);
    Ok(sink)
}

/// Decodes batches of symbol indices against validated tables.
///
/// Tables are treated as padded with their total beyond the supplied
/// entries: any position past the last supplied boundary resolves to the last
/// symbol with a non-empty interval rather than failing. Reading past the end
/// of the stream yields `0xFF` fill, so `decode` always returns the requested
/// count; symbols decoded from fill carry no meaning.
///
/// The search strategy defaults to [`BinarySearch`]; any [`TableSearch`],
/// such as [`Simd256`](crate::Simd256), can be chosen with
/// [`SymbolDecoder::with_search`].
#[derive(Debug)]
pub struct SymbolDecoder<R, S = BinarySearch<u32>> {
    decoder: Option<RangeDecoder<R, S>>,
    limits: Limits,
}

impl SymbolDecoder<ReadSource<BufReader<File>>> {
    /// Open a file and decode from it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("opened {} for decoding", path.display());
        Self::new(ReadSource::new(BufReader::new(file)))
    }
}

impl<R: ByteSource> SymbolDecoder<R> {
    /// Decode from `source` with default [`Limits`].
    ///
    /// Reads the first 4 bytes of the stream.
    pub fn new(source: R) -> Result<Self> {
        Self::with_limits(source, Limits::default())
    }

    /// Decode from `source`, rejecting tables outside `limits`.
    pub fn with_limits(source: R, limits: Limits) -> Result<Self> {
        Self::with_search(source, BinarySearch::new(), limits)
    }
}

impl<R: ByteSource, S: TableSearch> SymbolDecoder<R, S> {
    /// Decode from `source` using `search` to resolve symbols.
    ///
    /// Tables the search cannot lay out (for example more than 256 symbols
    /// for [`Simd256`](crate::Simd256)) are rejected by `decode`.
    pub fn with_search(source: R, search: S, limits: Limits) -> Result<Self> {
        Ok(Self {
            decoder: Some(RangeDecoder::with_search(source, search)?),
            limits,
        })
    }

    /// Decode exactly `count` symbols, each against `table`.
    ///
    /// # Errors
    /// - `Error::Closed` after [`SymbolDecoder::close`] or a failed read.
    /// - `Error::TooManySymbols` / `Error::ResolutionTooLarge` if the table is
    ///   outside the limits or does not fit the search's layout.
    /// - `Error::Io` if the source fails; the stream is then closed.
    pub fn decode(&mut self, count: usize, table: &CumFreqTable) -> Result<Vec<usize>> {
        let decoder = self.decoder.as_mut().ok_or(Error::Closed)?;
        table.check_limits(&self.limits)?;

        let lookup = decoder.search().lookup_table(table)?;
        let total = table.total();
        let decoded = (0..count)
            .map(|_| decoder.decode(total, &lookup))
            .collect::<Result<Vec<_>>>();
        if let Err(e) = &decoded {
            warn!("closing decoding stream after error: {}", e);
            self.decoder = None;
        }
        decoded
    }

    /// Whether the stream has been closed.
    pub fn is_closed(&self) -> bool {
        self.decoder.is_none()
    }

    /// Release the source. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.decoder.take().is_some() {
            debug!("closed decoding stream");
        }
    }

    /// Close the stream and return the source.
    ///
    /// # Errors
    /// Returns `Error::Closed` if the stream was already closed.
    pub fn into_source(mut self) -> Result<R> {
        self.decoder
            .take()
            .map(RangeDecoder::into_source)
            .ok_or(Error::Closed)
    }
}
