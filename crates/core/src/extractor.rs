//! Rejection sampling of symbol indices from a bit stream.
//!
//! Each attempt reads one `window_bits` wide window at the cursor. A value
//! below the alphabet size is accepted and the cursor moves a full window.
//! A rejected value moves the cursor only as far as its shift table entry
//! says, so bits that could still start a valid window are reused.
//!
//! # Buffer sizing
//!
//! The cursor holds one ID's worth of window bits, rounded up to whole
//! bytes. When the alphabet size is a power of two and that byte count is a
//! multiple of 8, an ID consumes the buffer exactly and a refill replaces
//! all of it. Otherwise the buffer gets one extra byte and each refill
//! carries the last byte to the front so no buffered bits are lost.

use crate::bitio::BitCursor;
use crate::entropy::EntropySource;
use crate::error::Result;
use crate::metrics::{is_pow2, shift_lookup, AlphabetMetrics, GenerationStats};
use crate::settings::Settings;
use tracing::{debug, warn};

/// Turns cursor bits into uniformly distributed indices in `[0, n)`.
#[derive(Debug, Clone)]
pub struct IndexExtractor {
    symbol_count: usize,
    window_bits: usize,
    shifts: Vec<u8>,
    whole_refill: bool,
    buffer_len: usize,
}

impl IndexExtractor {
    /// Prepare extraction for an alphabet and its settings.
    pub fn new(metrics: &AlphabetMetrics, settings: &Settings) -> Self {
        let bytes_per_id = settings.bytes_per_id();
        let whole_refill = is_pow2(metrics.symbol_count) && bytes_per_id % 8 == 0;
        let buffer_len = if whole_refill {
            bytes_per_id
        } else {
            bytes_per_id + 1
        };

        Self {
            symbol_count: metrics.symbol_count,
            window_bits: metrics.window_bits,
            shifts: shift_lookup(&metrics.shift_rules, metrics.window_bits),
            whole_refill,
            buffer_len,
        }
    }

    /// An exhausted cursor sized for this extractor.
    pub fn cursor(&self) -> BitCursor {
        BitCursor::new(self.buffer_len)
    }

    /// Whether refills replace the whole buffer rather than carrying a byte.
    pub fn whole_refill(&self) -> bool {
        self.whole_refill
    }

    /// Cursor buffer size in bytes.
    pub fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    /// Bits read per attempt.
    pub fn window_bits(&self) -> usize {
        self.window_bits
    }

    /// Extract one accepted index.
    ///
    /// # Errors
    /// Entropy source failures are returned as-is and never retried. The
    /// cursor is emptied when that happens.
    pub fn next_index(
        &self,
        cursor: &mut BitCursor,
        source: &mut dyn EntropySource,
        stats: &mut GenerationStats,
    ) -> Result<u8> {
        loop {
            if cursor.bits_remaining() < self.window_bits {
                self.refill(cursor, source, stats)?;
            }

            let value = cursor.peek(self.window_bits)?;
            if (value as usize) < self.symbol_count {
                cursor.advance(self.window_bits);
                stats.symbols_accepted += 1;
                stats.bits_consumed += self.window_bits as u64;
                return Ok(value);
            }

            let shift = self.shifts[value as usize] as usize;
            cursor.advance(shift);
            stats.windows_rejected += 1;
            stats.bits_consumed += shift as u64;
        }
    }

    /// Extract `count` accepted indices, in order.
    pub fn next_indices(
        &self,
        count: usize,
        cursor: &mut BitCursor,
        source: &mut dyn EntropySource,
        stats: &mut GenerationStats,
    ) -> Result<Vec<u8>> {
        let mut indices = Vec::with_capacity(count);
        for _ in 0..count {
            indices.push(self.next_index(cursor, source, stats)?);
        }
        Ok(indices)
    }

    fn refill(
        &self,
        cursor: &mut BitCursor,
        source: &mut dyn EntropySource,
        stats: &mut GenerationStats,
    ) -> Result<()> {
        let refilled = if self.whole_refill {
            cursor.refill(source)
        } else {
            cursor.refill_with_carry(source)
        };

        match refilled {
            Ok(bytes) => {
                debug!(
                    whole = self.whole_refill,
                    bytes,
                    offset = cursor.offset(),
                    "refilled entropy buffer"
                );
                stats.refills += 1;
                stats.bytes_drawn += bytes as u64;
                Ok(())
            }
            Err(err) => {
                warn!(source = %source.describe(), error = %err, "entropy source failed");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{Alphabet, Charset};
    use crate::entropy::FixedSource;
    use crate::error::{EntropyError, Error};
    use crate::settings::EntropyTarget;

    fn extractor(alphabet: Alphabet, bits: f64) -> IndexExtractor {
        let metrics = AlphabetMetrics::new(&alphabet);
        let settings = Settings::new(EntropyTarget::Bits(bits), &metrics).unwrap();
        IndexExtractor::new(&metrics, &settings)
    }

    #[test]
    fn test_buffer_sizing() {
        // 22 * 6 bits = 17 bytes, not a multiple of 8
        let ex = extractor(Charset::Safe64.into(), 128.0);
        assert!(!ex.whole_refill());
        assert_eq!(ex.buffer_len(), 18);

        // 16 * 4 bits = 8 bytes
        let ex = extractor(Charset::Hex.into(), 64.0);
        assert!(ex.whole_refill());
        assert_eq!(ex.buffer_len(), 8);

        // 10 * log2(52) = 57 bits = 8 bytes, but 52 symbols
        let ex = extractor(Charset::Alpha.into(), 55.0);
        assert!(!ex.whole_refill());
        assert_eq!(ex.buffer_len(), 9);

        // 3 * log2(36) = 15.5 bits = 2 bytes
        let ex = extractor(Charset::AlphaNumLower.into(), 12.0);
        assert!(!ex.whole_refill());
        assert_eq!(ex.buffer_len(), 3);
    }

    #[test]
    fn test_hex_indices() {
        let ex = extractor(Charset::Hex.into(), 8.0);
        let mut cursor = ex.cursor();
        let mut source = FixedSource::new(vec![0xC7, 0xC9]);
        let mut stats = GenerationStats::new();

        let indices = ex.next_indices(4, &mut cursor, &mut source, &mut stats).unwrap();
        assert_eq!(indices, vec![0xC, 0x7, 0xC, 0x9]);
        assert_eq!(stats.windows_rejected, 0);
        assert_eq!(stats.bytes_drawn, 2);
    }

    #[test]
    fn test_rejection_uses_shift() {
        // alphaLower, 5-bit windows. 0xF1 = 11110 001..: 30 is rejected and
        // shifts 3 bits, then 10001 = 17 is accepted.
        let ex = extractor(Charset::AlphaLower.into(), 5.0);
        let mut cursor = ex.cursor();
        let mut source = FixedSource::new(vec![0xF1, 0xB1]);
        let mut stats = GenerationStats::new();

        let index = ex.next_index(&mut cursor, &mut source, &mut stats).unwrap();
        assert_eq!(index, 17);
        assert_eq!(stats.windows_rejected, 1);
        assert_eq!(stats.bits_consumed, 8);
    }

    #[test]
    fn test_exhausted_source_propagates() {
        let ex = extractor(Charset::Hex.into(), 8.0);
        let mut cursor = ex.cursor();
        let mut source = FixedSource::new(vec![0xC7]);
        let mut stats = GenerationStats::new();

        ex.next_indices(2, &mut cursor, &mut source, &mut stats).unwrap();
        let err = ex.next_index(&mut cursor, &mut source, &mut stats).unwrap_err();
        assert!(matches!(err, Error::Entropy(EntropyError::Exhausted { .. })));
        assert_eq!(cursor.bits_remaining(), 0);
    }
}
