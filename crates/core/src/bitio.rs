//! Bit-level access to entropy bytes.
//!
//! Three pieces live here, all MSB-first (the most significant bit of byte 0
//! is bit 0 of the stream):
//! - [`BitCursor`]: the rolling window over buffered entropy that index
//!   extraction slices from. Refilled from an [`EntropySource`] when the bits
//!   left are fewer than one window.
//! - [`BitWriter`]: packs symbol indices into bytes for `decode`.
//! - [`BitReader`]: reads packed indices back out for `encode`.
//!
//! Windows are at most 8 bits wide, so a single read touches at most two
//! adjacent bytes.
//!
//! # Example
//! ```
//! use puid_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b11, 2).unwrap();
//! // 10111 -> padded to 10111000
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! ```

use crate::entropy::EntropySource;
use crate::error::{BitIoError, EntropyError};

/// Widest window any alphabet of up to 256 symbols needs.
pub const MAX_WINDOW_BITS: usize = 8;

fn check_count(count: usize) -> Result<(), BitIoError> {
    if count > MAX_WINDOW_BITS {
        return Err(BitIoError::InvalidBitCount(count));
    }
    Ok(())
}

/// Slice `count` bits starting at bit `offset` of `data`.
///
/// Caller guarantees `offset + count <= data.len() * 8` and `1 <= count <= 8`.
fn slice_bits(data: &[u8], offset: usize, count: usize) -> u8 {
    let byte_idx = offset >> 3;
    let bit = offset & 7;

    let hi = data[byte_idx] as u16;
    let lo = data.get(byte_idx + 1).copied().unwrap_or(0) as u16;
    let word = (hi << 8) | lo;

    ((word >> (16 - bit - count)) & ((1u16 << count) - 1)) as u8
}

/// Buffered entropy plus a bit offset into it.
///
/// A cursor starts exhausted (`offset == bit_len`) and is filled lazily on
/// the first extraction. It is owned by exactly one generator and handed to
/// the extractor by `&mut`.
///
/// # Invariants
/// - `offset <= buffer.len() * 8`
#[derive(Debug, Clone)]
pub struct BitCursor {
    buffer: Vec<u8>,
    offset: usize,
}

impl BitCursor {
    /// Create an exhausted cursor over a buffer of `byte_len` bytes.
    pub fn new(byte_len: usize) -> Self {
        Self {
            buffer: vec![0; byte_len],
            offset: byte_len * 8,
        }
    }

    /// Total bits the buffer holds.
    pub fn bit_len(&self) -> usize {
        self.buffer.len() * 8
    }

    /// Current bit position.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bits left between the offset and the end of the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.bit_len() - self.offset
    }

    /// Raw buffered bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Read `count` bits at the current offset without advancing.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count is 0 or more than 8
    /// - `BitIoError::InsufficientBits` if fewer than `count` bits remain
    pub fn peek(&self, count: usize) -> Result<u8, BitIoError> {
        if count == 0 {
            return Err(BitIoError::InvalidBitCount(count));
        }
        check_count(count)?;

        let available = self.bits_remaining();
        if count > available {
            return Err(BitIoError::InsufficientBits {
                requested: count,
                available,
            });
        }

        Ok(slice_bits(&self.buffer, self.offset, count))
    }

    /// Move the offset forward, stopping at the end of the buffer.
    pub fn advance(&mut self, bits: usize) {
        self.offset = (self.offset + bits).min(self.bit_len());
    }

    /// Replace the whole buffer with fresh bytes and rewind to bit 0.
    ///
    /// Leftover bits are discarded. Returns the number of bytes drawn.
    pub fn refill(&mut self, source: &mut dyn EntropySource) -> Result<usize, EntropyError> {
        let count = self.buffer.len();
        if let Err(err) = source.fill(&mut self.buffer, count, 0) {
            self.reset();
            return Err(err);
        }
        self.offset = 0;
        Ok(count)
    }

    /// Carry the last byte to the front and refill the rest.
    ///
    /// The offset lands on the first leftover bit inside the carried byte,
    /// so bits not yet consumed stay in the stream. Only valid when fewer
    /// than 8 bits remain. Returns the number of bytes drawn.
    pub fn refill_with_carry(
        &mut self,
        source: &mut dyn EntropySource,
    ) -> Result<usize, EntropyError> {
        let len = self.buffer.len();
        if len < 2 {
            return self.refill(source);
        }

        let leftover = self.bits_remaining().min(7);
        self.buffer[0] = self.buffer[len - 1];

        let count = len - 1;
        if let Err(err) = source.fill(&mut self.buffer, count, 1) {
            self.reset();
            return Err(err);
        }
        self.offset = 8 - leftover;
        Ok(count)
    }

    /// Discard all buffered bits.
    pub fn reset(&mut self) {
        self.buffer.iter_mut().for_each(|b| *b = 0);
        self.offset = self.bit_len();
    }
}

/// Packs values of up to 8 bits MSB-first into a byte buffer.
///
/// The final partial byte is padded with trailing zeros.
///
/// # Invariants
/// - `pending_bits` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    pending: u8,
    pending_bits: usize,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `count` bits of `value`.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 8.
    pub fn write_bits(&mut self, value: u8, count: usize) -> Result<(), BitIoError> {
        check_count(count)?;

        let mut remaining = count;
        while remaining > 0 {
            let take = remaining.min(8 - self.pending_bits);
            let shift = remaining - take;
            let bits = ((value as u16 >> shift) & ((1u16 << take) - 1)) as u8;

            self.pending |= bits << (8 - self.pending_bits - take);
            self.pending_bits += take;
            remaining -= take;

            if self.pending_bits == 8 {
                self.bytes.push(self.pending);
                self.pending = 0;
                self.pending_bits = 0;
            }
        }

        Ok(())
    }

    /// Total bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.pending_bits
    }

    /// Flush the padded final byte and return the output.
    pub fn finish(mut self) -> Vec<u8> {
        if self.pending_bits > 0 {
            self.bytes.push(self.pending);
        }
        self.bytes
    }
}

/// Reads values of up to 8 bits MSB-first from a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader at bit 0 of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Read the next `count` bits.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 8
    /// - `BitIoError::InsufficientBits` if fewer than `count` bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u8, BitIoError> {
        check_count(count)?;
        if count == 0 {
            return Ok(0);
        }

        let available = self.bits_remaining();
        if count > available {
            return Err(BitIoError::InsufficientBits {
                requested: count,
                available,
            });
        }

        let value = slice_bits(self.data, self.position, count);
        self.position += count;
        Ok(value)
    }

    /// Bits left to read.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.position
    }
}
