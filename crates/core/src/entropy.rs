//! Sources of random bytes.
//!
//! Every source implements the same byte-filling contract, so extraction
//! never knows where its bits come from:
//! - [`SystemSource`]: the operating system CSPRNG (default)
//! - [`PrngSource`]: a fast generator over any `rand::RngCore`, optionally
//!   seeded for reproducible runs
//! - [`FixedSource`]: replays a caller-supplied byte sequence and fails once
//!   it runs out; exists to make extraction deterministically testable
//!
//! # Thread Safety
//!
//! Sources are driven through `&mut self` by the one generator that owns
//! them. [`SystemSource`] carries no state and can be constructed freely per
//! generator.

use crate::error::EntropyError;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Supplier of raw random bytes.
pub trait EntropySource {
    /// Copy `count` fresh bytes into `buffer` starting at `offset`.
    ///
    /// # Errors
    /// - `EntropyError::BufferTooSmall` if `offset + count` exceeds the buffer
    /// - `EntropyError::Exhausted` if a finite source has run dry
    /// - `EntropyError::SourceFailure` if the system generator is unavailable
    ///
    /// On error no bytes of `buffer` are guaranteed to be meaningful.
    fn fill(&mut self, buffer: &mut [u8], count: usize, offset: usize)
        -> Result<(), EntropyError>;

    /// Human-readable provenance, for diagnostics only.
    fn describe(&self) -> String;

    /// Rewind to the start of the byte stream, where that is meaningful.
    ///
    /// Sources without a replayable stream ignore this.
    fn reset(&mut self) {}
}

impl<S: EntropySource + ?Sized> EntropySource for Box<S> {
    fn fill(
        &mut self,
        buffer: &mut [u8],
        count: usize,
        offset: usize,
    ) -> Result<(), EntropyError> {
        (**self).fill(buffer, count, offset)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Resolve the destination slice for a fill request.
fn target(buffer: &mut [u8], count: usize, offset: usize) -> Result<&mut [u8], EntropyError> {
    let capacity = buffer.len();
    match offset.checked_add(count) {
        Some(end) if end <= capacity => Ok(&mut buffer[offset..end]),
        _ => Err(EntropyError::BufferTooSmall {
            count,
            offset,
            capacity,
        }),
    }
}

/// Cryptographically strong bytes from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSource;

impl SystemSource {
    /// Create a system source.
    pub fn new() -> Self {
        Self
    }
}

impl EntropySource for SystemSource {
    fn fill(
        &mut self,
        buffer: &mut [u8],
        count: usize,
        offset: usize,
    ) -> Result<(), EntropyError> {
        let dest = target(buffer, count, offset)?;
        OsRng
            .try_fill_bytes(dest)
            .map_err(|err| EntropyError::SourceFailure(err.to_string()))
    }

    fn describe(&self) -> String {
        "OsRng".to_string()
    }
}

/// Bytes drawn from a pseudo-random generator, 64 bits at a time.
///
/// Each `u64` from the generator is split into its little-endian bytes and
/// handed out in order; bytes left over from one fill are used first by the
/// next, so no generator output is skipped.
///
/// Not suitable where unpredictability matters. Use it for speed, or with a
/// seed for reproducible test and demo runs.
#[derive(Debug, Clone)]
pub struct PrngSource<R = ChaCha8Rng> {
    rng: R,
    label: String,
    seed: Option<(u64, fn(u64) -> R)>,
    word: [u8; 8],
    word_offset: usize,
}

impl PrngSource<ChaCha8Rng> {
    /// ChaCha8 seeded from a `u64`; `reset` re-seeds to replay the stream.
    pub fn seeded(seed: u64) -> Self {
        Self::from_seed_u64(seed, "ChaCha8Rng")
    }

    /// ChaCha8 seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy(), "ChaCha8Rng")
    }
}

impl<R: RngCore + SeedableRng> PrngSource<R> {
    /// Any seedable generator; `reset` re-seeds to replay the stream.
    pub fn from_seed_u64(seed: u64, label: &str) -> Self {
        let mut source = Self::with_rng(R::seed_from_u64(seed), format!("{label} (seed {seed})"));
        let make: fn(u64) -> R = R::seed_from_u64;
        source.seed = Some((seed, make));
        source
    }
}

impl<R: RngCore> PrngSource<R> {
    /// Wrap any generator. `label` is returned by `describe`.
    pub fn with_rng(rng: R, label: impl Into<String>) -> Self {
        Self {
            rng,
            label: label.into(),
            seed: None,
            word: [0; 8],
            word_offset: 8,
        }
    }

    /// Seed this source was created with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed.map(|(seed, _)| seed)
    }

    fn next_byte(&mut self) -> u8 {
        if self.word_offset == self.word.len() {
            self.word = self.rng.next_u64().to_le_bytes();
            self.word_offset = 0;
        }
        let byte = self.word[self.word_offset];
        self.word_offset += 1;
        byte
    }
}

impl<R: RngCore> EntropySource for PrngSource<R> {
    fn fill(
        &mut self,
        buffer: &mut [u8],
        count: usize,
        offset: usize,
    ) -> Result<(), EntropyError> {
        let dest = target(buffer, count, offset)?;
        for byte in dest.iter_mut() {
            *byte = self.next_byte();
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }

    fn reset(&mut self) {
        if let Some((seed, make)) = self.seed {
            self.rng = make(seed);
            self.word_offset = self.word.len();
        }
    }
}

/// Replays a fixed byte sequence.
///
/// Not for production use: once every byte has been handed out, further
/// requests fail with [`EntropyError::Exhausted`].
#[derive(Debug, Clone)]
pub struct FixedSource {
    bytes: Vec<u8>,
    position: usize,
}

impl FixedSource {
    /// Replay `bytes` in order.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            position: 0,
        }
    }

    /// Parse hex text such as `"C7 C9 00 2A"`. Whitespace is ignored.
    pub fn from_hex(hex: &str) -> Result<Self, EntropyError> {
        let digits: Vec<char> = hex.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() % 2 != 0 {
            return Err(EntropyError::InvalidHex(format!(
                "odd number of hex digits ({})",
                digits.len()
            )));
        }

        let bytes = digits
            .chunks(2)
            .map(|pair| {
                let text: String = pair.iter().collect();
                u8::from_str_radix(&text, 16)
                    .map_err(|_| EntropyError::InvalidHex(format!("bad byte {text:?}")))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        Ok(Self::new(bytes))
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// The full byte sequence being replayed.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl EntropySource for FixedSource {
    fn fill(
        &mut self,
        buffer: &mut [u8],
        count: usize,
        offset: usize,
    ) -> Result<(), EntropyError> {
        let dest = target(buffer, count, offset)?;
        let available = self.remaining();
        if count > available {
            return Err(EntropyError::Exhausted {
                requested: count,
                available,
            });
        }

        dest.copy_from_slice(&self.bytes[self.position..self.position + count]);
        self.position += count;
        Ok(())
    }

    fn describe(&self) -> String {
        "Fixed Bytes".to_string()
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}
