//! ID generation.
//!
//! A [`Generator`] ties one alphabet, one entropy target and one entropy
//! source together. Everything but the bit cursor is fixed at construction,
//! so `generate()` is the only call that moves state forward.
//!
//! # Thread Safety
//!
//! A generator is `Send` but takes `&mut self` to generate. Use one per
//! thread, or wrap it in a `Mutex`.
//!
//! # Example
//! ```
//! use puid_core::{Charset, FixedSource, Generator};
//!
//! let mut gen = Generator::builder()
//!     .bits(8.0)
//!     .charset(Charset::Hex)
//!     .source(FixedSource::new(vec![0xC7, 0xC9]))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(gen.generate().unwrap(), "c7");
//! assert_eq!(gen.generate().unwrap(), "c9");
//! assert!(gen.generate().is_err());
//! ```

use crate::alphabet::{Alphabet, Charset};
use crate::bitio::{BitCursor, BitReader, BitWriter};
use crate::encoder::SymbolEncoder;
use crate::entropy::{EntropySource, SystemSource};
use crate::error::{EncodingError, Error, Result};
use crate::extractor::IndexExtractor;
use crate::metrics::{AlphabetMetrics, GenerationStats};
use crate::settings::{risk_after, EntropyTarget, RepeatRisk, Settings};
use std::fmt;
use tracing::debug;

/// Configuration record for a [`Generator`].
///
/// Defaults: 128 bits, the safe64 alphabet, the system CSPRNG.
pub struct GeneratorBuilder {
    target: EntropyTarget,
    alphabet: AlphabetChoice,
    source: Option<Box<dyn EntropySource + Send>>,
}

enum AlphabetChoice {
    Ready(Alphabet),
    Custom(String),
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self {
            target: EntropyTarget::default(),
            alphabet: AlphabetChoice::Ready(Alphabet::default()),
            source: None,
        }
    }
}

impl GeneratorBuilder {
    /// Start from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver at least `bits` of entropy per ID.
    pub fn bits(mut self, bits: f64) -> Self {
        self.target = EntropyTarget::Bits(bits);
        self
    }

    /// Size IDs so `total` of them repeat with at most the given risk.
    pub fn total_risk(mut self, total: f64, risk: RepeatRisk) -> Self {
        self.target = EntropyTarget::TotalRisk { total, risk };
        self
    }

    /// Use a prepared entropy target.
    pub fn target(mut self, target: EntropyTarget) -> Self {
        self.target = target;
        self
    }

    /// Use a predefined alphabet.
    pub fn charset(mut self, charset: Charset) -> Self {
        self.alphabet = AlphabetChoice::Ready(charset.into());
        self
    }

    /// Use a custom alphabet, validated at `build()`.
    pub fn chars(mut self, symbols: &str) -> Self {
        self.alphabet = AlphabetChoice::Custom(symbols.to_string());
        self
    }

    /// Use an already validated alphabet.
    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = AlphabetChoice::Ready(alphabet);
        self
    }

    /// Draw entropy from `source` instead of the system CSPRNG.
    pub fn source<S: EntropySource + Send + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Validate and derive settings.
    ///
    /// # Errors
    /// - `Error::Alphabet` if a custom alphabet fails validation
    /// - `Error::Config` if the entropy target is out of range
    pub fn build(self) -> Result<Generator> {
        let alphabet = match self.alphabet {
            AlphabetChoice::Ready(alphabet) => alphabet,
            AlphabetChoice::Custom(symbols) => Alphabet::new(&symbols)?,
        };
        let source = self
            .source
            .unwrap_or_else(|| Box::new(SystemSource::new()));

        let metrics = AlphabetMetrics::new(&alphabet);
        let settings = Settings::new(self.target, &metrics)?;
        let extractor = IndexExtractor::new(&metrics, &settings);
        let encoder = SymbolEncoder::new(&alphabet);
        let cursor = extractor.cursor();

        debug!(
            bits = settings.bits,
            length = settings.length,
            symbols = alphabet.len(),
            encoder = encoder.kind(),
            source = %source.describe(),
            "configured generator"
        );

        Ok(Generator {
            alphabet,
            metrics,
            settings,
            extractor,
            encoder,
            source,
            cursor,
            stats: GenerationStats::new(),
        })
    }
}

/// Produces IDs of a fixed length from one alphabet.
pub struct Generator {
    alphabet: Alphabet,
    metrics: AlphabetMetrics,
    settings: Settings,
    extractor: IndexExtractor,
    encoder: SymbolEncoder,
    source: Box<dyn EntropySource + Send>,
    cursor: BitCursor,
    stats: GenerationStats,
}

impl Generator {
    /// Configure a generator.
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    /// A generator with every default.
    pub fn new() -> Result<Self> {
        GeneratorBuilder::new().build()
    }

    /// Produce the next ID.
    ///
    /// # Errors
    /// Returns `Error::Entropy` if the source fails or runs out. Nothing is
    /// retried.
    pub fn generate(&mut self) -> Result<String> {
        let indices = self.extractor.next_indices(
            self.settings.length,
            &mut self.cursor,
            self.source.as_mut(),
            &mut self.stats,
        )?;

        let id = self.render(&indices)?;
        self.stats.ids_generated += 1;
        Ok(id)
    }

    fn render(&self, indices: &[u8]) -> Result<String> {
        let mut id = String::with_capacity(indices.len());
        for &index in indices {
            id.push(self.encoder.map(index)?);
        }
        Ok(id)
    }

    /// Entropy bits per ID.
    pub fn bits(&self) -> f64 {
        self.settings.bits
    }

    /// Entropy bits per symbol.
    pub fn bits_per_symbol(&self) -> f64 {
        self.settings.bits_per_symbol
    }

    /// Symbols per ID.
    pub fn length(&self) -> usize {
        self.settings.length
    }

    /// Alphabet symbols as a string.
    pub fn alphabet(&self) -> &str {
        self.alphabet.as_str()
    }

    /// Entropy representation efficiency.
    pub fn ere(&self) -> f64 {
        self.settings.ere
    }

    /// Where entropy comes from.
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// "1 in N" odds of a repeat after `total` IDs.
    pub fn risk_after(&self, total: f64) -> f64 {
        risk_after(total, self.settings.bits)
    }

    /// Derived settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Alphabet metrics.
    pub fn metrics(&self) -> &AlphabetMetrics {
        &self.metrics
    }

    /// Runtime counters.
    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Empty the cursor, rewind the source and clear counters.
    ///
    /// With a fixed or seeded source the next IDs repeat the sequence from
    /// the start.
    pub fn reset(&mut self) {
        self.cursor.reset();
        self.source.reset();
        self.stats = GenerationStats::new();
    }

    /// Pack an ID's symbol indices into bytes, `window_bits` per symbol,
    /// MSB-first and zero padded.
    ///
    /// # Errors
    /// - `EncodingError::DecodeUnsupported` for multi-byte alphabets
    /// - `EncodingError::LengthMismatch` if `id` is not `length` symbols
    /// - `EncodingError::UnknownSymbol` for symbols outside the alphabet
    pub fn decode(&self, id: &str) -> Result<Vec<u8>> {
        if !self.encoder.supports_decode() {
            return Err(EncodingError::DecodeUnsupported.into());
        }

        let actual = id.chars().count();
        if actual != self.settings.length {
            return Err(EncodingError::LengthMismatch {
                expected: self.settings.length,
                actual,
            }
            .into());
        }

        let mut writer = BitWriter::new();
        for symbol in id.chars() {
            let index = self.encoder.index_of(symbol)?;
            writer.write_bits(index, self.settings.window_bits)?;
        }
        Ok(writer.finish())
    }

    /// Render packed indices, as produced by [`decode`](Self::decode), into
    /// an ID.
    ///
    /// # Errors
    /// - `EncodingError::InsufficientBits` if `bits` holds fewer than
    ///   `length` windows
    /// - `EncodingError::InvalidEncoding` if a window is outside the alphabet
    pub fn encode(&self, bits: &[u8]) -> Result<String> {
        let window = self.settings.window_bits;
        let needed = window * self.settings.length;
        let available = bits.len() * 8;
        if available < needed {
            return Err(EncodingError::InsufficientBits { needed, available }.into());
        }

        let mut reader = BitReader::new(bits);
        let indices = (0..self.settings.length)
            .map(|_| reader.read_bits(window).map_err(Error::from))
            .collect::<Result<Vec<u8>>>()?;
        self.render(&indices)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("alphabet", &self.alphabet.as_str())
            .field("settings", &self.settings)
            .field("encoder", &self.encoder.kind())
            .field("source", &self.source.describe())
            .finish()
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} bits, {} symbols of {:.2} bits from {:?} (ere {:.2}), {}",
            self.settings.bits,
            self.settings.length,
            self.settings.bits_per_symbol,
            self.alphabet.as_str(),
            self.settings.ere,
            self.source.describe(),
        )
    }
}
