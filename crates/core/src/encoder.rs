//! Index to symbol mapping.
//!
//! Predefined alphabets made of a few contiguous code point ranges are
//! rendered by offset arithmetic over a static run table. Everything else
//! goes through a lookup table, single-byte when every symbol is ASCII and
//! `char` otherwise.

use crate::alphabet::{Alphabet, Charset};
use crate::error::EncodingError;

/// A contiguous range of ASCII codes: `(length, first code)`.
pub type Run = (u8, u8);

const ALPHA: &[Run] = &[(26, b'A'), (26, b'a')];
const ALPHA_LOWER: &[Run] = &[(26, b'a')];
const ALPHA_UPPER: &[Run] = &[(26, b'A')];
const ALPHA_NUM: &[Run] = &[(26, b'A'), (26, b'a'), (10, b'0')];
const ALPHA_NUM_LOWER: &[Run] = &[(26, b'a'), (10, b'0')];
const ALPHA_NUM_UPPER: &[Run] = &[(26, b'A'), (10, b'0')];
const BASE32: &[Run] = &[(26, b'A'), (6, b'2')];
const BASE32_HEX: &[Run] = &[(10, b'0'), (22, b'a')];
const BASE32_HEX_UPPER: &[Run] = &[(10, b'0'), (22, b'A')];
const BASE36: &[Run] = &[(10, b'0'), (26, b'a')];
const BASE36_UPPER: &[Run] = &[(10, b'0'), (26, b'A')];
const CROCKFORD32: &[Run] = &[
    (10, b'0'),
    (8, b'A'),
    (2, b'J'),
    (2, b'M'),
    (5, b'P'),
    (5, b'V'),
];
const DECIMAL: &[Run] = &[(10, b'0')];
const HEX: &[Run] = &[(10, b'0'), (6, b'a')];
const HEX_UPPER: &[Run] = &[(10, b'0'), (6, b'A')];
const SAFE_ASCII: &[Run] = &[(1, b'!'), (4, b'#'), (52, b'('), (3, b']'), (30, b'a')];
const SAFE32: &[Run] = &[
    (3, b'2'),
    (4, b'6'),
    (1, b'b'),
    (1, b'd'),
    (3, b'f'),
    (1, b'j'),
    (2, b'm'),
    (3, b'p'),
    (1, b't'),
    (1, b'B'),
    (1, b'D'),
    (3, b'F'),
    (1, b'J'),
    (3, b'L'),
    (3, b'P'),
    (1, b'T'),
];
const SAFE64: &[Run] = &[(26, b'A'), (26, b'a'), (10, b'0'), (1, b'-'), (1, b'_')];
const SYMBOL: &[Run] = &[
    (1, b'!'),
    (4, b'#'),
    (8, b'('),
    (7, b':'),
    (1, b'['),
    (3, b']'),
    (4, b'{'),
];
const URL_SAFE: &[Run] = &[(26, b'A'), (26, b'a'), (10, b'0'), (2, b'-'), (1, b'_'), (1, b'~')];

/// Static run table for a predefined alphabet, if it has one.
pub fn charset_runs(charset: Charset) -> Option<&'static [Run]> {
    let runs = match charset {
        Charset::Alpha => ALPHA,
        Charset::AlphaLower => ALPHA_LOWER,
        Charset::AlphaUpper => ALPHA_UPPER,
        Charset::AlphaNum | Charset::Base62 => ALPHA_NUM,
        Charset::AlphaNumLower => ALPHA_NUM_LOWER,
        Charset::AlphaNumUpper => ALPHA_NUM_UPPER,
        Charset::Base16 | Charset::HexUpper => HEX_UPPER,
        Charset::Base32 => BASE32,
        Charset::Base32Hex => BASE32_HEX,
        Charset::Base32HexUpper => BASE32_HEX_UPPER,
        Charset::Base36 => BASE36,
        Charset::Base36Upper => BASE36_UPPER,
        Charset::Crockford32 => CROCKFORD32,
        Charset::Decimal => DECIMAL,
        Charset::Hex => HEX,
        Charset::SafeAscii => SAFE_ASCII,
        Charset::Safe32 => SAFE32,
        Charset::Safe64 => SAFE64,
        Charset::Symbol => SYMBOL,
        Charset::UrlSafe => URL_SAFE,
        Charset::Base58
        | Charset::Bech32
        | Charset::Boolean
        | Charset::Dna
        | Charset::Geohash
        | Charset::WordSafe32
        | Charset::ZBase32 => return None,
    };
    Some(runs)
}

/// Maps accepted indices to symbols, and back where supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolEncoder {
    /// Offset arithmetic over contiguous ASCII runs
    Runs {
        runs: &'static [Run],
        symbol_count: usize,
    },
    /// Lookup table of single-byte symbols
    Ascii(Vec<u8>),
    /// Lookup table of arbitrary code points
    Unicode(Vec<char>),
}

impl SymbolEncoder {
    /// Pick the encoder for an alphabet.
    pub fn new(alphabet: &Alphabet) -> Self {
        if let Some(runs) = alphabet.charset().and_then(charset_runs) {
            return SymbolEncoder::Runs {
                runs,
                symbol_count: alphabet.len(),
            };
        }

        if alphabet.is_ascii() {
            SymbolEncoder::Ascii(alphabet.as_str().bytes().collect())
        } else {
            SymbolEncoder::Unicode(alphabet.symbols().to_vec())
        }
    }

    /// Number of indices this encoder accepts.
    pub fn symbol_count(&self) -> usize {
        match self {
            SymbolEncoder::Runs { symbol_count, .. } => *symbol_count,
            SymbolEncoder::Ascii(table) => table.len(),
            SymbolEncoder::Unicode(table) => table.len(),
        }
    }

    /// Short name of the mapping strategy.
    pub fn kind(&self) -> &'static str {
        match self {
            SymbolEncoder::Runs { .. } => "runs",
            SymbolEncoder::Ascii(_) => "ascii",
            SymbolEncoder::Unicode(_) => "unicode",
        }
    }

    /// Whether symbols can be mapped back to indices.
    pub fn supports_decode(&self) -> bool {
        !matches!(self, SymbolEncoder::Unicode(_))
    }

    /// Render one index.
    ///
    /// # Errors
    /// Returns `EncodingError::InvalidEncoding` if `index` is outside the
    /// alphabet.
    pub fn map(&self, index: u8) -> Result<char, EncodingError> {
        let invalid = || EncodingError::InvalidEncoding {
            index,
            symbol_count: self.symbol_count(),
        };

        match self {
            SymbolEncoder::Runs { runs, .. } => {
                let mut rest = index;
                for &(len, first) in runs.iter() {
                    if rest < len {
                        return Ok((first + rest) as char);
                    }
                    rest -= len;
                }
                Err(invalid())
            }
            SymbolEncoder::Ascii(table) => table
                .get(index as usize)
                .map(|b| *b as char)
                .ok_or_else(invalid),
            SymbolEncoder::Unicode(table) => table.get(index as usize).copied().ok_or_else(invalid),
        }
    }

    /// Map a symbol back to its index.
    ///
    /// # Errors
    /// - `EncodingError::DecodeUnsupported` for multi-byte alphabets
    /// - `EncodingError::UnknownSymbol` if `symbol` is not in the alphabet
    pub fn index_of(&self, symbol: char) -> Result<u8, EncodingError> {
        let unknown = EncodingError::UnknownSymbol { symbol };

        match self {
            SymbolEncoder::Runs { runs, .. } => {
                if !symbol.is_ascii() {
                    return Err(unknown);
                }
                let code = symbol as u8;
                let mut base = 0u8;
                for &(len, first) in runs.iter() {
                    if code >= first && code - first < len {
                        return Ok(base + (code - first));
                    }
                    base = base.wrapping_add(len);
                }
                Err(unknown)
            }
            SymbolEncoder::Ascii(table) => {
                if !symbol.is_ascii() {
                    return Err(unknown);
                }
                table
                    .iter()
                    .position(|b| *b == symbol as u8)
                    .map(|i| i as u8)
                    .ok_or(unknown)
            }
            SymbolEncoder::Unicode(_) => Err(EncodingError::DecodeUnsupported),
        }
    }
}
