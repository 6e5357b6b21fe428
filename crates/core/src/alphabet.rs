//! Alphabets: the ordered, unique symbols an ID is drawn from.
//!
//! An [`Alphabet`] is validated once and never changes. [`Charset`] is the
//! catalog of predefined alphabets; custom ones come from any string that
//! passes validation.
//!
//! # Valid symbols
//!
//! A symbol is a single Unicode code point that is:
//! - at or above `!` (U+0021)
//! - not `"`, `'`, `\` or `` ` ``
//! - either at most `~` (U+007E) or at least U+00A0 (non-breaking space)

use crate::error::AlphabetError;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Largest alphabet an 8-bit window can address.
pub const MAX_SYMBOLS: usize = 256;

/// Smallest usable alphabet.
pub const MIN_SYMBOLS: usize = 2;

const ALPHA: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const ALPHA_LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const ALPHA_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHA_NUM: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const ALPHA_NUM_LOWER: &str = "abcdefghijklmnopqrstuvwxyz0123456789";
const ALPHA_NUM_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const BASE16: &str = "0123456789ABCDEF";
const BASE32: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const BASE32_HEX: &str = "0123456789abcdefghijklmnopqrstuv";
const BASE32_HEX_UPPER: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUV";
const BASE36: &str = "0123456789abcdefghijklmnopqrstuvwxyz";
const BASE36_UPPER: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BASE58: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const CROCKFORD32: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const DECIMAL: &str = "0123456789";
const BECH32: &str = "023456789acdefghjklmnpqrstuvwxyz";
const BOOLEAN: &str = "TF";
const DNA: &str = "ACGT";
const GEOHASH: &str = "0123456789bcdefghjkmnpqrstuvwxyz";
const HEX: &str = "0123456789abcdef";
const HEX_UPPER: &str = "0123456789ABCDEF";
const SAFE_ASCII: &str =
    "!#$%&()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[]^_abcdefghijklmnopqrstuvwxyz{|}~";
const SAFE32: &str = "2346789bdfghjmnpqrtBDFGHJLMNPQRT";
const SAFE64: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
const URL_SAFE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";
const SYMBOL: &str = "!#$%&()*+,-./:;<=>?@[]^_{|}~";
const WORD_SAFE32: &str = "23456789CFGHJMPQRVWXcfghjmpqrvwx";
const Z_BASE32: &str = "ybndrfg8ejkmcpqxot1uwisza345h769";

/// Predefined alphabets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// Upper/lower case letters
    Alpha,
    /// Lower case letters
    AlphaLower,
    /// Upper case letters
    AlphaUpper,
    /// Upper/lower case letters and digits
    AlphaNum,
    /// Lower case letters and digits
    AlphaNumLower,
    /// Upper case letters and digits
    AlphaNumUpper,
    /// RFC 4648 base16
    Base16,
    /// RFC 4648 base32
    Base32,
    /// RFC 4648 base32 extended hex, lower case
    Base32Hex,
    /// RFC 4648 base32 extended hex, upper case
    Base32HexUpper,
    /// Digits then lower case letters
    Base36,
    /// Digits then upper case letters
    Base36Upper,
    /// Bitcoin base58 (no 0, O, I, l)
    Base58,
    /// Same symbols as `AlphaNum`
    Base62,
    /// Crockford base32 (no I, L, O, U)
    Crockford32,
    /// Decimal digits
    Decimal,
    /// Bitcoin SegWit (no 1, b, i, o)
    Bech32,
    /// `TF`
    Boolean,
    /// Nucleotide bases
    Dna,
    /// Geohash (no a, i, l, o)
    Geohash,
    /// Lower case hex
    Hex,
    /// Upper case hex
    HexUpper,
    /// Printable ASCII minus quotes, backslash and backtick
    SafeAscii,
    /// No vowels, no look-alike letters/digits
    Safe32,
    /// RFC 4648 file system and URL safe (default)
    Safe64,
    /// RFC 3986 unreserved characters
    UrlSafe,
    /// `SafeAscii` symbols that are not alphanumeric
    Symbol,
    /// Avoids forming English words
    WordSafe32,
    /// Zooko's human-oriented base32
    ZBase32,
}

impl Charset {
    /// Every predefined alphabet, in catalog order.
    pub const ALL: [Charset; 29] = [
        Charset::Alpha,
        Charset::AlphaLower,
        Charset::AlphaUpper,
        Charset::AlphaNum,
        Charset::AlphaNumLower,
        Charset::AlphaNumUpper,
        Charset::Base16,
        Charset::Base32,
        Charset::Base32Hex,
        Charset::Base32HexUpper,
        Charset::Base36,
        Charset::Base36Upper,
        Charset::Base58,
        Charset::Base62,
        Charset::Crockford32,
        Charset::Decimal,
        Charset::Bech32,
        Charset::Boolean,
        Charset::Dna,
        Charset::Geohash,
        Charset::Hex,
        Charset::HexUpper,
        Charset::SafeAscii,
        Charset::Safe32,
        Charset::Safe64,
        Charset::UrlSafe,
        Charset::Symbol,
        Charset::WordSafe32,
        Charset::ZBase32,
    ];

    /// The symbols, in index order.
    pub fn symbols(&self) -> &'static str {
        match self {
            Charset::Alpha => ALPHA,
            Charset::AlphaLower => ALPHA_LOWER,
            Charset::AlphaUpper => ALPHA_UPPER,
            Charset::AlphaNum | Charset::Base62 => ALPHA_NUM,
            Charset::AlphaNumLower => ALPHA_NUM_LOWER,
            Charset::AlphaNumUpper => ALPHA_NUM_UPPER,
            Charset::Base16 => BASE16,
            Charset::Base32 => BASE32,
            Charset::Base32Hex => BASE32_HEX,
            Charset::Base32HexUpper => BASE32_HEX_UPPER,
            Charset::Base36 => BASE36,
            Charset::Base36Upper => BASE36_UPPER,
            Charset::Base58 => BASE58,
            Charset::Crockford32 => CROCKFORD32,
            Charset::Decimal => DECIMAL,
            Charset::Bech32 => BECH32,
            Charset::Boolean => BOOLEAN,
            Charset::Dna => DNA,
            Charset::Geohash => GEOHASH,
            Charset::Hex => HEX,
            Charset::HexUpper => HEX_UPPER,
            Charset::SafeAscii => SAFE_ASCII,
            Charset::Safe32 => SAFE32,
            Charset::Safe64 => SAFE64,
            Charset::UrlSafe => URL_SAFE,
            Charset::Symbol => SYMBOL,
            Charset::WordSafe32 => WORD_SAFE32,
            Charset::ZBase32 => Z_BASE32,
        }
    }

    /// Kebab-case name, as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Alpha => "alpha",
            Charset::AlphaLower => "alpha-lower",
            Charset::AlphaUpper => "alpha-upper",
            Charset::AlphaNum => "alpha-num",
            Charset::AlphaNumLower => "alpha-num-lower",
            Charset::AlphaNumUpper => "alpha-num-upper",
            Charset::Base16 => "base16",
            Charset::Base32 => "base32",
            Charset::Base32Hex => "base32-hex",
            Charset::Base32HexUpper => "base32-hex-upper",
            Charset::Base36 => "base36",
            Charset::Base36Upper => "base36-upper",
            Charset::Base58 => "base58",
            Charset::Base62 => "base62",
            Charset::Crockford32 => "crockford32",
            Charset::Decimal => "decimal",
            Charset::Bech32 => "bech32",
            Charset::Boolean => "boolean",
            Charset::Dna => "dna",
            Charset::Geohash => "geohash",
            Charset::Hex => "hex",
            Charset::HexUpper => "hex-upper",
            Charset::SafeAscii => "safe-ascii",
            Charset::Safe32 => "safe32",
            Charset::Safe64 => "safe64",
            Charset::UrlSafe => "url-safe",
            Charset::Symbol => "symbol",
            Charset::WordSafe32 => "word-safe32",
            Charset::ZBase32 => "z-base32",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = String;

    /// Accepts kebab-case (`alpha-num-lower`), camel case (`alphaNumLower`)
    /// and snake case (`alpha_num_lower`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Charset::ALL
            .iter()
            .copied()
            .find(|charset| charset.name().replace('-', "") == wanted)
            .ok_or_else(|| format!("unknown charset: {s}"))
    }
}

/// Whether `symbol` may appear in an alphabet.
pub fn is_valid_symbol(symbol: char) -> bool {
    let code = symbol as u32;
    if code < '!' as u32 {
        return false;
    }
    if matches!(symbol, '"' | '\'' | '\\' | '`') {
        return false;
    }
    code <= '~' as u32 || code >= 0xA0
}

/// A validated, immutable symbol set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    text: String,
    charset: Option<Charset>,
}

impl Alphabet {
    /// Validate a custom alphabet.
    ///
    /// # Errors
    /// Checked in order: `TooFewSymbols` (< 2), `TooManySymbols` (> 256),
    /// `InvalidSymbol`, `DuplicateSymbols`.
    pub fn new(symbols: &str) -> Result<Self, AlphabetError> {
        let chars: Vec<char> = symbols.chars().collect();
        let count = chars.len();

        if count < MIN_SYMBOLS {
            return Err(AlphabetError::TooFewSymbols { count });
        }
        if count > MAX_SYMBOLS {
            return Err(AlphabetError::TooManySymbols {
                count,
                max: MAX_SYMBOLS,
            });
        }
        if let Some((position, &symbol)) =
            chars.iter().enumerate().find(|(_, c)| !is_valid_symbol(**c))
        {
            return Err(AlphabetError::InvalidSymbol { symbol, position });
        }

        let mut seen = HashSet::with_capacity(count);
        if let Some(&symbol) = chars.iter().find(|c| !seen.insert(**c)) {
            return Err(AlphabetError::DuplicateSymbols { symbol });
        }

        Ok(Self {
            symbols: chars,
            text: symbols.to_string(),
            charset: None,
        })
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; a valid alphabet has at least two symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in index order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Symbols as a string.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The catalog entry this alphabet came from, if any.
    pub fn charset(&self) -> Option<Charset> {
        self.charset
    }

    /// True if every symbol encodes to a single UTF-8 byte.
    pub fn is_ascii(&self) -> bool {
        self.text.is_ascii()
    }

    /// Total UTF-8 bytes across all symbols.
    pub fn utf8_len(&self) -> usize {
        self.text.len()
    }
}

impl From<Charset> for Alphabet {
    fn from(charset: Charset) -> Self {
        let text = charset.symbols();
        Self {
            symbols: text.chars().collect(),
            text: text.to_string(),
            charset: Some(charset),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Charset::Safe64.into()
    }
}

impl FromStr for Alphabet {
    type Err = AlphabetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Alphabet::new(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
