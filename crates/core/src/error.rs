//! Error types for identifier generation.
//!
//! All operations return structured errors rather than panicking. Nothing is
//! retried internally: a failed entropy request surfaces to the caller of
//! `generate()` exactly as the source reported it.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Alphabet: validation of the symbol set at construction
/// - Entropy: the random byte source failed or ran dry
/// - Encoding: index/symbol mapping or packed-bit conversion failed
/// - Bit I/O: reading or writing bits past the available buffer
/// - Config: entropy target outside its domain
#[derive(Debug, Error)]
pub enum Error {
    /// Alphabet rejected at construction
    #[error("alphabet error: {0}")]
    Alphabet(#[from] AlphabetError),

    /// Entropy source failure (exhausted or unavailable)
    #[error("entropy error: {0}")]
    Entropy(#[from] EntropyError),

    /// Symbol encoding or decoding failure
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Bit-level I/O failure
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Alphabet validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetError {
    /// Fewer than two symbols
    #[error("require at least 2 symbols, got {count}")]
    TooFewSymbols { count: usize },

    /// More symbols than an 8-bit window can address
    #[error("exceeded max of {max} symbols, got {count}")]
    TooManySymbols { count: usize, max: usize },

    /// Symbol with a disallowed code point
    #[error("invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    /// Same symbol appears more than once
    #[error("symbols not unique: {symbol:?} repeated")]
    DuplicateSymbols { symbol: char },
}

/// Entropy source errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntropyError {
    /// A finite source has no more bytes to hand out
    #[error("bytes are exhausted: requested {requested}, available {available}")]
    Exhausted { requested: usize, available: usize },

    /// The underlying system generator is unavailable
    #[error("failed to generate bytes: {0}")]
    SourceFailure(String),

    /// A fill request does not fit inside the destination buffer
    #[error("buffer of {capacity} bytes cannot accept {count} bytes at offset {offset}")]
    BufferTooSmall {
        count: usize,
        offset: usize,
        capacity: usize,
    },

    /// Hex text for a fixed source could not be parsed
    #[error("invalid hex bytes: {0}")]
    InvalidHex(String),
}

/// Symbol encoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Index outside the encoder's alphabet
    #[error("invalid encoding: index {index} not supported by a {symbol_count}-symbol encoder")]
    InvalidEncoding { index: u8, symbol_count: usize },

    /// Reverse mapping is not available for multi-byte alphabets
    #[error("decoding not supported for multi-byte alphabets")]
    DecodeUnsupported,

    /// Symbol is not part of the alphabet
    #[error("symbol {symbol:?} is not in the alphabet")]
    UnknownSymbol { symbol: char },

    /// ID has the wrong number of symbols
    #[error("length mismatch: expected {expected} symbols, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Packed bits too short to render a full ID
    #[error("insufficient bits: need {needed}, got {available}")]
    InsufficientBits { needed: usize, available: usize },
}

/// Bit-level I/O errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitIoError {
    /// Attempted to read more bits than remain
    #[error("insufficient bits: requested {requested}, available {available}")]
    InsufficientBits { requested: usize, available: usize },

    /// Window wider than a byte
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
