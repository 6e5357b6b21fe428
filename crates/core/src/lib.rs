//! puid-core: probably unique identifiers with a precise amount of entropy
//!
//! This library generates random ID strings from any alphabet of 2 to 256
//! symbols:
//! - Sizes IDs from an entropy target, either explicit bits or an expected
//!   total with an acceptable repeat risk
//! - Extracts symbol indices from random bytes without modulo bias, skipping
//!   as few bits as possible on each rejected window
//! - Renders indices through arithmetic or table encoders
//!
//! # Architecture
//!
//! - `alphabet`: Symbol validation and the predefined catalog
//! - `metrics`: Shift tables, efficiency figures, runtime counters
//! - `settings`: Entropy targets and collision math
//! - `entropy`: Byte sources (system, PRNG, fixed replay)
//! - `bitio`: Bit cursor plus MSB-first packing
//! - `extractor`: Rejection sampling of indices
//! - `encoder`: Index to symbol mapping
//! - `generator`: Ties it all together
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **No retries**: Entropy failures surface to the caller unchanged
//! - **Deterministic**: Fixed and seeded sources make runs reproducible

pub mod alphabet;
pub mod bitio;
pub mod encoder;
pub mod entropy;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod metrics;
pub mod settings;

// Re-export commonly used types
pub use alphabet::{Alphabet, Charset};
pub use entropy::{EntropySource, FixedSource, PrngSource, SystemSource};
pub use error::{Error, Result};
pub use generator::{Generator, GeneratorBuilder};
pub use metrics::{AlphabetMetrics, GenerationStats};
pub use settings::{EntropyTarget, RepeatRisk, Settings};
