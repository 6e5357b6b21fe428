//! Entropy targets and the figures derived from them.
//!
//! A generator is configured either with an explicit number of entropy bits
//! or with an expected population size and an acceptable repeat risk. Both
//! resolve to a bit target, which the alphabet turns into a symbol count.
//!
//! Collision math uses the birthday approximation. Below
//! [`EXACT_BIRTHDAY_LIMIT`] IDs the exact `T * (T - 1)` form is used; at and
//! above it `T - 1` is taken as `T`, which loses nothing at that scale and
//! keeps huge totals finite.

use crate::error::{Error, Result};
use crate::metrics::AlphabetMetrics;

/// Population size at which the asymptotic collision formula takes over.
pub const EXACT_BIRTHDAY_LIMIT: f64 = 1000.0;

/// Entropy bits used when nothing else is configured.
pub const DEFAULT_BITS: f64 = 128.0;

/// Longest ID, in symbols, a target may resolve to.
pub const MAX_LENGTH: usize = 1 << 20;

/// Acceptable odds of a repeat, as "1 in N".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatRisk(f64);

impl RepeatRisk {
    /// Risk of one repeat in `n` populations.
    pub fn one_in(n: f64) -> Self {
        RepeatRisk(n)
    }

    /// Risk given as a probability; `p = 1e-12` is `one_in(1e12)`.
    pub fn probability(p: f64) -> Self {
        RepeatRisk(1.0 / p)
    }

    /// The `N` of "1 in N".
    pub fn one_in_value(&self) -> f64 {
        self.0
    }
}

/// What a generator should deliver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntropyTarget {
    /// At least this many bits of entropy per ID
    Bits(f64),
    /// Enough bits that `total` IDs repeat with at most `risk` odds
    TotalRisk { total: f64, risk: RepeatRisk },
}

impl Default for EntropyTarget {
    fn default() -> Self {
        EntropyTarget::Bits(DEFAULT_BITS)
    }
}

impl EntropyTarget {
    /// Resolve to a bit count.
    ///
    /// # Errors
    /// Returns `Error::Config` for negative or non-finite inputs.
    pub fn bits(&self) -> Result<f64> {
        match *self {
            EntropyTarget::Bits(bits) => {
                if !bits.is_finite() || bits < 0.0 {
                    return Err(Error::Config(format!("invalid entropy bits: {bits}")));
                }
                Ok(bits)
            }
            EntropyTarget::TotalRisk { total, risk } => {
                let risk = risk.one_in_value();
                if !total.is_finite() || total < 0.0 {
                    return Err(Error::Config(format!("invalid total: {total}")));
                }
                if !risk.is_finite() || risk < 0.0 {
                    return Err(Error::Config(format!("invalid risk: {risk}")));
                }
                Ok(bits_for_total_risk(total, risk))
            }
        }
    }
}

/// Bits needed so `total` IDs repeat with odds of at most 1 in `risk`.
///
/// Zero when either figure is at most 1.
pub fn bits_for_total_risk(total: f64, risk: f64) -> f64 {
    if total <= 1.0 || risk <= 1.0 {
        return 0.0;
    }

    if total < EXACT_BIRTHDAY_LIMIT {
        total.log2() + (total - 1.0).log2() + risk.log2() - 1.0
    } else {
        2.0 * total.log2() + risk.log2() - 1.0
    }
}

/// Probability of at least one repeat among `total` IDs of `bits` entropy.
pub fn repeat_probability(total: f64, bits: f64) -> f64 {
    if total <= 1.0 {
        return 0.0;
    }
    let exponent = total * (total - 1.0) / (bits + 1.0).exp2();
    -(-exponent).exp_m1()
}

/// Inverse of [`repeat_probability`]: the "1 in N" odds of a repeat.
///
/// Returns `f64::INFINITY`, not 0, when a repeat is impossible or rounds to
/// impossible (including `total <= 1`), so "1 in N" reads as never.
pub fn risk_after(total: f64, bits: f64) -> f64 {
    let probability = repeat_probability(total, bits);
    if probability == 0.0 {
        f64::INFINITY
    } else {
        1.0 / probability
    }
}

/// Derived, immutable generation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Bits requested by the target
    pub target_bits: f64,
    /// `log2(alphabet size)`
    pub bits_per_symbol: f64,
    /// Bits read per extraction attempt
    pub window_bits: usize,
    /// Symbols per ID
    pub length: usize,
    /// Entropy actually delivered: `length * bits_per_symbol`
    pub bits: f64,
    /// Entropy bits over bits needed to store the rendered ID
    pub ere: f64,
}

impl Settings {
    /// Resolve a target against an alphabet.
    ///
    /// Length always rounds up and is at least one symbol.
    pub fn new(target: EntropyTarget, metrics: &AlphabetMetrics) -> Result<Self> {
        let target_bits = target.bits()?;
        let bits_per_symbol = metrics.bits_per_symbol;
        let symbols = (target_bits / bits_per_symbol).ceil();
        if symbols > MAX_LENGTH as f64 {
            return Err(Error::Config(format!(
                "{target_bits} bits needs {symbols} symbols, more than {MAX_LENGTH}"
            )));
        }
        let length = (symbols as usize).max(1);

        Ok(Self {
            target_bits,
            bits_per_symbol,
            window_bits: metrics.window_bits,
            length,
            bits: length as f64 * bits_per_symbol,
            ere: metrics.ere(),
        })
    }

    /// Bytes of entropy one ID carries: `ceil(bits / 8)`.
    pub fn bytes_per_id(&self) -> usize {
        (self.bits / 8.0).ceil() as usize
    }
}
