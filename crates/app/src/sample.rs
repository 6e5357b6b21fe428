//! Sample analysis for generated IDs.
//!
//! Generates a batch of IDs from a configured generator and reports how the
//! batch behaves against what the settings promise:
//! - per-symbol frequencies and a chi-square uniformity statistic
//! - repeated IDs versus the birthday-bound expectation
//! - observed source bits per symbol versus the analytic average
//!
//! Useful for sanity-checking custom alphabets and non-default sources.

use puid_core::Generator;
use std::collections::{HashMap, HashSet};

/// What a batch of IDs looked like.
#[derive(Debug, Clone)]
pub struct SampleReport {
    /// IDs generated
    pub ids: usize,
    /// Symbols per ID
    pub length: usize,
    /// Occurrences of each alphabet symbol, in alphabet order
    pub symbol_counts: Vec<(char, u64)>,
    /// Chi-square statistic against a uniform distribution
    pub chi_square: f64,
    /// Alphabet size minus one
    pub degrees_of_freedom: usize,
    /// IDs seen more than once (each extra occurrence counts)
    pub repeats: usize,
    /// Repeats expected for this many IDs at the configured bits
    pub expected_repeats: f64,
    /// Source bits consumed per symbol during the batch
    pub observed_bits_per_symbol: f64,
    /// Analytic bits per symbol for the alphabet
    pub avg_bits: f64,
}

/// Generate `count` IDs and summarize them.
pub fn analyze(gen: &mut Generator, count: usize) -> puid_core::Result<SampleReport> {
    let symbols: Vec<char> = gen.alphabet().chars().collect();
    let mut counts: HashMap<char, u64> = symbols.iter().map(|c| (*c, 0)).collect();
    let mut seen = HashSet::with_capacity(count);
    let mut repeats = 0;

    let before = *gen.stats();
    for _ in 0..count {
        let id = gen.generate()?;
        for symbol in id.chars() {
            *counts.entry(symbol).or_insert(0) += 1;
        }
        if !seen.insert(id) {
            repeats += 1;
        }
    }
    let after = *gen.stats();

    let symbol_counts: Vec<(char, u64)> = symbols
        .iter()
        .map(|c| (*c, counts.get(c).copied().unwrap_or(0)))
        .collect();

    let total_symbols = (count * gen.length()) as f64;
    let expected = total_symbols / symbols.len() as f64;
    let chi_square = if expected > 0.0 {
        symbol_counts
            .iter()
            .map(|&(_, c)| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum::<f64>()
    } else {
        0.0
    };

    let accepted = after.symbols_accepted - before.symbols_accepted;
    let consumed = after.bits_consumed - before.bits_consumed;
    let observed_bits_per_symbol = if accepted == 0 {
        0.0
    } else {
        consumed as f64 / accepted as f64
    };

    let pairs = count as f64 * (count as f64 - 1.0) / 2.0;

    Ok(SampleReport {
        ids: count,
        length: gen.length(),
        symbol_counts,
        chi_square,
        degrees_of_freedom: symbols.len() - 1,
        repeats,
        expected_repeats: pairs / gen.bits().exp2(),
        observed_bits_per_symbol,
        avg_bits: gen.metrics().avg_bits(),
    })
}

impl SampleReport {
    /// Chi-square within six standard deviations of its expectation.
    pub fn is_plausibly_uniform(&self) -> bool {
        let dof = self.degrees_of_freedom as f64;
        self.chi_square < dof + 6.0 * (2.0 * dof).sqrt()
    }

    /// Print a human-readable summary to stdout.
    pub fn print(&self) {
        println!("\n=== Sample Analysis ===");
        println!("IDs: {} x {} symbols", self.ids, self.length);
        println!();

        println!("=== Uniformity ===");
        println!(
            "Chi-square: {:.2} ({} degrees of freedom)",
            self.chi_square, self.degrees_of_freedom
        );
        if self.is_plausibly_uniform() {
            println!("Uniformity: PASSED ✓");
        } else {
            println!("Uniformity: FAILED ✗");
        }
        let (min, max) = self
            .symbol_counts
            .iter()
            .fold((u64::MAX, 0), |(lo, hi), (_, c)| (lo.min(*c), hi.max(*c)));
        println!("Symbol counts: min {min}, max {max}");
        println!();

        println!("=== Repeats ===");
        println!("Observed: {}", self.repeats);
        println!("Expected: {:.3e}", self.expected_repeats);
        println!();

        println!("=== Entropy Use ===");
        println!("Observed bits/symbol: {:.4}", self.observed_bits_per_symbol);
        println!("Expected bits/symbol: {:.4}", self.avg_bits);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puid_core::{Charset, FixedSource, PrngSource};

    #[test]
    fn test_counts_cover_every_symbol() {
        let mut gen = Generator::builder()
            .charset(Charset::Alpha)
            .source(PrngSource::seeded(42))
            .build()
            .unwrap();

        let report = analyze(&mut gen, 1000).unwrap();
        assert_eq!(report.symbol_counts.len(), 52);
        let total: u64 = report.symbol_counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 1000 * gen.length() as u64);
        assert_eq!(report.degrees_of_freedom, 51);
        assert_eq!(report.repeats, 0);
        assert!(report.is_plausibly_uniform());
    }

    #[test]
    fn test_low_entropy_repeats() {
        let mut gen = Generator::builder()
            .bits(4.0)
            .charset(Charset::Hex)
            .source(PrngSource::seeded(7))
            .build()
            .unwrap();

        let report = analyze(&mut gen, 100).unwrap();
        assert!(report.repeats >= 84);
        assert!(report.expected_repeats > 300.0);
    }

    #[test]
    fn test_observed_bits_track_average() {
        let mut gen = Generator::builder()
            .charset(Charset::AlphaNumLower)
            .source(PrngSource::seeded(3))
            .build()
            .unwrap();

        let report = analyze(&mut gen, 2000).unwrap();
        assert!((report.observed_bits_per_symbol - report.avg_bits).abs() < 0.1);
    }

    #[test]
    fn test_source_failure_propagates() {
        let mut gen = Generator::builder()
            .source(FixedSource::new(vec![0; 20]))
            .build()
            .unwrap();
        assert!(analyze(&mut gen, 5).is_err());
    }

    #[test]
    fn test_determinism() {
        let build = || {
            Generator::builder()
                .charset(Charset::Safe32)
                .source(PrngSource::seeded(12345))
                .build()
                .unwrap()
        };
        let a = analyze(&mut build(), 500).unwrap();
        let b = analyze(&mut build(), 500).unwrap();
        assert_eq!(a.symbol_counts, b.symbol_counts);
        assert_eq!(a.chi_square, b.chi_square);
    }
}
