//! Alphabet metrics and runtime counters.
//!
//! [`AlphabetMetrics`] is everything that follows from the alphabet size
//! alone: bits per symbol, the extraction window, the shift table that
//! decides how far to skip on a rejected window, and the efficiency figures
//! derived from it. It is computed once per alphabet and never changes.
//!
//! [`GenerationStats`] counts what extraction actually did at runtime
//! (accepted symbols, rejected windows, refills). It is owned by a generator
//! and updated through `&mut`.
//!
//! # Shift table
//!
//! A window of `w` bits yields values in `[0, 2^w)`. Values below `n` are
//! accepted. A rejected value only needs the cursor to move far enough to
//! change the high-order prefix that made it too large, so the table maps
//! each rejected value to the smallest such skip. Rules are stored ascending
//! by threshold; the first rule whose threshold is at least the value wins.

use crate::alphabet::Alphabet;

/// One entry of the shift table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftRule {
    /// Largest window value this rule covers
    pub threshold: u8,
    /// Bits to advance when a covered value is rejected
    pub shift: u8,
}

impl ShiftRule {
    const fn new(threshold: usize, shift: usize) -> Self {
        Self {
            threshold: threshold as u8,
            shift: shift as u8,
        }
    }
}

/// Bits needed to index `n` values: `ceil(log2(n))`.
pub fn window_bits(n: usize) -> usize {
    let mut bits = 0;
    while (1usize << bits) < n {
        bits += 1;
    }
    bits
}

/// True if `n` is a power of two.
pub fn is_pow2(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Build the shift table for an alphabet of `n` symbols.
///
/// Caller guarantees `2 <= n <= 256`.
pub fn shift_rules(n: usize) -> Vec<ShiftRule> {
    let window = window_bits(n);
    let base = if n % 2 == 0 { n - 1 } else { n };

    let mut rules = vec![ShiftRule::new(base, window)];
    if is_pow2(n) {
        return rules;
    }

    for bit in 2..window {
        if base & (1 << (bit - 1)) == 0 {
            rules.push(ShiftRule::new(base | ((1 << bit) - 1), window - bit + 1));
        }
    }
    rules
}

/// Expand a rule list into a shift per window value.
///
/// Values not covered by any rule fall back to a full window.
pub fn shift_lookup(rules: &[ShiftRule], window: usize) -> Vec<u8> {
    (0..(1usize << window))
        .map(|value| {
            rules
                .iter()
                .find(|rule| value <= rule.threshold as usize)
                .map(|rule| rule.shift)
                .unwrap_or(window as u8)
        })
        .collect()
}

/// Static figures for one alphabet.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphabetMetrics {
    /// Number of symbols
    pub symbol_count: usize,
    /// `log2(symbol_count)`
    pub bits_per_symbol: f64,
    /// Bits read per extraction attempt
    pub window_bits: usize,
    /// Total UTF-8 bytes across all symbols
    pub utf8_bytes: usize,
    /// Ascending shift rules
    pub shift_rules: Vec<ShiftRule>,
}

impl AlphabetMetrics {
    /// Compute metrics for a validated alphabet.
    pub fn new(alphabet: &Alphabet) -> Self {
        let n = alphabet.len();
        Self {
            symbol_count: n,
            bits_per_symbol: (n as f64).log2(),
            window_bits: window_bits(n),
            utf8_bytes: alphabet.utf8_len(),
            shift_rules: shift_rules(n),
        }
    }

    /// True if every window value is accepted.
    pub fn is_pow2(&self) -> bool {
        is_pow2(self.symbol_count)
    }

    /// Expected bits consumed per accepted symbol.
    pub fn avg_bits(&self) -> f64 {
        let window = self.window_bits as f64;
        if self.is_pow2() {
            return window;
        }

        let span = 1usize << self.window_bits;
        let lookup = shift_lookup(&self.shift_rules, self.window_bits);
        let rejected = &lookup[self.symbol_count..span];
        let shift_sum: usize = rejected.iter().map(|s| *s as usize).sum();

        let reject_count = rejected.len() as f64;
        let p_reject = reject_count / span as f64;
        let p_accept = self.symbol_count as f64 / span as f64;

        window + (p_reject / p_accept) * (shift_sum as f64 / reject_count)
    }

    /// Entropy representation efficiency: entropy bits per symbol over the
    /// average bits needed to store one rendered symbol.
    pub fn ere(&self) -> f64 {
        let bits_per_char = 8.0 * self.utf8_bytes as f64 / self.symbol_count as f64;
        self.bits_per_symbol / bits_per_char
    }

    /// Entropy transform efficiency: entropy bits per symbol over the
    /// source bits consumed per symbol.
    pub fn ete(&self) -> f64 {
        if self.is_pow2() {
            return 1.0;
        }
        self.bits_per_symbol / self.avg_bits()
    }

    /// Export as `key=value` lines.
    pub fn export_text(&self) -> String {
        let rules: Vec<String> = self
            .shift_rules
            .iter()
            .map(|rule| format!("{}:{}", rule.threshold, rule.shift))
            .collect();

        format!(
            "symbol_count={}\n\
             bits_per_symbol={:.4}\n\
             window_bits={}\n\
             shift_rules={}\n\
             avg_bits={:.4}\n\
             ere={:.4}\n\
             ete={:.4}\n",
            self.symbol_count,
            self.bits_per_symbol,
            self.window_bits,
            rules.join(","),
            self.avg_bits(),
            self.ere(),
            self.ete(),
        )
    }
}

/// What extraction did at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// IDs produced
    pub ids_generated: u64,
    /// Windows accepted as symbols
    pub symbols_accepted: u64,
    /// Windows rejected and skipped
    pub windows_rejected: u64,
    /// Bits the cursor advanced over
    pub bits_consumed: u64,
    /// Cursor refills
    pub refills: u64,
    /// Bytes drawn from the entropy source
    pub bytes_drawn: u64,
}

impl GenerationStats {
    /// Fresh counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejected windows over all windows read.
    ///
    /// Returns 0.0 before any window has been read.
    pub fn rejection_rate(&self) -> f64 {
        let windows = self.symbols_accepted + self.windows_rejected;
        if windows == 0 {
            0.0
        } else {
            self.windows_rejected as f64 / windows as f64
        }
    }

    /// Bits consumed per accepted symbol, the runtime counterpart of
    /// [`AlphabetMetrics::avg_bits`].
    pub fn observed_bits_per_symbol(&self) -> f64 {
        if self.symbols_accepted == 0 {
            0.0
        } else {
            self.bits_consumed as f64 / self.symbols_accepted as f64
        }
    }

    /// Export as `key=value` lines.
    pub fn export_text(&self) -> String {
        format!(
            "ids_generated={}\n\
             symbols_accepted={}\n\
             windows_rejected={}\n\
             rejection_rate={:.4}\n\
             bits_consumed={}\n\
             observed_bits_per_symbol={:.4}\n\
             refills={}\n\
             bytes_drawn={}\n",
            self.ids_generated,
            self.symbols_accepted,
            self.windows_rejected,
            self.rejection_rate(),
            self.bits_consumed,
            self.observed_bits_per_symbol(),
            self.refills,
            self.bytes_drawn,
        )
    }
}
