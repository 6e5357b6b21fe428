//! Configuration for the puid command-line tool.
//!
//! Command-line flags are parsed by clap into [`Cli`] and then resolved into
//! a [`Config`]: conflicting options are rejected, the entropy source is
//! chosen, and a PRNG without an explicit seed gets a random one.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments (128 bits, safe64, system
//! CSPRNG). The resolved seed is part of the printed configuration, so a
//! PRNG run can always be repeated.

use clap::{Parser, ValueEnum};
use puid_core::{
    Alphabet, Charset, EntropySource, EntropyTarget, FixedSource, Generator, PrngSource,
    RepeatRisk, SystemSource,
};
use thiserror::Error;

/// Where generated IDs draw their entropy from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Operating system CSPRNG
    Csprng,
    /// ChaCha8 PRNG, seeded
    Prng,
    /// Replay of `--hex` bytes
    Fixed,
}

#[derive(Debug, Parser)]
#[command(name = "puid")]
#[command(about = "Probably unique identifiers with a precise amount of entropy")]
pub struct Cli {
    /// Entropy bits per ID
    #[arg(long, conflicts_with_all = ["total", "risk"])]
    pub bits: Option<f64>,

    /// Expected number of IDs (with --risk)
    #[arg(long, requires = "risk")]
    pub total: Option<f64>,

    /// Acceptable repeat risk, as 1 in N (with --total)
    #[arg(long, requires = "total")]
    pub risk: Option<f64>,

    /// Predefined alphabet, e.g. alpha-num, hex, safe32
    #[arg(long, conflicts_with = "custom")]
    pub chars: Option<Charset>,

    /// Custom alphabet symbols
    #[arg(long)]
    pub custom: Option<String>,

    /// Number of IDs to generate
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Entropy source
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// PRNG seed (implies --source prng)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fixed entropy bytes as hex (implies --source fixed)
    #[arg(long, conflicts_with = "seed")]
    pub hex: Option<String>,

    /// Print alphabet metrics and run counters
    #[arg(long)]
    pub metrics: bool,

    /// Generate N IDs and report symbol uniformity and repeats
    #[arg(long, value_name = "N")]
    pub analyze: Option<usize>,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Log filter, e.g. warn, debug, puid_core=debug (default: RUST_LOG or warn)
    #[arg(long)]
    pub log: Option<String>,

    /// List predefined alphabets and exit
    #[arg(long)]
    pub list: bool,
}

/// Invalid option combinations.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("--source {0:?} conflicts with --{1}")]
    SourceConflict(SourceKind, &'static str),

    #[error("--source fixed requires --hex")]
    MissingHex,

    #[error("invalid --hex: {0}")]
    InvalidHex(String),

    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
}

/// Resolved alphabet choice.
#[derive(Debug, Clone, PartialEq)]
pub enum AlphabetConfig {
    Charset(Charset),
    Custom(Alphabet),
}

/// Resolved entropy source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    Csprng,
    Prng { seed: u64 },
    Fixed { bytes: Vec<u8> },
}

/// Complete configuration for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// What each ID must deliver
    pub target: EntropyTarget,

    /// Symbols to draw from
    pub alphabet: AlphabetConfig,

    /// Entropy source
    pub source: SourceConfig,

    /// IDs to print
    pub count: usize,

    /// IDs to sample for the analysis report
    pub analyze: Option<usize>,

    /// Whether to print alphabet metrics and counters
    pub print_metrics: bool,

    /// Whether to print this configuration
    pub print_config: bool,
}

impl Config {
    /// Resolve parsed flags into a configuration.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let target = match (cli.bits, cli.total, cli.risk) {
            (_, Some(total), Some(risk)) => EntropyTarget::TotalRisk {
                total,
                risk: RepeatRisk::one_in(risk),
            },
            (Some(bits), _, _) => EntropyTarget::Bits(bits),
            _ => EntropyTarget::default(),
        };

        let alphabet = match (&cli.custom, cli.chars) {
            (Some(symbols), _) => AlphabetConfig::Custom(
                Alphabet::new(symbols).map_err(|e| ConfigError::InvalidAlphabet(e.to_string()))?,
            ),
            (None, Some(charset)) => AlphabetConfig::Charset(charset),
            (None, None) => AlphabetConfig::Charset(Charset::Safe64),
        };

        let source = resolve_source(cli)?;

        Ok(Config {
            target,
            alphabet,
            source,
            count: cli.count,
            analyze: cli.analyze,
            print_metrics: cli.metrics,
            print_config: cli.print_config,
        })
    }

    /// Build the generator this configuration describes.
    pub fn generator(&self) -> puid_core::Result<Generator> {
        let builder = Generator::builder().target(self.target);
        let builder = match &self.alphabet {
            AlphabetConfig::Charset(charset) => builder.charset(*charset),
            AlphabetConfig::Custom(alphabet) => builder.alphabet(alphabet.clone()),
        };
        builder.source(self.entropy_source()).build()
    }

    fn entropy_source(&self) -> Box<dyn EntropySource + Send> {
        match &self.source {
            SourceConfig::Csprng => Box::new(SystemSource::new()),
            SourceConfig::Prng { seed } => Box::new(PrngSource::seeded(*seed)),
            SourceConfig::Fixed { bytes } => Box::new(FixedSource::new(bytes.clone())),
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match self.target {
            EntropyTarget::Bits(bits) => println!("Target: {bits} bits"),
            EntropyTarget::TotalRisk { total, risk } => println!(
                "Target: {total:e} IDs with 1 in {:e} repeat risk",
                risk.one_in_value()
            ),
        }
        match &self.alphabet {
            AlphabetConfig::Charset(charset) => {
                println!("Alphabet: {charset} ({})", charset.symbols())
            }
            AlphabetConfig::Custom(alphabet) => println!("Alphabet: custom ({alphabet})"),
        }
        match &self.source {
            SourceConfig::Csprng => println!("Source: csprng"),
            SourceConfig::Prng { seed } => println!("Source: prng (seed {seed})"),
            SourceConfig::Fixed { bytes } => println!("Source: fixed ({} bytes)", bytes.len()),
        }
        println!("Count: {}", self.count);
        if let Some(n) = self.analyze {
            println!("Analyze: {n} IDs");
        }
        println!();
    }
}

fn resolve_source(cli: &Cli) -> Result<SourceConfig, ConfigError> {
    let kind = match (cli.source, &cli.hex, cli.seed) {
        (Some(SourceKind::Fixed), None, _) => return Err(ConfigError::MissingHex),
        (Some(kind), Some(_), _) if kind != SourceKind::Fixed => {
            return Err(ConfigError::SourceConflict(kind, "hex"))
        }
        (Some(kind), _, Some(_)) if kind != SourceKind::Prng => {
            return Err(ConfigError::SourceConflict(kind, "seed"))
        }
        (Some(kind), _, _) => kind,
        (None, Some(_), _) => SourceKind::Fixed,
        (None, None, Some(_)) => SourceKind::Prng,
        (None, None, None) => SourceKind::Csprng,
    };

    Ok(match kind {
        SourceKind::Csprng => SourceConfig::Csprng,
        SourceKind::Prng => SourceConfig::Prng {
            seed: cli.seed.unwrap_or_else(rand::random),
        },
        SourceKind::Fixed => {
            let hex = cli.hex.as_deref().unwrap_or_default();
            let fixed =
                FixedSource::from_hex(hex).map_err(|e| ConfigError::InvalidHex(e.to_string()))?;
            SourceConfig::Fixed {
                bytes: fixed.bytes().to_vec(),
            }
        }
    })
}
