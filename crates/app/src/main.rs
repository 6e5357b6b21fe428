//! puid: generate probably unique identifiers from the command line.
//!
//! ```text
//! puid                                   # one 128-bit safe64 ID
//! puid --total 1e6 --risk 1e12 --count 5 # sized for a population
//! puid --custom "dîngøsky" --bits 64      # any alphabet
//! puid --seed 42 --count 3                # reproducible PRNG run
//! puid --chars hex --bits 8 --hex "C7 C9" # replay fixed bytes
//! ```

mod config;
mod sample;

use clap::Parser;
use config::{Cli, Config};
use puid_core::{Alphabet, Charset};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match &cli.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.list {
        print_catalog();
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_cli(cli)?;
    if config.print_config {
        config.print();
    }

    let mut gen = config.generator()?;
    tracing::info!(%gen, "generator ready");

    for _ in 0..config.count {
        println!("{}", gen.generate()?);
    }

    if config.print_metrics {
        println!("\n=== Generator ===");
        println!("{gen}");
        println!("\n=== Alphabet ===");
        print!("{}", gen.metrics().export_text());
        println!("\n=== Run ===");
        print!("{}", gen.stats().export_text());
    }

    if let Some(n) = config.analyze {
        sample::analyze(&mut gen, n)?.print();
    }

    Ok(())
}

fn print_catalog() {
    for charset in Charset::ALL {
        let alphabet = Alphabet::from(charset);
        println!("{:<18} {:>3}  {}", charset.name(), alphabet.len(), alphabet);
    }
}
