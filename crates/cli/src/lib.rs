//! `bmeconv-cli` — the `bmecat-converter` command line.

pub mod observability;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use bmeconv_core::{ConverterConfig, Mappings, Separators};

/// Convert BMEcat product catalog documents.
#[derive(Debug, Parser)]
#[command(name = "bmecat-converter", version)]
pub struct Args {
    /// Input catalog document
    pub input: PathBuf,

    /// Output catalog document
    pub output: PathBuf,

    /// strftime-style format of DATE fields in the input
    #[arg(long = "dateformat", default_value = "%Y-%m-%d")]
    pub date_format: String,

    /// Number separator preset of the input ("english" or "german")
    #[arg(long, default_value = "german")]
    pub separators: Separators,

    /// Abort on the first validation violation instead of recording it
    #[arg(long)]
    pub strict: bool,

    /// JSON file overriding unit mappings and feature blacklists
    #[arg(long)]
    pub mappings: Option<PathBuf>,

    /// Operator name used to derive the catalog-id initials
    #[arg(long)]
    pub operator: Option<String>,
}

impl Args {
    fn operator(&self) -> String {
        self.operator
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_default()
    }
}

/// End-to-end conversion: parse the input, export the catalog.
pub fn run(args: &Args) -> anyhow::Result<()> {
    let started = Instant::now();
    let config = ConverterConfig::new(
        args.separators.number_format(),
        &args.date_format,
        args.strict,
    )?;
    let mappings = match &args.mappings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading mappings file {}", path.display()))?;
            Mappings::from_json(&json)?
        }
        None => Mappings::with_default_units(),
    };

    tracing::info!(input = %args.input.display(), "importing catalog");
    let catalog = bmeconv_import::read_file(&args.input, &config, &mappings)?;
    tracing::info!(products = catalog.len(), "catalog imported");

    bmeconv_export::write_file(&catalog, &args.operator(), &args.output)?;
    tracing::info!(
        output = %args.output.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "conversion finished"
    );
    Ok(())
}
