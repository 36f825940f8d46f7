//! Command-line interface for crispr-guide.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **parse**: Validate plain or FASTA input and summarize its sequences
//! - **analyze**: Find and score guide RNAs in a sequence
//! - **systems**: List the available CRISPR systems
//! - **serve**: Start the interactive web interface
//!
//! ## Usage
//!
//! ```text
//! # Validate a FASTA file
//! crispr-guide parse genes.fasta
//!
//! # Pipe a plain sequence in
//! echo ATGCGATCGATCGATCGATCGGG | crispr-guide analyze -
//!
//! # Second record, Cas12a, JSON output, export the results
//! crispr-guide analyze genes.fa.gz --record 2 --system Cas12a --format json --export
//!
//! # Start web UI
//! crispr-guide serve --port 8080 --open
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use flate2::read::GzDecoder;

use crate::config::{Environment, ENV_VAR};

pub mod analyze;
pub mod parse;
pub mod systems;

#[derive(Parser)]
#[command(name = "crispr-guide")]
#[command(version)]
#[command(about = "Validate DNA input and design CRISPR guide RNAs")]
#[command(
    long_about = "crispr-guide validates plain or FASTA sequence input and finds candidate guide RNAs for a CRISPR system.\n\nFor each guide it reports:\n- GC content and a secondary-structure score\n- A weighted efficiency score\n- Optionally, the number of near-matching off-target sites"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate input and summarize its sequences
    Parse(parse::ParseArgs),

    /// Find and score guide RNAs
    Analyze(analyze::AnalyzeArgs),

    /// List available CRISPR systems
    Systems(systems::SystemsArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Deployment environment (sets upload limits and cache lifetime)
    #[arg(long, value_enum, env = ENV_VAR, default_value = "development")]
    pub env: Environment,

    /// Path to a custom CRISPR systems catalog (JSON)
    #[arg(long)]
    pub systems: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Read an input file to a string; `-` reads stdin and `.gz` files are decompressed
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not valid UTF-8.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    let mut buffer = String::new();

    if path.as_os_str() == "-" {
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read sequence from stdin")?;
        return Ok(buffer);
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let is_gzipped = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    let read = if is_gzipped {
        GzDecoder::new(file).read_to_string(&mut buffer)
    } else {
        io::BufReader::new(file).read_to_string(&mut buffer)
    };
    read.with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_read_plain_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seq.fa");
        std::fs::write(&path, ">a\nATGC\n").unwrap();
        assert_eq!(read_input(&path).unwrap(), ">a\nATGC\n");
    }

    #[test]
    fn test_read_gzipped_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seq.fa.gz");

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">a\nGGCC\n").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        assert_eq!(read_input(&path).unwrap(), ">a\nGGCC\n");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_input(Path::new("/nonexistent/seq.fa")).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
