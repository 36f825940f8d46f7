use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_input, OutputFormat};
use crate::core::types::InputKind;
use crate::parsing::input::{inspect, InputReport};

#[derive(Args)]
pub struct ParseArgs {
    /// Input file (plain sequence or FASTA, optionally .gz). Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute parse subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or fails validation.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ParseArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let report = inspect(&text)?;

    if verbose {
        eprintln!(
            "Read {} bytes from {} as {}",
            text.len(),
            args.input.display(),
            report.kind
        );
    }

    if report.headers_only {
        eprintln!("Warning: FASTA input has headers but no sequence lines");
    }

    for empty in &report.empty_records {
        eprintln!(
            "Warning: header '{}' on line {} has no sequence and was skipped",
            empty.header, empty.line
        );
    }

    match format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Tsv => print_tsv(&report),
    }

    Ok(())
}

fn print_text(report: &InputReport) {
    let summary = &report.summary;

    println!("Input: {}", report.kind);
    println!("Sequences: {}", summary.total_sequences);
    match (summary.average_length, summary.average_gc) {
        (Some(length), Some(gc)) => {
            println!("Average length: {length}");
            println!("Average GC: {gc:.2}%");
        }
        _ => println!("No sequences found"),
    }

    if report.kind == InputKind::Plain {
        return;
    }

    for (i, record) in report.sequences.iter().enumerate() {
        println!("\n#{} {}", i + 1, record.header);
        println!("   Length: {}", record.length);
        println!("   GC: {:.2}%", record.gc_content);
    }
}

fn print_tsv(report: &InputReport) {
    println!("index\theader\tlength\tgc_content");
    for (i, record) in report.sequences.iter().enumerate() {
        println!(
            "{}\t{}\t{}\t{:.2}",
            i + 1,
            record.header,
            record.length,
            record.gc_content
        );
    }
}
