use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::systems::store::SystemCatalog;

#[derive(Args)]
pub struct SystemsArgs {
    /// Path to a custom CRISPR systems catalog (JSON)
    #[arg(long)]
    pub systems: Option<PathBuf>,
}

/// Execute systems subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or serialized.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SystemsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = match &args.systems {
        Some(path) => SystemCatalog::load_from_file(path)?,
        None => SystemCatalog::load_embedded()?,
    };

    if verbose {
        eprintln!("Loaded {} CRISPR system(s)", catalog.len());
    }

    match format {
        OutputFormat::Text => {
            println!("{:<12} {:<6} {:>6}  Description", "System", "PAM", "Guide");
            for (id, system) in catalog.iter() {
                println!(
                    "{:<12} {:<6} {:>6}  {}",
                    id.as_str(),
                    system.pam_sequence,
                    system.guide_length,
                    system.description
                );
            }
        }
        OutputFormat::Json => println!("{}", catalog.to_json()?),
        OutputFormat::Tsv => {
            println!("system\tpam_sequence\tguide_length\tdescription");
            for (id, system) in catalog.iter() {
                println!(
                    "{}\t{}\t{}\t{}",
                    id.as_str(),
                    system.pam_sequence,
                    system.guide_length,
                    system.description
                );
            }
        }
    }

    Ok(())
}
