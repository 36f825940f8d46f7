use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::analysis::engine::GuideAnalyzer;
use crate::analysis::export::{write_export, EXPORT_FILE_NAME};
use crate::analysis::result::AnalysisResult;
use crate::analysis::scoring::ScoringWeights;
use crate::cli::{read_input, OutputFormat};
use crate::config::AppConfig;
use crate::parsing::input::{select_record, SelectedSequence};
use crate::systems::store::{CrisprSystem, SystemCatalog};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input file (plain sequence or FASTA, optionally .gz). Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// CRISPR system to design guides for
    #[arg(short, long, default_value = "SpCas9")]
    pub system: String,

    /// FASTA record to analyze (1-based)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub record: u32,

    /// Count near-matching off-target sites (sequences up to 10,000 bases)
    #[arg(long)]
    pub off_targets: bool,

    /// Number of guides to show (all by default)
    #[arg(short = 'n', long)]
    pub max_guides: Option<usize>,

    /// Path to a custom CRISPR systems catalog (JSON)
    #[arg(long)]
    pub systems: Option<PathBuf>,

    /// Write the full result as JSON (defaults to crispr_analysis_results.json)
    #[arg(long, num_args = 0..=1, default_missing_value = EXPORT_FILE_NAME)]
    pub export: Option<PathBuf>,

    // === Scoring weight options ===
    /// Weight for GC balance (0-100, default 60)
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_gc: u32,

    /// Weight for secondary-structure score (0-100, default 40)
    #[arg(long, default_value = "40", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_structure: u32,

    /// Weight for off-target specificity (0-100, default 0; needs --off-targets)
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_off_target: u32,
}

/// Execute analyze subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or validated, the system is
/// unknown, or the export file cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AnalyzeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let index = usize::try_from(args.record - 1)?;
    let selected = select_record(&text, index)?;

    let catalog = match &args.systems {
        Some(path) => SystemCatalog::load_from_file(path)?,
        None => SystemCatalog::load_embedded()?,
    };

    let weights = ScoringWeights {
        gc: f64::from(args.weight_gc) / 100.0,
        structure: f64::from(args.weight_structure) / 100.0,
        off_target: f64::from(args.weight_off_target) / 100.0,
    };
    let config = AppConfig::default().with_scoring_weights(weights);

    if verbose {
        let norm = if args.off_targets {
            weights.normalized()
        } else {
            weights.without_off_target().normalized()
        };
        eprintln!(
            "Selected {} bases ({}, record {} of {})",
            selected.sequence.len(),
            selected.kind,
            args.record,
            selected.record_count
        );
        eprintln!(
            "Scoring weights: {:.0}% GC balance, {:.0}% structure, {:.0}% off-target",
            norm.gc * 100.0,
            norm.structure * 100.0,
            norm.off_target * 100.0
        );
    }

    let analyzer = GuideAnalyzer::new(Arc::new(catalog), config.analysis_config());
    let result = analyzer.analyze(&selected.sequence, &args.system, args.off_targets)?;

    match format {
        OutputFormat::Text => {
            let system = analyzer.catalog().get(&args.system);
            print_text(&selected, &args.system, system, &result, args.max_guides);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*result)?),
        OutputFormat::Tsv => print_tsv(&result, args.max_guides),
    }

    if let Some(path) = &args.export {
        write_export(path, &result)?;
        eprintln!("Results written to {}", path.display());
    }

    Ok(())
}

fn print_text(
    selected: &SelectedSequence,
    system_name: &str,
    system: Option<&CrisprSystem>,
    result: &AnalysisResult,
    max_guides: Option<usize>,
) {
    let name = selected.header.as_deref().unwrap_or("(plain sequence)");
    println!("Sequence: {name} ({} bases)", selected.sequence.len());
    if let Some(system) = system {
        println!(
            "System: {system_name} (PAM {}, guide length {})",
            system.pam_sequence, system.guide_length
        );
    }

    let stats = &result.statistics;
    println!(
        "Guides: {} (average GC {:.2}%, average efficiency {:.2})",
        stats.total_guides, stats.average_gc, stats.average_efficiency
    );

    let Some(best) = &stats.best_guide else {
        println!("\nNo guides found.");
        return;
    };
    println!(
        "Best: {} at {} (efficiency {:.2})",
        best.sequence, best.position, best.efficiency_score
    );

    println!(
        "\n{:>4}  {:>8}  {:<25}  {:<5}  {:>6}  {:>9}  {:>10}  {:>11}",
        "#", "Position", "Guide", "PAM", "GC%", "Structure", "Efficiency", "Off-targets"
    );
    let shown = max_guides.unwrap_or(result.guides.len());
    for (i, guide) in result.guides.iter().take(shown).enumerate() {
        let off_targets = guide
            .off_target_sites
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        println!(
            "{:>4}  {:>8}  {:<25}  {:<5}  {:>6.2}  {:>9.2}  {:>10.2}  {:>11}",
            i + 1,
            guide.position,
            guide.sequence,
            guide.pam,
            guide.gc_content,
            guide.structure_score,
            guide.efficiency_score,
            off_targets
        );
    }
    if shown < result.guides.len() {
        println!("   ... {} more", result.guides.len() - shown);
    }
}

fn print_tsv(result: &AnalysisResult, max_guides: Option<usize>) {
    println!(
        "index\tposition\tsequence\tpam\tgc_content\tstructure_score\tefficiency_score\toff_target_sites\toff_target_score"
    );
    let shown = max_guides.unwrap_or(result.guides.len());
    for (i, guide) in result.guides.iter().take(shown).enumerate() {
        println!(
            "{}\t{}\t{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{}\t{}",
            i + 1,
            guide.position,
            guide.sequence,
            guide.pam,
            guide.gc_content,
            guide.structure_score,
            guide.efficiency_score,
            guide.off_target_sites.map_or_else(String::new, |n| n.to_string()),
            guide.off_target_score.map_or_else(String::new, |s| format!("{s:.2}")),
        );
    }
}
