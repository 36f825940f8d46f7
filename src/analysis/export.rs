use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::result::AnalysisResult;

/// File name offered for downloaded and exported results
pub const EXPORT_FILE_NAME: &str = "crispr_analysis_results.json";

/// Serialize a result as indented JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize analysis result")
}

/// Write a result to `path` as indented JSON.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_export(path: &Path, result: &AnalysisResult) -> Result<()> {
    let json = to_json_pretty(result)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write results to {}", path.display()))
}
