use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use ai_pricing_calculator::tokens;

use crate::commands::report::format_number;

/// Execute the tokens command
///
/// Counts a sample prompt so the per-prompt lengths can be filled in with
/// real numbers.
pub fn execute(text: Option<String>, file: Option<PathBuf>, json: bool) -> Result<()> {
    let sample = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("Provide sample text with --text or --file"),
    };

    info!(characters = sample.len(), "Estimating token count");
    let estimate = tokens::estimate(&sample)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    println!("{}", "Token Estimate:".green().bold());
    println!("  {}: {}", "Characters".cyan(), format_number(estimate.characters as f64));
    println!("  {}: {}", "Words".cyan(), format_number(estimate.words as f64));
    println!("  {}: {}", "Tokens (cl100k)".cyan(), format_number(estimate.tokens as f64));
    println!(
        "  {}: {:.1}",
        "Tokens (words x 1.3)".cyan(),
        estimate.approximate_tokens
    );
    Ok(())
}
