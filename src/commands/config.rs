use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::info;

use ai_pricing_calculator::config::Config;

/// Execute the config show command
///
/// Displays the effective configuration (file plus environment overrides)
pub fn show(cfg: &Config) -> Result<()> {
    info!("Displaying effective configuration");

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(cfg)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
///
/// `loaded` is the result of loading `path`; load errors are reported here
/// rather than aborting before the command runs.
pub fn validate(path: &Path, loaded: Result<Config>) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file");

    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            println!("{} {}", "✗ Configuration is invalid:".red(), e);
            return Err(e);
        }
    };

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };
    println!("  {}: {}", "File".cyan(), source);
    println!("  {}: {}", "Default Model".cyan(), cfg.defaults.model);
    println!(
        "  {}: {} ({} configured)",
        "Catalog Models".cyan(),
        cfg.catalog().models().len(),
        cfg.models.len()
    );
    println!(
        "  {}: {:?} {}%",
        "Pricing".cyan(),
        cfg.pricing.margin_model,
        cfg.pricing.margin_percent
    );
    println!("  {}: {}", "Usage Tiers".cyan(), cfg.usage_tiers().len());

    info!("Configuration validation successful");
    Ok(())
}
