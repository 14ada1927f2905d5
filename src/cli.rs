use ai_pricing_calculator::inputs::{
    clamp_cache_rate, clamp_percent, clamp_retention_rate, coerce_amount, coerce_count,
    coerce_length, coerce_percent, Deployment, LengthUnit, MarginKind,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pricing-calc", version, about = "AI feature cost and pricing calculator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "pricing.toml", global = true)]
    pub config: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Estimate cost and minimum price per user (default)
    Estimate(UsageArgs),

    /// Estimate with cache, retention, deployment and add-on costs
    Advanced(AdvancedArgs),

    /// Price against business targets with a 12-month projection
    Targets(TargetArgs),

    /// List the model price catalog
    Models,

    /// List usage presets
    Presets,

    /// List context window sizes
    Windows,

    /// Estimate prompt length from sample text
    Tokens {
        /// Sample prompt or response text
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the sample from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Request the detailed pricing guide by email
    Subscribe {
        /// Email address
        email: String,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}

/// Usage assumptions shared by every calculator
///
/// Numeric values never fail to parse: invalid input becomes 0 and is then
/// clamped to the field's minimum.
#[derive(Args, Debug, Clone, Default)]
pub struct UsageArgs {
    /// Model id from the catalog
    #[arg(short, long)]
    pub model: Option<String>,

    /// Monthly active users
    #[arg(short, long, value_parser = parse_count)]
    pub users: Option<u64>,

    /// Average prompts per user per month
    #[arg(short, long, value_parser = parse_count)]
    pub prompts: Option<u64>,

    /// Input length per prompt
    #[arg(long, value_parser = parse_length)]
    pub input_length: Option<f64>,

    /// Output length per prompt
    #[arg(long, value_parser = parse_length)]
    pub output_length: Option<f64>,

    /// Unit of the lengths: tokens or words
    #[arg(long)]
    pub unit: Option<LengthUnit>,

    /// Context window id (4k, 8k, 16k, 32k, 128k)
    #[arg(long)]
    pub context_window: Option<String>,

    /// Start from a usage preset; explicit flags still win
    #[arg(long)]
    pub preset: Option<String>,

    /// How the minimum price is derived: margin or markup
    #[arg(long)]
    pub margin_model: Option<MarginKind>,

    /// Margin or markup in percent
    #[arg(long, value_parser = parse_percent)]
    pub margin: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AdvancedArgs {
    #[command(flatten)]
    pub usage: UsageArgs,

    /// Cache hit rate in percent (0-90)
    #[arg(long, value_parser = parse_cache_rate)]
    pub cache_rate: Option<f64>,

    /// User retention rate in percent (10-100)
    #[arg(long, value_parser = parse_retention_rate)]
    pub retention_rate: Option<f64>,

    /// Deployment type: cloud, hybrid or onprem
    #[arg(short, long)]
    pub deployment: Option<Deployment>,

    /// Add the fine-tuning fee
    #[arg(long)]
    pub fine_tuning: bool,

    /// Add embedding costs
    #[arg(long)]
    pub embeddings: bool,

    /// Add a vector database
    #[arg(long)]
    pub vector_db: bool,

    /// Add redundancy (30% of running cost)
    #[arg(long)]
    pub redundancy: bool,

    /// Add high availability (50% of running cost)
    #[arg(long)]
    pub high_availability: bool,

    /// Also show per-tier economics for the configured usage tiers
    #[arg(long)]
    pub usage_tiers: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    #[command(flatten)]
    pub advanced: AdvancedArgs,

    /// Target ROI in percent; used as the pricing margin
    #[arg(long, value_parser = parse_percent)]
    pub target_roi: Option<f64>,

    /// User count to reach
    #[arg(long, value_parser = parse_count)]
    pub target_users: Option<u64>,

    /// Up-front investment to recoup
    #[arg(long, value_parser = parse_amount)]
    pub investment: Option<f64>,

    /// Monthly user growth in percent
    #[arg(long, value_parser = parse_bounded_percent)]
    pub growth_rate: Option<f64>,

    /// Free tier allowance as a percentage of prompts per user
    #[arg(long, value_parser = parse_bounded_percent)]
    pub free_tier: Option<f64>,
}

impl Cli {
    /// Get the command to execute, defaulting to Estimate if none provided
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Estimate(UsageArgs::default()))
    }
}

fn parse_count(s: &str) -> Result<u64, String> {
    Ok(coerce_count(s, 1))
}

fn parse_length(s: &str) -> Result<f64, String> {
    Ok(coerce_length(s))
}

fn parse_amount(s: &str) -> Result<f64, String> {
    Ok(coerce_amount(s))
}

fn parse_percent(s: &str) -> Result<f64, String> {
    Ok(coerce_percent(s))
}

fn parse_bounded_percent(s: &str) -> Result<f64, String> {
    Ok(clamp_percent(coerce_percent(s)))
}

fn parse_cache_rate(s: &str) -> Result<f64, String> {
    Ok(clamp_cache_rate(coerce_percent(s)))
}

fn parse_retention_rate(s: &str) -> Result<f64, String> {
    Ok(clamp_retention_rate(coerce_percent(s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_estimate() {
        let cli = Cli {
            config: PathBuf::from("pricing.toml"),
            json: false,
            command: None,
        };

        match cli.get_command() {
            Commands::Estimate(args) => {
                assert!(args.model.is_none());
                assert!(args.users.is_none());
            }
            _ => panic!("Expected Estimate command"),
        }
    }

    #[test]
    fn test_cli_parsing_estimate() {
        let args = vec!["pricing-calc", "estimate", "-m", "claude-sonnet", "-u", "2500", "-p", "12"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Estimate(usage) => {
                assert_eq!(usage.model.as_deref(), Some("claude-sonnet"));
                assert_eq!(usage.users, Some(2500));
                assert_eq!(usage.prompts, Some(12));
            }
            _ => panic!("Expected Estimate command"),
        }
    }

    #[test]
    fn test_invalid_numbers_are_coerced() {
        let args = vec!["pricing-calc", "estimate", "--users", "lots", "--input-length", ""];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Estimate(usage) => {
                assert_eq!(usage.users, Some(1));
                assert_eq!(usage.input_length, Some(1.0));
            }
            _ => panic!("Expected Estimate command"),
        }
    }

    #[test]
    fn test_cli_parsing_advanced() {
        let args = vec![
            "pricing-calc",
            "advanced",
            "--deployment",
            "onprem",
            "--cache-rate",
            "95",
            "--redundancy",
            "--json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.json);

        match cli.get_command() {
            Commands::Advanced(adv) => {
                assert_eq!(adv.deployment, Some(Deployment::OnPrem));
                assert_eq!(adv.cache_rate, Some(90.0));
                assert!(adv.redundancy);
                assert!(!adv.high_availability);
            }
            _ => panic!("Expected Advanced command"),
        }
    }

    #[test]
    fn test_cli_parsing_targets() {
        let args = vec![
            "pricing-calc",
            "targets",
            "--target-roi",
            "60",
            "--growth-rate",
            "15",
            "--unit",
            "words",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Targets(t) => {
                assert_eq!(t.target_roi, Some(60.0));
                assert_eq!(t.growth_rate, Some(15.0));
                assert_eq!(t.advanced.usage.unit, Some(LengthUnit::Words));
            }
            _ => panic!("Expected Targets command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_deployment() {
        let args = vec!["pricing-calc", "advanced", "--deployment", "mars"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_config_show() {
        let args = vec!["pricing-calc", "config", "show"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Config { action } => {
                assert!(matches!(action, ConfigCommands::Show));
            }
            _ => panic!("Expected Config command"),
        }
    }
}
