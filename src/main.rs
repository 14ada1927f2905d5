use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use ai_pricing_calculator::{
    config::{self, LoggingConfig},
    init_tracing,
};
use commands::estimate::View;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    // Configuration is loaded up front so logging can honor it; `config
    // validate` reports a load failure itself
    let loaded = config::load_config(&args.config);
    let logging = match &loaded {
        Ok(cfg) => cfg.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };
    init_tracing(&logging.level, &logging.format);

    match args.get_command() {
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&loaded?)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config, loaded)?,
        },
        cli::Commands::Estimate(usage) => {
            let cfg = loaded?;
            let inputs = commands::estimate::basic_inputs(&cfg, &usage)?;
            commands::estimate::execute(&cfg, inputs, View::Basic, args.json)?;
        }
        cli::Commands::Advanced(advanced) => {
            let cfg = loaded?;
            let inputs = commands::estimate::advanced_inputs(&cfg, &advanced)?;
            let view = View::Advanced {
                usage_tiers: advanced.usage_tiers,
            };
            commands::estimate::execute(&cfg, inputs, view, args.json)?;
        }
        cli::Commands::Targets(targets) => {
            let cfg = loaded?;
            let inputs = commands::estimate::target_inputs(&cfg, &targets)?;
            commands::estimate::execute(&cfg, inputs, View::Targets, args.json)?;
        }
        cli::Commands::Models => commands::catalog::models(&loaded?, args.json)?,
        cli::Commands::Presets => commands::catalog::presets(args.json)?,
        cli::Commands::Windows => commands::catalog::windows(args.json)?,
        cli::Commands::Tokens { text, file } => commands::tokens::execute(text, file, args.json)?,
        cli::Commands::Subscribe { email } => commands::subscribe::execute(&email).await?,
        cli::Commands::Version => {
            println!("AI Pricing Calculator v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
