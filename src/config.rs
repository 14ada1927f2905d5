use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::inputs::{
    CalculatorInputs, Deployment, LengthUnit, MarginKind, MarginModel, TargetSettings,
    MAX_CACHE_RATE, MAX_RETENTION_RATE, MIN_RETENTION_RATE,
};
use crate::pricing::models::{find_context_window, ModelCatalog, ModelPricing};
use crate::pricing::tiers::{default_usage_tiers, UsageTier};

pub const ENV_PREFIX: &str = "PRICING_CALC";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub defaults: ScenarioDefaults,
    pub pricing: PricingConfig,
    /// Extra or overriding catalog entries
    pub models: Vec<ModelPricing>,
    pub usage_tiers: Vec<UsageTier>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Starting values for every scenario before command-line overrides
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioDefaults {
    pub model: String,
    pub monthly_users: u64,
    pub prompts_per_user: u64,
    pub input_length: f64,
    pub output_length: f64,
    pub length_unit: LengthUnit,
    pub context_window: String,
    pub cache_rate: f64,
    pub retention_rate: f64,
    pub deployment: Deployment,
}

impl Default for ScenarioDefaults {
    fn default() -> Self {
        let inputs = CalculatorInputs::default();
        Self {
            model: inputs.model_id,
            monthly_users: inputs.monthly_users,
            prompts_per_user: inputs.prompts_per_user,
            input_length: inputs.input_length,
            output_length: inputs.output_length,
            length_unit: inputs.length_unit,
            context_window: inputs.context_window,
            cache_rate: inputs.cache_rate,
            retention_rate: inputs.retention_rate,
            deployment: inputs.deployment,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingConfig {
    pub margin_model: MarginKind,
    pub margin_percent: f64,
    pub targets: TargetSettings,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            margin_model: MarginKind::Margin,
            margin_percent: 40.0,
            targets: TargetSettings::default(),
        }
    }
}

impl Config {
    pub fn catalog(&self) -> ModelCatalog {
        ModelCatalog::new(&self.models)
    }

    pub fn usage_tiers(&self) -> Vec<UsageTier> {
        if self.usage_tiers.is_empty() {
            default_usage_tiers()
        } else {
            self.usage_tiers.clone()
        }
    }

    /// Inputs seeded from the configured defaults, without targets
    pub fn base_inputs(&self) -> CalculatorInputs {
        let d = &self.defaults;
        CalculatorInputs {
            model_id: d.model.clone(),
            monthly_users: d.monthly_users,
            prompts_per_user: d.prompts_per_user,
            input_length: d.input_length,
            output_length: d.output_length,
            length_unit: d.length_unit,
            context_window: d.context_window.clone(),
            cache_rate: d.cache_rate,
            retention_rate: d.retention_rate,
            deployment: d.deployment,
            margin: MarginModel::from_kind(self.pricing.margin_model, self.pricing.margin_percent),
            ..CalculatorInputs::default()
        }
        .clamped()
    }
}

/// Load configuration from an optional TOML file, overridden by
/// `PRICING_CALC__SECTION__KEY` environment variables
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    match cfg.logging.level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => anyhow::bail!(
            "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
            other
        ),
    }

    match cfg.logging.format.as_str() {
        "pretty" | "json" => {}
        other => anyhow::bail!("Invalid log format: '{}'. Must be one of: pretty, json", other),
    }

    for model in &cfg.models {
        if model.id.is_empty() {
            anyhow::bail!("Model id cannot be empty");
        }
        if !(model.input_price.is_finite() && model.input_price >= 0.0)
            || !(model.output_price.is_finite() && model.output_price >= 0.0)
        {
            anyhow::bail!("Model '{}' has an invalid price", model.id);
        }
    }

    let catalog = cfg.catalog();
    if !catalog.contains(&cfg.defaults.model) {
        anyhow::bail!("Default model '{}' is not in the catalog", cfg.defaults.model);
    }
    find_context_window(&cfg.defaults.context_window)?;

    if !(0.0..=MAX_CACHE_RATE).contains(&cfg.defaults.cache_rate) {
        anyhow::bail!("Cache rate must be between 0 and {}", MAX_CACHE_RATE);
    }
    if !(MIN_RETENTION_RATE..=MAX_RETENTION_RATE).contains(&cfg.defaults.retention_rate) {
        anyhow::bail!(
            "Retention rate must be between {} and {}",
            MIN_RETENTION_RATE,
            MAX_RETENTION_RATE
        );
    }

    let margin = MarginModel::from_kind(cfg.pricing.margin_model, cfg.pricing.margin_percent);
    margin.price_for(1.0)?;
    MarginModel::GrossMargin(cfg.pricing.targets.target_roi / 100.0).price_for(1.0)?;

    for tier in &cfg.usage_tiers {
        if tier.name.is_empty() {
            anyhow::bail!("Usage tier name cannot be empty");
        }
    }

    Ok(())
}
