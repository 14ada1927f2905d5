//! Calculator input model
//!
//! `CalculatorInputs` is the full, serializable parameter set handed to the
//! derivation engine. Raw user-entered values pass through the `coerce_*`
//! and `clamp_*` helpers at the input boundary; these never fail, they fall
//! back to 0 and clamp into range the way the calculator form does.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;
use crate::pricing::models::UsagePreset;

/// Tokens per word when lengths are entered in words
pub const TOKENS_PER_WORD: f64 = 1.3;

pub const MAX_CACHE_RATE: f64 = 90.0;
pub const MIN_RETENTION_RATE: f64 = 10.0;
pub const MAX_RETENTION_RATE: f64 = 100.0;

/// Where the feature is deployed; scales the whole monthly cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    #[default]
    Cloud,
    Hybrid,
    #[serde(rename = "onprem")]
    OnPrem,
}

impl Deployment {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Cloud => 1.0,
            Self::Hybrid => 1.2,
            Self::OnPrem => 1.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cloud => "Cloud-based",
            Self::Hybrid => "Hybrid Deployment",
            Self::OnPrem => "On-premises",
        }
    }
}

impl FromStr for Deployment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cloud" => Ok(Self::Cloud),
            "hybrid" => Ok(Self::Hybrid),
            "onprem" | "on-prem" | "on-premises" => Ok(Self::OnPrem),
            other => Err(format!(
                "Invalid deployment: '{}'. Must be one of: cloud, hybrid, onprem",
                other
            )),
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Self::Cloud => "cloud",
            Self::Hybrid => "hybrid",
            Self::OnPrem => "onprem",
        };
        write!(f, "{}", id)
    }
}

/// Unit the per-prompt lengths are entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Tokens,
    Words,
}

impl LengthUnit {
    /// Billable tokens per unit
    pub fn token_factor(self) -> f64 {
        match self {
            Self::Tokens => 1.0,
            Self::Words => TOKENS_PER_WORD,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tokens" | "token" => Ok(Self::Tokens),
            "words" | "word" => Ok(Self::Words),
            other => Err(format!("Invalid unit: '{}'. Must be one of: tokens, words", other)),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tokens => write!(f, "tokens"),
            Self::Words => write!(f, "words"),
        }
    }
}

/// How a per-user cost is turned into a minimum price
///
/// The two calculators historically disagreed here: one multiplied the cost
/// by `1 + rate`, the other divided by `1 - rate`. Both are kept and the
/// caller picks one. Rates are fractions (0.4 = 40%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rate", rename_all = "snake_case")]
pub enum MarginModel {
    /// `price = cost / (1 - margin)`; margin is the share of price kept as profit
    GrossMargin(f64),
    /// `price = cost * (1 + markup)`
    Markup(f64),
}

impl Default for MarginModel {
    fn default() -> Self {
        Self::GrossMargin(0.4)
    }
}

impl MarginModel {
    pub fn from_kind(kind: MarginKind, percent: f64) -> Self {
        match kind {
            MarginKind::Margin => Self::GrossMargin(percent / 100.0),
            MarginKind::Markup => Self::Markup(percent / 100.0),
        }
    }

    /// Minimum viable price for the given per-user cost
    pub fn price_for(&self, cost_per_user: f64) -> Result<f64, CalcError> {
        match *self {
            Self::GrossMargin(margin) => {
                if !(0.0..1.0).contains(&margin) {
                    return Err(CalcError::InvalidMargin(margin * 100.0));
                }
                Ok(cost_per_user / (1.0 - margin))
            }
            Self::Markup(markup) => {
                if !markup.is_finite() || markup < 0.0 {
                    return Err(CalcError::InvalidMargin(markup * 100.0));
                }
                Ok(cost_per_user * (1.0 + markup))
            }
        }
    }
}

/// Selector for `MarginModel`, as used in config and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginKind {
    #[default]
    Margin,
    Markup,
}

impl FromStr for MarginKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "margin" => Ok(Self::Margin),
            "markup" => Ok(Self::Markup),
            other => Err(format!(
                "Invalid margin model: '{}'. Must be one of: margin, markup",
                other
            )),
        }
    }
}

/// Optional cost add-ons, each toggled independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddOns {
    pub fine_tuning: bool,
    pub embeddings: bool,
    pub vector_db: bool,
    pub redundancy: bool,
    pub high_availability: bool,
}

/// Business targets; their presence switches the engine into the targets variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    /// Target return, in percent; also used as the pricing margin
    pub target_roi: f64,
    pub target_users: u64,
    pub target_investment: f64,
    /// Monthly user growth, in percent
    pub growth_rate: f64,
    /// Free tier allowance as a percentage of prompts per user
    pub free_tier_percentage: f64,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            target_roi: 40.0,
            target_users: 1000,
            target_investment: 0.0,
            growth_rate: 10.0,
            free_tier_percentage: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorInputs {
    pub model_id: String,
    pub monthly_users: u64,
    pub prompts_per_user: u64,
    pub input_length: f64,
    pub output_length: f64,
    pub length_unit: LengthUnit,
    pub context_window: String,
    /// Percent of prompts served from cache, 0-90
    pub cache_rate: f64,
    /// Percent of users retained month over month, 10-100
    pub retention_rate: f64,
    pub deployment: Deployment,
    pub add_ons: AddOns,
    pub margin: MarginModel,
    pub targets: Option<TargetSettings>,
}

impl Default for CalculatorInputs {
    fn default() -> Self {
        Self {
            model_id: "gpt-4-turbo".to_string(),
            monthly_users: 100,
            prompts_per_user: 10,
            input_length: 200.0,
            output_length: 800.0,
            length_unit: LengthUnit::Tokens,
            context_window: "8k".to_string(),
            cache_rate: 20.0,
            retention_rate: 85.0,
            deployment: Deployment::Cloud,
            add_ons: AddOns::default(),
            margin: MarginModel::default(),
            targets: None,
        }
    }
}

impl CalculatorInputs {
    pub fn has_targets(&self) -> bool {
        self.targets.is_some()
    }

    /// Overwrite usage fields from a preset; everything else is left alone
    pub fn apply_preset(&mut self, preset: &UsagePreset) {
        self.model_id = preset.model.to_string();
        self.monthly_users = preset.monthly_users;
        self.prompts_per_user = preset.prompts_per_user;
        self.input_length = preset.input_length;
        self.output_length = preset.output_length;
        self.context_window = preset.context_window.to_string();
    }

    /// Re-apply the boundary clamps to every field
    ///
    /// Useful for inputs that arrive from config or JSON rather than through
    /// the `coerce_*` helpers.
    pub fn clamped(mut self) -> Self {
        self.monthly_users = self.monthly_users.max(1);
        self.prompts_per_user = self.prompts_per_user.max(1);
        self.input_length = clamp_length(self.input_length);
        self.output_length = clamp_length(self.output_length);
        self.cache_rate = clamp_cache_rate(self.cache_rate);
        self.retention_rate = clamp_retention_rate(self.retention_rate);
        if let Some(targets) = self.targets.as_mut() {
            targets.target_investment = targets.target_investment.max(0.0);
            targets.growth_rate = clamp_percent(targets.growth_rate);
            targets.free_tier_percentage = clamp_percent(targets.free_tier_percentage);
        }
        self
    }
}

fn parse_int(raw: &str) -> i64 {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i64)
        })
        .unwrap_or(0)
}

fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a whole-number field; invalid input becomes 0, then clamps to `min`
pub fn coerce_count(raw: &str, min: u64) -> u64 {
    let value = parse_int(raw);
    if value < 0 {
        min
    } else {
        (value as u64).max(min)
    }
}

/// Parse a per-prompt length; invalid input becomes 0, then clamps to 1
pub fn coerce_length(raw: &str) -> f64 {
    clamp_length(parse_number(raw))
}

/// Parse a non-negative amount such as the investment; invalid input becomes 0
pub fn coerce_amount(raw: &str) -> f64 {
    parse_number(raw).max(0.0)
}

/// Parse a percentage without clamping; invalid input becomes 0
pub fn coerce_percent(raw: &str) -> f64 {
    parse_number(raw)
}

pub fn clamp_length(value: f64) -> f64 {
    if value.is_finite() {
        value.max(1.0)
    } else {
        1.0
    }
}

pub fn clamp_cache_rate(value: f64) -> f64 {
    value.clamp(0.0, MAX_CACHE_RATE)
}

pub fn clamp_retention_rate(value: f64) -> f64 {
    value.clamp(MIN_RETENTION_RATE, MAX_RETENTION_RATE)
}

pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::find_preset;

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count("250", 1), 250);
        assert_eq!(coerce_count("", 1), 1);
        assert_eq!(coerce_count("abc", 1), 1);
        assert_eq!(coerce_count("-5", 1), 1);
        assert_eq!(coerce_count("0", 1), 1);
        assert_eq!(coerce_count("0", 0), 0);
        assert_eq!(coerce_count("12.9", 1), 12);
    }

    #[test]
    fn test_coerce_length_and_amount() {
        assert_eq!(coerce_length("350"), 350.0);
        assert_eq!(coerce_length("nope"), 1.0);
        assert_eq!(coerce_length("0.2"), 1.0);
        assert_eq!(coerce_amount(""), 0.0);
        assert_eq!(coerce_amount("-100"), 0.0);
        assert_eq!(coerce_amount("2500.5"), 2500.5);
    }

    #[test]
    fn test_rate_clamps() {
        assert_eq!(clamp_cache_rate(95.0), 90.0);
        assert_eq!(clamp_cache_rate(-1.0), 0.0);
        assert_eq!(clamp_retention_rate(5.0), 10.0);
        assert_eq!(clamp_retention_rate(120.0), 100.0);
        assert_eq!(clamp_retention_rate(85.0), 85.0);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("onprem".parse::<Deployment>().unwrap(), Deployment::OnPrem);
        assert_eq!("Hybrid".parse::<Deployment>().unwrap(), Deployment::Hybrid);
        assert!("mars".parse::<Deployment>().is_err());
        assert_eq!("words".parse::<LengthUnit>().unwrap(), LengthUnit::Words);
        assert_eq!("markup".parse::<MarginKind>().unwrap(), MarginKind::Markup);
    }

    #[test]
    fn test_margin_models_disagree() {
        let margin = MarginModel::GrossMargin(0.4);
        let markup = MarginModel::Markup(0.4);

        assert!((margin.price_for(0.6).unwrap() - 1.0).abs() < 1e-12);
        assert!((markup.price_for(0.6).unwrap() - 0.84).abs() < 1e-12);
    }

    #[test]
    fn test_margin_at_or_above_100_percent_is_rejected() {
        assert_eq!(
            MarginModel::GrossMargin(1.0).price_for(1.0).unwrap_err(),
            CalcError::InvalidMargin(100.0)
        );
        assert!(MarginModel::GrossMargin(-0.1).price_for(1.0).is_err());
        // A markup above 100% is still a valid price
        assert_eq!(MarginModel::Markup(1.5).price_for(2.0).unwrap(), 5.0);
        assert!(MarginModel::from_kind(MarginKind::Margin, 99.0).price_for(1.0).is_ok());
    }

    #[test]
    fn test_apply_preset() {
        let mut inputs = CalculatorInputs {
            cache_rate: 35.0,
            ..CalculatorInputs::default()
        };
        inputs.apply_preset(find_preset("chatbot").unwrap());

        assert_eq!(inputs.model_id, "gpt-3.5-turbo");
        assert_eq!(inputs.monthly_users, 1000);
        assert_eq!(inputs.prompts_per_user, 30);
        assert_eq!(inputs.output_length, 300.0);
        assert_eq!(inputs.context_window, "8k");
        assert_eq!(inputs.cache_rate, 35.0);
    }

    #[test]
    fn test_clamped() {
        let inputs = CalculatorInputs {
            monthly_users: 0,
            cache_rate: 150.0,
            retention_rate: 0.0,
            targets: Some(TargetSettings {
                target_investment: -10.0,
                ..TargetSettings::default()
            }),
            ..CalculatorInputs::default()
        }
        .clamped();

        assert_eq!(inputs.monthly_users, 1);
        assert_eq!(inputs.cache_rate, 90.0);
        assert_eq!(inputs.retention_rate, 10.0);
        assert_eq!(inputs.targets.unwrap().target_investment, 0.0);
    }

    #[test]
    fn test_inputs_round_trip_through_json() {
        let inputs = CalculatorInputs {
            deployment: Deployment::OnPrem,
            margin: MarginModel::Markup(0.4),
            targets: Some(TargetSettings::default()),
            ..CalculatorInputs::default()
        };
        let json = serde_json::to_string(&inputs).unwrap();
        assert!(json.contains("\"onprem\""));
        assert!(json.contains("\"markup\""));
        let back: CalculatorInputs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inputs);
    }
}
