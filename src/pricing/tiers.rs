//! Pricing ladders
//!
//! A ladder is a handful of price points derived from one base price by
//! fixed ratios. The ratios and feature lists are constants, not outputs of
//! the cost model.

use serde::{Deserialize, Serialize};

use crate::pricing::models::ModelPricing;

pub const PRO_RATIO: f64 = 2.5;
pub const ENTERPRISE_RATIO: f64 = 10.0;

/// Usage limit multipliers relative to prompts per user
pub const PRO_USAGE_MULTIPLIER: u64 = 3;
pub const ENTERPRISE_USAGE_MULTIPLIER: u64 = 10;

const FREE_FEATURES: &[&str] = &["Limited monthly prompts", "Community support"];
const BASIC_FEATURES: &[&str] = &["Standard usage allowance", "Email support", "Core AI features"];
const PRO_FEATURES: &[&str] = &[
    "3x usage allowance",
    "Priority support",
    "Advanced AI features",
    "Usage analytics",
];
const ENTERPRISE_FEATURES: &[&str] = &[
    "10x usage allowance",
    "Dedicated support",
    "Custom integrations",
    "SLA guarantee",
];

/// Three-rung ladder: basic, professional, enterprise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StandardLadder {
    pub basic: u64,
    pub pro: u64,
    pub enterprise: u64,
}

/// One rung of a ladder as presented to users
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingTier {
    pub name: &'static str,
    /// Monthly price per user, whole currency units
    pub price: u64,
    /// Prompts per user per month; `None` when the ladder carries no limits
    pub usage_limit: Option<u64>,
    pub features: Vec<&'static str>,
}

fn ceil_price(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.ceil() as u64
    } else {
        0
    }
}

/// Ladder used when no business targets are set
pub fn standard_ladder(price: f64) -> StandardLadder {
    StandardLadder {
        basic: ceil_price(price),
        pro: ceil_price(price * PRO_RATIO),
        enterprise: ceil_price(price * ENTERPRISE_RATIO),
    }
}

impl StandardLadder {
    pub fn into_tiers(self) -> Vec<PricingTier> {
        vec![
            PricingTier {
                name: "Basic",
                price: self.basic,
                usage_limit: None,
                features: Vec::new(),
            },
            PricingTier {
                name: "Professional",
                price: self.pro,
                usage_limit: None,
                features: Vec::new(),
            },
            PricingTier {
                name: "Enterprise",
                price: self.enterprise,
                usage_limit: None,
                features: Vec::new(),
            },
        ]
    }
}

/// Four-rung ladder with a free tier and usage limits
///
/// The free tier's limit is `prompts_per_user * free_tier_percentage / 100`,
/// rounded down.
pub fn target_ladder(price: f64, prompts_per_user: u64, free_tier_percentage: f64) -> Vec<PricingTier> {
    let standard = standard_ladder(price);
    let free_limit = (prompts_per_user as f64 * free_tier_percentage.max(0.0) / 100.0).floor() as u64;

    vec![
        PricingTier {
            name: "Free",
            price: 0,
            usage_limit: Some(free_limit),
            features: FREE_FEATURES.to_vec(),
        },
        PricingTier {
            name: "Basic",
            price: standard.basic,
            usage_limit: Some(prompts_per_user),
            features: BASIC_FEATURES.to_vec(),
        },
        PricingTier {
            name: "Professional",
            price: standard.pro,
            usage_limit: Some(prompts_per_user.saturating_mul(PRO_USAGE_MULTIPLIER)),
            features: PRO_FEATURES.to_vec(),
        },
        PricingTier {
            name: "Enterprise",
            price: standard.enterprise,
            usage_limit: Some(prompts_per_user.saturating_mul(ENTERPRISE_USAGE_MULTIPLIER)),
            features: ENTERPRISE_FEATURES.to_vec(),
        },
    ]
}

/// User-editable usage tier row (users, prompts and price per tier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageTier {
    pub name: String,
    pub user_count: u64,
    pub prompts_per_user: u64,
    /// Monthly price per user
    pub price: f64,
}

impl UsageTier {
    pub fn new(name: &str, user_count: u64, prompts_per_user: u64, price: f64) -> Self {
        Self {
            name: name.to_string(),
            user_count,
            prompts_per_user,
            price,
        }
    }
}

pub fn default_usage_tiers() -> Vec<UsageTier> {
    vec![
        UsageTier::new("Free Tier", 100, 5, 0.0),
        UsageTier::new("Starter", 500, 20, 10.0),
        UsageTier::new("Professional", 1000, 50, 25.0),
        UsageTier::new("Enterprise", 5000, 100, 100.0),
    ]
}

/// Monthly economics of one usage tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierEconomics {
    pub name: String,
    pub revenue: f64,
    pub model_cost: f64,
    pub profit: f64,
}

/// Model cost against revenue for each usage tier
///
/// Only model token cost is counted; add-ons and deployment are not split
/// across tiers. `input_tokens` and `output_tokens` are per prompt.
pub fn evaluate_usage_tiers(
    tiers: &[UsageTier],
    model: &ModelPricing,
    input_tokens: f64,
    output_tokens: f64,
) -> Vec<TierEconomics> {
    tiers
        .iter()
        .map(|tier| {
            let prompts = tier.user_count as f64 * tier.prompts_per_user as f64;
            let model_cost = (prompts * input_tokens / 1000.0) * model.input_price
                + (prompts * output_tokens / 1000.0) * model.output_price;
            let revenue = tier.user_count as f64 * tier.price;
            TierEconomics {
                name: tier.name.clone(),
                revenue,
                model_cost,
                profit: revenue - model_cost,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ladder_ratios() {
        for price in [0.4333, 1.0, 3.2, 17.01, 250.0] {
            let ladder = standard_ladder(price);
            assert_eq!(ladder.basic, (price).ceil() as u64);
            assert_eq!(ladder.pro, (price * 2.5).ceil() as u64);
            assert_eq!(ladder.enterprise, (price * 10.0).ceil() as u64);
        }
    }

    #[test]
    fn test_standard_ladder_rounds_each_rung_from_raw_price() {
        // 0.4333 -> basic 1, but pro is ceil(1.083) = 2, not 1 * 2.5 rounded
        let ladder = standard_ladder(0.26 / 0.6);
        assert_eq!(ladder, StandardLadder { basic: 1, pro: 2, enterprise: 5 });
    }

    #[test]
    fn test_target_ladder_shape() {
        let tiers = target_ladder(4.2, 10, 20.0);

        let names: Vec<_> = tiers.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Free", "Basic", "Professional", "Enterprise"]);

        assert_eq!(tiers[0].price, 0);
        assert_eq!(tiers[0].usage_limit, Some(2));
        assert_eq!(tiers[1].price, 5);
        assert_eq!(tiers[1].usage_limit, Some(10));
        assert_eq!(tiers[2].price, 11);
        assert_eq!(tiers[2].usage_limit, Some(30));
        assert_eq!(tiers[3].price, 42);
        assert_eq!(tiers[3].usage_limit, Some(100));
        assert!(tiers.iter().all(|t| !t.features.is_empty()));
    }

    #[test]
    fn test_free_tier_limit_rounds_down() {
        let tiers = target_ladder(1.0, 7, 25.0);
        assert_eq!(tiers[0].usage_limit, Some(1));
    }

    #[test]
    fn test_evaluate_usage_tiers() {
        let model = ModelPricing::new("m", "M", "", 0.01, 0.03);
        let tiers = vec![UsageTier::new("Starter", 500, 20, 10.0)];

        let economics = evaluate_usage_tiers(&tiers, &model, 200.0, 800.0);

        // 10,000 prompts: 2,000K input tokens * 0.01 + 8,000K output * 0.03
        assert!((economics[0].model_cost - 260.0).abs() < 1e-9);
        assert_eq!(economics[0].revenue, 5000.0);
        assert!((economics[0].profit - 4740.0).abs() < 1e-9);
    }
}
