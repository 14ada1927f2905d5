use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CalcError;
use crate::inputs::{AddOns, CalculatorInputs, MarginModel};
use crate::pricing::models::{find_context_window, ModelCatalog, ModelPricing};
use crate::pricing::projection::{month_reaching_users, payback_month, project_revenue, MonthProjection};
use crate::pricing::tiers::{standard_ladder, target_ladder, PricingTier};

/// Flat monthly fee for a fine-tuned model
pub const FINE_TUNING_FEE: f64 = 500.0;
/// Embedding cost per prompt
pub const EMBEDDING_RATE: f64 = 0.001;
pub const VECTOR_DB_BASE_FEE: f64 = 50.0;
pub const VECTOR_DB_PER_USER: f64 = 0.001;
/// Share of the running cost added for redundancy
pub const REDUNDANCY_RATE: f64 = 0.3;
/// Share of the running cost added for high availability
pub const HIGH_AVAILABILITY_RATE: f64 = 0.5;

/// Suggested pricing strategy, keyed on prompts per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    #[serde(rename = "Flat Rate")]
    FlatRate,
    #[serde(rename = "Tiered Pricing")]
    TieredPricing,
    #[serde(rename = "Usage-based Pricing")]
    UsageBased,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::FlatRate => "Flat Rate",
            Self::TieredPricing => "Tiered Pricing",
            Self::UsageBased => "Usage-based Pricing",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::FlatRate => "Best for your current usage pattern with predictable per-user costs.",
            Self::TieredPricing => {
                "Recommended for your mixed usage pattern across different user types."
            }
            Self::UsageBased => {
                "Optimal for your high-volume usage with variable consumption patterns."
            }
        }
    }
}

/// `< 5` flat rate, `5..20` tiered, `>= 20` usage-based
pub fn classify_strategy(prompts_per_user: u64) -> Strategy {
    match prompts_per_user {
        0..=4 => Strategy::FlatRate,
        5..=19 => Strategy::TieredPricing,
        _ => Strategy::UsageBased,
    }
}

/// Where the monthly cost comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub input_cost: f64,
    pub output_cost: f64,
    pub add_on_cost: f64,
    pub deployment_surcharge: f64,
    pub total_cost: f64,
}

/// Everything derived from one set of inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub model_id: String,
    /// Input volume per month, in the unit the lengths were entered in
    pub input_units: f64,
    pub output_units: f64,
    pub total_units: f64,
    pub billable_tokens: f64,
    pub costs: CostBreakdown,
    pub total_cost: f64,
    pub cost_per_user: f64,
    /// Minimum viable price per user, unrounded
    pub minimum_price: f64,
    pub roi: f64,
    pub break_even_users: u64,
    pub tiers: Vec<PricingTier>,
    pub strategy: Strategy,
    pub exceeds_context_window: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Vec<MonthProjection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_users_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payback_month: Option<u32>,
}

/// Add-on costs stacked onto `base_cost`, in order
///
/// Redundancy and high availability are percentages of the running total,
/// so enabling both compounds (x1.3 then x1.5) instead of adding 80%.
pub fn apply_add_ons(base_cost: f64, add_ons: &AddOns, monthly_users: u64, prompts_per_user: u64) -> f64 {
    let users = monthly_users as f64;
    let mut total = base_cost;

    if add_ons.fine_tuning {
        total += FINE_TUNING_FEE;
    }
    if add_ons.embeddings {
        total += users * prompts_per_user as f64 * EMBEDDING_RATE;
    }
    if add_ons.vector_db {
        total += VECTOR_DB_BASE_FEE + users * VECTOR_DB_PER_USER;
    }
    if add_ons.redundancy {
        total += total * REDUNDANCY_RATE;
    }
    if add_ons.high_availability {
        total += total * HIGH_AVAILABILITY_RATE;
    }

    total
}

/// Derivation engine bound to a model catalog
pub struct CostCalculator {
    catalog: ModelCatalog,
}

impl CostCalculator {
    pub fn new(catalog: ModelCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Recompute every derived metric from scratch
    pub fn recompute(&self, inputs: &CalculatorInputs) -> Result<DerivedMetrics, CalcError> {
        recompute(inputs, &self.catalog)
    }
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self::new(ModelCatalog::default())
    }
}

/// Recompute every derived metric against `catalog`
pub fn recompute(inputs: &CalculatorInputs, catalog: &ModelCatalog) -> Result<DerivedMetrics, CalcError> {
    let model = catalog.find(&inputs.model_id)?;
    derive(inputs, model)
}

fn derive(inputs: &CalculatorInputs, model: &ModelPricing) -> Result<DerivedMetrics, CalcError> {
    if inputs.monthly_users == 0 {
        return Err(CalcError::NoUsers);
    }

    let users = inputs.monthly_users as f64;
    let window = find_context_window(&inputs.context_window)?;

    // Cache hits are never billed
    let effective_prompts = inputs.prompts_per_user as f64 * (1.0 - inputs.cache_rate / 100.0);

    let input_units = users * effective_prompts * inputs.input_length;
    let output_units = users * effective_prompts * inputs.output_length;
    let total_units = users * effective_prompts * (inputs.input_length + inputs.output_length);

    let factor = inputs.length_unit.token_factor();
    let input_tokens = input_units * factor;
    let output_tokens = output_units * factor;

    let input_cost = (input_tokens / 1000.0) * model.input_price;
    let output_cost = (output_tokens / 1000.0) * model.output_price;
    let base_cost = input_cost + output_cost;

    let with_add_ons = apply_add_ons(
        base_cost,
        &inputs.add_ons,
        inputs.monthly_users,
        inputs.prompts_per_user,
    );
    let total_cost = with_add_ons * inputs.deployment.multiplier();

    let cost_per_user = total_cost / users;

    let margin = match &inputs.targets {
        Some(targets) => MarginModel::GrossMargin(targets.target_roi / 100.0),
        None => inputs.margin,
    };
    let minimum_price = margin.price_for(cost_per_user)?;

    let roi = if total_cost > 0.0 {
        let revenue = minimum_price * users * (inputs.retention_rate / 100.0);
        (revenue - total_cost) / total_cost * 100.0
    } else {
        0.0
    };

    let break_even_users = if minimum_price > 0.0 {
        (total_cost / minimum_price).ceil() as u64
    } else {
        0
    };

    let per_prompt_tokens = (inputs.input_length + inputs.output_length) * factor;
    let exceeds_context_window = per_prompt_tokens > window.tokens as f64;
    if exceeds_context_window {
        warn!(
            "Prompt size of {:.0} tokens exceeds the {} context window",
            per_prompt_tokens, window.name
        );
    }

    let (tiers, projection, target_users_month, payback) = match &inputs.targets {
        Some(targets) => {
            let tiers = target_ladder(
                minimum_price,
                inputs.prompts_per_user,
                targets.free_tier_percentage,
            );
            let projection = project_revenue(
                inputs.monthly_users,
                minimum_price,
                total_cost,
                targets.growth_rate,
            );
            let reached = month_reaching_users(&projection, targets.target_users);
            let payback = payback_month(&projection, targets.target_investment);
            (tiers, Some(projection), reached, payback)
        }
        None => (standard_ladder(minimum_price).into_tiers(), None, None, None),
    };

    let strategy = classify_strategy(inputs.prompts_per_user);

    debug!(
        model = %model.id,
        total_cost,
        cost_per_user,
        minimum_price,
        strategy = strategy.label(),
        "Recomputed pricing metrics"
    );

    Ok(DerivedMetrics {
        model_id: model.id.clone(),
        input_units,
        output_units,
        total_units,
        billable_tokens: input_tokens + output_tokens,
        costs: CostBreakdown {
            input_cost,
            output_cost,
            add_on_cost: with_add_ons - base_cost,
            deployment_surcharge: total_cost - with_add_ons,
            total_cost,
        },
        total_cost,
        cost_per_user,
        minimum_price,
        roi,
        break_even_users,
        tiers,
        strategy,
        exceeds_context_window,
        projection,
        target_users_month,
        payback_month: payback,
    })
}
