//! Calculator commands: `estimate`, `advanced` and `targets`
//!
//! All three share one engine. They differ only in which inputs they expose
//! and how much of the derived metrics they print.

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde_json::json;
use tracing::info;

use ai_pricing_calculator::{
    config::Config,
    inputs::{AddOns, CalculatorInputs, Deployment, MarginModel},
    pricing::{
        models::find_preset,
        tiers::{evaluate_usage_tiers, TierEconomics},
        CostCalculator, DerivedMetrics, ModelPricing,
    },
};

use crate::cli::{AdvancedArgs, TargetArgs, UsageArgs};
use crate::commands::report::{
    format_currency, format_currency_precise, format_number, projection_table, tiers_table,
};

/// How much of the result to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Basic,
    Advanced { usage_tiers: bool },
    Targets,
}

fn apply_usage(inputs: &mut CalculatorInputs, args: &UsageArgs, cfg: &Config) -> Result<()> {
    if let Some(id) = &args.preset {
        inputs.apply_preset(find_preset(id)?);
    }
    if let Some(model) = &args.model {
        inputs.model_id = model.clone();
    }
    if let Some(users) = args.users {
        inputs.monthly_users = users;
    }
    if let Some(prompts) = args.prompts {
        inputs.prompts_per_user = prompts;
    }
    if let Some(len) = args.input_length {
        inputs.input_length = len;
    }
    if let Some(len) = args.output_length {
        inputs.output_length = len;
    }
    if let Some(unit) = args.unit {
        inputs.length_unit = unit;
    }
    if let Some(window) = &args.context_window {
        inputs.context_window = window.clone();
    }
    if args.margin_model.is_some() || args.margin.is_some() {
        inputs.margin = MarginModel::from_kind(
            args.margin_model.unwrap_or(cfg.pricing.margin_model),
            args.margin.unwrap_or(cfg.pricing.margin_percent),
        );
    }
    Ok(())
}

/// Inputs for the basic calculator: no cache, cloud, no add-ons
pub fn basic_inputs(cfg: &Config, args: &UsageArgs) -> Result<CalculatorInputs> {
    let mut inputs = cfg.base_inputs();
    apply_usage(&mut inputs, args, cfg)?;
    inputs.cache_rate = 0.0;
    inputs.deployment = Deployment::Cloud;
    inputs.add_ons = AddOns::default();
    Ok(inputs)
}

pub fn advanced_inputs(cfg: &Config, args: &AdvancedArgs) -> Result<CalculatorInputs> {
    let mut inputs = cfg.base_inputs();
    apply_usage(&mut inputs, &args.usage, cfg)?;

    if let Some(rate) = args.cache_rate {
        inputs.cache_rate = rate;
    }
    if let Some(rate) = args.retention_rate {
        inputs.retention_rate = rate;
    }
    if let Some(deployment) = args.deployment {
        inputs.deployment = deployment;
    }
    inputs.add_ons = AddOns {
        fine_tuning: args.fine_tuning,
        embeddings: args.embeddings,
        vector_db: args.vector_db,
        redundancy: args.redundancy,
        high_availability: args.high_availability,
    };
    Ok(inputs)
}

pub fn target_inputs(cfg: &Config, args: &TargetArgs) -> Result<CalculatorInputs> {
    let mut inputs = advanced_inputs(cfg, &args.advanced)?;
    let mut targets = cfg.pricing.targets;

    if let Some(roi) = args.target_roi {
        targets.target_roi = roi;
    }
    if let Some(users) = args.target_users {
        targets.target_users = users;
    }
    if let Some(investment) = args.investment {
        targets.target_investment = investment;
    }
    if let Some(growth) = args.growth_rate {
        targets.growth_rate = growth;
    }
    if let Some(free) = args.free_tier {
        targets.free_tier_percentage = free;
    }

    inputs.targets = Some(targets);
    Ok(inputs.clamped())
}

/// Run the engine once and print the result
pub fn execute(cfg: &Config, inputs: CalculatorInputs, view: View, json: bool) -> Result<()> {
    info!(
        model = %inputs.model_id,
        users = inputs.monthly_users,
        prompts = inputs.prompts_per_user,
        targets = inputs.has_targets(),
        "Calculating pricing"
    );

    let calculator = CostCalculator::new(cfg.catalog());
    let metrics = calculator.recompute(&inputs)?;
    let model = calculator.catalog().find(&inputs.model_id)?;

    let usage_tiers = match view {
        View::Advanced { usage_tiers: true } => Some(evaluate_usage_tiers(
            &cfg.usage_tiers(),
            model,
            inputs.input_length * inputs.length_unit.token_factor(),
            inputs.output_length * inputs.length_unit.token_factor(),
        )),
        _ => None,
    };

    if json {
        let output = json!({
            "inputs": inputs,
            "metrics": metrics,
            "usage_tiers": usage_tiers,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_summary(model, &inputs, &metrics);

    if view != View::Basic {
        print_advanced(&inputs, &metrics);
    }
    if let Some(economics) = usage_tiers {
        print_usage_tiers(&economics);
    }
    if view == View::Targets {
        print_targets(&inputs, &metrics);
    }
    print_strategy(&metrics);

    Ok(())
}

fn print_summary(model: &ModelPricing, inputs: &CalculatorInputs, metrics: &DerivedMetrics) {
    println!("{}", "AI Cost Calculator".green().bold());
    println!(
        "  {} pricing: ${:.4} per 1K input tokens, ${:.4} per 1K output tokens",
        model.name.cyan(),
        model.input_price,
        model.output_price
    );
    println!();

    println!("{}", "Your Results:".bold());
    println!(
        "  {}: {}",
        format!("Total {} used per month", inputs.length_unit).cyan(),
        format_number(metrics.total_units)
    );
    println!(
        "  {}: {}",
        "Estimated monthly cost".cyan(),
        format_currency(metrics.total_cost)
    );
    println!(
        "  {}: {}",
        "Cost per user".cyan(),
        format_currency_precise(metrics.cost_per_user)
    );
    let margin_label = match inputs.margin {
        MarginModel::GrossMargin(rate) => format!("{:.0}% margin", rate * 100.0),
        MarginModel::Markup(rate) => format!("{:.0}% markup", rate * 100.0),
    };
    let margin_label = match &inputs.targets {
        Some(t) => format!("{:.0}% target ROI", t.target_roi),
        None => margin_label,
    };
    println!(
        "  {}: {} {}",
        "Minimum price per user".cyan(),
        format_currency(metrics.minimum_price).bold(),
        format!("({})", margin_label).dimmed()
    );

    if metrics.exceeds_context_window {
        println!(
            "  {}",
            format!(
                "Warning: a single prompt exceeds the {} context window",
                inputs.context_window
            )
            .yellow()
        );
    }
}

fn print_advanced(inputs: &CalculatorInputs, metrics: &DerivedMetrics) {
    println!("  {}: {:.1}%", "Projected ROI".cyan(), metrics.roi);
    println!(
        "  {}: {}",
        "Break-even user count".cyan(),
        format_number(metrics.break_even_users as f64)
    );
    println!();

    println!("{}", "Cost Breakdown:".bold());
    println!("  Input cost:           {}", format_currency(metrics.costs.input_cost));
    println!("  Output cost:          {}", format_currency(metrics.costs.output_cost));
    println!("  Add-ons:              {}", format_currency(metrics.costs.add_on_cost));
    println!(
        "  Deployment surcharge: {} {}",
        format_currency(metrics.costs.deployment_surcharge),
        format!("({})", inputs.deployment.label()).dimmed()
    );
    println!();

    if !inputs.has_targets() {
        println!("{}", "Suggested Pricing Tiers:".bold());
        println!("{}", tiers_table(&metrics.tiers));
        println!();
    }
}

fn print_usage_tiers(economics: &[TierEconomics]) {
    println!("{}", "Usage Tier Economics:".bold());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("TIER").fg(Color::Cyan),
        Cell::new("REVENUE").fg(Color::Cyan),
        Cell::new("MODEL COST").fg(Color::Cyan),
        Cell::new("PROFIT").fg(Color::Cyan),
    ]);
    for tier in economics {
        table.add_row(vec![
            Cell::new(&tier.name),
            Cell::new(format_currency(tier.revenue)),
            Cell::new(format_currency(tier.model_cost)),
            Cell::new(format_currency(tier.profit)),
        ]);
    }
    println!("{}", table);
    println!();
}

fn print_targets(inputs: &CalculatorInputs, metrics: &DerivedMetrics) {
    let Some(targets) = &inputs.targets else {
        return;
    };

    println!("{}", "Pricing Tiers:".bold());
    println!("{}", tiers_table(&metrics.tiers));
    println!();

    if let Some(projection) = &metrics.projection {
        println!(
            "{} {}",
            "12-Month Projection".bold(),
            format!("({:.1}% monthly growth)", targets.growth_rate).dimmed()
        );
        println!("{}", projection_table(projection));
        println!();
    }

    let reached = match metrics.target_users_month {
        Some(month) => format!("month {}", month).green(),
        None => "not within 12 months".red(),
    };
    println!(
        "  {}: {}",
        format!("Reach {} users", format_number(targets.target_users as f64)).cyan(),
        reached
    );

    let payback = match metrics.payback_month {
        Some(month) => format!("month {}", month).green(),
        None => "not within 12 months".red(),
    };
    println!(
        "  {}: {}",
        format!("Recoup {} investment", format_currency(targets.target_investment)).cyan(),
        payback
    );
    println!();
}

fn print_strategy(metrics: &DerivedMetrics) {
    println!("{}", "Recommended Strategy:".bold());
    println!("  {}", metrics.strategy.label().green());
    println!("  {}", metrics.strategy.description().dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_inputs_ignore_advanced_defaults() {
        let cfg = Config::default();
        let inputs = basic_inputs(&cfg, &UsageArgs::default()).unwrap();

        assert_eq!(inputs.cache_rate, 0.0);
        assert_eq!(inputs.deployment, Deployment::Cloud);
        assert!(!inputs.has_targets());
    }

    #[test]
    fn test_preset_then_explicit_overrides() {
        let cfg = Config::default();
        let args = UsageArgs {
            preset: Some("support".to_string()),
            users: Some(750),
            ..UsageArgs::default()
        };
        let inputs = basic_inputs(&cfg, &args).unwrap();

        assert_eq!(inputs.model_id, "claude-sonnet");
        assert_eq!(inputs.monthly_users, 750);
        assert_eq!(inputs.context_window, "4k");
    }

    #[test]
    fn test_unknown_preset_fails() {
        let cfg = Config::default();
        let args = UsageArgs {
            preset: Some("rocket".to_string()),
            ..UsageArgs::default()
        };
        assert!(basic_inputs(&cfg, &args).is_err());
    }

    #[test]
    fn test_margin_flags_fall_back_to_config() {
        let cfg = Config::default();
        let args = UsageArgs {
            margin_model: Some(ai_pricing_calculator::inputs::MarginKind::Markup),
            ..UsageArgs::default()
        };
        let inputs = basic_inputs(&cfg, &args).unwrap();
        assert_eq!(inputs.margin, MarginModel::Markup(0.4));
    }

    #[test]
    fn test_advanced_inputs() {
        let cfg = Config::default();
        let args = AdvancedArgs {
            deployment: Some(Deployment::Hybrid),
            vector_db: true,
            ..AdvancedArgs::default()
        };
        let inputs = advanced_inputs(&cfg, &args).unwrap();

        assert_eq!(inputs.cache_rate, 20.0);
        assert_eq!(inputs.deployment, Deployment::Hybrid);
        assert!(inputs.add_ons.vector_db);
        assert!(!inputs.add_ons.fine_tuning);
    }

    #[test]
    fn test_target_inputs() {
        let cfg = Config::default();
        let args = TargetArgs {
            target_roi: Some(55.0),
            growth_rate: Some(15.0),
            ..TargetArgs::default()
        };
        let inputs = target_inputs(&cfg, &args).unwrap();
        let targets = inputs.targets.unwrap();

        assert_eq!(targets.target_roi, 55.0);
        assert_eq!(targets.growth_rate, 15.0);
        assert_eq!(targets.free_tier_percentage, 20.0);
    }

    #[test]
    fn test_configured_targets_are_clamped() {
        let mut cfg = Config::default();
        cfg.pricing.targets.free_tier_percentage = 500.0;
        cfg.pricing.targets.growth_rate = -40.0;
        cfg.pricing.targets.target_investment = -1000.0;

        let inputs = target_inputs(&cfg, &TargetArgs::default()).unwrap();
        let targets = inputs.targets.unwrap();
        assert_eq!(targets.free_tier_percentage, 100.0);
        assert_eq!(targets.growth_rate, 0.0);
        assert_eq!(targets.target_investment, 0.0);

        let metrics = CostCalculator::new(cfg.catalog()).recompute(&inputs).unwrap();
        let free = metrics.tiers[0].usage_limit.unwrap();
        let basic = metrics.tiers[1].usage_limit.unwrap();
        assert!(free <= basic);

        let projection = metrics.projection.unwrap();
        assert!(projection.iter().all(|m| m.users == inputs.monthly_users));
    }

    #[test]
    fn test_execute_json() {
        let cfg = Config::default();
        let inputs = target_inputs(&cfg, &TargetArgs::default()).unwrap();
        assert!(execute(&cfg, inputs, View::Targets, true).is_ok());
    }
}
