//! Text rendering helpers shared by the calculator commands
//!
//! Rounding happens here only; the engine keeps full precision.

use ai_pricing_calculator::pricing::{MonthProjection, PricingTier};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Whole number with thousands separators, e.g. `1,000,000`
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Two-decimal currency, e.g. `$26.00`
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

/// Four-decimal currency for per-user amounts
pub fn format_currency_precise(amount: f64) -> String {
    format!("${:.4}", amount)
}

pub fn tiers_table(tiers: &[PricingTier]) -> Table {
    let with_limits = tiers.iter().any(|t| t.usage_limit.is_some());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("TIER").fg(Color::Cyan),
        Cell::new("PRICE").fg(Color::Cyan),
    ];
    if with_limits {
        header.push(Cell::new("PROMPTS/MO").fg(Color::Cyan));
        header.push(Cell::new("FEATURES").fg(Color::Cyan));
    }
    table.set_header(header);

    for tier in tiers {
        let mut row = vec![Cell::new(tier.name), Cell::new(format!("${}/mo", tier.price))];
        if with_limits {
            row.push(Cell::new(
                tier.usage_limit
                    .map(|l| format_number(l as f64))
                    .unwrap_or_else(|| "-".to_string()),
            ));
            row.push(Cell::new(tier.features.join(", ")));
        }
        table.add_row(row);
    }

    table
}

pub fn projection_table(months: &[MonthProjection]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("MONTH").fg(Color::Cyan),
        Cell::new("USERS").fg(Color::Cyan),
        Cell::new("REVENUE").fg(Color::Cyan),
        Cell::new("COST").fg(Color::Cyan),
        Cell::new("PROFIT").fg(Color::Cyan),
    ]);

    for m in months {
        let profit = Cell::new(format_currency(m.profit));
        let profit = if m.profit < 0.0 {
            profit.fg(Color::Red)
        } else {
            profit.fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(m.month),
            Cell::new(format_number(m.users as f64)),
            Cell::new(format_currency(m.revenue)),
            Cell::new(format_currency(m.cost)),
            profit,
        ]);
    }

    table
}
