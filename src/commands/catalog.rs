use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use ai_pricing_calculator::{
    config::Config,
    pricing::models::{CONTEXT_WINDOWS, USAGE_PRESETS},
};

use crate::commands::report::format_number;

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.iter().map(|h| Cell::new(h).fg(Color::Cyan)).collect::<Vec<_>>());
    table
}

/// List the model catalog, including configured entries
pub fn models(cfg: &Config, json: bool) -> Result<()> {
    let catalog = cfg.catalog();

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.models())?);
        return Ok(());
    }

    println!("{}", "Available Models:".green().bold());
    let mut table = new_table(&["ID", "NAME", "INPUT / 1K", "OUTPUT / 1K", "DESCRIPTION"]);
    for model in catalog.models() {
        table.add_row(vec![
            Cell::new(&model.id),
            Cell::new(&model.name),
            Cell::new(format!("${:.4}", model.input_price)),
            Cell::new(format!("${:.4}", model.output_price)),
            Cell::new(&model.description),
        ]);
    }
    println!("{}", table);
    Ok(())
}

pub fn presets(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(USAGE_PRESETS)?);
        return Ok(());
    }

    println!("{}", "Usage Presets:".green().bold());
    let mut table = new_table(&["ID", "NAME", "MODEL", "USERS", "PROMPTS/USER", "IN", "OUT", "WINDOW"]);
    for preset in USAGE_PRESETS {
        table.add_row(vec![
            Cell::new(preset.id),
            Cell::new(preset.name),
            Cell::new(preset.model),
            Cell::new(format_number(preset.monthly_users as f64)),
            Cell::new(preset.prompts_per_user),
            Cell::new(preset.input_length),
            Cell::new(preset.output_length),
            Cell::new(preset.context_window),
        ]);
    }
    println!("{}", table);
    println!("{}", "Use with: pricing-calc advanced --preset <ID>".dimmed());
    Ok(())
}

pub fn windows(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(CONTEXT_WINDOWS)?);
        return Ok(());
    }

    println!("{}", "Context Windows:".green().bold());
    let mut table = new_table(&["ID", "NAME", "TOKENS", "DESCRIPTION"]);
    for window in CONTEXT_WINDOWS {
        table.add_row(vec![
            Cell::new(window.id),
            Cell::new(window.name),
            Cell::new(format_number(window.tokens as f64)),
            Cell::new(window.description),
        ]);
    }
    println!("{}", table);
    Ok(())
}
