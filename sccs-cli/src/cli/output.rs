//! Terminal output shared by the commands
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};

#[derive(Debug, Clone, Copy)]
pub enum Status {
    Done,
    Note,
    Warn,
}

pub fn status(kind: Status, message: &str) {
    let marker = match kind {
        Status::Done => "✓".green(),
        Status::Note => "●".blue(),
        Status::Warn => "⚠".yellow(),
    };
    println!("{} {}", marker, message);
}

pub fn heading(title: &str) {
    println!("\n{}", title.bold().cyan());
}

/// Rounded UTF-8 table with bold cyan column titles
pub fn table_with_header(columns: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            columns
                .iter()
                .map(|c| Cell::new(c).add_attribute(Attribute::Bold).fg(TableColor::Cyan)),
        );
    table
}

pub fn summary_table(rows: &[(&str, String)]) -> Table {
    let mut table = table_with_header(&["Metric", "Value"]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table
}

/// Score with `inf` for the degenerate case
pub fn format_score(score: f64) -> String {
    if score.is_finite() {
        format!("{:.4}", score)
    } else {
        "inf".to_string()
    }
}
