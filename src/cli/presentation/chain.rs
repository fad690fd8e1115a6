//! Chain presentation: one row per page in Next order.

use super::format_section_heading;
use crate::error::ApiError;
use crate::nav::NavRole;
use crate::page::Page;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainRow {
    pub name: String,
    pub title: String,
    /// Body items, navigation buttons excluded.
    pub items: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub first: Option<String>,
}

/// Summarize pages, reading navigation targets from their buttons.
pub fn chain_rows(pages: &[Page]) -> Vec<ChainRow> {
    pages
        .iter()
        .map(|page| {
            let target = |role: NavRole| {
                page.items()
                    .iter()
                    .find(|item| NavRole::of(item) == Some(role))
                    .and_then(|item| item.link.clone())
            };
            ChainRow {
                name: page.name.clone(),
                title: page.title_text().to_string(),
                items: page
                    .items()
                    .iter()
                    .filter(|item| NavRole::of(item).is_none())
                    .count(),
                next: target(NavRole::Next),
                previous: target(NavRole::Previous),
                first: target(NavRole::First),
            }
        })
        .collect()
}

pub fn format_chain_text(frameset: &str, rows: &[ChainRow]) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("Frameset {}", frameset))
    );
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Page", "Title", "Items", "Previous", "Next", "First"]);
    let dash = || "-".to_string();
    for row in rows {
        table.add_row(vec![
            row.name.clone(),
            row.title.clone(),
            row.items.to_string(),
            row.previous.clone().unwrap_or_else(dash),
            row.next.clone().unwrap_or_else(dash),
            row.first.clone().unwrap_or_else(dash),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {} page(s)", rows.len()));
    out
}

pub fn format_chain_json(frameset: &str, rows: &[ChainRow]) -> Result<String, ApiError> {
    let out = serde_json::json!({ "frameset": frameset, "pages": rows, "total": rows.len() });
    serde_json::to_string_pretty(&out).map_err(|e| ApiError::OutputError(e.to_string()))
}
