//! Page presentation: title and item table.

use super::format_section_heading;
use crate::error::ApiError;
use crate::item::{Item, ItemKind};
use crate::page::Page;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

fn describe(item: &Item) -> (&'static str, String) {
    match &item.kind {
        ItemKind::Text { text } => ("text", text.replace('\n', " / ")),
        ItemKind::Picture { source, size } => {
            ("picture", format!("{} ({}x{})", source, size.width, size.height))
        }
        ItemKind::Rule { size } => ("rule", format!("{}x{}", size.width, size.height)),
    }
}

pub fn format_page_text(page: &Page) -> String {
    let mut out = format!(
        "{}\n",
        format_section_heading(&format!("Page {}", page.name))
    );
    out.push_str(&format!("  Title: {}\n", page.title_text()));
    out.push_str(&format!("  Revision: {}\n\n", page.revision()));

    if page.items().is_empty() {
        out.push_str("No items.");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Kind", "Content", "Position", "Link", "Action"]);
    for item in page.items() {
        let (kind, content) = describe(item);
        table.add_row(vec![
            item.id.to_string(),
            kind.to_string(),
            content,
            format!("{},{}", item.position.x, item.position.y),
            item.link.clone().unwrap_or_else(|| "-".to_string()),
            item.action.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    out.push_str(&table.to_string());
    out
}

pub fn format_page_json(page: &Page) -> Result<String, ApiError> {
    serde_json::to_string_pretty(page).map_err(|e| ApiError::OutputError(e.to_string()))
}
