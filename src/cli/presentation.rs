//! CLI presentation: text and json formatters per command family.

mod chain;
mod page;

pub use chain::{chain_rows, format_chain_json, format_chain_text, ChainRow};
pub use page::{format_page_json, format_page_text};

use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}
