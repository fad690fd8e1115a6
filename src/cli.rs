//! CLI domain: parse, route, output, and presentation only.
//! No layout logic; the route table dispatches to the pagination engine and stores.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    chain_rows, format_chain_json, format_chain_text, format_page_json, format_page_text,
    format_section_heading, ChainRow,
};
pub use route::RunContext;
