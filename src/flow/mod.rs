//! Frame flow
//!
//! Lays a stream of items out across a chain of pages: fills the current page
//! top to bottom, wraps into further columns when multi-column mode is on, and
//! spawns a new linked page when the current one is full.

pub mod cursor;
pub mod engine;

pub use cursor::{FlowCursor, StartDirective};
pub use engine::{Paginator, Placed, SessionOptions};

/// Fixed layout constants of a pagination session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSettings {
    /// Horizontal indent of the flow origin from the title's left edge.
    pub title_indent: i32,
    /// Horizontal gap between columns.
    pub gutter: i32,
    /// Marker token of a start directive.
    pub start_marker: String,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            title_indent: 20,
            gutter: 20,
            start_marker: "@start".to_string(),
        }
    }
}
