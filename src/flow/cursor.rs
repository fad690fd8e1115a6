//! Flow cursor: the pen position used to decide where the next item lands.
//!
//! The cursor is a plain value. Every change is a transition that returns the
//! new cursor, so a placement can compute its outcome and only commit the
//! resulting cursor once the item is actually on the page.

use crate::error::GeometryError;
use crate::flow::FlowSettings;
use crate::geometry::Geometry;
use crate::nav::chain::PageId;
use crate::page::Page;
use crate::types::{ItemId, Point};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowCursor {
    pub page: PageId,
    pub pen: Point,
    /// Title-derived flow origin; line breaks return to `start.y`.
    pub start: Point,
    pub max_x: i32,
    pub multi_column: bool,
    placed: usize,
}

impl FlowCursor {
    /// Cursor for a page whose flow begins at `origin`.
    pub fn new(page: PageId, start: Point, origin: Point, multi_column: bool) -> Self {
        Self {
            page,
            pen: origin,
            start,
            max_x: 0,
            multi_column,
            placed: 0,
        }
    }

    /// Nothing has been placed since the cursor was reset.
    pub fn is_fresh(&self) -> bool {
        self.placed == 0
    }

    /// Move to the top of a new column to the right of everything placed so far.
    pub fn line_break(self, gutter: i32) -> Self {
        Self {
            pen: Point::new(self.max_x + gutter, self.start.y),
            ..self
        }
    }

    /// Record an item occupying up to `bottom` and `right`.
    pub fn advance(self, bottom: i32, right: i32) -> Self {
        Self {
            pen: Point::new(self.pen.x, bottom),
            max_x: self.max_x.max(right),
            placed: self.placed + 1,
            ..self
        }
    }

    /// Account for an item already on the page; the pen never moves up.
    pub fn occupy(self, bottom: i32, right: i32) -> Self {
        Self {
            pen: Point::new(self.pen.x, self.pen.y.max(bottom)),
            max_x: self.max_x.max(right),
            placed: self.placed + 1,
            ..self
        }
    }

    /// Move the pen down by `amount`, staying between `start.y` and `limit`.
    pub fn advance_spacing(self, amount: i32, limit: i32) -> Self {
        let y = (self.pen.y + amount).min(limit).max(self.start.y.min(limit));
        Self {
            pen: Point::new(self.pen.x, y),
            ..self
        }
    }
}

/// How the first body item of a page reads as a start directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartDirective {
    None,
    /// The marker alone: the item is removed and its position becomes the origin.
    Bare,
    /// The marker followed by text that survives the strip.
    WithText(String),
}

/// Parse `text` against the start marker (case-insensitive, optional `:`).
pub fn parse_directive(text: &str, marker: &str) -> StartDirective {
    let trimmed = text.trim_start();
    let Some(head) = trimmed.get(..marker.len()) else {
        return StartDirective::None;
    };
    if !head.eq_ignore_ascii_case(marker) {
        return StartDirective::None;
    }

    let rest = &trimmed[marker.len()..];
    let rest = if let Some(after_colon) = rest.strip_prefix(':') {
        after_colon
    } else if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        rest
    } else {
        // "@startle" is a word of its own, not the marker.
        return StartDirective::None;
    };

    let rest = rest.trim();
    if rest.is_empty() {
        StartDirective::Bare
    } else {
        StartDirective::WithText(rest.to_string())
    }
}

/// Initialise a cursor for `page`.
///
/// The default origin is the bottom edge of the title, indented to the right.
/// A start directive in the first body item (ignoring the ids in `skip`, the
/// page's navigation buttons) can override it.
pub fn reset_for_page(
    page: &mut Page,
    id: PageId,
    skip: &[ItemId],
    settings: &FlowSettings,
    geometry: &dyn Geometry,
    multi_column: bool,
) -> Result<FlowCursor, GeometryError> {
    let title = geometry.bounds(&page.title)?;
    let start = Point::new(page.title.position.x + settings.title_indent, title.bottom);

    let first_body = page
        .items()
        .iter()
        .find(|item| !skip.contains(&item.id))
        .map(|item| (item.id, item.position, item.as_text().map(str::to_string)));

    let mut origin = start;
    if let Some((item_id, position, Some(text))) = first_body {
        match parse_directive(&text, &settings.start_marker) {
            StartDirective::None => {}
            StartDirective::Bare => {
                page.remove(item_id);
                origin = position;
                debug!(page = %page.name, x = origin.x, y = origin.y, "Start directive moved flow origin");
            }
            StartDirective::WithText(rest) => {
                if let Some(item) = page.item_mut(item_id) {
                    item.set_text(rest);
                }
                warn!(page = %page.name, "Start directive carries text; using default origin");
            }
        }
    }

    Ok(FlowCursor::new(id, start, origin, multi_column))
}
