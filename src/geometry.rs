//! Geometry oracle
//!
//! The pagination engine never measures anything itself. It asks a
//! [`Geometry`] for item footprints and the usable page area, and lets it
//! position items and rebuild their outlines.

use crate::error::GeometryError;
use crate::item::{AxisAnchor, Item, ItemKind};
use crate::types::{Bounds, Point, Size};

/// Measurement and positioning services consumed by the engine.
pub trait Geometry {
    /// Placement footprint of an item.
    fn measure(&self, item: &Item) -> Result<Size, GeometryError>;

    /// Maximum usable width/height of a page.
    fn usable_page_size(&self) -> Result<Size, GeometryError>;

    fn set_position(&self, item: &mut Item, x: i32, y: i32) -> Result<(), GeometryError>;

    /// Set the item's right margin. With `relative`, `width` is measured from
    /// the item's left edge; otherwise it is a page coordinate.
    fn set_right_margin(
        &self,
        item: &mut Item,
        width: i32,
        relative: bool,
    ) -> Result<(), GeometryError>;

    /// Rebuild the item's outline polygon after a geometry change.
    fn recompute_outline(&self, item: &mut Item) -> Result<(), GeometryError>;

    /// Bounding box of an item at its current position.
    fn bounds(&self, item: &Item) -> Result<Bounds, GeometryError> {
        Ok(Bounds::around(item.position, self.measure(item)?))
    }

    /// Resolve an item's anchor against the usable page size.
    ///
    /// Free axes keep the item's current coordinate.
    fn anchored_position(&self, item: &Item) -> Result<Point, GeometryError> {
        let size = self.measure(item)?;
        let page = self.usable_page_size()?;
        let x = match item.anchor.horizontal {
            AxisAnchor::Free => item.position.x,
            AxisAnchor::Absolute(x) => x,
            AxisAnchor::Offset(right) => page.width - right - size.width,
        };
        let y = match item.anchor.vertical {
            AxisAnchor::Free => item.position.y,
            AxisAnchor::Absolute(y) => y,
            AxisAnchor::Offset(bottom) => page.height - bottom - size.height / 2,
        };
        Ok(Point::new(x, y))
    }
}

/// Monospace metrics over a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedMetrics {
    pub char_width: i32,
    pub line_height: i32,
    pub padding: i32,
    pub page: Size,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            char_width: 8,
            line_height: 16,
            padding: 4,
            page: Size::new(1024, 768),
        }
    }
}

impl FixedMetrics {
    pub fn with_page(page: Size) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }
}

impl Geometry for FixedMetrics {
    fn measure(&self, item: &Item) -> Result<Size, GeometryError> {
        match &item.kind {
            ItemKind::Text { text } => {
                let lines = text.lines().count().max(1) as i32;
                let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
                Ok(Size::new(
                    longest * self.char_width + 2 * self.padding,
                    lines * self.line_height + 2 * self.padding,
                ))
            }
            ItemKind::Picture { source, size } if size.is_empty() => Err(
                GeometryError::Unmeasurable(item.id, format!("picture {} has no size", source)),
            ),
            ItemKind::Rule { size } if size.is_empty() => Err(GeometryError::Unmeasurable(
                item.id,
                "rule has no extent".to_string(),
            )),
            ItemKind::Picture { size, .. } | ItemKind::Rule { size } => Ok(*size),
        }
    }

    fn usable_page_size(&self) -> Result<Size, GeometryError> {
        if self.page.is_empty() {
            return Err(GeometryError::EmptyPage {
                width: self.page.width,
                height: self.page.height,
            });
        }
        Ok(self.page)
    }

    fn set_position(&self, item: &mut Item, x: i32, y: i32) -> Result<(), GeometryError> {
        item.position = Point::new(x, y);
        Ok(())
    }

    fn set_right_margin(
        &self,
        item: &mut Item,
        width: i32,
        relative: bool,
    ) -> Result<(), GeometryError> {
        if width <= 0 {
            return Err(GeometryError::InvalidMargin(width));
        }
        let margin = if relative {
            item.position.x + width
        } else {
            width
        };
        item.right_margin = Some(margin);
        Ok(())
    }

    fn recompute_outline(&self, item: &mut Item) -> Result<(), GeometryError> {
        let bounds = self.bounds(item)?;
        let grow = (item.thickness / 2.0).ceil() as i32;
        item.outline = vec![
            Point::new(bounds.left - grow, bounds.top - grow),
            Point::new(bounds.right + grow, bounds.top - grow),
            Point::new(bounds.right + grow, bounds.bottom + grow),
            Point::new(bounds.left - grow, bounds.bottom + grow),
        ];
        Ok(())
    }
}
