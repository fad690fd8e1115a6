//! Placed visual units.
//!
//! An item is anything that can sit on a page: a piece of text, a picture or a
//! rule. Navigation buttons are ordinary text items that carry a link target
//! and an anchor.

use crate::error::GeometryError;
use crate::types::{Color, ItemId, Point, Size, UNASSIGNED_ITEM};
use serde::{Deserialize, Serialize};

/// What an item shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Text { text: String },
    Picture { source: String, size: Size },
    Rule { size: Size },
}

/// Screen-relative placement on one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisAnchor {
    /// Position is whatever the item was given.
    #[default]
    Free,
    /// Fixed absolute coordinate.
    Absolute(i32),
    /// Distance from the far page edge (right or bottom).
    Offset(i32),
}

/// Validated anchoring for both axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub horizontal: AxisAnchor,
    pub vertical: AxisAnchor,
}

impl Anchor {
    pub const FREE: Anchor = Anchor {
        horizontal: AxisAnchor::Free,
        vertical: AxisAnchor::Free,
    };

    /// Anchor to the bottom-right corner.
    pub const fn bottom_right(right: i32, bottom: i32) -> Self {
        Anchor {
            horizontal: AxisAnchor::Offset(right),
            vertical: AxisAnchor::Offset(bottom),
        }
    }

    pub fn is_free(&self) -> bool {
        *self == Anchor::FREE
    }
}

/// Raw anchor request; at most one of absolute/offset per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnchorSpec {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub right: Option<i32>,
    pub bottom: Option<i32>,
}

impl TryFrom<AnchorSpec> for Anchor {
    type Error = GeometryError;

    fn try_from(spec: AnchorSpec) -> Result<Self, Self::Error> {
        Ok(Anchor {
            horizontal: axis(spec.x, spec.right, "horizontal")?,
            vertical: axis(spec.y, spec.bottom, "vertical")?,
        })
    }
}

fn axis(
    absolute: Option<i32>,
    offset: Option<i32>,
    name: &'static str,
) -> Result<AxisAnchor, GeometryError> {
    match (absolute, offset) {
        (Some(_), Some(_)) => Err(GeometryError::ConflictingAnchor(name)),
        (Some(a), None) => Ok(AxisAnchor::Absolute(a)),
        (None, Some(o)) => Ok(AxisAnchor::Offset(o)),
        (None, None) => Ok(AxisAnchor::Free),
    }
}

/// A placed visual unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Left edge and vertical centre.
    pub position: Point,
    pub offset: Point,
    pub right_margin: Option<i32>,
    pub link: Option<String>,
    pub action: Option<String>,
    pub color: Option<Color>,
    pub fill: Option<Color>,
    pub border: Option<Color>,
    pub thickness: f32,
    pub anchor: Anchor,
    pub follow_link: bool,
    pub record_history: bool,
    pub outline: Vec<Point>,
}

impl Item {
    fn with_kind(kind: ItemKind) -> Self {
        Item {
            id: UNASSIGNED_ITEM,
            kind,
            position: Point::ORIGIN,
            offset: Point::ORIGIN,
            right_margin: None,
            link: None,
            action: None,
            color: None,
            fill: None,
            border: None,
            thickness: 0.0,
            anchor: Anchor::FREE,
            follow_link: true,
            record_history: true,
            outline: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_kind(ItemKind::Text { text: text.into() })
    }

    pub fn picture(source: impl Into<String>, size: Size) -> Self {
        Self::with_kind(ItemKind::Picture {
            source: source.into(),
            size,
        })
    }

    pub fn rule(size: Size) -> Self {
        Self::with_kind(ItemKind::Rule { size })
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) -> bool {
        match &mut self.kind {
            ItemKind::Text { text } => {
                *text = value.into();
                true
            }
            _ => false,
        }
    }

    pub fn has_link(&self) -> bool {
        self.link.is_some()
    }
}
