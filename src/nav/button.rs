//! Navigation buttons
//!
//! Next/Previous/First buttons are text items with fixed styling, anchored to
//! the bottom-right corner of the page. The three prototypes are built once and
//! never mutated; pages receive positioned copies.

use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::item::{Anchor, AnchorSpec, Item};
use crate::page::Page;
use crate::types::{Color, ItemId};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const BUTTON_THICKNESS: f32 = 1.0;
pub const BUTTON_FILL: Color = Color::LIGHT_GRAY;
pub const BUTTON_BORDER: Color = Color::DARK_GRAY;

const BUTTON_BOTTOM: i32 = 10;
const NEXT_RIGHT: i32 = 10;
const PREVIOUS_RIGHT: i32 = 80;
const FIRST_RIGHT: i32 = 170;

/// Role of a navigation button in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavRole {
    Next,
    Previous,
    First,
}

impl NavRole {
    pub const ALL: [NavRole; 3] = [NavRole::Next, NavRole::Previous, NavRole::First];

    pub fn caption(self) -> &'static str {
        match self {
            NavRole::Next => "Next",
            NavRole::Previous => "Previous",
            NavRole::First => "First",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NavRole::Next => "next",
            NavRole::Previous => "previous",
            NavRole::First => "first",
        }
    }

    fn anchor(self) -> Anchor {
        let right = match self {
            NavRole::Next => NEXT_RIGHT,
            NavRole::Previous => PREVIOUS_RIGHT,
            NavRole::First => FIRST_RIGHT,
        };
        Anchor::bottom_right(right, BUTTON_BOTTOM)
    }

    /// Role of a stored item, judged by caption and the presence of a link.
    pub fn of(item: &Item) -> Option<NavRole> {
        if !item.has_link() {
            return None;
        }
        let text = item.as_text()?;
        NavRole::ALL.into_iter().find(|role| role.caption() == text)
    }
}

fn styled(caption: &str, anchor: Anchor) -> Item {
    let mut item = Item::text(caption);
    item.anchor = anchor;
    item.fill = Some(BUTTON_FILL);
    item.border = Some(BUTTON_BORDER);
    item.thickness = BUTTON_THICKNESS;
    item
}

/// Build a button-shaped item.
///
/// Fails if an axis is given both an absolute coordinate and an edge offset.
pub fn make_button(
    caption: &str,
    spec: AnchorSpec,
    geometry: &dyn Geometry,
) -> Result<Item, GeometryError> {
    let anchor = Anchor::try_from(spec)?;
    let mut item = styled(caption, anchor);
    position(&mut item, geometry)?;
    Ok(item)
}

fn position(item: &mut Item, geometry: &dyn Geometry) -> Result<(), GeometryError> {
    let at = geometry.anchored_position(item)?;
    geometry.set_position(item, at.x, at.y)?;
    geometry.recompute_outline(item)
}

/// The three shared, read-only button prototypes.
#[derive(Debug, Clone)]
pub struct ButtonTemplates {
    next: Item,
    previous: Item,
    first: Item,
}

impl ButtonTemplates {
    fn build() -> Self {
        let make = |role: NavRole| styled(role.caption(), role.anchor());
        Self {
            next: make(NavRole::Next),
            previous: make(NavRole::Previous),
            first: make(NavRole::First),
        }
    }

    /// Process-wide prototype table.
    pub fn standard() -> &'static ButtonTemplates {
        static TEMPLATES: OnceLock<ButtonTemplates> = OnceLock::new();
        TEMPLATES.get_or_init(Self::build)
    }

    pub fn get(&self, role: NavRole) -> &Item {
        match role {
            NavRole::Next => &self.next,
            NavRole::Previous => &self.previous,
            NavRole::First => &self.first,
        }
    }

    /// Positioned copy of a prototype, ready to attach.
    ///
    /// The copy never follows its link automatically and never records history.
    pub fn instantiate(
        &self,
        role: NavRole,
        geometry: &dyn Geometry,
    ) -> Result<Item, GeometryError> {
        let mut copy = self.get(role).clone();
        copy.follow_link = false;
        copy.record_history = false;
        position(&mut copy, geometry)?;
        Ok(copy)
    }

    /// Top edge of the navigation band: where content must stop so it never
    /// runs under a Previous button.
    pub fn band_top(&self, geometry: &dyn Geometry) -> Result<i32, GeometryError> {
        let previous = self.instantiate(NavRole::Previous, geometry)?;
        let size = geometry.measure(&previous)?;
        Ok(previous.position.y - size.height)
    }
}

/// Attach an instantiated button to `page`, linking it to `target`.
pub fn attach(page: &mut Page, mut button: Item, target: &str) -> ItemId {
    button.id = page.next_item_id();
    button.link = Some(target.to_string());
    page.push(button)
}
