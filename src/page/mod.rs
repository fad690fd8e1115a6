//! Pages (frames)
//!
//! A page is a named canvas holding a title item and an ordered sequence of
//! placed items. Pages belong to exactly one frameset and are owned by the
//! frame store; a pagination session only works on its own copies.

pub mod name;

pub use name::{page_name, parse_page_name, validate_frameset_name};

use crate::item::Item;
use crate::types::{ItemId, Point};
use serde::{Deserialize, Serialize};

/// Where a store places a fresh page's title.
pub const TITLE_POSITION: Point = Point { x: 20, y: 30 };

/// A frame in a frameset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    pub frameset: String,
    pub number: u32,
    pub title: Item,
    items: Vec<Item>,
    next_item_id: ItemId,
    revision: u64,
}

impl Page {
    /// Create page `number` of `frameset` with the given title text.
    pub fn new(frameset: &str, number: u32, title: &str) -> Self {
        let mut title_item = Item::text(title);
        title_item.id = 1;
        title_item.position = TITLE_POSITION;

        Page {
            name: page_name(frameset, number),
            frameset: frameset.to_string(),
            number,
            title: title_item,
            items: Vec::new(),
            next_item_id: 2,
            revision: 0,
        }
    }

    /// Body items, in placement order. The title is not included.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn title_text(&self) -> &str {
        self.title.as_text().unwrap_or_default()
    }

    pub fn set_title(&mut self, text: &str) {
        self.title.set_text(text);
        self.touch();
    }

    /// Allocate a fresh item id scoped to this page.
    pub fn next_item_id(&mut self) -> ItemId {
        let id = self.next_item_id;
        self.next_item_id += 1;
        id
    }

    /// Append an item, assigning an id if it has none.
    pub fn push(&mut self, mut item: Item) -> ItemId {
        if item.id == crate::types::UNASSIGNED_ITEM || self.item(item.id).is_some() {
            item.id = self.next_item_id();
        }
        let id = item.id;
        self.items.push(item);
        self.touch();
        id
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.touch();
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Remove an item by id, returning it.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        self.touch();
        Some(self.items.remove(index))
    }

    /// Items whose link points at `target`.
    pub fn links_to<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |item| {
            item.link
                .as_deref()
                .is_some_and(|link| name::page_key(link) == name::page_key(target))
        })
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
