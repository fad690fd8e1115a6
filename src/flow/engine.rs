//! Pagination engine
//!
//! A [`Paginator`] owns one session: a chain of pages and the flow cursor on
//! the current (always the last) page. It is single-threaded and
//! non-reentrant; callers serialize access.

use crate::error::{ChainError, GeometryError, PlacementError};
use crate::flow::cursor::{reset_for_page, FlowCursor};
use crate::flow::FlowSettings;
use crate::geometry::Geometry;
use crate::item::Item;
use crate::nav::button::{ButtonTemplates, NavRole};
use crate::nav::chain::{Chain, PageId};
use crate::page::Page;
use crate::store::{FrameStore, PersistOutcome};
use crate::types::{Bounds, Color, ItemId, Point, Size};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Parameters for starting a session on a new frameset.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub frameset: String,
    pub path: PathBuf,
    /// Title of the first page; the frameset name when `None`.
    pub title: Option<String>,
    pub recreate: bool,
    pub multi_column: bool,
}

impl SessionOptions {
    pub fn new(frameset: impl Into<String>) -> Self {
        Self {
            frameset: frameset.into(),
            path: PathBuf::new(),
            title: None,
            recreate: false,
            multi_column: false,
        }
    }
}

/// Result of a successful placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    /// Name of the page the item landed on.
    pub page: String,
    pub item: Item,
    /// Pages spawned to make room for the item.
    pub spawned: usize,
}

/// Drives item placement across a chain of pages.
pub struct Paginator {
    store: Arc<dyn FrameStore>,
    geometry: Arc<dyn Geometry>,
    settings: FlowSettings,
    templates: &'static ButtonTemplates,
    chain: Chain,
    cursor: FlowCursor,
    poisoned: Option<String>,
}

impl Paginator {
    /// Create the frameset and start a session on its first page.
    pub fn start(
        store: Arc<dyn FrameStore>,
        geometry: Arc<dyn Geometry>,
        settings: FlowSettings,
        options: SessionOptions,
    ) -> Result<Self, PlacementError> {
        let mut first = store.create_frameset(&options.frameset, &options.path, options.recreate)?;
        if let Some(title) = &options.title {
            first.set_title(title);
            store.persist(&first, false)?;
        }
        info!(frameset = %options.frameset, page = %first.name, "Pagination session started");
        Self::resume(store, geometry, settings, first, options.multi_column)
    }

    /// Start a session on an existing page, which becomes the chain's first page.
    ///
    /// The page must be the last of its chain: a page that already carries a
    /// Next button is rejected. Flow continues below its existing body items.
    pub fn resume(
        store: Arc<dyn FrameStore>,
        geometry: Arc<dyn Geometry>,
        settings: FlowSettings,
        page: Page,
        multi_column: bool,
    ) -> Result<Self, PlacementError> {
        let nav: Vec<(ItemId, NavRole)> = page
            .items()
            .iter()
            .filter_map(|item| NavRole::of(item).map(|role| (item.id, role)))
            .collect();
        if nav.iter().any(|(_, role)| *role == NavRole::Next) {
            warn!(page = %page.name, "Cannot resume a page that already links to a next page");
            return Err(ChainError::NextAlreadyLinked(page.name.clone()).into());
        }
        let skip: Vec<ItemId> = nav.into_iter().map(|(id, _)| id).collect();

        let mut chain = Chain::new(page);
        let first = chain
            .page_mut(0)
            .ok_or_else(|| ChainError::UnknownPage("#0".to_string()))?;
        let cursor = reset_for_page(first, 0, &skip, &settings, geometry.as_ref(), multi_column)?;
        let cursor = below_body(first, &skip, geometry.as_ref(), cursor)?;
        if !cursor.is_fresh() {
            debug!(page = %first.name, y = cursor.pen.y, "Resumed below existing items");
        }

        Ok(Self {
            store,
            geometry,
            settings,
            templates: ButtonTemplates::standard(),
            chain,
            cursor,
            poisoned: None,
        })
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn cursor(&self) -> &FlowCursor {
        &self.cursor
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    pub fn current_page(&self) -> &Page {
        &self.chain.pages()[self.cursor.page]
    }

    pub fn current_page_name(&self) -> &str {
        &self.current_page().name
    }

    pub fn first_page_name(&self) -> &str {
        &self.chain.first().name
    }

    pub fn multi_column(&self) -> bool {
        self.cursor.multi_column
    }

    pub fn set_multi_column(&mut self, enabled: bool) -> Result<(), PlacementError> {
        self.ensure_usable()?;
        self.cursor.multi_column = enabled;
        Ok(())
    }

    /// Lowest y an item's bottom edge may reach on the current page.
    ///
    /// This is the top of the Previous button. A resumed page may carry a
    /// stored Previous button outside the session's chain. Pages without one
    /// use the position the button would have.
    pub fn vertical_limit(&self) -> Result<i32, PlacementError> {
        let page = self.current_page();
        let previous = match self.chain.links(self.cursor.page).and_then(|links| links.previous) {
            Some(edge) => Some(page.item(edge.button).ok_or_else(|| ChainError::MissingLink {
                page: page.name.clone(),
                role: "previous",
            })?),
            None => page
                .items()
                .iter()
                .find(|item| NavRole::of(item) == Some(NavRole::Previous)),
        };
        match previous {
            Some(button) => {
                let size = self.geometry.measure(button)?;
                Ok(button.position.y - size.height)
            }
            None => Ok(self.templates.band_top(self.geometry.as_ref())?),
        }
    }

    /// Place an item after the last one, breaking columns or pages as needed.
    ///
    /// On failure nothing is committed: no page gains the item and the cursor
    /// is unchanged. A page spawned before the failure stays in the chain.
    pub fn place(&mut self, item: Item, persist_now: bool) -> Result<Placed, PlacementError> {
        self.ensure_usable()?;
        let mut spawned = 0;

        loop {
            let size = self.geometry.measure(&item)?;
            let page_size = self.geometry.usable_page_size()?;
            let limit = self.vertical_limit()?;
            let mut cursor = self.cursor;

            let overflows = cursor.pen.y + size.height > limit;
            // An item taller than a whole page goes on the first page that has nothing else.
            let fits_anywhere = cursor.start.y + size.height <= limit;
            if overflows && (fits_anywhere || !cursor.is_fresh()) {
                cursor = cursor.line_break(self.settings.gutter);
                let too_wide = cursor.pen.x + size.width > page_size.width;
                if !cursor.multi_column || too_wide {
                    debug!(
                        page = %self.current_page_name(),
                        multi_column = cursor.multi_column,
                        too_wide,
                        "Page break"
                    );
                    self.spawn_next()?;
                    spawned += 1;
                    continue;
                }
                debug!(page = %self.current_page_name(), x = cursor.pen.x, "Column break");
            }

            let placed = self.commit(item, size, page_size, cursor, persist_now)?;
            return Ok(Placed { spawned, ..placed });
        }
    }

    fn commit(
        &mut self,
        mut item: Item,
        size: Size,
        page_size: Size,
        cursor: FlowCursor,
        persist_now: bool,
    ) -> Result<Placed, PlacementError> {
        let geometry = self.geometry.as_ref();
        geometry.set_position(&mut item, cursor.pen.x, cursor.pen.y + size.height / 2)?;
        item.offset = Point::ORIGIN;
        geometry.set_right_margin(&mut item, page_size.width, false)?;
        geometry.recompute_outline(&mut item)?;

        let bounds = Bounds::around(item.position, size);
        let next_cursor = cursor.advance(bounds.bottom, bounds.right);

        let page = self.current_page_mut()?;
        item.id = page.next_item_id();
        let id = page.push(item.clone());

        if persist_now {
            let page = self
                .chain
                .page_mut(cursor.page)
                .ok_or_else(|| ChainError::UnknownPage(format!("#{}", cursor.page)))?;
            if let Err(err) = self.store.persist(page, false) {
                page.remove(id);
                error!(page = %page.name, error = %err, "Failed to persist placed item");
                return Err(err.into());
            }
        }

        self.cursor = next_cursor;
        debug!(
            page = %self.current_page_name(),
            item = id,
            x = item.position.x,
            y = item.position.y,
            "Placed item"
        );
        Ok(Placed {
            page: self.current_page_name().to_string(),
            item,
            spawned: 0,
        })
    }

    fn spawn_next(&mut self) -> Result<(), PlacementError> {
        let from = self.cursor.page;
        let new_id = match self.chain.spawn_next(
            from,
            self.store.as_ref(),
            self.geometry.as_ref(),
            self.templates,
        ) {
            Ok(id) => id,
            Err(PlacementError::Chain(err @ ChainError::LinkNotPersisted { .. })) => {
                warn!(error = %err, "Pagination session poisoned");
                self.poisoned = Some(err.to_string());
                return Err(err.into());
            }
            Err(err) => return Err(err),
        };

        match self.reset_cursor(new_id) {
            Ok(cursor) => {
                self.cursor = cursor;
                Ok(())
            }
            Err(err) => {
                // The new page is linked but has no cursor; the session cannot continue.
                self.poisoned = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn reset_cursor(&mut self, id: PageId) -> Result<FlowCursor, PlacementError> {
        let skip: Vec<ItemId> = self
            .chain
            .links(id)
            .map(|links| links.buttons().collect())
            .unwrap_or_default();
        let multi_column = self.cursor.multi_column;
        let page = self
            .chain
            .page_mut(id)
            .ok_or_else(|| ChainError::UnknownPage(format!("#{}", id)))?;
        Ok(reset_for_page(
            page,
            id,
            &skip,
            &self.settings,
            self.geometry.as_ref(),
            multi_column,
        )?)
    }

    /// Create a text item at the cursor and place it.
    pub fn add_text(
        &mut self,
        text: &str,
        color: Option<Color>,
        link: Option<&str>,
        action: Option<&str>,
        persist_now: bool,
    ) -> Result<Item, PlacementError> {
        let mut item = Item::text(text);
        item.color = color;
        item.link = link.map(str::to_string);
        item.action = action.map(str::to_string);
        Ok(self.place(item, persist_now)?.item)
    }

    /// Leave `amount` pixels of vertical space before the next item.
    pub fn advance_spacing(&mut self, amount: i32) -> Result<(), PlacementError> {
        self.ensure_usable()?;
        let limit = self.vertical_limit()?;
        self.cursor = self.cursor.advance_spacing(amount, limit);
        Ok(())
    }

    /// Retitle the current page. Pages spawned later inherit the new title.
    pub fn set_title(&mut self, text: &str) -> Result<(), PlacementError> {
        self.ensure_usable()?;
        self.current_page_mut()?.set_title(text);
        Ok(())
    }

    /// Force-persist the current page.
    pub fn save(&mut self) -> Result<PersistOutcome, PlacementError> {
        self.ensure_usable()?;
        Ok(self.store.persist(self.current_page(), true)?)
    }

    /// Persist every page of the session and hand back the chain.
    pub fn finish(self) -> Result<Chain, PlacementError> {
        if let Some(reason) = &self.poisoned {
            return Err(ChainError::Poisoned(reason.clone()).into());
        }
        for page in self.chain.pages() {
            self.store.persist(page, false)?;
        }
        info!(pages = self.chain.len(), first = %self.first_page_name(), "Pagination session finished");
        Ok(self.chain)
    }

    fn current_page_mut(&mut self) -> Result<&mut Page, ChainError> {
        let id = self.cursor.page;
        self.chain
            .page_mut(id)
            .ok_or_else(|| ChainError::UnknownPage(format!("#{}", id)))
    }

    fn ensure_usable(&self) -> Result<(), ChainError> {
        match &self.poisoned {
            Some(reason) => Err(ChainError::Poisoned(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Move `cursor` below the body items already on `page`.
fn below_body(
    page: &Page,
    skip: &[ItemId],
    geometry: &dyn Geometry,
    cursor: FlowCursor,
) -> Result<FlowCursor, GeometryError> {
    page.items()
        .iter()
        .filter(|item| !skip.contains(&item.id))
        .try_fold(cursor, |cursor, item| {
            let bounds = geometry.bounds(item)?;
            Ok(cursor.occupy(bounds.bottom, bounds.right))
        })
}
