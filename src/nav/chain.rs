//! Chain navigator
//!
//! The pages produced by one session form a linear chain. Pages live in an
//! arena indexed by [`PageId`]; the typed edges (`next`, `previous`, `first`)
//! live beside each page and name both the target page and the button item
//! that carries the link.
//!
//! Every page except the first has exactly one Previous and one First edge;
//! every page except the last has exactly one Next edge.

use crate::error::{ChainError, PlacementError};
use crate::geometry::Geometry;
use crate::nav::button::{attach, ButtonTemplates, NavRole};
use crate::page::name::page_key;
use crate::page::Page;
use crate::store::FrameStore;
use crate::types::ItemId;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info};

/// Index of a page in the session arena.
pub type PageId = usize;

/// A typed link: target page plus the button item carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEdge {
    pub target: PageId,
    pub button: ItemId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<NavEdge>,
    pub previous: Option<NavEdge>,
    pub first: Option<NavEdge>,
}

impl PageLinks {
    pub fn edge(&self, role: NavRole) -> Option<NavEdge> {
        match role {
            NavRole::Next => self.next,
            NavRole::Previous => self.previous,
            NavRole::First => self.first,
        }
    }

    /// Ids of the navigation buttons on this page.
    pub fn buttons(&self) -> impl Iterator<Item = ItemId> + '_ {
        NavRole::ALL
            .into_iter()
            .filter_map(|role| self.edge(role).map(|edge| edge.button))
    }
}

/// Pages of one authoring session and their navigation edges.
#[derive(Debug, Clone)]
pub struct Chain {
    pages: Vec<Page>,
    links: Vec<PageLinks>,
    index: HashMap<String, PageId>,
}

impl Chain {
    /// Start a chain at `first`, which never receives a First button.
    pub fn new(first: Page) -> Self {
        let mut index = HashMap::new();
        index.insert(page_key(&first.name), 0);
        Self {
            pages: vec![first],
            links: vec![PageLinks::default()],
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn first(&self) -> &Page {
        &self.pages[0]
    }

    pub fn last_id(&self) -> PageId {
        self.pages.len() - 1
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id)
    }

    pub(crate) fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.get_mut(id)
    }

    pub fn links(&self, id: PageId) -> Option<&PageLinks> {
        self.links.get(id)
    }

    pub fn id_of(&self, name: &str) -> Option<PageId> {
        self.index.get(&page_key(name)).copied()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    /// Pages in Next order, starting from the first page.
    pub fn walk(&self) -> ChainWalk<'_> {
        ChainWalk {
            chain: self,
            next: Some(0),
            seen: HashSet::new(),
        }
    }

    /// Run the spawn-and-link protocol from page `from`.
    ///
    /// Creates the next page in `from`'s frameset, wires Previous/Next/First
    /// buttons and persists `from`. On any failure the chain is unchanged and
    /// `from` carries no new button; a failed persist is reported as
    /// [`ChainError::LinkNotPersisted`].
    pub fn spawn_next(
        &mut self,
        from: PageId,
        store: &dyn FrameStore,
        geometry: &dyn Geometry,
        templates: &ButtonTemplates,
    ) -> Result<PageId, PlacementError> {
        let current = self
            .pages
            .get(from)
            .ok_or_else(|| ChainError::UnknownPage(format!("#{}", from)))?;
        if self.links[from].next.is_some() {
            return Err(ChainError::NextAlreadyLinked(current.name.clone()).into());
        }

        // Geometry first: nothing is created until every button is positioned.
        let previous_button = templates.instantiate(NavRole::Previous, geometry)?;
        let next_button = templates.instantiate(NavRole::Next, geometry)?;
        let first_button = templates.instantiate(NavRole::First, geometry)?;

        let mut page = store.create_page(&current.frameset, current.title_text(), Vec::new())?;
        if page_key(&page.name) == page_key(&current.name) {
            return Err(ChainError::SelfLink(page.name).into());
        }
        if self.index.contains_key(&page_key(&page.name)) {
            return Err(ChainError::DuplicatePage(page.name).into());
        }

        let current_name = current.name.clone();
        let first_name = self.first().name.clone();
        let new_id = self.pages.len();

        let previous = attach(&mut page, previous_button, &current_name);
        let first = attach(&mut page, first_button, &first_name);
        let links = PageLinks {
            next: None,
            previous: Some(NavEdge {
                target: from,
                button: previous,
            }),
            first: Some(NavEdge {
                target: 0,
                button: first,
            }),
        };

        let current = &mut self.pages[from];
        let next = attach(current, next_button, &page.name);

        if let Err(err) = store.persist(current, false) {
            current.remove(next);
            error!(from = %current_name, orphan = %page.name, error = %err, "Failed to persist Next link");
            return Err(ChainError::LinkNotPersisted {
                from: current_name,
                orphan: page.name,
                reason: err.to_string(),
            }
            .into());
        }

        info!(from = %current_name, page = %page.name, "Spawned page");
        self.links[from].next = Some(NavEdge {
            target: new_id,
            button: next,
        });
        self.index.insert(page_key(&page.name), new_id);
        self.pages.push(page);
        self.links.push(links);

        self.check_page(from)?;
        self.check_page(new_id)?;
        debug!(pages = self.pages.len(), "Chain extended");
        Ok(new_id)
    }

    /// Check one page's edges against its button items.
    fn check_page(&self, id: PageId) -> Result<(), ChainError> {
        let page = &self.pages[id];
        let links = &self.links[id];

        for role in NavRole::ALL {
            let Some(edge) = links.edge(role) else {
                continue;
            };
            if edge.target == id {
                return Err(ChainError::SelfLink(page.name.clone()));
            }
            let target = self
                .pages
                .get(edge.target)
                .ok_or_else(|| ChainError::UnknownPage(format!("#{}", edge.target)))?;
            let linked = page
                .item(edge.button)
                .and_then(|button| button.link.as_deref())
                .is_some_and(|link| page_key(link) == page_key(&target.name));
            if !linked {
                return Err(ChainError::MissingLink {
                    page: page.name.clone(),
                    role: role.as_str(),
                });
            }
        }

        let is_first = id == 0;
        let is_last = id == self.last_id();
        let required = [
            (NavRole::Previous, !is_first),
            (NavRole::First, !is_first),
            (NavRole::Next, !is_last),
        ];
        for (role, needed) in required {
            if needed && links.edge(role).is_none() {
                return Err(ChainError::MissingLink {
                    page: page.name.clone(),
                    role: role.as_str(),
                });
            }
        }
        if is_first && links.first.is_some() {
            return Err(ChainError::SelfLink(page.name.clone()));
        }
        Ok(())
    }

    /// Re-check every chain invariant.
    pub fn validate(&self) -> Result<(), ChainError> {
        for id in 0..self.pages.len() {
            self.check_page(id)?;
        }

        let mut visited = HashSet::new();
        let mut cursor = Some(0);
        while let Some(id) = cursor {
            if !visited.insert(id) {
                return Err(ChainError::Cycle(self.pages[id].name.clone()));
            }
            cursor = self.links[id].next.map(|edge| edge.target);
        }
        if visited.len() != self.pages.len() {
            let unreachable = (0..self.pages.len())
                .find(|id| !visited.contains(id))
                .map(|id| self.pages[id].name.clone())
                .unwrap_or_default();
            return Err(ChainError::UnknownPage(unreachable));
        }
        Ok(())
    }
}

/// Iterator over chain pages in Next order. Stops rather than revisiting a page.
pub struct ChainWalk<'a> {
    chain: &'a Chain,
    next: Option<PageId>,
    seen: HashSet<PageId>,
}

impl<'a> Iterator for ChainWalk<'a> {
    type Item = &'a Page;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        if !self.seen.insert(id) {
            self.next = None;
            return None;
        }
        self.next = self
            .chain
            .links
            .get(id)
            .and_then(|links| links.next)
            .map(|edge| edge.target);
        self.chain.pages.get(id)
    }
}

/// Follow stored Next buttons from `start`, loading each page from `store`.
///
/// Used to inspect chains after the session that built them is gone.
pub fn follow_stored(store: &dyn FrameStore, start: &str) -> Result<Vec<Page>, PlacementError> {
    let mut pages: Vec<Page> = Vec::new();
    let mut seen = HashSet::new();
    let mut name = start.to_string();

    loop {
        if !seen.insert(page_key(&name)) {
            return Err(ChainError::Cycle(name).into());
        }
        let page = store
            .load(&name)?
            .ok_or_else(|| ChainError::UnknownPage(name.clone()))?;

        let mut next_links = page
            .items()
            .iter()
            .filter(|item| NavRole::of(item) == Some(NavRole::Next))
            .filter_map(|item| item.link.clone());
        let next = next_links.next();
        if next_links.next().is_some() {
            return Err(ChainError::NextAlreadyLinked(page.name.clone()).into());
        }

        pages.push(page);
        match next {
            Some(target) => name = target,
            None => return Ok(pages),
        }
    }
}
