//! In-process frame store.
//!
//! Keeps pages in memory behind a `parking_lot` mutex. Persistence failures can
//! be injected per page, which is how chain-failure handling is exercised.

use crate::error::StoreError;
use crate::item::Item;
use crate::page::name::{frameset_key, page_key, validate_frameset_name};
use crate::page::Page;
use crate::store::{encode_page, new_page, FrameStore, FramesetRecord, Fingerprint, PersistOutcome};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

#[derive(Default)]
struct MemoryState {
    framesets: HashMap<String, FramesetRecord>,
    pages: HashMap<String, (Page, Fingerprint)>,
    reject_persist: HashSet<String>,
    reject_create: bool,
    writes: usize,
}

/// Frame store backed by process memory.
#[derive(Default)]
pub struct MemoryFrameStore {
    state: Mutex<MemoryState>,
}

impl MemoryFrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later persist of `page` fail.
    pub fn reject_persist_of(&self, page: &str) {
        self.state.lock().reject_persist.insert(page_key(page));
    }

    /// Make every later page creation fail.
    pub fn reject_page_creation(&self, reject: bool) {
        self.state.lock().reject_create = reject;
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.reject_persist.clear();
        state.reject_create = false;
    }

    /// Number of persist calls that actually wrote a page.
    pub fn writes(&self) -> usize {
        self.state.lock().writes
    }
}

impl FrameStore for MemoryFrameStore {
    fn create_frameset(&self, name: &str, path: &Path, recreate: bool) -> Result<Page, StoreError> {
        validate_frameset_name(name)?;
        let key = frameset_key(name);
        let mut state = self.state.lock();

        if state.framesets.contains_key(&key) {
            if !recreate {
                return Err(StoreError::FramesetExists(name.to_string()));
            }
            state.pages.retain(|_, (page, _)| frameset_key(&page.frameset) != key);
        }

        let mut record = FramesetRecord::new(name, path);
        let page = new_page(&mut record, name, Vec::new());
        let (_, fingerprint) = encode_page(&page)?;
        state.pages.insert(page_key(&page.name), (page.clone(), fingerprint));
        state.framesets.insert(key, record);
        debug!(frameset = name, "Created frameset in memory");
        Ok(page)
    }

    fn create_page(
        &self,
        frameset: &str,
        title: &str,
        initial_items: Vec<Item>,
    ) -> Result<Page, StoreError> {
        let mut state = self.state.lock();
        if state.reject_create {
            return Err(StoreError::Rejected {
                page: frameset.to_string(),
                reason: "page creation disabled".to_string(),
            });
        }
        let record = state
            .framesets
            .get_mut(&frameset_key(frameset))
            .ok_or_else(|| StoreError::FramesetNotFound(frameset.to_string()))?;

        let page = new_page(record, title, initial_items);
        let (_, fingerprint) = encode_page(&page)?;
        state.pages.insert(page_key(&page.name), (page.clone(), fingerprint));
        Ok(page)
    }

    fn persist(&self, page: &Page, force: bool) -> Result<PersistOutcome, StoreError> {
        let key = page_key(&page.name);
        let mut state = self.state.lock();
        if state.reject_persist.contains(&key) {
            return Err(StoreError::Rejected {
                page: page.name.clone(),
                reason: "persistence disabled for page".to_string(),
            });
        }

        let (_, fingerprint) = encode_page(page)?;
        if !force {
            if let Some((_, stored)) = state.pages.get(&key) {
                if *stored == fingerprint {
                    return Ok(PersistOutcome::Unchanged);
                }
            }
        }

        state.pages.insert(key, (page.clone(), fingerprint));
        state.writes += 1;
        Ok(PersistOutcome::Written)
    }

    fn load(&self, name: &str) -> Result<Option<Page>, StoreError> {
        Ok(self
            .state
            .lock()
            .pages
            .get(&page_key(name))
            .map(|(page, _)| page.clone()))
    }

    fn list(&self, frameset: &str) -> Result<Vec<String>, StoreError> {
        let key = frameset_key(frameset);
        let state = self.state.lock();
        if !state.framesets.contains_key(&key) {
            return Err(StoreError::FramesetNotFound(frameset.to_string()));
        }
        let mut pages: Vec<(u32, String)> = state
            .pages
            .values()
            .filter(|(page, _)| frameset_key(&page.frameset) == key)
            .map(|(page, _)| (page.number, page.name.clone()))
            .collect();
        pages.sort();
        Ok(pages.into_iter().map(|(_, name)| name).collect())
    }
}
