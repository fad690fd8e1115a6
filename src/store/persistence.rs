//! Sled-backed frame store

use crate::error::{io_other, StoreError};
use crate::item::Item;
use crate::page::name::{frameset_key, page_key, validate_frameset_name};
use crate::page::Page;
use crate::store::{
    decode_page, encode_page, new_page, short_hex, FrameStore, FramesetRecord, PersistOutcome,
};
use parking_lot::Mutex;
use sled::{Db, Tree};
use std::path::Path;
use tracing::debug;

const TREE_PAGES: &str = "pages";
const TREE_FRAMESETS: &str = "framesets";
const TREE_FINGERPRINTS: &str = "fingerprints";

/// Frame store in a sled database.
pub struct SledFrameStore {
    db: Db,
    pages: Tree,
    framesets: Tree,
    fingerprints: Tree,
    /// Serializes page-number allocation.
    allocation: Mutex<()>,
}

impl SledFrameStore {
    /// Open (or create) a database at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(to_storage_io)?;
        Self::from_db(db)
    }

    pub fn from_db(db: Db) -> Result<Self, StoreError> {
        let pages = db.open_tree(TREE_PAGES).map_err(to_storage_io)?;
        let framesets = db.open_tree(TREE_FRAMESETS).map_err(to_storage_io)?;
        let fingerprints = db.open_tree(TREE_FINGERPRINTS).map_err(to_storage_io)?;
        Ok(Self {
            db,
            pages,
            framesets,
            fingerprints,
            allocation: Mutex::new(()),
        })
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush().map_err(to_storage_io)?;
        Ok(())
    }

    fn get_record(&self, frameset: &str) -> Result<Option<FramesetRecord>, StoreError> {
        let Some(raw) = self
            .framesets
            .get(frameset_key(frameset).as_bytes())
            .map_err(to_storage_io)?
        else {
            return Ok(None);
        };
        let record = bincode::deserialize(&raw)
            .map_err(|e| io_other(format!("Failed to deserialize frameset record: {}", e)))?;
        Ok(Some(record))
    }

    fn put_record(&self, record: &FramesetRecord) -> Result<(), StoreError> {
        let value = bincode::serialize(record)
            .map_err(|e| io_other(format!("Failed to serialize frameset record: {}", e)))?;
        self.framesets
            .insert(frameset_key(&record.name).as_bytes(), value)
            .map_err(to_storage_io)?;
        Ok(())
    }

    fn put_page(&self, page: &Page) -> Result<[u8; 32], StoreError> {
        let (bytes, fingerprint) = encode_page(page)?;
        let key = page_key(&page.name);
        self.pages
            .insert(key.as_bytes(), bytes)
            .map_err(to_storage_io)?;
        self.fingerprints
            .insert(key.as_bytes(), &fingerprint[..])
            .map_err(to_storage_io)?;
        Ok(fingerprint)
    }

    fn pages_of(&self, frameset: &str) -> Result<Vec<Page>, StoreError> {
        let key = frameset_key(frameset);
        let mut pages = Vec::new();
        for entry in self.pages.scan_prefix(key.as_bytes()) {
            let (_, value) = entry.map_err(to_storage_io)?;
            let page = decode_page(&value)?;
            // The prefix scan also matches framesets whose name extends this one.
            if frameset_key(&page.frameset) == key {
                pages.push(page);
            }
        }
        pages.sort_by_key(|page| page.number);
        Ok(pages)
    }
}

impl FrameStore for SledFrameStore {
    fn create_frameset(&self, name: &str, path: &Path, recreate: bool) -> Result<Page, StoreError> {
        validate_frameset_name(name)?;
        let _guard = self.allocation.lock();

        if self.get_record(name)?.is_some() {
            if !recreate {
                return Err(StoreError::FramesetExists(name.to_string()));
            }
            for page in self.pages_of(name)? {
                let key = page_key(&page.name);
                self.pages.remove(key.as_bytes()).map_err(to_storage_io)?;
                self.fingerprints.remove(key.as_bytes()).map_err(to_storage_io)?;
            }
        }

        let mut record = FramesetRecord::new(name, path);
        let page = new_page(&mut record, name, Vec::new());
        self.put_record(&record)?;
        self.put_page(&page)?;
        debug!(frameset = name, "Created frameset in sled");
        Ok(page)
    }

    fn create_page(
        &self,
        frameset: &str,
        title: &str,
        initial_items: Vec<Item>,
    ) -> Result<Page, StoreError> {
        let _guard = self.allocation.lock();
        let mut record = self
            .get_record(frameset)?
            .ok_or_else(|| StoreError::FramesetNotFound(frameset.to_string()))?;
        let page = new_page(&mut record, title, initial_items);
        self.put_record(&record)?;
        self.put_page(&page)?;
        Ok(page)
    }

    fn persist(&self, page: &Page, force: bool) -> Result<PersistOutcome, StoreError> {
        let (_, fingerprint) = encode_page(page)?;
        if !force {
            let stored = self
                .fingerprints
                .get(page_key(&page.name).as_bytes())
                .map_err(to_storage_io)?;
            if stored.as_deref() == Some(&fingerprint[..]) {
                return Ok(PersistOutcome::Unchanged);
            }
        }
        let written = self.put_page(page)?;
        self.flush()?;
        debug!(page = %page.name, fingerprint = %short_hex(&written), "Persisted page");
        Ok(PersistOutcome::Written)
    }

    fn load(&self, name: &str) -> Result<Option<Page>, StoreError> {
        match self
            .pages
            .get(page_key(name).as_bytes())
            .map_err(to_storage_io)?
        {
            Some(value) => decode_page(&value).map(Some),
            None => Ok(None),
        }
    }

    fn list(&self, frameset: &str) -> Result<Vec<String>, StoreError> {
        if self.get_record(frameset)?.is_none() {
            return Err(StoreError::FramesetNotFound(frameset.to_string()));
        }
        Ok(self
            .pages_of(frameset)?
            .into_iter()
            .map(|page| page.name)
            .collect())
    }
}

fn to_storage_io(err: sled::Error) -> StoreError {
    io_other(format!("sled error: {}", err))
}
