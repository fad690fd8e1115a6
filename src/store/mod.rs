//! Frame Store
//!
//! Owns pages durably: creates framesets and pages, persists and loads them.
//! The pagination engine consumes a store only through [`FrameStore`].

pub mod memory;
pub mod persistence;
pub mod storage;

pub use memory::MemoryFrameStore;
pub use persistence::SledFrameStore;
pub use storage::FileFrameStore;

use crate::error::{io_other, StoreError};
use crate::item::Item;
use crate::page::Page;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// blake3 digest of a serialized page.
pub type Fingerprint = [u8; 32];

/// Durable description of a frameset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramesetRecord {
    pub name: String,
    pub path: PathBuf,
    pub last_number: u32,
}

impl FramesetRecord {
    pub fn new(name: &str, path: &Path) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            last_number: 0,
        }
    }

    /// Reserve the next page number.
    pub fn allocate(&mut self) -> u32 {
        self.last_number += 1;
        self.last_number
    }
}

/// What a persist call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Written,
    /// Page content matched the last persisted fingerprint and `force` was not set.
    Unchanged,
}

/// Frame store interface
pub trait FrameStore {
    /// Create a frameset and return its first page, titled with the frameset name.
    ///
    /// Fails with [`StoreError::FramesetExists`] unless `recreate` is set.
    fn create_frameset(&self, name: &str, path: &Path, recreate: bool) -> Result<Page, StoreError>;

    /// Create the next page of `frameset`.
    fn create_page(
        &self,
        frameset: &str,
        title: &str,
        initial_items: Vec<Item>,
    ) -> Result<Page, StoreError>;

    /// Persist a page. Unchanged pages are skipped unless `force` is set.
    fn persist(&self, page: &Page, force: bool) -> Result<PersistOutcome, StoreError>;

    fn load(&self, name: &str) -> Result<Option<Page>, StoreError>;

    /// Names of all stored pages of a frameset, ordered by page number.
    fn list(&self, frameset: &str) -> Result<Vec<String>, StoreError>;
}

/// Build a new page carrying the initial items.
pub(crate) fn new_page(record: &mut FramesetRecord, title: &str, initial_items: Vec<Item>) -> Page {
    let number = record.allocate();
    let mut page = Page::new(&record.name, number, title);
    for item in initial_items {
        page.push(item);
    }
    page
}

pub(crate) fn encode_page(page: &Page) -> Result<(Vec<u8>, Fingerprint), StoreError> {
    let bytes = bincode::serialize(page)
        .map_err(|e| io_other(format!("Failed to serialize page {}: {}", page.name, e)))?;
    let fingerprint = *blake3::hash(&bytes).as_bytes();
    Ok((bytes, fingerprint))
}

pub(crate) fn decode_page(bytes: &[u8]) -> Result<Page, StoreError> {
    bincode::deserialize(bytes).map_err(|e| {
        StoreError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to deserialize page: {}", e),
        ))
    })
}

/// Short hex form of a fingerprint for log lines.
pub(crate) fn short_hex(fingerprint: &Fingerprint) -> String {
    hex::encode(&fingerprint[..6])
}
