//! Filesystem frame store
//!
//! Stores each page as a bincode file:
//! `{root}/{frameset path}/{frameset}/{number}.page`
//!
//! The frameset record lives next to its pages in `frameset.meta`. Writes go to
//! a `.tmp` sibling first and are renamed into place.

use crate::error::{io_other, StoreError};
use crate::item::Item;
use crate::page::name::{frameset_key, page_key, parse_page_name, validate_frameset_name};
use crate::page::Page;
use crate::store::{
    decode_page, encode_page, new_page, short_hex, FrameStore, FramesetRecord, Fingerprint,
    PersistOutcome,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const META_FILE: &str = "frameset.meta";
const INDEX_FILE: &str = "framesets.index";
const PAGE_EXTENSION: &str = "page";

/// Frame store on the local filesystem.
pub struct FileFrameStore {
    root: PathBuf,
    /// Last fingerprint written per page, for skip-if-unchanged.
    written: Mutex<HashMap<String, Fingerprint>>,
    /// Frameset directories discovered or created by this store.
    dirs: Mutex<HashMap<String, PathBuf>>,
}

impl FileFrameStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            io_other(format!("Failed to create store root at {:?}: {}", root, e))
        })?;

        Ok(Self {
            root,
            written: Mutex::new(HashMap::new()),
            dirs: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a frameset's pages.
    fn frameset_dir(&self, frameset: &str) -> Result<PathBuf, StoreError> {
        let key = frameset_key(frameset);
        if let Some(dir) = self.dirs.lock().get(&key) {
            return Ok(dir.clone());
        }

        let index = self.read_index()?;
        let dir = match index.get(&key) {
            Some(path) => self.root.join(path).join(&key),
            None => return Err(StoreError::FramesetNotFound(frameset.to_string())),
        };
        if !dir.join(META_FILE).exists() {
            return Err(StoreError::FramesetNotFound(frameset.to_string()));
        }
        self.dirs.lock().insert(key, dir.clone());
        Ok(dir)
    }

    /// Frameset key -> frameset path, relative to the root.
    fn read_index(&self) -> Result<HashMap<String, PathBuf>, StoreError> {
        let path = self.root.join(INDEX_FILE);
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let bytes = fs::read(&path)
            .map_err(|e| io_other(format!("Failed to read frameset index {:?}: {}", path, e)))?;
        bincode::deserialize(&bytes)
            .map_err(|e| io_other(format!("Failed to deserialize frameset index: {}", e)))
    }

    fn register(&self, key: &str, path: &Path) -> Result<(), StoreError> {
        let mut index = self.read_index()?;
        index.insert(key.to_string(), path.to_path_buf());
        let bytes = bincode::serialize(&index)
            .map_err(|e| io_other(format!("Failed to serialize frameset index: {}", e)))?;
        write_atomic(&self.root.join(INDEX_FILE), &bytes)
    }

    fn page_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let (frameset, number) = parse_page_name(name)?;
        Ok(self
            .frameset_dir(&frameset)?
            .join(format!("{}.{}", number, PAGE_EXTENSION)))
    }

    fn read_record(&self, dir: &Path) -> Result<FramesetRecord, StoreError> {
        let bytes = fs::read(dir.join(META_FILE))
            .map_err(|e| io_other(format!("Failed to read frameset record in {:?}: {}", dir, e)))?;
        bincode::deserialize(&bytes).map_err(|e| {
            io_other(format!("Failed to deserialize frameset record in {:?}: {}", dir, e))
        })
    }

    fn write_record(&self, dir: &Path, record: &FramesetRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record)
            .map_err(|e| io_other(format!("Failed to serialize frameset record: {}", e)))?;
        write_atomic(&dir.join(META_FILE), &bytes)
    }

    fn write_page(&self, page: &Page) -> Result<Fingerprint, StoreError> {
        let (bytes, fingerprint) = encode_page(page)?;
        write_atomic(&self.page_path(&page.name)?, &bytes)?;
        self.written.lock().insert(page_key(&page.name), fingerprint);
        Ok(fingerprint)
    }
}

impl FrameStore for FileFrameStore {
    fn create_frameset(&self, name: &str, path: &Path, recreate: bool) -> Result<Page, StoreError> {
        validate_frameset_name(name)?;
        if path.is_absolute()
            || path.components().any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(StoreError::InvalidPath(path.to_path_buf()));
        }

        let key = frameset_key(name);
        let dir = self.root.join(path).join(&key);
        if let Ok(existing) = self.frameset_dir(name) {
            if !recreate {
                return Err(StoreError::FramesetExists(name.to_string()));
            }
            fs::remove_dir_all(&existing).map_err(|e| {
                io_other(format!("Failed to clear frameset {:?}: {}", existing, e))
            })?;
            self.written
                .lock()
                .retain(|page, _| parse_page_name(page).map_or(true, |(set, _)| frameset_key(&set) != key));
        }
        fs::create_dir_all(&dir)
            .map_err(|e| io_other(format!("Failed to create frameset directory {:?}: {}", dir, e)))?;
        self.register(&key, path)?;
        self.dirs.lock().insert(key, dir.clone());

        let mut record = FramesetRecord::new(name, path);
        let page = new_page(&mut record, name, Vec::new());
        self.write_record(&dir, &record)?;
        self.write_page(&page)?;
        debug!(frameset = name, dir = %dir.display(), "Created frameset on disk");
        Ok(page)
    }

    fn create_page(
        &self,
        frameset: &str,
        title: &str,
        initial_items: Vec<Item>,
    ) -> Result<Page, StoreError> {
        let dir = self.frameset_dir(frameset)?;
        let mut record = self.read_record(&dir)?;
        let page = new_page(&mut record, title, initial_items);
        self.write_record(&dir, &record)?;
        self.write_page(&page)?;
        Ok(page)
    }

    fn persist(&self, page: &Page, force: bool) -> Result<PersistOutcome, StoreError> {
        let (_, fingerprint) = encode_page(page)?;
        if !force && self.written.lock().get(&page_key(&page.name)) == Some(&fingerprint) {
            return Ok(PersistOutcome::Unchanged);
        }
        let written = self.write_page(page)?;
        debug!(page = %page.name, fingerprint = %short_hex(&written), "Persisted page");
        Ok(PersistOutcome::Written)
    }

    fn load(&self, name: &str) -> Result<Option<Page>, StoreError> {
        let path = match self.page_path(name) {
            Ok(path) => path,
            Err(StoreError::FramesetNotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)
            .map_err(|e| io_other(format!("Failed to read page from {:?}: {}", path, e)))?;
        decode_page(&bytes).map(Some)
    }

    fn list(&self, frameset: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.frameset_dir(frameset)?;
        let record = self.read_record(&dir)?;
        let mut numbers = Vec::new();
        let entries = fs::read_dir(&dir)
            .map_err(|e| io_other(format!("Failed to list {:?}: {}", dir, e)))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PAGE_EXTENSION) {
                continue;
            }
            if let Some(number) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok())
            {
                numbers.push(number);
            }
        }
        numbers.sort_unstable();
        Ok(numbers
            .into_iter()
            .map(|n| crate::page::page_name(&record.name, n))
            .collect())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, bytes)
        .map_err(|e| io_other(format!("Failed to write {:?}: {}", temp_path, e)))?;
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        io_other(format!("Failed to rename temp file to {:?}: {}", path, e))
    })
}
