//! Error types for the frame-flow and pagination engine.

use std::path::PathBuf;
use thiserror::Error;

/// Measurement or positioning failures reported by a [`crate::geometry::Geometry`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Cannot measure item {0}: {1}")]
    Unmeasurable(u32, String),

    #[error("Usable page size is empty ({width}x{height})")]
    EmptyPage { width: i32, height: i32 },

    #[error("Invalid right margin {0}")]
    InvalidMargin(i32),

    #[error("Conflicting anchors on the {0} axis: absolute and offset both given")]
    ConflictingAnchor(&'static str),
}

/// Frame store failures: page creation, loading and persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Frameset already exists: {0}")]
    FramesetExists(String),

    #[error("Frameset not found: {0}")]
    FramesetNotFound(String),

    #[error("Invalid frameset name: {0:?}")]
    InvalidFramesetName(String),

    #[error("Invalid page name: {0:?}")]
    InvalidPageName(String),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    #[error("Persistence rejected for page {page}: {reason}")]
    Rejected { page: String, reason: String },

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Violations of the navigation chain invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChainError {
    #[error("Page {0} already carries a Next link")]
    NextAlreadyLinked(String),

    #[error("Page {0} is already part of the chain")]
    DuplicatePage(String),

    #[error("Page {0} would link to itself")]
    SelfLink(String),

    #[error("Missing {role} link target on page {page}")]
    MissingLink { page: String, role: &'static str },

    #[error("Chain has a cycle through page {0}")]
    Cycle(String),

    #[error("Page {0} is not part of the chain")]
    UnknownPage(String),

    #[error("Next link from {from} to {orphan} could not be persisted: {reason}")]
    LinkNotPersisted {
        from: String,
        orphan: String,
        reason: String,
    },

    #[error("Session is unusable after an earlier chain failure: {0}")]
    Poisoned(String),
}

/// Outcome of a failed placement; the item is never partially committed.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),
}

/// Errors surfaced to the command line and configuration layers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Placement failed: {0}")]
    Placement(#[from] PlacementError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StoreError),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Cannot read input {path}: {source}")]
    InputError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output formatting failed: {0}")]
    OutputError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

pub(crate) fn io_other(message: String) -> StoreError {
    StoreError::IoError(std::io::Error::new(std::io::ErrorKind::Other, message))
}
