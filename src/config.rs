//! Configuration System
//!
//! Layered configuration for layout constants, storage backend and logging.
//! Sources, lowest precedence first: built-in defaults, the global config file,
//! workspace config files, then `FRAMEFLOW__*` environment variables.

use crate::error::ApiError;
use crate::flow::FlowSettings;
use crate::geometry::FixedMetrics;
use crate::logging::LoggingConfig;
use crate::store::{FileFrameStore, FrameStore, MemoryFrameStore, SledFrameStore};
use crate::types::Size;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Layout constants and page metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_title_indent")]
    pub title_indent: i32,

    #[serde(default = "default_gutter")]
    pub gutter: i32,

    #[serde(default = "default_start_marker")]
    pub start_marker: String,

    /// Wrap into further columns before spawning a new page.
    #[serde(default)]
    pub multi_column: bool,

    #[serde(default = "default_char_width")]
    pub char_width: i32,

    #[serde(default = "default_line_height")]
    pub line_height: i32,

    #[serde(default = "default_padding")]
    pub padding: i32,

    #[serde(default = "default_page_width")]
    pub page_width: i32,

    #[serde(default = "default_page_height")]
    pub page_height: i32,
}

fn default_title_indent() -> i32 {
    20
}

fn default_gutter() -> i32 {
    20
}

fn default_start_marker() -> String {
    "@start".to_string()
}

fn default_char_width() -> i32 {
    8
}

fn default_line_height() -> i32 {
    16
}

fn default_padding() -> i32 {
    4
}

fn default_page_width() -> i32 {
    1024
}

fn default_page_height() -> i32 {
    768
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title_indent: default_title_indent(),
            gutter: default_gutter(),
            start_marker: default_start_marker(),
            multi_column: false,
            char_width: default_char_width(),
            line_height: default_line_height(),
            padding: default_padding(),
            page_width: default_page_width(),
            page_height: default_page_height(),
        }
    }
}

impl LayoutConfig {
    pub fn to_settings(&self) -> FlowSettings {
        FlowSettings {
            title_indent: self.title_indent,
            gutter: self.gutter,
            start_marker: self.start_marker.clone(),
        }
    }

    pub fn to_metrics(&self) -> FixedMetrics {
        FixedMetrics {
            char_width: self.char_width,
            line_height: self.line_height,
            padding: self.padding,
            page: Size::new(self.page_width, self.page_height),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.start_marker.trim().is_empty() {
            return Err("Start marker cannot be empty".to_string());
        }
        if self.start_marker.chars().any(char::is_whitespace) {
            return Err(format!(
                "Start marker {:?} cannot contain whitespace",
                self.start_marker
            ));
        }
        if self.page_width <= 0 || self.page_height <= 0 {
            return Err(format!(
                "Page size must be positive, got {}x{}",
                self.page_width, self.page_height
            ));
        }
        if self.char_width <= 0 || self.line_height <= 0 {
            return Err("Character metrics must be positive".to_string());
        }
        if self.gutter < 0 || self.title_indent < 0 || self.padding < 0 {
            return Err("Gutter, title indent and padding cannot be negative".to_string());
        }
        Ok(())
    }
}

/// Which frame store backs the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Sled,
    Memory,
}

/// Storage paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Store root; relative paths resolve against the workspace root.
    #[serde(default = "default_store_root")]
    pub root: PathBuf,
}

fn default_store_root() -> PathBuf {
    PathBuf::from(".frameflow/pages")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: default_store_root(),
        }
    }
}

impl StorageConfig {
    pub fn resolve_root(&self, workspace_root: &Path) -> PathBuf {
        if self.root.is_absolute() {
            self.root.clone()
        } else {
            dunce::simplified(workspace_root).join(&self.root)
        }
    }

    /// Open the configured backend rooted under `workspace_root`.
    pub fn open_store(&self, workspace_root: &Path) -> Result<Arc<dyn FrameStore>, ApiError> {
        let root = self.resolve_root(workspace_root);
        let store: Arc<dyn FrameStore> = match self.backend {
            StorageBackend::File => Arc::new(FileFrameStore::new(&root)?),
            StorageBackend::Sled => Arc::new(SledFrameStore::new(&root)?),
            StorageBackend::Memory => Arc::new(MemoryFrameStore::new()),
        };
        Ok(store)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.backend != StorageBackend::Memory && self.root.as_os_str().is_empty() {
            return Err("Store root cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Layout(String),
    Storage(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Layout(msg) => write!(f, "Layout: {}", msg),
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl FlowConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.layout.validate() {
            errors.push(ValidationError::Layout(e));
        }
        if let Err(e) = self.storage.validate() {
            errors.push(ValidationError::Storage(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render as TOML, for display.
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
