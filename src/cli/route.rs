//! CLI route: single route table and run context. Dispatches to the engine, stores and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    chain_rows, format_chain_json, format_chain_text, format_page_json, format_page_text,
};
use crate::config::{ConfigLoader, FlowConfig};
use crate::error::{ApiError, PlacementError};
use crate::flow::{Paginator, SessionOptions};
use crate::geometry::Geometry;
use crate::nav::follow_stored;
use crate::page::{page_name, parse_page_name, validate_frameset_name, Page};
use crate::store::FrameStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace, effective config and the opened store.
pub struct RunContext {
    workspace_root: PathBuf,
    config: FlowConfig,
    store: Arc<dyn FrameStore>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        let store = config.storage.open_store(&workspace_root)?;
        debug!(
            workspace = %workspace_root.display(),
            backend = ?config.storage.backend,
            "Run context ready"
        );

        Ok(Self {
            workspace_root,
            config,
            store,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn FrameStore> {
        Arc::clone(&self.store)
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        info!(command = command.name(), "Executing command");

        let result = match command {
            Commands::Flow {
                input,
                frameset,
                title,
                path,
                multi_column,
                recreate,
                format,
            } => {
                let options = SessionOptions {
                    frameset: frameset.clone(),
                    path: path.clone().unwrap_or_default(),
                    title: title.clone(),
                    recreate: *recreate,
                    multi_column: *multi_column || self.config.layout.multi_column,
                };
                self.handle_flow(input, options, format)
            }
            Commands::Chain { frameset, format } => self.handle_chain(frameset, format),
            Commands::Show { page, format } => self.handle_show(page, format),
            Commands::Config => self.config.to_toml(),
        };

        debug!(
            command = command.name(),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn handle_flow(
        &self,
        input: &Path,
        options: SessionOptions,
        format: &str,
    ) -> Result<String, ApiError> {
        let text = std::fs::read_to_string(input).map_err(|source| ApiError::InputError {
            path: input.to_path_buf(),
            source,
        })?;

        let layout = &self.config.layout;
        let geometry: Arc<dyn Geometry> = Arc::new(layout.to_metrics());
        let frameset = options.frameset.clone();
        let mut paginator =
            Paginator::start(self.store(), geometry, layout.to_settings(), options)?;

        for line in text.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                paginator.advance_spacing(layout.line_height)?;
            } else {
                paginator.add_text(line, None, None, None, false)?;
            }
        }

        let chain = paginator.finish()?;
        chain.validate().map_err(PlacementError::from)?;
        let pages: Vec<Page> = chain.walk().cloned().collect();
        info!(frameset = %frameset, pages = pages.len(), "Flow complete");

        render_chain(&frameset, &pages, format)
    }

    fn handle_chain(&self, frameset: &str, format: &str) -> Result<String, ApiError> {
        validate_frameset_name(frameset)?;
        let first = page_name(frameset, 1);
        if self.store.load(&first)?.is_none() {
            return Err(ApiError::PageNotFound(first));
        }
        let pages = follow_stored(self.store.as_ref(), &first)?;
        render_chain(frameset, &pages, format)
    }

    fn handle_show(&self, name: &str, format: &str) -> Result<String, ApiError> {
        parse_page_name(name)?;
        let page = self
            .store
            .load(name)?
            .ok_or_else(|| ApiError::PageNotFound(name.to_string()))?;
        match format {
            "json" => format_page_json(&page),
            _ => Ok(format_page_text(&page)),
        }
    }
}

fn render_chain(frameset: &str, pages: &[Page], format: &str) -> Result<String, ApiError> {
    let rows = chain_rows(pages);
    match format {
        "json" => format_chain_json(frameset, &rows),
        _ => Ok(format_chain_text(frameset, &rows)),
    }
}
