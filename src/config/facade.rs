//! Entry point for loading a [`FlowConfig`] from its layered sources.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::FlowConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Defaults, then the global file, then `config/config.toml` and
    /// `config/{FRAMEFLOW_ENV}.toml` under `workspace_root`, then environment.
    pub fn load(workspace_root: &Path) -> Result<FlowConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: FlowConfig = builder.build()?.try_deserialize()?;
        Self::checked(config)
    }

    /// Load from a single explicit file, on top of defaults and environment.
    pub fn load_from_file(path: &Path) -> Result<FlowConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);

        let config: FlowConfig = builder.build()?.try_deserialize()?;
        Self::checked(config)
    }

    /// Path of the global config file, when HOME or XDG_CONFIG_HOME is set.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn checked(config: FlowConfig) -> Result<FlowConfig, ApiError> {
        if let Err(errors) = config.validate() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::ConfigError(format!("Invalid configuration: {}", joined)));
        }
        debug!(
            backend = ?config.storage.backend,
            multi_column = config.layout.multi_column,
            "Configuration loaded"
        );
        Ok(config)
    }
}
