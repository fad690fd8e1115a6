//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key, so a workspace file that
/// only sets `layout.gutter` keeps every other default.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("layout.title_indent", 20)?
        .set_default("layout.gutter", 20)?
        .set_default("layout.start_marker", "@start")?
        .set_default("layout.multi_column", false)?
        .set_default("storage.backend", "file")?
        .set_default("storage.root", ".frameflow/pages")?
        .set_default("logging.level", "info")
}
