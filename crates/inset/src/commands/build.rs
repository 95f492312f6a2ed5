//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use inset_static::SiteBuilder;

use crate::config::load_config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = load_config(config_path)?;
    let config = file_config.to_build_config(output, minify);

    let result = SiteBuilder::new(config).build().await?;

    tracing::info!(
        "Built {} pages with {} hotspots in {}ms",
        result.pages,
        result.hotspots,
        result.duration_ms
    );
    if result.diagnostics > 0 {
        tracing::warn!("{} pages show a load error", result.diagnostics);
    }
    if result.warnings > 0 {
        tracing::warn!("{} validation warnings", result.warnings);
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
