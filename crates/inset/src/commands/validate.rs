//! Validate configuration documents.

use std::path::PathBuf;

use anyhow::Result;
use inset_overlay::{load_overlay, DocumentStore, OverlayConfig, Scale, Size};
use inset_static::{FsDocumentStore, FsImageProbe};

/// Counts reported for one valid document.
struct Report {
    hotspots: usize,
    warnings: usize,
}

/// Run the validate command.
pub async fn run(paths: Vec<PathBuf>, skip_image: bool) -> Result<()> {
    let store = FsDocumentStore::new(PathBuf::new());
    let probe = FsImageProbe::new(PathBuf::new());

    let mut failed = 0;
    for path in &paths {
        let path = path.to_string_lossy();
        let report = if skip_image {
            check_document(&store, &path).await
        } else {
            check_overlay(&store, &probe, &path).await
        };

        match report {
            Ok(report) => tracing::info!(
                "{}: {} hotspots, {} warnings",
                path,
                report.hotspots,
                report.warnings
            ),
            Err(e) => {
                tracing::error!("{}: {}", path, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} documents failed validation", failed, paths.len());
    }
    Ok(())
}

/// Load the document and its screenshot, then check the pair can be scaled.
async fn check_overlay(store: &FsDocumentStore, probe: &FsImageProbe, path: &str) -> Result<Report> {
    let loaded = load_overlay(store, probe, path).await?;
    Scale::new(loaded.image, loaded.config.base_image.size())?;
    Ok(Report {
        hotspots: loaded.config.hotspots.len(),
        warnings: loaded.warnings.len(),
    })
}

/// Check the document alone. Only the authored reference size is verified.
async fn check_document(store: &FsDocumentStore, path: &str) -> Result<Report> {
    let doc = store.load_config(path).await?;
    let validated = OverlayConfig::from_document(doc);
    Scale::new(Size::new(1.0, 1.0), validated.config.base_image.size())?;
    Ok(Report {
        hotspots: validated.config.hotspots.len(),
        warnings: validated.warnings.len(),
    })
}
