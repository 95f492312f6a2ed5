//! Re-export a configuration document through the builder model.

use std::path::PathBuf;

use anyhow::Result;
use inset_builder::BuilderSession;
use inset_overlay::DocumentStore;
use inset_static::FsDocumentStore;

/// Run the export command.
///
/// Prints the `"overlays": [...]` fragment, or the whole document when
/// `document` is set.
pub async fn run(path: PathBuf, document: bool) -> Result<()> {
    let store = FsDocumentStore::new(PathBuf::new());
    let doc = store.load_config(&path.to_string_lossy()).await?;

    let mut session = BuilderSession::default();
    let warnings = session.load_document(doc);
    if !warnings.is_empty() {
        tracing::info!("{} fields were replaced with defaults", warnings.len());
    }

    let output = if document {
        session.export_document()?
    } else {
        session.export_overlays()?
    };
    println!("{}", output);
    Ok(())
}
