//! Filesystem implementations of the overlay load collaborators.

use std::future::Future;
use std::path::{Component, Path, PathBuf};

use inset_overlay::{ConfigDocument, DocumentStore, ImageProbe, LoadError, Size};

/// Reads configuration documents relative to a site root.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentStore for FsDocumentStore {
    fn load_config(&self, path: &str) -> impl Future<Output = Result<ConfigDocument, LoadError>> + Send {
        let full = self.root.join(path);
        let path = path.to_string();
        async move {
            let text = tokio::fs::read_to_string(&full)
                .await
                .map_err(|e| LoadError::Fetch {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            ConfigDocument::from_json(&path, &text)
        }
    }
}

/// Reads image headers to find their natural size.
#[derive(Debug, Clone)]
pub struct FsImageProbe {
    root: PathBuf,
}

impl FsImageProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute location of `src` as referenced from `document_path`.
    pub fn resolve(&self, document_path: &str, src: &str) -> PathBuf {
        resolve_relative(&self.root, document_path, src)
    }
}

impl ImageProbe for FsImageProbe {
    fn probe(&self, document_path: &str, src: &str) -> impl Future<Output = Result<Size, LoadError>> + Send {
        let file = self.resolve(document_path, src);
        let src = src.to_string();
        async move {
            let dims = tokio::task::spawn_blocking(move || image::image_dimensions(&file))
                .await
                .map_err(|e| LoadError::Image {
                    src: src.clone(),
                    message: e.to_string(),
                })?;
            let (width, height) = dims.map_err(|e| LoadError::Image {
                src: src.clone(),
                message: e.to_string(),
            })?;
            Ok(Size::new(width as f64, height as f64))
        }
    }
}

/// Resolve `src` against the directory of `document_path`, both under `root`.
pub fn resolve_relative(root: &Path, document_path: &str, src: &str) -> PathBuf {
    let base = Path::new(document_path).parent().unwrap_or(Path::new(""));
    normalize(&root.join(base).join(src))
}

/// Lexically remove `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
