//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde_json::Value;
use walkdir::WalkDir;

use inset_adapters::{HtmlAdapter, ImageInfo, OverlayAdapter, RenderContext};
use inset_overlay::{
    load_overlay, Diagnostic, DisplayMode, EngineState, LoadError, LoadedOverlay, OverlayEngine,
    ScaleError, Size, Theme,
};

use crate::assets::AssetPipeline;
use crate::store::{normalize, FsDocumentStore, FsImageProbe};
use crate::templates::{PageContext, ScriptCard, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Site root containing `scripts/<id>/config.json`
    pub site_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Width screenshots are shown at. Natural size when unset.
    pub display_width: Option<f64>,

    /// Pages start in show-all mode
    pub show_all: bool,

    /// Theme inline colors are resolved against before the runtime loads
    pub theme: Theme,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from("."),
            output_dir: PathBuf::from("dist"),
            minify: true,
            base_url: "/".to_string(),
            title: "Scripts Portfolio".to_string(),
            display_width: None,
            show_all: false,
            theme: Theme::Light,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of script pages generated, including the index
    pub pages: usize,

    /// Number of hotspots rendered
    pub hotspots: usize,

    /// Pages that show a load diagnostic instead of an overlay
    pub diagnostics: usize,

    /// Validation warnings across all documents
    pub warnings: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read site directory: {0}")]
    ReadError(String),

    #[error("Cannot scale overlay {path}: {source}")]
    ScaleError {
        path: String,
        #[source]
        source: ScaleError,
    },

    #[error("Failed to render overlay {path}: {message}")]
    RenderError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A script found under `scripts/`.
#[derive(Debug)]
struct ScriptSource {
    id: String,
    /// Document path relative to the site root
    config_path: String,
    outcome: Result<LoadedOverlay, LoadError>,
    /// Contents of `description.md`, if present
    body: Option<String>,
}

#[derive(Debug)]
struct PageSummary {
    card: ScriptCard,
    hotspots: usize,
    diagnostic: bool,
}

/// Static site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    adapter: HtmlAdapter,
    templates: TemplateEngine,
}

impl SiteBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            adapter: HtmlAdapter::default(),
            templates: TemplateEngine::new(),
        }
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let ids = self.discover_scripts()?;
        tracing::info!("Found {} scripts", ids.len());

        let sources = self.load_scripts(ids).await;
        let warnings: usize = sources
            .iter()
            .filter_map(|s| s.outcome.as_ref().ok())
            .map(|loaded| loaded.warnings.len())
            .sum();

        // Pages are independent once everything is loaded.
        let results: Vec<Result<PageSummary, BuildError>> = sources
            .par_iter()
            .map(|source| self.build_page(source))
            .collect();

        let mut summaries = Vec::with_capacity(results.len());
        for result in results {
            summaries.push(result?);
        }

        let hotspots: usize = summaries.iter().map(|s| s.hotspots).sum();
        let diagnostics = summaries.iter().filter(|s| s.diagnostic).count();

        let mut cards: Vec<ScriptCard> = summaries.into_iter().map(|s| s.card).collect();
        sort_cards(&mut cards);
        self.write_index(&cards)?;

        self.generate_assets()?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: cards.len() + 1,
            hotspots,
            diagnostics,
            warnings,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Find every `scripts/<id>` directory with a `config.json`, sorted by id.
    fn discover_scripts(&self) -> Result<Vec<String>, BuildError> {
        let scripts_dir = self.config.site_dir.join("scripts");
        if !scripts_dir.is_dir() {
            return Err(BuildError::ReadError(format!(
                "Scripts directory not found: {}",
                scripts_dir.display()
            )));
        }

        let mut ids = Vec::new();
        for entry in WalkDir::new(&scripts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(id) = entry.file_name().to_str() else {
                continue;
            };
            if entry.path().join("config.json").is_file() {
                ids.push(id.to_string());
            } else {
                tracing::warn!("Found script directory '{}' without config.json", id);
            }
        }

        Ok(ids)
    }

    /// Load every document and its image. Failures are kept per script.
    async fn load_scripts(&self, ids: Vec<String>) -> Vec<ScriptSource> {
        let store = FsDocumentStore::new(&self.config.site_dir);
        let probe = FsImageProbe::new(&self.config.site_dir);

        let mut sources = Vec::with_capacity(ids.len());
        for id in ids {
            let config_path = format!("scripts/{}/config.json", id);
            let outcome = load_overlay(&store, &probe, &config_path).await;

            let body_path = self
                .config
                .site_dir
                .join("scripts")
                .join(&id)
                .join("description.md");
            let body = tokio::fs::read_to_string(&body_path).await.ok();

            sources.push(ScriptSource {
                id,
                config_path,
                outcome,
                body,
            });
        }
        sources
    }

    /// Render one script page.
    fn build_page(&self, source: &ScriptSource) -> Result<PageSummary, BuildError> {
        let url = format!("{}scripts/{}/", self.config.base_url, source.id);

        let mut engine = OverlayEngine::new(self.config.theme);
        engine.set_show_all(self.config.show_all);
        let ticket = engine.begin_load();

        let (page, card, hotspots, diagnostic) = match &source.outcome {
            Ok(loaded) => {
                let config = &loaded.config;
                let display = self.display_size(loaded.image);
                engine
                    .complete(ticket, config.clone(), display)
                    .map_err(|source_err| BuildError::ScaleError {
                        path: source.config_path.clone(),
                        source: source_err,
                    })?;

                let image_url = self.copy_image(&source.config_path, &config.base_image.src);
                let ctx = RenderContext {
                    image: ImageInfo {
                        src: image_url.clone().unwrap_or_else(|| config.base_image.src.clone()),
                        alt: config.script_name.clone(),
                        display,
                    },
                    theme: self.config.theme,
                    show_all: engine.mode() == DisplayMode::ShowAll,
                };
                let rendered =
                    self.adapter
                        .render(engine.geometry(), &ctx)
                        .map_err(|e| BuildError::RenderError {
                            path: source.config_path.clone(),
                            message: e.to_string(),
                        })?;

                let category = extra_str(&config.extras, "category").map(|c| capitalize(&c));
                let title = if config.script_name.is_empty() {
                    source.id.clone()
                } else {
                    config.script_name.clone()
                };

                let page = PageContext {
                    title: title.clone(),
                    site_title: self.config.title.clone(),
                    base_url: self.config.base_url.clone(),
                    version: config.version.clone(),
                    category: category.clone(),
                    summary: config.description.clone(),
                    overlay: rendered.markup,
                    body: source.body.as_deref().map(inset_markdown::render_markdown),
                    show_all: self.config.show_all,
                    hotspot_count: rendered.hotspot_count,
                };
                let card = ScriptCard {
                    id: source.id.clone(),
                    name: title,
                    version: config.version.clone(),
                    category,
                    description: config.description.clone(),
                    thumbnail: image_url,
                    url,
                    pinned: config
                        .extras
                        .get("pinned")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                    tags: config
                        .extras
                        .get("tags")
                        .and_then(Value::as_array)
                        .map(|tags| {
                            tags.iter()
                                .filter_map(|t| t.as_str().map(str::to_string))
                                .collect()
                        })
                        .unwrap_or_default(),
                };
                (page, card, rendered.hotspot_count, false)
            }
            Err(err) => {
                engine.fail(ticket, err);
                let diagnostic = match engine.state() {
                    EngineState::Failed(diagnostic) => diagnostic.clone(),
                    _ => Diagnostic::from(err),
                };
                let overlay = self.adapter.render_diagnostic(&diagnostic);
                let page = PageContext {
                    title: source.id.clone(),
                    site_title: self.config.title.clone(),
                    base_url: self.config.base_url.clone(),
                    version: None,
                    category: None,
                    summary: None,
                    overlay,
                    body: source.body.as_deref().map(inset_markdown::render_markdown),
                    show_all: self.config.show_all,
                    hotspot_count: 0,
                };
                let card = ScriptCard {
                    id: source.id.clone(),
                    name: source.id.clone(),
                    version: None,
                    category: None,
                    description: None,
                    thumbnail: None,
                    url,
                    pinned: false,
                    tags: Vec::new(),
                };
                (page, card, 0, true)
            }
        };

        let html = self
            .templates
            .render_page(&page)
            .map_err(|e: minijinja::Error| BuildError::TemplateError(e.to_string()))?;

        let output_path = self
            .config
            .output_dir
            .join("scripts")
            .join(&source.id)
            .join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }
        fs::write(&output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::debug!("Wrote {}", output_path.display());
        Ok(PageSummary {
            card,
            hotspots,
            diagnostic,
        })
    }

    /// Size the screenshot is laid out at on its page.
    fn display_size(&self, natural: Size) -> Size {
        match self.config.display_width {
            Some(width) if natural.width > 0.0 => {
                Size::new(width, natural.height * width / natural.width)
            }
            _ => natural,
        }
    }

    /// Copy a document's image into the output, mirroring its location
    /// under the site root. Returns the URL to reference it by.
    fn copy_image(&self, config_path: &str, src: &str) -> Option<String> {
        let probe = FsImageProbe::new(&self.config.site_dir);
        let source = probe.resolve(config_path, src);
        let site = normalize(&self.config.site_dir);

        let relative = match source.strip_prefix(&site) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => Path::new("images").join(source.file_name()?),
        };
        let target = self.config.output_dir.join(&relative);

        if let Some(parent) = target.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!("Failed to create {}: {}", parent.display(), e);
                return None;
            }
        }
        if let Err(e) = fs::copy(&source, &target) {
            tracing::warn!("Failed to copy image {}: {}", source.display(), e);
            return None;
        }

        let url_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Some(format!("{}{}", self.config.base_url, url_path))
    }

    fn write_index(&self, cards: &[ScriptCard]) -> Result<(), BuildError> {
        let html = self
            .templates
            .render_index(&self.config.title, &self.config.base_url, cards)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        fs::write(self.config.output_dir.join("index.html"), html)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let js = AssetPipeline::generate_js();
        fs::write(assets_dir.join("overlay.js"), js)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Pinned scripts first, then by name.
fn sort_cards(cards: &mut [ScriptCard]) {
    cards.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

fn extra_str(extras: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    extras.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
