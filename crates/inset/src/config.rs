//! Site configuration file (inset.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use inset_overlay::{Theme, ThemeContext, ThemePreference};
use inset_static::BuildConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub overlay: OverlaySettings,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_dir")]
    pub dir: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            dir: default_site_dir(),
            output: default_output(),
            title: default_title(),
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct OverlaySettings {
    /// Width screenshots are shown at; natural size when unset
    pub display_width: Option<f64>,
    #[serde(default)]
    pub show_all: bool,
    /// Theme inline colors are resolved against; `auto` means light until
    /// the page runtime sees the visitor's preference
    #[serde(default)]
    pub theme: ThemePreference,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_site_dir() -> String {
    ".".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_title() -> String {
    "Scripts Portfolio".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_minify() -> bool {
    true
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

impl ConfigFile {
    /// Build settings with command line overrides applied.
    pub fn to_build_config(&self, output: Option<PathBuf>, minify: Option<bool>) -> BuildConfig {
        let theme = ThemeContext::new(self.overlay.theme, Theme::Light);
        BuildConfig {
            site_dir: PathBuf::from(&self.site.dir),
            output_dir: output.unwrap_or_else(|| PathBuf::from(&self.site.output)),
            minify: minify.unwrap_or(self.build.minify),
            base_url: self.site.base_url.clone(),
            title: self.site.title.clone(),
            display_width: self.overlay.display_width,
            show_all: self.overlay.show_all,
            theme: theme.effective(),
            ..Default::default()
        }
    }
}
