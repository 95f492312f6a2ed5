//! Asset pipeline for CSS and JavaScript processing.

use inset_adapters::generate_runtime;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Site stylesheet: page layout, theme variables and overlay elements.
    pub fn generate_css() -> String {
        format!("{}\n{}", SITE_CSS, OVERLAY_CSS)
    }

    /// Overlay runtime script.
    pub fn generate_js() -> String {
        generate_runtime()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const SITE_CSS: &str = r#"/* Portfolio theme */
:root {
  --bg-primary: #ffffff;
  --bg-secondary: #f8fafc;
  --bg-tertiary: #e2e8f0;
  --text-primary: #0f172a;
  --text-muted: #64748b;
  --border: #cbd5e1;
  --header-bg: #1e293b;
  --header-text: #f8fafc;
  --header-subtitle: #cbd5e1;
  --tooltip-bg: #ffffff;
  --tooltip-text: #0f172a;
  --tooltip-shadow: 0 4px 16px rgba(15, 23, 42, 0.18);
  --content-max-width: 960px;
}

:root[data-theme="dark"] {
  --bg-primary: #0f172a;
  --bg-secondary: #1e293b;
  --bg-tertiary: #334155;
  --text-primary: #f1f5f9;
  --text-muted: #94a3b8;
  --border: #475569;
  --header-bg: #020617;
  --header-text: #f8fafc;
  --header-subtitle: #94a3b8;
  --tooltip-bg: #1e293b;
  --tooltip-text: #f1f5f9;
  --tooltip-shadow: 0 4px 16px rgba(0, 0, 0, 0.5);
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--bg-primary);
  color: var(--text-primary);
  line-height: 1.6;
}

.container {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 2rem;
  position: relative;
}

.header {
  background: var(--header-bg);
  color: var(--header-text);
}

.breadcrumb a {
  color: var(--header-subtitle);
  text-decoration: none;
  font-size: 0.9rem;
}

.site-title {
  font-size: 2rem;
  font-weight: 700;
}

.site-subtitle {
  color: var(--header-subtitle);
}

.theme-toggle {
  position: absolute;
  top: 1rem;
  right: 2rem;
  background: none;
  border: none;
  color: var(--header-subtitle);
  font-size: 0.8rem;
  opacity: 0.7;
  cursor: pointer;
}

.theme-toggle:hover {
  opacity: 1;
}

.badges {
  margin-top: 1rem;
  display: flex;
  gap: 0.5rem;
}

.badge {
  background: var(--bg-tertiary);
  color: var(--text-muted);
  padding: 0.3rem 0.8rem;
  border-radius: 15px;
  font-size: 0.85rem;
}

.script-grid {
  list-style: none;
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
  gap: 1.5rem;
}

.script-card {
  background: var(--bg-secondary);
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 1rem;
}

.script-card.pinned {
  border-width: 2px;
}

.script-card a {
  color: inherit;
  text-decoration: none;
}

.script-card .thumbnail {
  width: 100%;
  height: 180px;
  object-fit: cover;
  object-position: top;
  border-radius: 4px;
}

.tags {
  list-style: none;
  display: flex;
  flex-wrap: wrap;
  gap: 0.3rem;
  margin-top: 0.5rem;
  font-size: 0.75rem;
  color: var(--text-muted);
}

.screenshot {
  display: flex;
  flex-direction: column;
  align-items: center;
  gap: 1rem;
}

.overlay-toggle {
  padding: 0.4rem 1rem;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--bg-secondary);
  color: var(--text-primary);
  cursor: pointer;
}

.description {
  margin-top: 2rem;
}

.description h1,
.description h2 {
  margin: 1.5rem 0 0.75rem;
}

.description p,
.description ul,
.description ol {
  margin-bottom: 1rem;
}

.description ul,
.description ol {
  padding-left: 1.5rem;
}
"#;

const OVERLAY_CSS: &str = r#"/* Hotspot overlays */
.image-container {
  position: relative;
  display: inline-block;
}

.base-image {
  display: block;
}

.hotspot {
  position: absolute;
  cursor: pointer;
}

.highlight {
  position: absolute;
  left: 0;
  top: 0;
  border: 2px solid transparent;
  opacity: 0;
  transition: opacity 0.15s ease;
  pointer-events: none;
}

.overlay-line-container {
  position: absolute;
  left: 0;
  top: 0;
  pointer-events: none;
}

.line-segment {
  position: absolute;
}

.description-tooltip {
  position: absolute;
  max-width: 280px;
  padding: 0.5rem 0.75rem;
  background: var(--tooltip-bg);
  color: var(--tooltip-text);
  box-shadow: var(--tooltip-shadow);
  border-radius: 6px;
  font-size: 0.85rem;
  z-index: 10;
  pointer-events: none;
}

.description-tooltip p {
  margin: 0;
}

/* Hover mode: simple tier only while hovered */
.image-container[data-show-all="false"] .hover-line,
.image-container[data-show-all="false"] .hover-tooltip {
  visibility: hidden;
}

.image-container[data-show-all="false"] .hotspot.is-hovered .hover-line,
.image-container[data-show-all="false"] .hover-tooltip.is-hovered {
  visibility: visible;
}

.hotspot.is-hovered .highlight,
.image-container[data-show-all="true"] .highlight {
  opacity: 1;
}

.overlay-error {
  padding: 1rem;
  border: 1px solid #ef4444;
  border-radius: 6px;
  background: rgba(239, 68, 68, 0.1);
  color: var(--text-primary);
}

.overlay-error code {
  font-family: ui-monospace, monospace;
}
"#;
