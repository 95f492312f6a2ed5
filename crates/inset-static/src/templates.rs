//! Template engine for rendering script pages and the index.

use minijinja::{context, Environment};
use serde::Serialize;

/// One script on the index page.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptCard {
    pub id: String,
    pub name: String,
    pub version: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Thumbnail URL, absent when the image could not be copied
    pub thumbnail: Option<String>,
    pub url: String,
    pub pinned: bool,
    pub tags: Vec<String>,
}

/// Context for rendering a script page.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub title: String,
    pub site_title: String,
    pub base_url: String,
    pub version: Option<String>,
    pub category: Option<String>,
    pub summary: Option<String>,
    /// Overlay markup, or the inline diagnostic that replaced it
    pub overlay: String,
    /// Rendered `description.md`
    pub body: Option<String>,
    pub show_all: bool,
    pub hotspot_count: usize,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");
        env.add_template_owned("script.html".to_string(), SCRIPT_TEMPLATE.to_string())
            .expect("Failed to add script template");
        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");

        Self { env }
    }

    pub fn render_page(&self, page: &PageContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("script.html")?;
        tmpl.render(context! {
            title => &page.title,
            site_title => &page.site_title,
            base_url => &page.base_url,
            version => &page.version,
            category => &page.category,
            summary => &page.summary,
            overlay => &page.overlay,
            body => &page.body,
            show_all => page.show_all,
            hotspot_count => page.hotspot_count,
        })
    }

    pub fn render_index(
        &self,
        site_title: &str,
        base_url: &str,
        scripts: &[ScriptCard],
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("index.html")?;
        tmpl.render(context! {
            title => site_title,
            site_title => site_title,
            base_url => base_url,
            scripts => scripts,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if title != site_title %}{{ title }} - {% endif %}{{ site_title }}</title>
  <link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body>
  <header class="header">
    <div class="container">
      <button type="button" id="theme-toggle" class="theme-toggle" title="Toggle theme">Theme</button>
      {% block header %}{% endblock %}
    </div>
  </header>
  <main class="container">
    {% block content %}{% endblock %}
  </main>
  <script src="{{ base_url }}assets/overlay.js"></script>
</body>
</html>"##;

const SCRIPT_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block header %}
<nav class="breadcrumb"><a href="{{ base_url }}">&larr; Back to Scripts</a></nav>
<h1 class="site-title">{{ title }}</h1>
{% if summary %}<p class="site-subtitle">{{ summary }}</p>{% endif %}
<div class="badges">
  {% if version %}<span class="badge">v{{ version }}</span>{% endif %}
  {% if category %}<span class="badge">{{ category }}</span>{% endif %}
</div>
{% endblock %}

{% block content %}
<section class="screenshot">
  {% if hotspot_count > 0 %}
  <button type="button" id="overlay-toggle" class="overlay-toggle" aria-pressed="{{ show_all }}">{% if show_all %}Hide all{% else %}Show all{% endif %}</button>
  {% endif %}
  {{ overlay | safe }}
</section>
{% if body %}
<article class="description">
  {{ body | safe }}
</article>
{% endif %}
{% endblock %}"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block header %}
<h1 class="site-title">{{ site_title }}</h1>
{% endblock %}

{% block content %}
<ul class="script-grid">
{% for script in scripts %}
  <li class="script-card{% if script.pinned %} pinned{% endif %}">
    <a href="{{ script.url }}">
      {% if script.thumbnail %}<img class="thumbnail" src="{{ script.thumbnail }}" alt="{{ script.name }}" loading="lazy">{% endif %}
      <h2>{{ script.name }}</h2>
    </a>
    <div class="badges">
      {% if script.version %}<span class="badge">v{{ script.version }}</span>{% endif %}
      {% if script.category %}<span class="badge">{{ script.category }}</span>{% endif %}
    </div>
    {% if script.description %}<p>{{ script.description }}</p>{% endif %}
    {% if script.tags %}
    <ul class="tags">{% for tag in script.tags %}<li>{{ tag }}</li>{% endfor %}</ul>
    {% endif %}
  </li>
{% endfor %}
</ul>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageContext {
        PageContext {
            title: "Batch Rename".to_string(),
            site_title: "Scripts Portfolio".to_string(),
            base_url: "/".to_string(),
            version: Some("1.2".to_string()),
            category: Some("Utility".to_string()),
            summary: Some("Rename <layers>".to_string()),
            overlay: "<div class=\"image-container\"></div>".to_string(),
            body: Some("<h1>About</h1>".to_string()),
            show_all: false,
            hotspot_count: 1,
        }
    }

    #[test]
    fn renders_script_page() {
        let html = TemplateEngine::new().render_page(&page()).unwrap();

        assert!(html.contains("<title>Batch Rename - Scripts Portfolio</title>"));
        assert!(html.contains("<div class=\"image-container\"></div>"));
        assert!(html.contains("<h1>About</h1>"));
        assert!(html.contains("Rename &lt;layers&gt;"));
        assert!(html.contains("id=\"overlay-toggle\""));
        assert!(html.contains(">Show all<"));
        assert!(html.contains("v1.2"));
    }

    #[test]
    fn hides_toggle_without_hotspots() {
        let mut context = page();
        context.hotspot_count = 0;
        context.body = None;
        let html = TemplateEngine::new().render_page(&context).unwrap();

        assert!(!html.contains("overlay-toggle"));
        assert!(!html.contains("class=\"description\""));
    }

    #[test]
    fn renders_index() {
        let scripts = vec![ScriptCard {
            id: "rename".to_string(),
            name: "Batch Rename".to_string(),
            version: None,
            category: Some("Utility".to_string()),
            description: Some("Renames layers".to_string()),
            thumbnail: Some("/images/rename.png".to_string()),
            url: "/scripts/rename/".to_string(),
            pinned: true,
            tags: vec!["layers".to_string()],
        }];

        let html = TemplateEngine::new()
            .render_index("Scripts Portfolio", "/", &scripts)
            .unwrap();

        assert!(html.contains("<title>Scripts Portfolio</title>"));
        assert!(html.contains("script-card pinned"));
        // Auto-escaping encodes `/` in template values.
        assert!(html.contains("href=\"&#x2f;scripts&#x2f;rename&#x2f;\""));
        assert!(html.contains("src=\"&#x2f;images&#x2f;rename.png\""));
        assert!(html.contains("<li>layers</li>"));
    }
}
