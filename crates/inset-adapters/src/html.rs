//! HTML adapter: absolutely positioned elements over the base image.
//!
//! Both tiers of every hotspot are emitted up front. The tier that is not
//! active starts with `display: none` and the runtime flips it.

use std::collections::HashSet;
use std::fmt;

use inset_overlay::render::{LineGeometry, Side, Tier, TooltipPlacement};
use inset_overlay::{Diagnostic, DiagnosticKind, HotspotGeometry, Theme};

use crate::traits::{AdapterError, OverlayAdapter, RenderContext, RenderedOverlay};

/// Converts description markdown to an HTML fragment.
pub type ContentRenderer = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Adapter producing static HTML.
pub struct HtmlAdapter {
    content: ContentRenderer,
}

impl HtmlAdapter {
    pub fn new(content: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            content: Box::new(content),
        }
    }
}

impl Default for HtmlAdapter {
    fn default() -> Self {
        Self::new(inset_markdown::render_markdown)
    }
}

impl fmt::Debug for HtmlAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlAdapter").finish_non_exhaustive()
    }
}

impl OverlayAdapter for HtmlAdapter {
    fn name(&self) -> &'static str {
        "html"
    }

    fn render(
        &self,
        hotspots: &[HotspotGeometry],
        ctx: &RenderContext,
    ) -> Result<RenderedOverlay, AdapterError> {
        let mut seen = HashSet::new();
        for geo in hotspots {
            if !seen.insert(geo.id.as_str()) {
                return Err(AdapterError::DuplicateId(geo.id.clone()));
            }
            if !is_finite(geo) {
                return Err(AdapterError::NonFinite(geo.id.clone()));
            }
        }

        let theme = match ctx.theme {
            Theme::Light => "light",
            Theme::Dark => "dark",
        };

        let mut out = String::new();
        out.push_str(&format!(
            r#"<div class="image-container" data-overlay-root data-show-all="{}" data-resolved-theme="{}" style="width: {}px; height: {}px;">"#,
            ctx.show_all,
            theme,
            px(ctx.image.display.width),
            px(ctx.image.display.height),
        ));
        out.push('\n');
        out.push_str(&format!(
            r#"  <img class="base-image" src="{}" alt="{}" width="{}" height="{}">"#,
            escape(&ctx.image.src),
            escape(&ctx.image.alt),
            px(ctx.image.display.width),
            px(ctx.image.display.height),
        ));
        out.push('\n');

        for geo in hotspots {
            out.push_str(&self.hotspot(geo, ctx.show_all));
        }

        out.push_str("</div>\n");

        tracing::debug!("Rendered {} hotspots as HTML", hotspots.len());
        Ok(RenderedOverlay {
            markup: out,
            hotspot_count: hotspots.len(),
        })
    }

    fn render_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let label = match diagnostic.kind {
            DiagnosticKind::Config => "Config path",
            DiagnosticKind::Image => "Image",
        };
        format!(
            r#"<div class="overlay-error" role="alert">
  <p><strong>{}</strong></p>
  <p>{}: <code>{}</code></p>
  <p>Error: {}</p>
</div>
"#,
            escape(&diagnostic.title),
            label,
            escape(&diagnostic.path),
            escape(&diagnostic.cause),
        )
    }
}

impl HtmlAdapter {
    fn hotspot(&self, geo: &HotspotGeometry, show_all: bool) -> String {
        let id = escape(&geo.id);
        let color = escape(geo.accent.as_ref().unwrap_or(&geo.line_color).as_str());
        let b = geo.bounds;

        let mut out = format!(
            r#"  <div class="hotspot" id="hotspot-{id}" data-hotspot-id="{id}" data-color="{color}" style="left: {}px; top: {}px; width: {}px; height: {}px;">"#,
            px(b.x),
            px(b.y),
            px(b.width),
            px(b.height),
        );
        out.push('\n');

        let hl = &geo.highlight;
        let mut hl_style = format!(
            "width: {}px; height: {}px; border-radius: {}px;",
            px(hl.rect.width),
            px(hl.rect.height),
            px(hl.radius)
        );
        if let Some(border) = &hl.border_color {
            hl_style.push_str(&format!(" border-color: {};", escape(border)));
        }
        if let Some(fill) = &hl.fill {
            hl_style.push_str(&format!(" background: {};", fill));
        }
        out.push_str(&format!(
            "    <div class=\"highlight\" style=\"{}\"></div>\n",
            hl_style
        ));

        if let Some(line) = &geo.simple.line {
            out.push_str(&line_markup(line, geo, "hover-line", show_all));
        }
        if let Some(line) = &geo.complex.line {
            out.push_str(&line_markup(line, geo, "show-all-line", !show_all));
        }
        out.push_str("  </div>\n");

        if let Some(description) = &geo.description {
            let content = (self.content)(description);
            out.push_str(&tooltip_markup(&geo.simple, &id, "hover-tooltip", show_all, &content));
            out.push_str(&tooltip_markup(
                &geo.complex,
                &id,
                "show-all-tooltip",
                !show_all,
                &content,
            ));
        }

        out
    }
}

/// Line container positioned relative to its hotspot.
fn line_markup(line: &LineGeometry, geo: &HotspotGeometry, class: &str, hidden: bool) -> String {
    let mut out = format!(
        "    <div class=\"overlay-line-container {}\"{}>\n",
        class,
        display_none(hidden)
    );
    for (i, seg) in line.segments.iter().enumerate() {
        out.push_str(&format!(
            "      <div class=\"line-segment segment-{}\" style=\"left: {}px; top: {}px; width: {}px; height: {}px; background-color: {};\"></div>\n",
            i,
            px(seg.rect.x - geo.bounds.x),
            px(seg.rect.y - geo.bounds.y),
            px(seg.rect.width),
            px(seg.rect.height),
            escape(&line.color),
        ));
    }
    out.push_str("    </div>\n");
    out
}

fn tooltip_markup(tier: &Tier, id: &str, class: &str, hidden: bool, content: &str) -> String {
    let Some(placement) = &tier.tooltip else {
        return String::new();
    };
    let hidden_style = if hidden { " display: none;" } else { "" };
    format!(
        "  <div class=\"description-tooltip {}\" data-hotspot-id=\"{}\" style=\"{}{}\">{}</div>\n",
        class,
        id,
        tooltip_style(placement),
        hidden_style,
        content.trim_end(),
    )
}

/// Flush positioning against the anchor for each side.
fn tooltip_style(placement: &TooltipPlacement) -> String {
    let x = px(placement.anchor.x);
    let y = px(placement.anchor.y);
    match placement.side {
        Side::Right => format!("left: {}px; top: {}px; transform: translateY(-50%);", x, y),
        Side::Left => format!(
            "right: calc(100% - {}px); top: {}px; transform: translateY(-50%);",
            x, y
        ),
        Side::Below => format!("left: {}px; top: {}px; transform: translateX(-50%);", x, y),
        Side::Above => format!(
            "left: {}px; bottom: calc(100% - {}px); transform: translateX(-50%);",
            x, y
        ),
    }
}

fn display_none(hidden: bool) -> &'static str {
    if hidden {
        " style=\"display: none;\""
    } else {
        ""
    }
}

fn is_finite(geo: &HotspotGeometry) -> bool {
    let b = geo.bounds;
    let lines = [&geo.simple.line, &geo.complex.line];
    [b.x, b.y, b.width, b.height].iter().all(|v| v.is_finite())
        && lines.iter().all(|line| {
            line.iter()
                .flat_map(|l| l.segments.iter())
                .all(|s| s.rect.x.is_finite() && s.rect.y.is_finite())
        })
}

/// Pixel value rounded to two decimals, without trailing zeros.
fn px(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Escape text for HTML content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use inset_overlay::schema::{Description, Hotspot, Line};
    use inset_overlay::{render_hotspot, ColorSpec, LoadError, Rect, Scale, Segment, Size};

    fn geometry(id: &str) -> HotspotGeometry {
        let hotspot = Hotspot {
            id: id.to_string(),
            coordinates: Rect::new(100.0, 50.0, 40.0, 30.0),
            color: Some(ColorSpec::parse("green")),
            line: Some(Line::new(vec![
                Segment::horizontal(60.0),
                Segment::vertical(-50.0),
                Segment::horizontal(60.0),
            ])),
            description: Some(Description::new("**Name** field")),
        };
        render_hotspot(&hotspot, &Scale::IDENTITY, Theme::Light)
    }

    fn ctx(show_all: bool) -> RenderContext {
        RenderContext {
            image: crate::ImageInfo {
                src: "shot.png".to_string(),
                alt: "Rename dialog".to_string(),
                display: Size::new(328.0, 612.0),
            },
            theme: Theme::Light,
            show_all,
        }
    }

    #[test]
    fn renders_hotspot_markup() {
        let adapter = HtmlAdapter::default();
        let out = adapter.render(&[geometry("name")], &ctx(false)).unwrap();

        assert_eq!(out.hotspot_count, 1);
        let html = out.markup;
        assert!(html.contains(r#"data-hotspot-id="name" data-color="green""#));
        assert!(html.contains("left: 100px; top: 50px; width: 40px; height: 30px;"));
        assert!(html.contains("border-color: #22c55e;"));
        assert!(html.contains("background: rgba(34, 197, 94, 0.1);"));
        assert!(html.contains("<strong>Name</strong> field"));
        // Simple tier: one 120px run from the right edge.
        assert!(html.contains("left: 40px; top: 14px; width: 120px; height: 2px;"));
    }

    #[test]
    fn hover_mode_hides_complex_tier() {
        let html = HtmlAdapter::default()
            .render(&[geometry("a")], &ctx(false))
            .unwrap()
            .markup;
        assert!(html.contains(r#"<div class="overlay-line-container hover-line">"#));
        assert!(html.contains(
            r#"<div class="overlay-line-container show-all-line" style="display: none;">"#
        ));
    }

    #[test]
    fn show_all_mode_hides_simple_tier() {
        let html = HtmlAdapter::default()
            .render(&[geometry("a")], &ctx(true))
            .unwrap()
            .markup;
        assert!(html.contains(
            r#"<div class="overlay-line-container hover-line" style="display: none;">"#
        ));
        assert!(html.contains(r#"data-show-all="true""#));
    }

    #[test]
    fn positions_tooltips_by_side() {
        let right = TooltipPlacement {
            anchor: inset_overlay::Point::new(220.0, 15.0),
            side: Side::Right,
        };
        assert_eq!(
            tooltip_style(&right),
            "left: 220px; top: 15px; transform: translateY(-50%);"
        );

        let above = TooltipPlacement {
            anchor: inset_overlay::Point::new(10.5, 20.0),
            side: Side::Above,
        };
        assert_eq!(
            tooltip_style(&above),
            "left: 10.5px; bottom: calc(100% - 20px); transform: translateX(-50%);"
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = HtmlAdapter::default()
            .render(&[geometry("a"), geometry("a")], &ctx(false))
            .unwrap_err();
        assert!(matches!(err, AdapterError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn uses_injected_content_renderer() {
        let adapter = HtmlAdapter::new(|md| format!("<pre>{}</pre>", escape(md)));
        let html = adapter.render(&[geometry("a")], &ctx(false)).unwrap().markup;
        assert!(html.contains("<pre>**Name** field</pre>"));
    }

    #[test]
    fn renders_diagnostic() {
        let err = LoadError::Parse {
            path: "scripts/x/config.json".to_string(),
            message: "expected `,` at <line 3>".to_string(),
        };
        let html = HtmlAdapter::default().render_diagnostic(&Diagnostic::from(&err));
        assert!(html.contains("Failed to load overlay configuration."));
        assert!(html.contains("Config path: <code>scripts/x/config.json</code>"));
        assert!(html.contains("&lt;line 3&gt;"));
    }

    #[test]
    fn formats_pixels() {
        assert_eq!(px(200.0), "200");
        assert_eq!(px(0.30000000000000004), "0.3");
        assert_eq!(px(-0.0), "0");
        assert_eq!(px(12.346), "12.35");
    }
}
