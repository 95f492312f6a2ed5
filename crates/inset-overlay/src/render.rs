//! Display-space geometry for hotspots.
//!
//! Rendering is split into a pure descriptor layer (this module) and thin
//! adapters that translate descriptors into markup. Every hotspot gets two
//! prebuilt tiers:
//!
//! - **simple**: one horizontal run of the summed horizontal distance,
//!   shown while the hotspot is hovered
//! - **complex**: the full resolved path, shown in show-all mode
//!
//! Switching between them is a visibility flip, nothing is recomputed.

use serde::Serialize;

use crate::color::{ColorSpec, Rgb, Theme};
use crate::defaults;
use crate::error::ScaleError;
use crate::geometry::{Point, Rect, Size};
use crate::path::{self, Resolution, Segment, SegmentKind};
use crate::scale::Scale;
use crate::schema::{Hotspot, OverlayConfig};

/// Hotspot edge a connector leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Which side of its anchor a tooltip sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Right,
    Left,
    Below,
    Above,
}

/// One drawn connector segment, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentRect {
    pub kind: SegmentKind,
    pub rect: Rect,
}

/// A connector laid out in display space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGeometry {
    pub edge: Edge,
    pub start: Point,
    pub end: Point,
    pub segments: Vec<SegmentRect>,
    /// Resolved CSS color
    pub color: String,
    pub thickness: f64,
}

/// Where a tooltip is attached. The tooltip sits flush against `anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipPlacement {
    pub anchor: Point,
    pub side: Side,
}

/// Border and translucent fill drawn over the hotspot area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub rect: Rect,
    pub border_color: Option<String>,
    pub fill: Option<String>,
    pub radius: f64,
}

/// One line plus tooltip combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tier {
    pub line: Option<LineGeometry>,
    pub tooltip: Option<TooltipPlacement>,
}

/// Everything an adapter needs to draw one hotspot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotGeometry {
    pub id: String,
    pub bounds: Rect,
    pub highlight: Highlight,
    pub simple: Tier,
    pub complex: Tier,
    /// Raw markdown, converted by the adapter
    pub description: Option<String>,
    /// Authored color, kept so colors can be re-resolved on theme change
    pub accent: Option<ColorSpec>,
    pub line_color: ColorSpec,
    #[serde(skip)]
    pub resolution: Option<Resolution>,
}

impl HotspotGeometry {
    /// Re-resolve every color against `theme`. Positions are untouched.
    pub fn apply_theme(&mut self, theme: Theme) {
        let (border, fill) = highlight_colors(self.accent.as_ref(), theme);
        self.highlight.border_color = border;
        self.highlight.fill = fill;

        let line_color = self.line_color.resolve(theme);
        for tier in [&mut self.simple, &mut self.complex] {
            if let Some(line) = &mut tier.line {
                line.color.clone_from(&line_color);
            }
        }
    }
}

fn highlight_colors(accent: Option<&ColorSpec>, theme: Theme) -> (Option<String>, Option<String>) {
    match accent {
        Some(spec) => {
            let resolved = spec.resolve(theme);
            let fill = Rgb::from_hex(&resolved).map(|rgb| rgb.rgba(defaults::HIGHLIGHT_ALPHA));
            (Some(resolved), fill)
        }
        None => (None, None),
    }
}

/// Point on the hotspot edge the first segment leaves from.
fn start_anchor(bounds: &Rect, first: &Segment) -> (Edge, Point) {
    let mid = bounds.center();
    match (first.kind, first.is_positive()) {
        (SegmentKind::Horizontal, true) => (Edge::Right, Point::new(bounds.right(), mid.y)),
        (SegmentKind::Horizontal, false) => (Edge::Left, Point::new(bounds.x, mid.y)),
        (SegmentKind::Vertical, true) => (Edge::Bottom, Point::new(mid.x, bounds.bottom())),
        (SegmentKind::Vertical, false) => (Edge::Top, Point::new(mid.x, bounds.y)),
    }
}

fn tooltip_side(last: &Segment) -> Side {
    match (last.kind, last.is_positive()) {
        (SegmentKind::Horizontal, true) => Side::Right,
        (SegmentKind::Horizontal, false) => Side::Left,
        (SegmentKind::Vertical, true) => Side::Below,
        (SegmentKind::Vertical, false) => Side::Above,
    }
}

/// Walk `segments` from the hotspot edge, producing one rectangle per
/// segment. Lengths and thickness are in reference pixels.
pub fn layout_line(
    bounds: &Rect,
    segments: &[Segment],
    scale: &Scale,
    thickness: f64,
    color: String,
) -> Option<LineGeometry> {
    let first = segments.first()?;
    let (edge, start) = start_anchor(bounds, first);
    let stroke = thickness * scale.line();
    let half = stroke / 2.0;

    let mut cur = start;
    let mut rects = Vec::with_capacity(segments.len());
    for segment in segments {
        let len = scale.length(segment.length);
        let extent = len.abs();
        let rect = match segment.kind {
            SegmentKind::Horizontal => {
                let x = if len >= 0.0 { cur.x } else { cur.x - extent };
                let r = Rect::new(x, cur.y - half, extent, stroke);
                cur.x += len;
                r
            }
            SegmentKind::Vertical => {
                let y = if len >= 0.0 { cur.y } else { cur.y - extent };
                let r = Rect::new(cur.x - half, y, stroke, extent);
                cur.y += len;
                r
            }
        };
        rects.push(SegmentRect {
            kind: segment.kind,
            rect,
        });
    }

    Some(LineGeometry {
        edge,
        start,
        end: cur,
        segments: rects,
        color,
        thickness: stroke,
    })
}

/// Lay out both tiers, the highlight and the tooltip anchors of a hotspot.
pub fn render_hotspot(hotspot: &Hotspot, scale: &Scale, theme: Theme) -> HotspotGeometry {
    let bounds = scale.rect(&hotspot.coordinates);
    let accent = hotspot.accent().cloned();
    let line_color = hotspot.line_color();
    let (border_color, fill) = highlight_colors(accent.as_ref(), theme);
    let has_tooltip = hotspot.description.is_some();

    let (simple, complex, resolution) = match &hotspot.line {
        Some(line) => {
            let resolved = path::simplify(&line.segments);
            if resolved.resolution == Resolution::Fallback {
                tracing::warn!(
                    "Hotspot {}: invalid segment pattern {}, drawing {}",
                    hotspot.id,
                    path::describe(&line.segments),
                    path::describe(&resolved.segments)
                );
            } else if resolved.resolution == Resolution::Collapsed {
                tracing::debug!(
                    "Hotspot {}: drawing {} as {}",
                    hotspot.id,
                    path::describe(&line.segments),
                    path::describe(&resolved.segments)
                );
            }

            let color = line_color.resolve(theme);
            let simple_segments = [Segment::horizontal(path::horizontal_total(&resolved.segments))];
            let simple_line = layout_line(
                &bounds,
                &simple_segments,
                scale,
                line.thickness(),
                color.clone(),
            );
            let complex_line = layout_line(
                &bounds,
                &resolved.segments,
                scale,
                line.thickness(),
                color,
            );

            let simple = tier(simple_line, &simple_segments, has_tooltip);
            let complex = tier(complex_line, &resolved.segments, has_tooltip);
            (simple, complex, Some(resolved.resolution))
        }
        None => {
            // No connector: the tooltip sits against the right edge.
            let tooltip = has_tooltip.then(|| TooltipPlacement {
                anchor: Point::new(bounds.right(), bounds.center().y),
                side: Side::Right,
            });
            let bare = Tier {
                line: None,
                tooltip,
            };
            (bare.clone(), bare, None)
        }
    };

    HotspotGeometry {
        id: hotspot.id.clone(),
        bounds,
        highlight: Highlight {
            rect: bounds,
            border_color,
            fill,
            radius: defaults::BORDER_RADIUS,
        },
        simple,
        complex,
        description: hotspot.description.as_ref().map(|d| d.content.clone()),
        accent,
        line_color,
        resolution,
    }
}

fn tier(line: Option<LineGeometry>, segments: &[Segment], has_tooltip: bool) -> Tier {
    let tooltip = match (&line, segments.last()) {
        (Some(line), Some(last)) if has_tooltip => Some(TooltipPlacement {
            anchor: line.end,
            side: tooltip_side(last),
        }),
        _ => None,
    };
    Tier { line, tooltip }
}

/// Render every hotspot of a document at the given display size.
pub fn render_overlay(
    config: &OverlayConfig,
    display: Size,
    theme: Theme,
) -> Result<Vec<HotspotGeometry>, ScaleError> {
    let scale = Scale::new(display, config.base_image.size())?;
    let (width, height) = (display.width, display.height);
    tracing::debug!(
        "Rendering {} hotspots at {}x{} (scale {:.3}, {:.3})",
        config.hotspots.len(),
        width,
        height,
        scale.x,
        scale.y
    );
    Ok(config
        .hotspots
        .iter()
        .map(|h| render_hotspot(h, &scale, theme))
        .collect())
}
