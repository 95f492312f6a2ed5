//! Configuration document schema and hotspot validation.
//!
//! [`ConfigDocument`] mirrors the JSON on disk and is deliberately lenient:
//! every hotspot field is optional and unknown document fields are kept in
//! `extras`. [`OverlayConfig::from_document`] turns it into validated
//! [`Hotspot`]s, substituting defaults and collecting a warning for each
//! field it had to fix.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::color::ColorSpec;
use crate::defaults;
use crate::error::{LoadError, ValidationError};
use crate::geometry::{whole, whole_opt, Rect, Size};
use crate::path::{self, Distances, Resolution, Segment, SegmentKind};

/// The screenshot a document was authored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseImage {
    pub src: String,
    #[serde(serialize_with = "whole")]
    pub width: f64,
    #[serde(serialize_with = "whole")]
    pub height: f64,
}

impl BaseImage {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Markdown shown in a hotspot's tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub content: String,
}

impl Description {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum LegacyDirection {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLine {
    Segments {
        segments: Vec<Segment>,
        thickness: Option<f64>,
        color: Option<ColorSpec>,
    },
    Legacy {
        direction: LegacyDirection,
        length: f64,
        thickness: Option<f64>,
        color: Option<ColorSpec>,
    },
}

impl From<RawLine> for Line {
    fn from(raw: RawLine) -> Self {
        match raw {
            RawLine::Segments {
                segments,
                thickness,
                color,
            } => Line {
                segments,
                thickness,
                color,
            },
            RawLine::Legacy {
                direction,
                length,
                thickness,
                color,
            } => {
                let (kind, signed) = match direction {
                    LegacyDirection::Left => (SegmentKind::Horizontal, -length),
                    LegacyDirection::Right => (SegmentKind::Horizontal, length),
                    LegacyDirection::Top => (SegmentKind::Vertical, -length),
                    LegacyDirection::Bottom => (SegmentKind::Vertical, length),
                };
                let other = match kind {
                    SegmentKind::Horizontal => SegmentKind::Vertical,
                    SegmentKind::Vertical => SegmentKind::Horizontal,
                };
                Line {
                    segments: vec![
                        Segment { kind, length: signed },
                        Segment {
                            kind: other,
                            length: 0.0,
                        },
                        Segment { kind, length: 0.0 },
                    ],
                    thickness: thickness.or(Some(defaults::LINE_THICKNESS)),
                    color,
                }
            }
        }
    }
}

/// A connector as stored in a document.
///
/// Also accepts the legacy `{direction, length}` form, which is converted
/// to three segments on load and written back in segment form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLine")]
pub struct Line {
    pub segments: Vec<Segment>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "whole_opt"
    )]
    pub thickness: Option<f64>,
    /// Per-line color, only consulted when the hotspot has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,
}

impl Line {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            thickness: Some(defaults::LINE_THICKNESS),
            color: None,
        }
    }

    pub fn from_distances(distances: &Distances) -> Self {
        Self::new(distances.to_segments())
    }

    /// Stroke thickness in reference pixels.
    pub fn thickness(&self) -> f64 {
        self.thickness.unwrap_or(defaults::LINE_THICKNESS)
    }

    pub fn distances(&self) -> Distances {
        path::segments_to_distances(&self.segments)
    }
}

/// A hotspot as stored in a document, before validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HotspotRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
}

/// A validated hotspot.
///
/// `id` is non-empty and unique within its document and `coordinates` has
/// a positive size. Serializes to the same shape as [`HotspotRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub coordinates: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
}

impl Hotspot {
    /// Color of the highlight: the hotspot's own, else its line's.
    pub fn accent(&self) -> Option<&ColorSpec> {
        self.color
            .as_ref()
            .or_else(|| self.line.as_ref().and_then(|l| l.color.as_ref()))
    }

    /// Color of the connector, falling back to the default line color.
    pub fn line_color(&self) -> ColorSpec {
        self.accent()
            .cloned()
            .unwrap_or_else(|| ColorSpec::parse(defaults::LINE_COLOR))
    }

    fn to_record(&self) -> HotspotRecord {
        HotspotRecord {
            id: Some(self.id.clone()),
            coordinates: Some(self.coordinates),
            color: self.color.clone(),
            line: self.line.clone(),
            description: self.description.clone(),
        }
    }
}

/// The JSON document stored next to each script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default)]
    pub script_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub base_image: BaseImage,
    #[serde(default)]
    pub overlays: Vec<HotspotRecord>,
    /// Fields this crate does not interpret, kept for write-back
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl ConfigDocument {
    /// Parse a document, attributing failures to `path`.
    pub fn from_json(path: &str, text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|e| LoadError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A document whose hotspots passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub script_name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub base_image: BaseImage,
    pub hotspots: Vec<Hotspot>,
    pub extras: Map<String, Value>,
}

/// Result of [`OverlayConfig::from_document`].
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub config: OverlayConfig,
    pub warnings: Vec<ValidationError>,
}

impl OverlayConfig {
    /// Validate every hotspot, substituting defaults for malformed fields.
    ///
    /// Never fails. Each substitution is logged and returned as a warning.
    pub fn from_document(doc: ConfigDocument) -> Validated {
        let mut warnings = Vec::new();
        let mut used = HashSet::new();
        let mut hotspots = Vec::with_capacity(doc.overlays.len());

        // Replacement ids must not take an id a later hotspot authored.
        let reserved: HashSet<String> = doc
            .overlays
            .iter()
            .filter_map(|r| r.id.as_ref())
            .filter(|id| !id.trim().is_empty())
            .cloned()
            .collect();

        for (index, record) in doc.overlays.into_iter().enumerate() {
            hotspots.push(validate_hotspot(
                index,
                record,
                &reserved,
                &mut used,
                &mut warnings,
            ));
        }

        for warning in &warnings {
            tracing::warn!("{}: {}", doc.script_name, warning);
        }

        Validated {
            config: OverlayConfig {
                script_name: doc.script_name,
                version: doc.version,
                description: doc.description,
                base_image: doc.base_image,
                hotspots,
                extras: doc.extras,
            },
            warnings,
        }
    }

    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    /// Rebuild the whole document for write-back.
    pub fn to_document(&self) -> ConfigDocument {
        ConfigDocument {
            script_name: self.script_name.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            base_image: self.base_image.clone(),
            overlays: self.hotspots.iter().map(Hotspot::to_record).collect(),
            extras: self.extras.clone(),
        }
    }
}

/// Pick an id in neither `used` nor `reserved`, starting from
/// `hotspot-{index + 1}`.
fn fallback_id(index: usize, used: &HashSet<String>, reserved: &HashSet<String>) -> String {
    let mut n = index + 1;
    loop {
        let candidate = format!("hotspot-{}", n);
        if !used.contains(&candidate) && !reserved.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn validate_hotspot(
    index: usize,
    record: HotspotRecord,
    reserved: &HashSet<String>,
    used: &mut HashSet<String>,
    warnings: &mut Vec<ValidationError>,
) -> Hotspot {
    let id = match record.id {
        Some(id) if id.trim().is_empty() => {
            warnings.push(ValidationError::EmptyId { index });
            fallback_id(index, used, reserved)
        }
        Some(id) if used.contains(&id) => {
            warnings.push(ValidationError::DuplicateId { id });
            fallback_id(index, used, reserved)
        }
        Some(id) => id,
        None => {
            let id = fallback_id(index, used, reserved);
            warnings.push(ValidationError::MissingField {
                id: id.clone(),
                field: "id",
            });
            id
        }
    };
    used.insert(id.clone());

    let mut coordinates = match record.coordinates {
        Some(rect) => rect,
        None => {
            warnings.push(ValidationError::MissingField {
                id: id.clone(),
                field: "coordinates",
            });
            Rect::new(0.0, 0.0, 1.0, 1.0)
        }
    };
    if coordinates.width <= 0.0 || coordinates.height <= 0.0 {
        warnings.push(ValidationError::NonPositiveSize {
            id: id.clone(),
            width: coordinates.width,
            height: coordinates.height,
        });
        coordinates.width = coordinates.width.max(1.0);
        coordinates.height = coordinates.height.max(1.0);
    }

    if let Some(line) = &record.line {
        let resolved = path::simplify(&line.segments);
        if resolved.resolution == Resolution::Fallback {
            warnings.push(ValidationError::InvalidPattern {
                id: id.clone(),
                found: path::describe(&line.segments),
            });
        }
    }

    Hotspot {
        id,
        coordinates,
        color: record.color,
        line: record.line,
        description: record.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r##"{
        "scriptName": "Batch Rename",
        "version": "1.2",
        "baseImage": { "src": "../../images/rename.png", "width": 328, "height": 612 },
        "category": "utility",
        "overlays": [
            {
                "id": "name-field",
                "coordinates": { "x": 100, "y": 50, "width": 40, "height": 30 },
                "color": "green",
                "line": {
                    "segments": [
                        { "type": "horizontal", "length": 60 },
                        { "type": "vertical", "length": -50 },
                        { "type": "horizontal", "length": 60 }
                    ],
                    "thickness": 2
                },
                "description": { "content": "Type the **new** name" }
            },
            {
                "id": "apply",
                "coordinates": { "x": 10, "y": 500, "width": 80, "height": 20 }
            }
        ]
    }"##;

    fn parse(text: &str) -> ConfigDocument {
        ConfigDocument::from_json("config.json", text).unwrap()
    }

    #[test]
    fn parses_document() {
        let validated = OverlayConfig::from_document(parse(DOCUMENT));
        assert!(validated.warnings.is_empty());

        let config = validated.config;
        assert_eq!(config.script_name, "Batch Rename");
        assert_eq!(config.base_image.size(), Size::new(328.0, 612.0));
        assert_eq!(config.hotspots.len(), 2);

        let first = config.hotspot("name-field").unwrap();
        assert_eq!(first.coordinates, Rect::new(100.0, 50.0, 40.0, 30.0));
        assert_eq!(first.color, Some(ColorSpec::parse("green")));
        assert_eq!(
            first.line.as_ref().map(Line::distances),
            Some(Distances::new(120.0, -50.0, 60.0))
        );

        let second = config.hotspot("apply").unwrap();
        assert!(second.line.is_none());
        assert!(second.description.is_none());
    }

    #[test]
    fn preserves_extras_on_write_back() {
        let config = OverlayConfig::from_document(parse(DOCUMENT)).config;
        let json = config.to_document().to_json_pretty().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["category"], "utility");
        assert_eq!(value["baseImage"]["width"], 328);
        assert_eq!(value["overlays"][0]["coordinates"]["x"], 100);
        assert!(value["overlays"][1].get("line").is_none());
    }

    #[test]
    fn converts_legacy_line() {
        let line: Line = serde_json::from_str(r#"{"direction": "left", "length": 80}"#).unwrap();
        assert_eq!(
            line.segments,
            vec![
                Segment::horizontal(-80.0),
                Segment::vertical(0.0),
                Segment::horizontal(0.0),
            ]
        );
        assert_eq!(line.thickness(), 2.0);
        assert_eq!(
            path::simplify(&line.segments).segments,
            vec![Segment::horizontal(-80.0)]
        );
    }

    #[test]
    fn fills_missing_ids() {
        let doc = parse(
            r#"{
                "baseImage": { "src": "a.png", "width": 10, "height": 10 },
                "overlays": [
                    { "coordinates": { "x": 0, "y": 0, "width": 2, "height": 2 } },
                    { "id": "", "coordinates": { "x": 0, "y": 0, "width": 2, "height": 2 } }
                ]
            }"#,
        );
        let validated = OverlayConfig::from_document(doc);
        let ids: Vec<&str> = validated
            .config
            .hotspots
            .iter()
            .map(|h| h.id.as_str())
            .collect();
        assert_eq!(ids, vec!["hotspot-1", "hotspot-2"]);
        assert_eq!(validated.warnings.len(), 2);
    }

    #[test]
    fn renames_duplicate_ids() {
        let doc = parse(
            r#"{
                "baseImage": { "src": "a.png", "width": 10, "height": 10 },
                "overlays": [
                    { "id": "hotspot-2", "coordinates": { "x": 0, "y": 0, "width": 2, "height": 2 } },
                    { "id": "hotspot-2", "coordinates": { "x": 1, "y": 1, "width": 2, "height": 2 } }
                ]
            }"#,
        );
        let validated = OverlayConfig::from_document(doc);
        assert_eq!(validated.config.hotspots[1].id, "hotspot-3");
        assert_eq!(
            validated.warnings,
            vec![ValidationError::DuplicateId {
                id: "hotspot-2".to_string()
            }]
        );
    }

    #[test]
    fn replacement_ids_skip_ids_authored_later() {
        let doc = parse(
            r#"{
                "baseImage": { "src": "a.png", "width": 10, "height": 10 },
                "overlays": [
                    { "id": "a", "coordinates": { "x": 0, "y": 0, "width": 2, "height": 2 } },
                    { "id": "a", "coordinates": { "x": 1, "y": 1, "width": 2, "height": 2 } },
                    { "id": "hotspot-2", "coordinates": { "x": 2, "y": 2, "width": 2, "height": 2 } }
                ]
            }"#,
        );
        let validated = OverlayConfig::from_document(doc);
        let ids: Vec<&str> = validated
            .config
            .hotspots
            .iter()
            .map(|h| h.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "hotspot-3", "hotspot-2"]);
        assert_eq!(
            validated.warnings,
            vec![ValidationError::DuplicateId {
                id: "a".to_string()
            }]
        );
    }

    #[test]
    fn clamps_non_positive_size() {
        let doc = parse(
            r#"{
                "baseImage": { "src": "a.png", "width": 10, "height": 10 },
                "overlays": [
                    { "id": "flat", "coordinates": { "x": 4, "y": 4, "width": 0, "height": -3 } }
                ]
            }"#,
        );
        let validated = OverlayConfig::from_document(doc);
        assert_eq!(
            validated.config.hotspots[0].coordinates,
            Rect::new(4.0, 4.0, 1.0, 1.0)
        );
        assert!(matches!(
            validated.warnings[0],
            ValidationError::NonPositiveSize { .. }
        ));
    }

    #[test]
    fn flags_invalid_pattern_but_keeps_segments() {
        let doc = parse(
            r#"{
                "baseImage": { "src": "a.png", "width": 10, "height": 10 },
                "overlays": [
                    {
                        "id": "bad",
                        "coordinates": { "x": 0, "y": 0, "width": 2, "height": 2 },
                        "line": { "segments": [{ "type": "vertical", "length": 10 }] }
                    }
                ]
            }"#,
        );
        let validated = OverlayConfig::from_document(doc);
        assert_eq!(
            validated.warnings,
            vec![ValidationError::InvalidPattern {
                id: "bad".to_string(),
                found: "[V(10)]".to_string()
            }]
        );
        let line = validated.config.hotspots[0].line.as_ref().unwrap();
        assert_eq!(line.segments, vec![Segment::vertical(10.0)]);
    }

    #[test]
    fn line_color_falls_back_to_cyan() {
        let hotspot = Hotspot {
            id: "a".to_string(),
            coordinates: Rect::new(0.0, 0.0, 1.0, 1.0),
            color: None,
            line: Some(Line::new(vec![Segment::horizontal(10.0)])),
            description: None,
        };
        assert_eq!(hotspot.accent(), None);
        assert_eq!(hotspot.line_color(), ColorSpec::parse("cyan"));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let err = ConfigDocument::from_json("scripts/a/config.json", "{").unwrap_err();
        assert_eq!(err.path(), "scripts/a/config.json");
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
