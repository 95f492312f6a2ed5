//! Property form for the selected hotspot.
//!
//! The form holds raw text exactly as typed. [`FormInput::parse`] applies
//! the lenient parsing rules: integers only, trailing garbage ignored,
//! empty or unparsable fields replaced with per-field defaults.

use inset_overlay::path::TURN_STUB;
use inset_overlay::schema::Hotspot;
use inset_overlay::{Distances, Rect, ValidationError};

/// Form fields in editing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    X,
    Y,
    Width,
    Height,
    Horizontal,
    Vertical,
    Turning,
    Description,
}

impl Field {
    /// Fields whose edits go through the geometry debounce slot.
    pub fn is_geometry(self) -> bool {
        !matches!(self, Self::Description)
    }

    /// Fields that describe the connector path.
    pub fn is_distance(self) -> bool {
        matches!(self, Self::Horizontal | Self::Vertical | Self::Turning)
    }
}

/// Raw form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub id: String,
    pub x: String,
    pub y: String,
    pub width: String,
    pub height: String,
    pub horizontal: String,
    pub vertical: String,
    pub turning: String,
    pub description: String,
}

/// Parsed form values, ready to apply to a hotspot.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub id: String,
    pub coordinates: Rect,
    pub distances: Distances,
    pub description: String,
}

/// Horizontal distance used when the field is empty.
pub const DEFAULT_HORIZONTAL: f64 = 120.0;

impl FormInput {
    /// Populate the form from a hotspot.
    pub fn from_hotspot(hotspot: &Hotspot) -> Self {
        let c = hotspot.coordinates;
        let d = hotspot
            .line
            .as_ref()
            .map(|line| line.distances())
            .unwrap_or_default();

        // A far-end turn is stored as a stub; show it as the distance the
        // author typed so re-applying the form reproduces the same path.
        let turning = if d.vertical_distance != 0.0 && d.turning_point == TURN_STUB {
            d.horizontal_distance.abs()
        } else {
            d.turning_point
        };

        Self {
            id: hotspot.id.clone(),
            x: number(c.x),
            y: number(c.y),
            width: number(c.width),
            height: number(c.height),
            horizontal: number(d.horizontal_distance),
            vertical: number(d.vertical_distance),
            turning: number(turning),
            description: hotspot
                .description
                .as_ref()
                .map(|desc| desc.content.clone())
                .unwrap_or_default(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::X => &self.x,
            Field::Y => &self.y,
            Field::Width => &self.width,
            Field::Height => &self.height,
            Field::Horizontal => &self.horizontal,
            Field::Vertical => &self.vertical,
            Field::Turning => &self.turning,
            Field::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Id => self.id = value,
            Field::X => self.x = value,
            Field::Y => self.y = value,
            Field::Width => self.width = value,
            Field::Height => self.height = value,
            Field::Horizontal => self.horizontal = value,
            Field::Vertical => self.vertical = value,
            Field::Turning => self.turning = value,
            Field::Description => self.description = value,
        }
    }

    /// Parse every field, applying defaults and the turning-point rule.
    ///
    /// Non-positive sizes are replaced with 1 and reported as warnings.
    pub fn parse(&self) -> (FormValues, Vec<ValidationError>) {
        let mut warnings = Vec::new();
        let id = self.id.trim().to_string();

        let x = parse_int(&self.x).unwrap_or(0) as f64;
        let y = parse_int(&self.y).unwrap_or(0) as f64;
        let raw_w = parse_int(&self.width).filter(|v| *v != 0).unwrap_or(1) as f64;
        let raw_h = parse_int(&self.height).filter(|v| *v != 0).unwrap_or(1) as f64;
        if raw_w <= 0.0 || raw_h <= 0.0 {
            warnings.push(ValidationError::NonPositiveSize {
                id: id.clone(),
                width: raw_w,
                height: raw_h,
            });
        }

        let horizontal = parse_int(&self.horizontal)
            .map(|v| v as f64)
            .unwrap_or(DEFAULT_HORIZONTAL);
        let vertical = parse_int(&self.vertical).unwrap_or(0) as f64;
        let turning = parse_int(&self.turning).unwrap_or(0).abs() as f64;

        let values = FormValues {
            id,
            coordinates: Rect::new(x, y, raw_w.max(1.0), raw_h.max(1.0)),
            distances: Distances::new(horizontal, vertical, turning_point(horizontal, vertical, turning)),
            description: self.description.clone(),
        };
        (values, warnings)
    }
}

/// Whether the turning point field is editable for a vertical distance.
pub fn turning_enabled(vertical: f64) -> bool {
    vertical != 0.0
}

/// Apply the turning-point rule.
///
/// Forced to 0 for a straight path. For an elbow with no turning point the
/// turn defaults to half the horizontal run.
pub fn turning_point(horizontal: f64, vertical: f64, turning: f64) -> f64 {
    if !turning_enabled(vertical) {
        0.0
    } else if turning == 0.0 {
        round_half_up(horizontal / 2.0).abs()
    } else {
        turning
    }
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Leading-integer parse: optional whitespace and sign, then digits.
/// Anything after the digits is ignored. `None` when no digits lead.
pub fn parse_int(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Format a number for a text field. Values within float noise of an
/// integer are shown as that integer.
pub fn number(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        value.to_string()
    }
}
