//! Connector path model.
//!
//! A connector runs from a hotspot edge to its tooltip as a list of
//! axis-aligned segments. Only two shapes are allowed:
//!
//! - `[H]`: one horizontal run
//! - `[H, V, H]`: horizontal run, vertical run, horizontal run
//!
//! Authors describe paths with three distances instead (see [`Distances`]);
//! [`distances_to_segments`] and [`segments_to_distances`] convert between
//! the two.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Segments shorter than this are treated as absent.
pub const NEAR_ZERO: f64 = 0.1;

/// Length of the leading stub emitted for a turn at the far end of the run.
///
/// Exactly [`NEAR_ZERO`], the shortest length [`simplify`] keeps.
pub const TURN_STUB: f64 = 0.1;

/// Length of the horizontal run substituted for a malformed path.
pub const FALLBACK_LENGTH: f64 = 100.0;

/// Length used when every segment was filtered out.
pub const COLLAPSED_LENGTH: f64 = 1.0;

/// Orientation of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Horizontal,
    Vertical,
}

/// One axis-aligned run of a connector.
///
/// Horizontal: negative is left, positive is right.
/// Vertical: negative is up, positive is down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    #[serde(serialize_with = "crate::geometry::whole")]
    pub length: f64,
}

impl Segment {
    pub const fn horizontal(length: f64) -> Self {
        Self {
            kind: SegmentKind::Horizontal,
            length,
        }
    }

    pub const fn vertical(length: f64) -> Self {
        Self {
            kind: SegmentKind::Vertical,
            length,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.kind == SegmentKind::Horizontal
    }

    /// Zero counts as the positive direction.
    pub fn is_positive(&self) -> bool {
        self.length >= 0.0
    }

    fn is_near_zero(&self) -> bool {
        self.length.abs() < NEAR_ZERO
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            SegmentKind::Horizontal => 'H',
            SegmentKind::Vertical => 'V',
        };
        write!(f, "{}({})", tag, self.length)
    }
}

/// Render a segment list as `[H(60), V(-50), H(60)]` for diagnostics.
pub fn describe(segments: &[Segment]) -> String {
    let parts: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Author-facing description of a connector path.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distances {
    /// Signed total horizontal travel
    pub horizontal_distance: f64,
    /// Signed vertical travel, zero for a straight path
    pub vertical_distance: f64,
    /// Absolute horizontal travel before the vertical turn
    pub turning_point: f64,
}

impl Distances {
    pub const fn new(horizontal: f64, vertical: f64, turning_point: f64) -> Self {
        Self {
            horizontal_distance: horizontal,
            vertical_distance: vertical,
            turning_point,
        }
    }

    pub fn to_segments(&self) -> Vec<Segment> {
        distances_to_segments(
            self.horizontal_distance,
            self.vertical_distance,
            self.turning_point,
        )
    }
}

/// Convert author distances into a canonical segment list.
///
/// Always returns `[H]` when `vertical` is zero and `[H, V, H]` otherwise.
pub fn distances_to_segments(horizontal: f64, vertical: f64, turning_point: f64) -> Vec<Segment> {
    if vertical == 0.0 {
        return vec![Segment::horizontal(horizontal)];
    }

    let direction = if horizontal >= 0.0 { 1.0 } else { -1.0 };

    // Turning at the far end keeps the tooltip flush with the hotspot edge.
    if turning_point == horizontal.abs() {
        let stub = TURN_STUB * direction;
        return vec![
            Segment::horizontal(stub),
            Segment::vertical(vertical),
            Segment::horizontal(horizontal - stub),
        ];
    }

    let lead = turning_point * direction;
    vec![
        Segment::horizontal(lead),
        Segment::vertical(vertical),
        Segment::horizontal(horizontal - lead),
    ]
}

/// Inverse of [`distances_to_segments`], for populating the editor form.
pub fn segments_to_distances(segments: &[Segment]) -> Distances {
    let horizontal_distance = horizontal_total(segments);

    let vertical_distance = segments
        .iter()
        .find(|s| s.kind == SegmentKind::Vertical)
        .map(|s| s.length)
        .unwrap_or(0.0);

    let turning_point = match segments {
        [first, _, _] if first.is_horizontal() => first.length.abs(),
        _ => 0.0,
    };

    Distances {
        horizontal_distance,
        vertical_distance,
        turning_point,
    }
}

/// Sum of every horizontal segment, the run drawn by the hover tier.
pub fn horizontal_total(segments: &[Segment]) -> f64 {
    segments
        .iter()
        .filter(|s| s.is_horizontal())
        .map(|s| s.length)
        .sum()
}

/// Check that segments form exactly `[H]` or `[H, V, H]`.
pub fn is_valid_pattern(segments: &[Segment]) -> bool {
    use SegmentKind::{Horizontal as H, Vertical as V};

    matches!(
        segments
            .iter()
            .map(|s| s.kind)
            .collect::<Vec<_>>()
            .as_slice(),
        [H] | [H, V, H]
    )
}

/// How a path was obtained from its authored segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Authored segments were canonical after near-zero filtering
    Canonical,
    /// Every segment was near zero, replaced by a minimal run
    Collapsed,
    /// Segments did not match a canonical shape, replaced by the fallback
    Fallback,
}

/// Drawable segments plus how they were derived.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub segments: Vec<Segment>,
    pub resolution: Resolution,
}

/// Drop near-zero segments and validate what remains.
///
/// Never fails: a malformed list resolves to `[H(100)]` marked
/// [`Resolution::Fallback`] so the caller can surface a warning.
pub fn simplify(segments: &[Segment]) -> ResolvedPath {
    let filtered: Vec<Segment> = segments
        .iter()
        .copied()
        .filter(|s| !s.is_near_zero())
        .collect();

    if filtered.is_empty() {
        return ResolvedPath {
            segments: vec![Segment::horizontal(COLLAPSED_LENGTH)],
            resolution: Resolution::Collapsed,
        };
    }

    if !is_valid_pattern(&filtered) {
        return ResolvedPath {
            segments: vec![Segment::horizontal(FALLBACK_LENGTH)],
            resolution: Resolution::Fallback,
        };
    }

    ResolvedPath {
        segments: filtered,
        resolution: Resolution::Canonical,
    }
}
