//! Mapping between reference-image pixels and rendered pixels.

use crate::error::ScaleError;
use crate::geometry::{Point, Rect, Size};

/// Per-axis scale factors from reference space to display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    /// Identity scale, used when rendering at the reference size.
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    /// Compute `display / reference` per axis.
    pub fn new(display: Size, reference: Size) -> Result<Self, ScaleError> {
        if !is_positive(reference.width) || !is_positive(reference.height) {
            return Err(ScaleError::ZeroReference {
                width: reference.width,
                height: reference.height,
            });
        }
        if !is_positive(display.width) || !is_positive(display.height) {
            return Err(ScaleError::EmptyDisplay {
                width: display.width,
                height: display.height,
            });
        }

        Ok(Self {
            x: display.width / reference.width,
            y: display.height / reference.height,
        })
    }

    /// Uniform factor for line lengths and stroke thickness: the smaller of
    /// the two axis factors.
    pub fn line(&self) -> f64 {
        self.x.min(self.y)
    }

    /// Scale a reference rectangle into display space, per axis.
    pub fn rect(&self, r: &Rect) -> Rect {
        Rect {
            x: r.x * self.x,
            y: r.y * self.y,
            width: r.width * self.x,
            height: r.height * self.y,
        }
    }

    /// Scale a length along a connector path.
    pub fn length(&self, len: f64) -> f64 {
        len * self.line()
    }

    /// Map a display rectangle back into reference space, rounded to whole
    /// pixels the way authored coordinates are stored.
    pub fn to_reference(&self, r: &Rect) -> Rect {
        Rect {
            x: (r.x / self.x).round(),
            y: (r.y / self.y).round(),
            width: (r.width / self.x).round(),
            height: (r.height / self.y).round(),
        }
    }

    /// Map a display point back into reference space without rounding.
    pub fn point_to_reference(&self, p: Point) -> Point {
        Point::new(p.x / self.x, p.y / self.y)
    }
}

/// Finite and greater than zero.
fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
