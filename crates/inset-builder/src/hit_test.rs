//! Delegated hit testing for preview elements.
//!
//! Every clickable preview element registers a region here instead of
//! carrying its own handler. A click is resolved with one query.

use inset_overlay::render::{Side, TooltipPlacement};
use inset_overlay::{Point, Rect, Size};

/// Nominal tooltip size used until the host reports a measured one.
pub const NOMINAL_TOOLTIP: Size = Size::new(220.0, 48.0);

/// Part of a hotspot preview a region belongs to.
///
/// Ordered by stacking: tooltips draw above lines, lines above hotspots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HitPart {
    Hotspot,
    Line,
    Tooltip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub id: String,
    pub part: HitPart,
    pub rect: Rect,
    seq: u64,
}

/// Result of a successful hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub id: String,
    pub part: HitPart,
}

#[derive(Debug, Clone, Default)]
pub struct HitTestRegistry {
    regions: Vec<HitRegion>,
    next_seq: u64,
}

impl HitTestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: &str, part: HitPart, rect: Rect) {
        self.regions.push(HitRegion {
            id: id.to_string(),
            part,
            rect,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Drop every region of one hotspot. Returns how many were removed.
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.regions.len();
        self.regions.retain(|r| r.id != id);
        before - self.regions.len()
    }

    /// Topmost region containing `point`: highest part first, then the most
    /// recently registered.
    pub fn hit(&self, point: Point) -> Option<Hit> {
        self.regions
            .iter()
            .filter(|r| r.rect.contains(point))
            .max_by_key(|r| (r.part, r.seq))
            .map(|r| Hit {
                id: r.id.clone(),
                part: r.part,
            })
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }
}

/// Box a tooltip of `size` occupies when placed at `placement`.
pub fn tooltip_rect(placement: &TooltipPlacement, size: Size) -> Rect {
    let Point { x, y } = placement.anchor;
    let (w, h) = (size.width, size.height);
    match placement.side {
        Side::Right => Rect::new(x, y - h / 2.0, w, h),
        Side::Left => Rect::new(x - w, y - h / 2.0, w, h),
        Side::Below => Rect::new(x - w / 2.0, y, w, h),
        Side::Above => Rect::new(x - w / 2.0, y - h, w, h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_wins_over_hotspot() {
        let mut reg = HitTestRegistry::new();
        reg.register("a", HitPart::Tooltip, Rect::new(0.0, 0.0, 50.0, 50.0));
        reg.register("b", HitPart::Hotspot, Rect::new(0.0, 0.0, 100.0, 100.0));

        let hit = reg.hit(Point::new(10.0, 10.0)).unwrap();
        assert_eq!(
            hit,
            Hit {
                id: "a".to_string(),
                part: HitPart::Tooltip
            }
        );
        assert_eq!(reg.hit(Point::new(80.0, 80.0)).unwrap().id, "b");
        assert!(reg.hit(Point::new(200.0, 0.0)).is_none());
    }

    #[test]
    fn later_region_wins_within_part() {
        let mut reg = HitTestRegistry::new();
        reg.register("first", HitPart::Hotspot, Rect::new(0.0, 0.0, 10.0, 10.0));
        reg.register("second", HitPart::Hotspot, Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(reg.hit(Point::new(7.0, 7.0)).unwrap().id, "second");
    }

    #[test]
    fn removes_by_id() {
        let mut reg = HitTestRegistry::new();
        reg.register("a", HitPart::Hotspot, Rect::new(0.0, 0.0, 10.0, 10.0));
        reg.register("a", HitPart::Tooltip, Rect::new(20.0, 0.0, 10.0, 10.0));
        reg.register("b", HitPart::Hotspot, Rect::new(0.0, 0.0, 10.0, 10.0));

        assert_eq!(reg.remove("a"), 2);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.hit(Point::new(5.0, 5.0)).unwrap().id, "b");
    }

    #[test]
    fn tooltip_rect_per_side() {
        let size = Size::new(100.0, 40.0);
        let at = |side| TooltipPlacement {
            anchor: Point::new(200.0, 100.0),
            side,
        };
        assert_eq!(tooltip_rect(&at(Side::Right), size), Rect::new(200.0, 80.0, 100.0, 40.0));
        assert_eq!(tooltip_rect(&at(Side::Left), size), Rect::new(100.0, 80.0, 100.0, 40.0));
        assert_eq!(tooltip_rect(&at(Side::Below), size), Rect::new(150.0, 100.0, 100.0, 40.0));
        assert_eq!(tooltip_rect(&at(Side::Above), size), Rect::new(150.0, 60.0, 100.0, 40.0));
    }
}
