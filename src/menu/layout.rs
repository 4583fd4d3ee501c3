use crate::config::{Arrangement, LayoutConfig};
use crate::menu::geometry::{Point, Rect};
use crate::menu::item::Item;
use crate::menu::{FACING_DEAD_ZONE, ITEM_GAP, MIN_HIT_SIZE};
use std::f64::consts::{PI, SQRT_2};

/// Places items on a circle (or an arc of one) around the touch point.
///
/// Every region is a square of the same side. The orbit radius grows past the configured
/// one whenever that is needed to keep neighbouring squares apart and the anchor itself
/// outside all of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadialLayout {
    config: LayoutConfig,
}

impl RadialLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn region_side(&self) -> f64 {
        let side = self.config.item_size.max(self.config.min_hit_size);
        if side.is_finite() && side > 0.0 {
            side
        } else {
            MIN_HIT_SIZE
        }
    }

    /// One region per item, in item order. Empty input yields no regions.
    pub fn layout(&self, items: &[Item], anchor: Point) -> Vec<Rect> {
        if items.is_empty() {
            return Vec::new();
        }

        let side = self.region_side();
        let angles = self.angles(items.len(), anchor);
        let radius = self.orbit_radius(&angles, side);

        angles
            .into_iter()
            .map(|angle| Rect::centered(anchor.polar(radius, angle), side))
            .collect()
    }

    fn angles(&self, count: usize, anchor: Point) -> Vec<f64> {
        match self.config.arrangement {
            Arrangement::Ring => self.ring_angles(count),
            Arrangement::Fan => self.fan_angles(count, anchor),
        }
    }

    fn ring_angles(&self, count: usize) -> Vec<f64> {
        let step = 2.0 * PI / count as f64;
        let start = self.config.start.angle();
        (0..count).map(|i| start + i as f64 * step).collect()
    }

    fn fan_angles(&self, count: usize, anchor: Point) -> Vec<f64> {
        let facing = self.facing(anchor);
        if count == 1 {
            return vec![facing];
        }

        // the last item may not wrap around onto the first one
        let max_spread = 2.0 * PI * (count - 1) as f64 / count as f64;
        let spread = self.config.spread.to_radians().clamp(0.0, max_spread);
        if !spread.is_finite() || spread <= f64::EPSILON {
            return self.ring_angles(count);
        }

        let step = spread / (count - 1) as f64;
        let first = facing - spread / 2.0;
        (0..count).map(|i| first + i as f64 * step).collect()
    }

    /// Direction the fan opens towards: the middle of the bounds when known.
    fn facing(&self, anchor: Point) -> f64 {
        self.config
            .bounds
            .map(|bounds| bounds.center())
            .filter(|center| anchor.distance_to(*center) > FACING_DEAD_ZONE)
            .map(|center| anchor.angle_to(center))
            .unwrap_or_else(|| self.config.start.angle())
    }

    fn orbit_radius(&self, angles: &[f64], side: f64) -> f64 {
        // squares whose centres are at least side * sqrt(2) apart cannot overlap
        let chord = (side + ITEM_GAP) * SQRT_2;
        let spacing = min_step(angles)
            .map(|step| chord / (2.0 * (step / 2.0).sin()))
            .unwrap_or(0.0);

        self.config.radius.max(side + ITEM_GAP).max(spacing)
    }
}

fn min_step(angles: &[f64]) -> Option<f64> {
    angles
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .min_by(|a, b| a.total_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Direction;

    fn items(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| Item::new(format!("item-{i}"), format!("Item {i}")))
            .collect()
    }

    fn assert_well_formed(regions: &[Rect], anchor: Point, min_side: f64) {
        for (i, a) in regions.iter().enumerate() {
            assert!(!a.is_empty());
            assert!(a.width >= min_side && a.height >= min_side);
            assert!(!a.contains(anchor), "region {i} covers the anchor");
            for (j, b) in regions.iter().enumerate().skip(i + 1) {
                assert!(!a.intersects(b), "regions {i} and {j} overlap");
            }
        }
    }

    #[test]
    fn test_empty_items_have_no_regions() {
        let layout = RadialLayout::default();
        assert!(layout.layout(&[], Point::new(10.0, 10.0)).is_empty());
    }

    #[test]
    fn test_ring_regions_are_disjoint() {
        let layout = RadialLayout::default();
        let anchor = Point::new(400.0, 300.0);
        for count in 1..=16 {
            let regions = layout.layout(&items(count), anchor);
            assert_eq!(regions.len(), count);
            assert_well_formed(&regions, anchor, MIN_HIT_SIZE);
        }
    }

    #[test]
    fn test_fan_regions_are_disjoint() {
        let layout = RadialLayout::new(LayoutConfig {
            arrangement: Arrangement::Fan,
            spread: 60.0,
            ..LayoutConfig::default()
        });
        let anchor = Point::new(0.0, 0.0);
        for count in 1..=12 {
            let regions = layout.layout(&items(count), anchor);
            assert_eq!(regions.len(), count);
            assert_well_formed(&regions, anchor, MIN_HIT_SIZE);
        }
    }

    #[test]
    fn test_first_ring_item_sits_at_start_direction() {
        let layout = RadialLayout::new(LayoutConfig {
            start: Direction::East,
            ..LayoutConfig::default()
        });
        let anchor = Point::new(100.0, 100.0);
        let regions = layout.layout(&items(4), anchor);
        let first = regions[0].center();
        assert!(first.x > anchor.x);
        assert!((first.y - anchor.y).abs() < 1e-6);
    }

    #[test]
    fn test_tiny_items_get_touch_sized_regions() {
        let layout = RadialLayout::new(LayoutConfig {
            item_size: 10.0,
            ..LayoutConfig::default()
        });
        let regions = layout.layout(&items(3), Point::default());
        assert!(regions.iter().all(|r| r.width == MIN_HIT_SIZE));
    }

    #[test]
    fn test_invalid_sizes_fall_back_to_minimum() {
        let layout = RadialLayout::new(LayoutConfig {
            item_size: f64::NAN,
            min_hit_size: -1.0,
            ..LayoutConfig::default()
        });
        assert_eq!(layout.region_side(), MIN_HIT_SIZE);
    }

    #[test]
    fn test_fan_opens_towards_bounds_center() {
        let layout = RadialLayout::new(LayoutConfig {
            arrangement: Arrangement::Fan,
            bounds: Some(Rect::new(0.0, 0.0, 1000.0, 1000.0)),
            ..LayoutConfig::default()
        });
        // bottom-right corner: the menu should open up and to the left
        let anchor = Point::new(950.0, 950.0);
        let regions = layout.layout(&items(3), anchor);
        let middle = regions[1].center();
        assert!(middle.x < anchor.x);
        assert!(middle.y < anchor.y);
    }

    #[test]
    fn test_zero_spread_fan_falls_back_to_ring() {
        let layout = RadialLayout::new(LayoutConfig {
            arrangement: Arrangement::Fan,
            spread: 0.0,
            ..LayoutConfig::default()
        });
        let anchor = Point::new(0.0, 0.0);
        let regions = layout.layout(&items(5), anchor);
        assert_well_formed(&regions, anchor, MIN_HIT_SIZE);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let layout = RadialLayout::default();
        let anchor = Point::new(12.5, 99.0);
        assert_eq!(
            layout.layout(&items(6), anchor),
            layout.layout(&items(6), anchor)
        );
    }
}
