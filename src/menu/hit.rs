use super::geometry::{Point, Rect};

/// Index of the first region containing `point`. Overlaps resolve to the earliest region.
pub fn resolve<'a>(point: Point, regions: impl IntoIterator<Item = &'a Rect>) -> Option<usize> {
    regions.into_iter().position(|region| region.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_hit_and_miss() {
        let regions = [
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Rect::new(100.0, 0.0, 50.0, 50.0),
        ];
        assert_eq!(resolve(Point::new(10.0, 10.0), &regions), Some(0));
        assert_eq!(resolve(Point::new(120.0, 49.0), &regions), Some(1));
        assert_eq!(resolve(Point::new(75.0, 25.0), &regions), None);
    }

    #[test]
    fn test_overlap_resolves_to_first_region() {
        let regions = [
            Rect::new(0.0, 0.0, 60.0, 60.0),
            Rect::new(40.0, 40.0, 60.0, 60.0),
        ];
        assert_eq!(resolve(Point::new(50.0, 50.0), &regions), Some(0));
        assert_eq!(resolve(Point::new(70.0, 70.0), &regions), Some(1));
    }

    #[test]
    fn test_no_regions() {
        let regions: Vec<Rect> = Vec::new();
        assert_eq!(resolve(Point::new(0.0, 0.0), &regions), None);
    }
}
