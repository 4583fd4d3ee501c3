use crate::menu::{Item, Point, Rect};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("No surface available to attach the menu to")]
    Unavailable,
    #[error("Surface rejected the menu: {0}")]
    Rejected(String),
}

/// Whatever puts the menu on screen. Calls arrive synchronously from the controller.
pub trait Surface {
    /// Attach the overlay showing `items` in `regions` around `anchor`.
    fn present(&mut self, items: &[Item], regions: &[Rect], anchor: Point)
    -> Result<(), SurfaceError>;

    fn activate(&mut self, index: usize, item: &Item);

    fn deactivate(&mut self, index: usize, item: &Item);

    /// Detach the overlay.
    fn dismiss(&mut self);
}

/// Surface with nothing to draw on. Always attaches and only tracks what would be shown.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    regions: Vec<Rect>,
    active: Option<usize>,
}

impl HeadlessSurface {
    pub fn is_attached(&self) -> bool {
        !self.regions.is_empty()
    }

    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }
}

impl Surface for HeadlessSurface {
    fn present(
        &mut self,
        items: &[Item],
        regions: &[Rect],
        anchor: Point,
    ) -> Result<(), SurfaceError> {
        if items.len() != regions.len() {
            return Err(SurfaceError::Rejected(format!(
                "{} items for {} regions",
                items.len(),
                regions.len()
            )));
        }
        log::trace!("Presenting {} items around {:?}", items.len(), anchor);
        self.regions = regions.to_vec();
        self.active = None;
        Ok(())
    }

    fn activate(&mut self, index: usize, item: &Item) {
        log::trace!("Activating '{}'", item.id);
        self.active = Some(index);
    }

    fn deactivate(&mut self, index: usize, item: &Item) {
        log::trace!("Deactivating '{}'", item.id);
        if self.active == Some(index) {
            self.active = None;
        }
    }

    fn dismiss(&mut self) {
        self.regions.clear();
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_surface_tracks_activation() {
        let mut surface = HeadlessSurface::default();
        let items = [Item::new("a", "A"), Item::new("b", "B")];
        let regions = [
            Rect::new(0.0, 0.0, 44.0, 44.0),
            Rect::new(50.0, 0.0, 44.0, 44.0),
        ];

        surface
            .present(&items, &regions, Point::new(22.0, 80.0))
            .unwrap();
        assert!(surface.is_attached());

        surface.activate(1, &items[1]);
        assert_eq!(surface.active(), Some(1));
        surface.deactivate(0, &items[0]);
        assert_eq!(surface.active(), Some(1));
        surface.deactivate(1, &items[1]);
        assert_eq!(surface.active(), None);

        surface.dismiss();
        assert!(!surface.is_attached());
    }

    #[test]
    fn test_headless_surface_rejects_mismatched_regions() {
        let mut surface = HeadlessSurface::default();
        let items = [Item::new("a", "A")];
        assert!(matches!(
            surface.present(&items, &[], Point::default()),
            Err(SurfaceError::Rejected(_))
        ));
        assert!(!surface.is_attached());
    }
}
