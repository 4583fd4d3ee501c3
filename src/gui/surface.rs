use super::ICON_SIZE;
use crate::config::Style;
use crate::icon;
use crate::menu::{Item, Point, Rect};
use crate::surface::{Surface, SurfaceError};
use gdk_pixbuf::Pixbuf;
use gtk::prelude::*;
use gtk4 as gtk;
use std::cell::RefCell;
use std::iter::zip;
use std::rc::Rc;

pub struct SceneItem {
    pub item: Item,
    pub region: Rect,
    pub pixbuf: Option<Pixbuf>,
}

impl SceneItem {
    fn new(item: &Item, region: Rect) -> Self {
        Self {
            item: item.clone(),
            region,
            pixbuf: Self::load_icon(item),
        }
    }

    fn load_icon(item: &Item) -> Option<Pixbuf> {
        let path = item.icon.as_ref().and_then(icon::find_icon_path)?;
        Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true)
            .map_err(|e| log::warn!("Failed to load icon for '{}': {}", item.id, e))
            .ok()
    }
}

pub struct MenuScene {
    pub anchor: Point,
    pub items: Vec<SceneItem>,
    pub active: Option<usize>,
}

/// What the drawing area paints. Shared between the surface and the draw function.
pub struct Scene {
    pub style: Style,
    pub menu: Option<MenuScene>,
}

impl Scene {
    pub fn new(style: Style) -> Self {
        Self { style, menu: None }
    }
}

pub struct OverlaySurface {
    scene: Rc<RefCell<Scene>>,
    canvas: Option<gtk::DrawingArea>,
    pending_style: Option<Style>,
}

impl OverlaySurface {
    pub fn new(scene: Rc<RefCell<Scene>>) -> Self {
        Self {
            scene,
            canvas: None,
            pending_style: None,
        }
    }

    pub fn attach(&mut self, canvas: gtk::DrawingArea) {
        self.canvas = Some(canvas);
    }

    /// Takes effect immediately when no menu is shown, otherwise once it is dismissed.
    pub fn set_style(&mut self, style: Style) {
        let mut scene = self.scene.borrow_mut();
        if scene.menu.is_some() {
            self.pending_style = Some(style);
        } else {
            scene.style = style;
        }
    }

    fn update(&mut self, f: impl FnOnce(&mut MenuScene)) {
        if let Some(menu) = self.scene.borrow_mut().menu.as_mut() {
            f(menu);
        }
    }

    /// Scene changes are only painted once this is called.
    pub fn queue_redraw(&self) {
        if let Some(canvas) = &self.canvas {
            canvas.queue_draw();
        }
    }
}

impl Surface for OverlaySurface {
    fn present(
        &mut self,
        items: &[Item],
        regions: &[Rect],
        anchor: Point,
    ) -> Result<(), SurfaceError> {
        if !self.canvas.as_ref().is_some_and(|c| c.is_mapped()) {
            return Err(SurfaceError::Unavailable);
        }
        if items.len() != regions.len() {
            return Err(SurfaceError::Rejected(format!(
                "{} items for {} regions",
                items.len(),
                regions.len()
            )));
        }

        {
            let mut scene = self.scene.borrow_mut();
            if let Some(style) = self.pending_style.take() {
                scene.style = style;
            }
            scene.menu = Some(MenuScene {
                anchor,
                items: zip(items, regions)
                    .map(|(item, region)| SceneItem::new(item, *region))
                    .collect(),
                active: None,
            });
        }
        Ok(())
    }

    fn activate(&mut self, index: usize, _item: &Item) {
        self.update(|menu| menu.active = Some(index));
    }

    fn deactivate(&mut self, index: usize, _item: &Item) {
        self.update(|menu| {
            if menu.active == Some(index) {
                menu.active = None;
            }
        });
    }

    fn dismiss(&mut self) {
        let mut scene = self.scene.borrow_mut();
        scene.menu = None;
        if let Some(style) = self.pending_style.take() {
            scene.style = style;
        }
    }
}
