use super::surface::{MenuScene, Scene, SceneItem};
use super::{
    ICON_FILL, LABEL_FONT_SIZE, LABEL_REFERENCE_SIZE, TITLE_GAP, TOUCH_POINT_ALPHA,
    TOUCH_POINT_RADIUS,
};
use crate::config::{Color, Style};
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use std::f64::consts::PI;

fn set_color(cr: &Context, color: &Color, alpha: f64) {
    let (r, g, b, a) = color.components();
    cr.set_source_rgba(r, g, b, a * alpha);
}

struct ItemRenderer<'a> {
    entry: &'a SceneItem,
    active: bool,
}

impl<'a> ItemRenderer<'a> {
    fn new(entry: &'a SceneItem, active: bool) -> Self {
        Self { entry, active }
    }

    fn draw(&self, cr: &Context, style: &Style) -> Result<(), cairo::Error> {
        self.draw_circle(cr, style)?;
        self.draw_content(cr, style)?;
        Ok(())
    }

    fn diameter(&self) -> f64 {
        self.entry.region.width.min(self.entry.region.height)
    }

    fn draw_circle(&self, cr: &Context, style: &Style) -> Result<(), cairo::Error> {
        let color = if self.active {
            &style.item_active_color
        } else {
            &style.item_color
        };
        let center = self.entry.region.center();
        set_color(cr, color, 1.0);
        cr.arc(center.x, center.y, self.diameter() / 2.0, 0.0, 2.0 * PI);
        cr.fill()
    }

    fn draw_content(&self, cr: &Context, style: &Style) -> Result<(), cairo::Error> {
        if let Some(pixbuf) = &self.entry.pixbuf {
            self.draw_icon(cr, pixbuf, style)
        } else {
            self.draw_label(cr, style)
        }
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf, style: &Style) -> Result<(), cairo::Error> {
        let largest = pixbuf.width().max(pixbuf.height()).max(1) as f64;
        let icon_scale = self.diameter() * ICON_FILL / largest;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );
        let center = self.entry.region.center();

        cr.save()?;
        cr.translate(center.x - iw / 2.0, center.y - ih / 2.0);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);

        let tint = if self.active {
            style.icon_active_color
        } else {
            style.icon_color
        };
        match tint {
            // keep the icon's shape, repaint it in a flat colour
            Some(color) => {
                let shape = cr.source();
                set_color(cr, &color, 1.0);
                cr.mask(&shape)?;
            }
            None => cr.paint()?,
        }
        cr.restore()
    }

    fn draw_label(&self, cr: &Context, style: &Style) -> Result<(), cairo::Error> {
        let text = self.entry.item.title.as_str();
        let center = self.entry.region.center();
        set_color(cr, &style.title_color, 1.0);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(LABEL_FONT_SIZE * self.diameter() / LABEL_REFERENCE_SIZE);
        if let Ok(ext) = cr.text_extents(text) {
            cr.move_to(
                center.x - ext.width() / 2.0 - ext.x_bearing(),
                center.y - ext.height() / 2.0 - ext.y_bearing(),
            );
            cr.show_text(text)?;
        }
        Ok(())
    }
}

pub fn draw(cr: &Context, scene: &Scene) -> Result<(), cairo::Error> {
    let Some(menu) = &scene.menu else {
        return Ok(());
    };

    draw_touch_point(cr, menu, &scene.style)?;

    for (i, entry) in menu.items.iter().enumerate() {
        ItemRenderer::new(entry, menu.active == Some(i)).draw(cr, &scene.style)?;
    }

    if let Some(entry) = menu.active.and_then(|i| menu.items.get(i)) {
        draw_title(cr, menu, entry, &scene.style)?;
    }
    Ok(())
}

fn draw_touch_point(cr: &Context, menu: &MenuScene, style: &Style) -> Result<(), cairo::Error> {
    set_color(cr, &style.touch_point_color, TOUCH_POINT_ALPHA);
    cr.arc(
        menu.anchor.x,
        menu.anchor.y,
        TOUCH_POINT_RADIUS,
        0.0,
        2.0 * PI,
    );
    cr.fill()
}

/// Title of the hovered item, above the menu, or below it when there is no room on top.
fn draw_title(
    cr: &Context,
    menu: &MenuScene,
    entry: &SceneItem,
    style: &Style,
) -> Result<(), cairo::Error> {
    let text = entry.item.title.as_str();
    set_color(cr, &style.title_color, 1.0);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(style.title_size);

    let Ok(ext) = cr.text_extents(text) else {
        return Ok(());
    };

    let top = menu
        .items
        .iter()
        .map(|e| e.region.y)
        .fold(menu.anchor.y, f64::min);
    let bottom = menu
        .items
        .iter()
        .map(|e| e.region.y + e.region.height)
        .fold(menu.anchor.y, f64::max);

    let above = top - TITLE_GAP - (ext.height() + ext.y_bearing());
    let baseline = if above + ext.y_bearing() >= 0.0 {
        above
    } else {
        bottom + TITLE_GAP - ext.y_bearing()
    };

    cr.move_to(
        menu.anchor.x - ext.width() / 2.0 - ext.x_bearing(),
        baseline,
    );
    cr.show_text(text)?;
    Ok(())
}
