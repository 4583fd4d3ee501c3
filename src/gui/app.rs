use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::surface::{OverlaySurface, Scene};
use crate::gui::{view, window};
use crate::menu::{
    Item, ItemId, MenuController, MenuDelegate, Point, PointerPhase, RadialLayout, Transition,
};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Offers the configured items everywhere and logs what the user picks.
pub struct DemoHost {
    items: Vec<Item>,
    last_selected: Option<ItemId>,
}

impl DemoHost {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            last_selected: None,
        }
    }

    pub fn last_selected(&self) -> Option<&ItemId> {
        self.last_selected.as_ref()
    }
}

impl MenuDelegate for DemoHost {
    fn items_for(&mut self, _at: Point) -> Vec<Item> {
        self.items.clone()
    }

    fn activated(&mut self, item: &Item) {
        log::debug!("Hovering '{}'", item.title);
    }

    fn selected(&mut self, item: &Item) {
        log::info!("Selected '{}' ({})", item.title, item.id);
        self.last_selected = Some(item.id.clone());
    }
}

pub struct AppModel {
    pub controller: MenuController<DemoHost, OverlaySurface>,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum AppMsg {
    Pointer(PointerPhase),
    Quit,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Config,
        Option<PathBuf>,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("ringmenu"),
            add_css_class: "ringmenu-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Quit);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "ringmenu-drawing-area",

                // the menu opens on a hold, the drag then tracks the same press
                add_controller = gtk::GestureLongPress {
                    set_button: gtk::gdk::BUTTON_PRIMARY,

                    connect_pressed[sender] => move |_, x, y| {
                        sender.input(AppMsg::Pointer(PointerPhase::Began(Point::new(x, y))));
                    },
                },

                add_controller = gtk::GestureDrag {
                    set_button: gtk::gdk::BUTTON_PRIMARY,

                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            let to = Point::new(x, y).offset(dx, dy);
                            sender.input(AppMsg::Pointer(PointerPhase::Moved(to)));
                        }
                    },

                    connect_drag_end[sender] => move |_, _, _| {
                        sender.input(AppMsg::Pointer(PointerPhase::Ended));
                    },

                    connect_cancel[sender] => move |_, _| {
                        sender.input(AppMsg::Pointer(PointerPhase::Cancelled));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, config_path, rx) = init;

        window::load_css();
        window::init_overlay(&root);

        let scene = Rc::new(RefCell::new(Scene::new(config.style.clone())));

        let model = AppModel {
            controller: MenuController::new(
                DemoHost::new(config.items.clone()),
                OverlaySurface::new(scene.clone()),
                RadialLayout::new(config.layout.clone()),
            ),
            config_path,
        };

        let widgets = view_output!();

        let mut model = model;
        model
            .controller
            .surface_mut()
            .attach(widgets.drawing_area.clone());

        widgets
            .drawing_area
            .set_draw_func(move |_, cr, _, _| {
                if let Err(e) = view::draw(cr, &scene.borrow()) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Pointer(phase) => {
                let transition = self.controller.handle(phase);
                if transition.should_redraw() {
                    self.controller.surface().queue_redraw();
                }
                if let Transition::Closed { selected: Some(id) } = transition {
                    log::info!("Menu closed on '{}'", id);
                }
            }
            AppMsg::Quit => {
                if let Some(id) = self.controller.delegate().last_selected() {
                    println!("{}", id);
                }
                relm4::main_application().quit();
            }
            AppMsg::ConfigReload => match config::load_config(self.config_path.as_deref()) {
                Ok(new_config) => {
                    self.controller.delegate_mut().items = new_config.items;
                    self.controller.surface_mut().set_style(new_config.style);
                    if !self
                        .controller
                        .reconfigure(RadialLayout::new(new_config.layout))
                    {
                        log::info!("Layout change deferred until the menu closes");
                    }
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
