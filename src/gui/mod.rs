pub mod app;
pub mod surface;
pub mod view;
pub mod window;

pub use app::AppModel;
pub use surface::{OverlaySurface, Scene};
pub use view::draw;

pub const ICON_SIZE: i32 = 128;
pub const ICON_FILL: f64 = 0.6; // share of the item circle covered by its icon
pub const LABEL_FONT_SIZE: f64 = 14.0; // at the default item size
pub const LABEL_REFERENCE_SIZE: f64 = 96.0;
pub const TITLE_GAP: f64 = 16.0;
pub const TOUCH_POINT_RADIUS: f64 = 24.0;
pub const TOUCH_POINT_ALPHA: f64 = 0.35;
