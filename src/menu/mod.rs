pub mod controller;
pub mod geometry;
pub mod hit;
pub mod item;
pub mod layout;

pub use controller::{Entry, MenuController, MenuDelegate, PointerPhase, Session, Suppression, Transition};
pub use geometry::{Point, Rect};
pub use item::{Item, ItemId, ItemTitle};
pub use layout::RadialLayout;

pub const MIN_HIT_SIZE: f64 = 44.0; // smallest reliable touch target
pub const ITEM_GAP: f64 = 4.0; // clearance between neighbouring regions
pub const FACING_DEAD_ZONE: f64 = 1.0; // anchor this close to the bounds centre has no facing
