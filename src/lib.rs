mod macros;

pub mod config;
pub mod events;
#[cfg(feature = "gui")]
pub mod gui;
pub mod icon;
pub mod menu;
pub mod surface;
pub mod sys;
