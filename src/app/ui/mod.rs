pub mod control_bar;
pub mod main_panel;
pub mod orientation_view;

pub use control_bar::render_control_bar;
pub use main_panel::render_main_panel;
