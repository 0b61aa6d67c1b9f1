mod app;
mod theme;
mod views;

pub use app::HuddleApp;
pub use theme::{setup_fonts, setup_theme};
