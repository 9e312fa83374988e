pub mod app;
pub mod panel;
pub mod settings;
pub mod theme;
pub mod tray;

pub use app::{UiConfig, run};
