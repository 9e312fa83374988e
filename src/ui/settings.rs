// Settings persistence and management.

mod broadcast;
mod color;
mod data;
mod persistence;

pub use broadcast::SettingsBroadcast;
pub use color::ColorSetting;
pub use data::{
    BREAK_MINUTES_RANGE, Settings, TEXT_SIZE_RANGE, TimerStyle, VOLUME_RANGE, WORK_MINUTES_RANGE,
};
pub use persistence::{SettingsPaths, SettingsStore};
