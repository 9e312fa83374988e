use super::color::ColorSetting;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const WORK_MINUTES_RANGE: RangeInclusive<u32> = 1..=120;
pub const BREAK_MINUTES_RANGE: RangeInclusive<u32> = 1..=60;
pub const TEXT_SIZE_RANGE: RangeInclusive<u32> = 12..=300;
pub const VOLUME_RANGE: RangeInclusive<u32> = 0..=100;

macro_rules! settings_enum {
    ($(#[$attr:meta])* $vis:vis enum $name:ident { $($(#[$var_attr:meta])* $variant:ident => $label:expr),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
        #[serde(rename_all = "snake_case")] $(#[$attr])*
        $vis enum $name { $($(#[$var_attr])* $variant,)+ }
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self { $(Self::$variant => $label),+ })
            }
        }
    };
}

settings_enum!(pub enum TimerStyle { #[default] Orange => "Orange Visual", Classic => "Time" });

impl TimerStyle {
    pub const ALL: [TimerStyle; 2] = [TimerStyle::Orange, TimerStyle::Classic];
}

/// The effective settings mapping used by the running application.
///
/// `Default` is the compiled-in layer: the only source guaranteed to carry
/// every key. Field names are the persisted JSON keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub work_color: ColorSetting,
    pub break_color: ColorSetting,
    pub text_size: u32,
    pub text_opacity: f32,
    pub bg_opacity: f32,
    pub work_volume: u32,
    pub break_volume: u32,
    pub run_at_startup: bool,
    pub timer_style: TimerStyle,
    pub orange_opacity: f32,
    pub work_log_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
            work_color: ColorSetting::rgb(0xFF, 0xA5, 0x00),
            break_color: ColorSetting::rgb(0x32, 0xCD, 0x32),
            text_size: 40,
            text_opacity: 1.0,
            bg_opacity: 0.0,
            work_volume: 50,
            break_volume: 50,
            run_at_startup: true,
            timer_style: TimerStyle::Orange,
            orange_opacity: 0.25,
            work_log_enabled: false,
        }
    }
}

impl Settings {
    /// Clamps every numeric value into its domain.
    pub fn sanitize(&mut self) {
        fn clamp(value: &mut u32, range: &RangeInclusive<u32>) {
            *value = (*value).clamp(*range.start(), *range.end());
        }
        fn unit(value: &mut f32) {
            *value = if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                0.0
            };
        }

        clamp(&mut self.work_minutes, &WORK_MINUTES_RANGE);
        clamp(&mut self.break_minutes, &BREAK_MINUTES_RANGE);
        clamp(&mut self.text_size, &TEXT_SIZE_RANGE);
        clamp(&mut self.work_volume, &VOLUME_RANGE);
        clamp(&mut self.break_volume, &VOLUME_RANGE);
        unit(&mut self.text_opacity);
        unit(&mut self.bg_opacity);
        unit(&mut self.orange_opacity);
    }
}
