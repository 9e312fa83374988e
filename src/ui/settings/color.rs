use iced::Color;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A timer color persisted as a hex string (`#rgb`, `#rgba`, `#rrggbb` or
/// `#rrggbbaa`).
#[derive(Debug, Clone, Copy)]
pub struct ColorSetting(Color);

impl ColorSetting {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Color::from_rgb8(r, g, b))
    }

    pub fn rgba8(self) -> [u8; 4] {
        self.0.into_rgba8()
    }

    /// Replaces one of the red, green or blue channels, keeping alpha.
    pub fn with_channel(self, channel: usize, value: u8) -> Self {
        let mut color = self.0;
        let value = f32::from(value) / 255.0;
        match channel {
            0 => color.r = value,
            1 => color.g = value,
            _ => color.b = value,
        }
        Self(color)
    }
}

// Colors are stored at 8 bits per channel, so compare what would be written.
impl PartialEq for ColorSetting {
    fn eq(&self, other: &Self) -> bool {
        self.rgba8() == other.rgba8()
    }
}

impl fmt::Display for ColorSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for ColorSetting {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColorSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        let hex = value.trim();
        // iced slices the string by byte offsets.
        if !hex.is_ascii() {
            return Err(de::Error::custom(format!("invalid color {value:?}")));
        }
        hex.parse::<Color>()
            .map(ColorSetting)
            .map_err(|err| de::Error::custom(format!("invalid color {value:?}: {err}")))
    }
}

impl From<Color> for ColorSetting {
    fn from(color: Color) -> Self {
        Self(color)
    }
}

impl From<ColorSetting> for Color {
    fn from(ColorSetting(color): ColorSetting) -> Self {
        color
    }
}
