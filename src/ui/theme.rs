//! Dark theme whose accents follow the configured work and break colors.

use crate::ui::settings::Settings;
use iced::border::{Border, Radius};
use iced::theme::palette::{self, Extended};
use iced::widget::{button, container, slider, text};
use iced::{Background, Color, Theme};

const BACKGROUND: Color = Color::from_rgb(0.082, 0.071, 0.063);
const TEXT: Color = Color::from_rgb(0.925, 0.906, 0.878);
const OUTLINE: Color = Color::from_rgb(0.243, 0.220, 0.200);
const DANGER: Color = Color::from_rgb(0.800, 0.298, 0.259);

const CORNER: f32 = 4.0;

/// Builds the theme for the current settings. The work color becomes the
/// primary accent and the break color the success accent.
pub fn theme(settings: &Settings) -> Theme {
    Theme::custom_with_fn(
        "TomodOrange",
        accent_palette(settings.work_color.into(), settings.break_color.into()),
        Extended::generate,
    )
}

fn accent_palette(work: Color, rest: Color) -> palette::Palette {
    palette::Palette {
        background: BACKGROUND,
        text: TEXT,
        primary: opaque(work),
        success: opaque(rest),
        warning: opaque(work),
        danger: DANGER,
    }
}

fn opaque(color: Color) -> Color {
    Color { a: 1.0, ..color }
}

/// Perceived brightness as a gray of the same alpha.
pub fn grayscale(color: Color) -> Color {
    let luma = 0.299 * color.r + 0.587 * color.g + 0.114 * color.b;
    Color::from_rgba(luma, luma, luma, color.a)
}

pub fn outline(highlight: Option<Color>) -> Border {
    Border {
        color: highlight.unwrap_or(OUTLINE),
        width: if highlight.is_some() { 2.0 } else { 1.0 },
        radius: Radius::from(CORNER),
    }
}

/// Toggle-like buttons: style tabs, tray entries, picker actions.
pub fn chip_style(theme: &Theme, selected: bool, status: button::Status) -> button::Style {
    let p = theme.extended_palette();
    let pair = if selected {
        p.primary.base
    } else {
        p.background.weak
    };
    let fill = match status {
        button::Status::Hovered => palette::deviate(pair.color, 0.06),
        button::Status::Pressed => palette::deviate(pair.color, 0.12),
        button::Status::Disabled => palette::mix(pair.color, p.background.base.color, 0.5),
        button::Status::Active => pair.color,
    };
    let highlight = (status == button::Status::Pressed).then_some(p.primary.strong.color);
    button::Style {
        background: Some(Background::Color(fill)),
        text_color: pair.text,
        border: outline(highlight),
        ..Default::default()
    }
}

/// The tray icon stand-in. Ghost mode drains its color.
pub fn tray_icon_style(theme: &Theme, ghost: bool) -> container::Style {
    let p = theme.extended_palette();
    let accent = if ghost {
        grayscale(p.primary.base.color)
    } else {
        p.primary.base.color
    };
    container::Style {
        background: Some(Background::Color(palette::mix(
            p.background.base.color,
            accent,
            0.25,
        ))),
        text_color: Some(p.background.base.text),
        border: outline(Some(accent)),
        ..Default::default()
    }
}

pub fn card(theme: &Theme) -> container::Style {
    let p = theme.extended_palette();
    container::Style {
        background: Some(Background::Color(p.background.weaker.color)),
        text_color: Some(p.background.weaker.text),
        border: outline(None),
        ..Default::default()
    }
}

pub fn hint_text(theme: &Theme) -> text::Style {
    text::Style {
        color: Some(palette::mix(
            theme.extended_palette().background.base.text,
            BACKGROUND,
            0.45,
        )),
    }
}

pub fn slider_style(theme: &Theme, status: slider::Status) -> slider::Style {
    let p = theme.extended_palette();
    let filled = p.primary.base.color;
    let handle = match status {
        slider::Status::Active => filled,
        slider::Status::Hovered | slider::Status::Dragged => p.primary.strong.color,
    };

    slider::Style {
        rail: slider::Rail {
            backgrounds: (
                Background::Color(filled),
                Background::Color(p.background.strong.color),
            ),
            width: 4.0,
            border: Border {
                radius: Radius::from(2.0),
                ..Border::default()
            },
        },
        handle: slider::Handle {
            shape: slider::HandleShape::Rectangle {
                width: 10,
                border_radius: Radius::from(CORNER),
            },
            background: Background::Color(handle),
            border_color: p.background.base.color,
            border_width: 1.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::settings::ColorSetting;

    #[test]
    fn accents_follow_timer_colors() {
        let settings = Settings {
            work_color: ColorSetting::rgb(0x12, 0x34, 0x56),
            break_color: ColorSetting::rgb(0x65, 0x43, 0x21),
            ..Settings::default()
        };
        let palette = theme(&settings).palette();
        assert_eq!(palette.primary, Color::from_rgb8(0x12, 0x34, 0x56));
        assert_eq!(palette.success, Color::from_rgb8(0x65, 0x43, 0x21));
    }

    #[test]
    fn accents_ignore_color_alpha() {
        let palette = accent_palette(Color::from_rgba(1.0, 0.5, 0.0, 0.2), Color::BLACK);
        assert_eq!(palette.primary.a, 1.0);
    }

    #[test]
    fn grayscale_keeps_brightness_and_alpha() {
        let gray = grayscale(Color::from_rgba(1.0, 0.0, 0.0, 0.5));
        assert!((gray.r - 0.299).abs() < 1e-6);
        assert_eq!(gray.r, gray.g);
        assert_eq!(gray.g, gray.b);
        assert_eq!(gray.a, 0.5);
    }

    #[test]
    fn highlighted_outline_is_thicker() {
        assert_eq!(outline(None).width, 1.0);
        let focused = outline(Some(Color::WHITE));
        assert_eq!(focused.width, 2.0);
        assert_eq!(focused.color, Color::WHITE);
    }
}
