// Modal color picker for the work and break colors.

use crate::ui::settings::ColorSetting;
use crate::ui::theme;
use iced::alignment::Vertical;
use iced::widget::text::Wrapping;
use iced::widget::{Button, Column, Row, Space, container, slider, text};
use iced::{Background, Element, Length, Theme};

const SWATCH_SIZE: (f32, f32) = (56.0, 28.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Work,
    Break,
}

impl ColorTarget {
    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerEvent {
    Adjust(ColorSetting),
    Accept,
    Cancel,
}

/// The selection a picker resolves to once it closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerOutcome {
    Selected(ColorTarget, ColorSetting),
    Cancelled,
}

/// Editing state for one open picker. Adjustments stay local until accepted.
#[derive(Debug, Clone)]
pub struct ColorPicker {
    target: ColorTarget,
    color: ColorSetting,
}

impl ColorPicker {
    pub fn open(target: ColorTarget, current: ColorSetting) -> Self {
        Self {
            target,
            color: current,
        }
    }

    pub fn target(&self) -> ColorTarget {
        self.target
    }

    pub fn color(&self) -> ColorSetting {
        self.color
    }

    pub fn title(&self) -> String {
        format!("Select {} Color", self.target.label())
    }

    /// Returns `Some` once the picker should close.
    pub fn update(&mut self, event: PickerEvent) -> Option<PickerOutcome> {
        match event {
            PickerEvent::Adjust(color) => {
                self.color = color;
                None
            }
            PickerEvent::Accept => Some(PickerOutcome::Selected(self.target, self.color)),
            PickerEvent::Cancel => Some(PickerOutcome::Cancelled),
        }
    }

    pub fn view(&self) -> Element<'_, PickerEvent> {
        let c = self.color;
        let header = Row::new()
            .spacing(8.0)
            .align_y(Vertical::Center)
            .push(container(text(self.title()).size(12).wrapping(Wrapping::None)).clip(true))
            .push(Space::new().width(Length::Fill).height(Length::Shrink))
            .push(swatch(c, true));

        let [r, g, b, _] = c.rgba8();
        let channels = [("R", r, 0usize), ("G", g, 1), ("B", b, 2)];
        let col = channels.into_iter().fold(
            Column::new().spacing(8.0).push(header),
            |col, (lbl, val, ch)| {
                col.push(
                    Row::new()
                        .spacing(8.0)
                        .align_y(Vertical::Center)
                        .push(
                            container(text(lbl).size(12).wrapping(Wrapping::None))
                                .width(Length::Fixed(32.0))
                                .clip(true),
                        )
                        .push(
                            slider::Slider::new(0.0..=255.0, f32::from(val), move |nv| {
                                let nv = nv.round().clamp(0.0, 255.0) as u8;
                                PickerEvent::Adjust(c.with_channel(ch, nv))
                            })
                            .step(1.0)
                            .style(theme::slider_style)
                            .width(Length::Fill),
                        )
                        .push(
                            container(text(format!("{val:>3}")).size(12).wrapping(Wrapping::None))
                                .clip(true),
                        ),
                )
            },
        );

        let actions = Row::new()
            .spacing(8.0)
            .push(Space::new().width(Length::Fill).height(Length::Shrink))
            .push(action_button("Cancel", PickerEvent::Cancel))
            .push(action_button("OK", PickerEvent::Accept));

        container(col.push(actions))
            .padding(12)
            .style(theme::card)
            .into()
    }
}

/// A color swatch with its hex code underneath.
pub fn swatch<'a, M: 'a>(color: ColorSetting, active: bool) -> Column<'a, M> {
    let (w, h) = SWATCH_SIZE;
    Column::new()
        .spacing(4.0)
        .push(
            container(Space::new().width(Length::Fill).height(Length::Fill))
                .width(Length::Fixed(w))
                .height(Length::Fixed(h))
                .style(move |t| swatch_style(t, color, active)),
        )
        .push(container(text(color.to_string()).size(11).wrapping(Wrapping::None)).clip(true))
}

fn action_button(label: &'static str, event: PickerEvent) -> Button<'static, PickerEvent> {
    Button::new(container(text(label).size(12).wrapping(Wrapping::None)).clip(true))
        .padding([6, 10])
        .style(|t, s| theme::chip_style(t, false, s))
        .on_press(event)
}

fn swatch_style(theme: &Theme, color: ColorSetting, active: bool) -> container::Style {
    let highlight = active.then(|| theme.extended_palette().background.base.text);
    container::Style::default()
        .background(Background::Color(color.into()))
        .border(theme::outline(highlight))
}
