// Shared widgets and utilities for the settings panel

use crate::ui::theme;
use iced::widget::text::Wrapping;
use iced::widget::{column, container, slider, text, toggler};
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}
impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }
    pub fn integral(range: &RangeInclusive<u32>) -> Self {
        Self::new(*range.start() as f32, *range.end() as f32, 1.0)
    }
    #[inline]
    pub fn snap(self, value: f32) -> f32 {
        debug_assert!(self.step > 0.0, "SliderRange::snap expects a positive step");
        if self.step <= 0.0 {
            return value.clamp(self.min, self.max);
        }
        (self.min + ((value - self.min) / self.step).round() * self.step).clamp(self.min, self.max)
    }
    #[inline]
    pub fn snap_u32(self, value: f32) -> u32 {
        let snapped = self.snap(if value.is_finite() { value } else { self.min });
        snapped.round() as u32
    }
}

#[inline]
pub fn set_if_changed<T: PartialEq>(target: &mut T, value: T) -> bool {
    if *target != value {
        *target = value;
        true
    } else {
        false
    }
}

#[inline]
pub fn update_u32_from_f32(target: &mut u32, value: f32, range: SliderRange) -> bool {
    debug_assert!(
        [range.min, range.max, range.step]
            .into_iter()
            .all(|v| v.fract().abs() <= f32::EPSILON),
        "update_u32_from_f32 expects integral slider bounds"
    );
    set_if_changed(target, range.snap_u32(value))
}

pub fn labeled_slider<'a, M: Clone + 'a>(
    label: &'static str,
    value: u32,
    range: SliderRange,
    on_change: impl Fn(f32) -> M + 'a,
) -> iced::widget::Column<'a, M> {
    let slider = slider::Slider::new(range.min..=range.max, value as f32, on_change)
        .step(range.step)
        .style(theme::slider_style);
    let header = text(format!("{label}: {value}"))
        .size(12)
        .wrapping(Wrapping::None);
    column![container(header).clip(true), slider].spacing(8.0)
}

pub fn labeled_toggler<'a, M: 'a>(
    label: &'static str,
    value: bool,
    on_toggle: impl Fn(bool) -> M + 'a,
) -> iced::widget::Toggler<'a, M> {
    toggler(value)
        .label(label)
        .spacing(4)
        .text_size(11)
        .on_toggle(on_toggle)
}

pub fn section_title<'a, M: 'a>(label: &'static str) -> container::Container<'a, M> {
    container(text(label).size(14).wrapping(Wrapping::None)).clip(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_clamps_and_rounds_to_step() {
        let range = SliderRange::integral(&(10..=100));
        assert_eq!(range.snap_u32(64.6), 65);
        assert_eq!(range.snap_u32(3.0), 10);
        assert_eq!(range.snap_u32(180.0), 100);
        assert_eq!(range.snap_u32(f32::NAN), 10);
    }

    #[test]
    fn update_reports_only_real_changes() {
        let range = SliderRange::integral(&(1..=120));
        let mut minutes = 25;
        assert!(!update_u32_from_f32(&mut minutes, 25.2, range));
        assert!(update_u32_from_f32(&mut minutes, 45.0, range));
        assert_eq!(minutes, 45);
    }
}
