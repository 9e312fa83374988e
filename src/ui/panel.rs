//! Settings panel: one control per setting, live persistence and broadcast.
//!
//! Control values live in [`ControlState`]. Mapping between it and
//! [`Settings`] is pure, so the panel's behavior is testable without a
//! window.

pub mod color_picker;
mod widgets;

use self::color_picker::{ColorPicker, ColorTarget, PickerEvent, PickerOutcome};
use self::widgets::{
    SliderRange, labeled_slider, labeled_toggler, section_title, set_if_changed,
    update_u32_from_f32,
};
use crate::ui::settings::{
    BREAK_MINUTES_RANGE, ColorSetting, Settings, SettingsBroadcast, SettingsStore,
    TEXT_SIZE_RANGE, TimerStyle, VOLUME_RANGE, WORK_MINUTES_RANGE,
};
use crate::ui::theme;
use async_channel::Receiver;
use iced::widget::text::Wrapping;
use iced::widget::{Column, Row, button, column, container, scrollable, text};
use iced::{Element, Length};
use tracing::{debug, info};

pub const PANEL_TITLE: &str = "Settings - TomodOrange";

const TEXT_OPACITY_RANGE: SliderRange = SliderRange::new(10.0, 100.0, 1.0);
const BG_OPACITY_RANGE: SliderRange = SliderRange::new(0.0, 100.0, 1.0);
const ORANGE_OPACITY_RANGE: SliderRange = SliderRange::new(10.0, 100.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderControl {
    WorkMinutes,
    BreakMinutes,
    TextSize,
    TextOpacity,
    BgOpacity,
    OrangeOpacity,
    WorkVolume,
    BreakVolume,
}

impl SliderControl {
    pub fn range(self) -> SliderRange {
        match self {
            Self::WorkMinutes => SliderRange::integral(&WORK_MINUTES_RANGE),
            Self::BreakMinutes => SliderRange::integral(&BREAK_MINUTES_RANGE),
            Self::TextSize => SliderRange::integral(&TEXT_SIZE_RANGE),
            Self::TextOpacity => TEXT_OPACITY_RANGE,
            Self::BgOpacity => BG_OPACITY_RANGE,
            Self::OrangeOpacity => ORANGE_OPACITY_RANGE,
            Self::WorkVolume | Self::BreakVolume => SliderRange::integral(&VOLUME_RANGE),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::WorkMinutes => "Work",
            Self::BreakMinutes => "Break",
            Self::TextSize => "Size",
            Self::TextOpacity => "Text Opacity",
            Self::BgOpacity => "Background Opacity",
            Self::OrangeOpacity => "Orange Opacity",
            Self::WorkVolume => "Work Volume (Tic)",
            Self::BreakVolume => "Break Volume (Waves)",
        }
    }
}

/// Controls whose availability can depend on the timer style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Slider(SliderControl),
    WorkColorButton,
    BreakColorButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub visible: bool,
    pub enabled: bool,
}

impl Availability {
    const fn both(on: bool) -> Self {
        Self {
            visible: on,
            enabled: on,
        }
    }
}

/// Shown and enabled state of `control` under `style`.
///
/// Orange mode owns the orange opacity slider. Time mode owns the text and
/// background opacity sliders and both color buttons. Everything else is
/// always available.
pub fn availability(style: TimerStyle, control: Control) -> Availability {
    let orange = style == TimerStyle::Orange;
    match control {
        Control::Slider(SliderControl::TextOpacity | SliderControl::BgOpacity)
        | Control::WorkColorButton
        | Control::BreakColorButton => Availability::both(!orange),
        Control::Slider(SliderControl::OrangeOpacity) => Availability::both(orange),
        Control::Slider(_) => Availability::both(true),
    }
}

#[inline]
fn opacity_to_percent(opacity: f32, range: SliderRange) -> u32 {
    range.snap_u32(opacity * 100.0)
}

#[inline]
fn percent_to_opacity(percent: u32) -> f32 {
    percent as f32 / 100.0
}

/// Raw values held by the panel's controls. Opacities are slider percents.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub style: TimerStyle,
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub work_color: ColorSetting,
    pub break_color: ColorSetting,
    pub text_size: u32,
    pub text_opacity: u32,
    pub bg_opacity: u32,
    pub orange_opacity: u32,
    pub work_volume: u32,
    pub break_volume: u32,
    pub run_at_startup: bool,
}

impl ControlState {
    /// Applies a settings mapping to the controls, clamping each value to
    /// its control's range.
    pub fn from_settings(s: &Settings) -> Self {
        let int = |value: u32, control: SliderControl| control.range().snap_u32(value as f32);
        Self {
            style: s.timer_style,
            work_minutes: int(s.work_minutes, SliderControl::WorkMinutes),
            break_minutes: int(s.break_minutes, SliderControl::BreakMinutes),
            work_color: s.work_color,
            break_color: s.break_color,
            text_size: int(s.text_size, SliderControl::TextSize),
            text_opacity: opacity_to_percent(s.text_opacity, TEXT_OPACITY_RANGE),
            bg_opacity: opacity_to_percent(s.bg_opacity, BG_OPACITY_RANGE),
            orange_opacity: opacity_to_percent(s.orange_opacity, ORANGE_OPACITY_RANGE),
            work_volume: int(s.work_volume, SliderControl::WorkVolume),
            break_volume: int(s.break_volume, SliderControl::BreakVolume),
            run_at_startup: s.run_at_startup,
        }
    }

    /// Rebuilds the full settings snapshot from the controls.
    pub fn to_settings(&self, work_log_enabled: bool) -> Settings {
        Settings {
            work_minutes: self.work_minutes,
            break_minutes: self.break_minutes,
            work_color: self.work_color,
            break_color: self.break_color,
            text_size: self.text_size,
            text_opacity: percent_to_opacity(self.text_opacity),
            bg_opacity: percent_to_opacity(self.bg_opacity),
            orange_opacity: percent_to_opacity(self.orange_opacity),
            timer_style: self.style,
            work_volume: self.work_volume,
            break_volume: self.break_volume,
            run_at_startup: self.run_at_startup,
            work_log_enabled,
        }
    }

    pub fn slider(&self, control: SliderControl) -> u32 {
        match control {
            SliderControl::WorkMinutes => self.work_minutes,
            SliderControl::BreakMinutes => self.break_minutes,
            SliderControl::TextSize => self.text_size,
            SliderControl::TextOpacity => self.text_opacity,
            SliderControl::BgOpacity => self.bg_opacity,
            SliderControl::OrangeOpacity => self.orange_opacity,
            SliderControl::WorkVolume => self.work_volume,
            SliderControl::BreakVolume => self.break_volume,
        }
    }

    fn slider_mut(&mut self, control: SliderControl) -> &mut u32 {
        match control {
            SliderControl::WorkMinutes => &mut self.work_minutes,
            SliderControl::BreakMinutes => &mut self.break_minutes,
            SliderControl::TextSize => &mut self.text_size,
            SliderControl::TextOpacity => &mut self.text_opacity,
            SliderControl::BgOpacity => &mut self.bg_opacity,
            SliderControl::OrangeOpacity => &mut self.orange_opacity,
            SliderControl::WorkVolume => &mut self.work_volume,
            SliderControl::BreakVolume => &mut self.break_volume,
        }
    }

    pub fn color(&self, target: ColorTarget) -> ColorSetting {
        match target {
            ColorTarget::Work => self.work_color,
            ColorTarget::Break => self.break_color,
        }
    }

    fn color_mut(&mut self, target: ColorTarget) -> &mut ColorSetting {
        match target {
            ColorTarget::Work => &mut self.work_color,
            ColorTarget::Break => &mut self.break_color,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PanelMessage {
    StyleSelected(TimerStyle),
    SliderChanged(SliderControl, f32),
    RunAtStartup(bool),
    OpenColorPicker(ColorTarget),
    Picker(PickerEvent),
    CloseRequested,
}

/// The singleton settings panel. Closing hides it; it is never destroyed.
#[derive(Debug)]
pub struct SettingsPanel {
    store: SettingsStore,
    broadcast: SettingsBroadcast,
    controls: ControlState,
    work_log_enabled: bool,
    visible: bool,
    picker: Option<ColorPicker>,
}

impl SettingsPanel {
    pub fn new(store: SettingsStore) -> Self {
        let settings = store.load();
        debug!("[panel] loaded {settings:?} via {:?}", store.paths());
        Self {
            store,
            broadcast: SettingsBroadcast::new(),
            controls: ControlState::from_settings(&settings),
            work_log_enabled: settings.work_log_enabled,
            visible: false,
            picker: None,
        }
    }

    /// Registers a `settings_changed` subscriber.
    pub fn subscribe(&mut self) -> Receiver<Settings> {
        self.broadcast.subscribe()
    }

    #[cfg(test)]
    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn current_settings(&self) -> Settings {
        self.controls.to_settings(self.work_log_enabled)
    }

    pub fn availability(&self, control: Control) -> Availability {
        availability(self.controls.style, control)
    }

    pub fn work_log_enabled(&self) -> bool {
        self.work_log_enabled
    }

    /// Updates the flag carried in later snapshots without emitting one.
    pub fn set_work_log_enabled(&mut self, enabled: bool) {
        self.work_log_enabled = enabled;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn request_close(&mut self) {
        if self.visible {
            info!("[panel] hiding settings");
        }
        self.visible = false;
    }

    #[cfg(test)]
    pub fn picker(&self) -> Option<&ColorPicker> {
        self.picker.as_ref()
    }

    /// Opens the picker for `target`, seeded with its current color.
    pub fn open_color_picker(&mut self, target: ColorTarget) -> Option<&ColorPicker> {
        if !self.availability(color_button(target)).enabled {
            return None;
        }
        self.picker = Some(ColorPicker::open(target, self.controls.color(target)));
        self.picker.as_ref()
    }

    /// Applies a picker result. `None` means the picker was cancelled.
    pub fn apply_color_selection(
        &mut self,
        target: ColorTarget,
        selection: Option<ColorSetting>,
    ) -> bool {
        let Some(color) = selection else {
            return false;
        };
        if !self.availability(color_button(target)).enabled {
            debug!("[panel] ignoring {target:?} color while its button is disabled");
            return false;
        }
        let changed = set_if_changed(self.controls.color_mut(target), color);
        if changed {
            self.emit();
        }
        changed
    }

    /// Handles one control change. Returns `true` if a snapshot was emitted.
    pub fn update(&mut self, message: PanelMessage) -> bool {
        let changed = match message {
            PanelMessage::StyleSelected(style) => {
                let changed = set_if_changed(&mut self.controls.style, style);
                if !self.availability(Control::WorkColorButton).enabled {
                    self.picker = None;
                }
                changed
            }
            PanelMessage::SliderChanged(control, _)
                if !self.availability(Control::Slider(control)).enabled =>
            {
                debug!("[panel] ignoring change on disabled {control:?}");
                false
            }
            PanelMessage::SliderChanged(control, value) => {
                update_u32_from_f32(self.controls.slider_mut(control), value, control.range())
            }
            PanelMessage::RunAtStartup(enabled) => {
                set_if_changed(&mut self.controls.run_at_startup, enabled)
            }
            PanelMessage::OpenColorPicker(target) => {
                self.open_color_picker(target);
                false
            }
            PanelMessage::Picker(event) => {
                let outcome = self.picker.as_mut().and_then(|p| p.update(event));
                match outcome {
                    Some(PickerOutcome::Selected(target, color)) => {
                        self.picker = None;
                        return self.apply_color_selection(target, Some(color));
                    }
                    Some(PickerOutcome::Cancelled) => {
                        self.picker = None;
                        false
                    }
                    None => false,
                }
            }
            PanelMessage::CloseRequested => {
                self.request_close();
                false
            }
        };

        if changed {
            self.emit();
        }
        changed
    }

    // Persist first, then notify.
    fn emit(&mut self) {
        let settings = self.current_settings();
        self.store.save(&settings);
        self.broadcast.emit(&settings);
    }

    pub fn view(&self) -> Element<'_, PanelMessage> {
        let style_row = TimerStyle::ALL
            .into_iter()
            .fold(Row::new().spacing(8.0), |row, style| {
                let active = self.controls.style == style;
                row.push(
                    button(text(style.to_string()).size(12).wrapping(Wrapping::None))
                        .padding([6, 10])
                        .width(Length::Fill)
                        .style(move |t, s| theme::chip_style(t, active, s))
                        .on_press(PanelMessage::StyleSelected(style)),
                )
            });

        let durations = Row::new()
            .spacing(12.0)
            .push(self.slider(SliderControl::WorkMinutes).width(Length::Fill))
            .push(self.slider(SliderControl::BreakMinutes).width(Length::Fill));

        let mut visuals = Column::new().spacing(12.0);
        if self.availability(Control::WorkColorButton).visible {
            visuals = visuals.push(
                Row::new()
                    .spacing(12.0)
                    .push(self.color_button(ColorTarget::Work))
                    .push(self.color_button(ColorTarget::Break)),
            );
        }
        if let Some(picker) = &self.picker {
            visuals = visuals.push(picker.view().map(PanelMessage::Picker));
        }
        for control in [
            SliderControl::TextSize,
            SliderControl::TextOpacity,
            SliderControl::BgOpacity,
            SliderControl::OrangeOpacity,
        ] {
            if self.availability(Control::Slider(control)).visible {
                visuals = visuals.push(self.slider(control));
            }
        }

        let audio = column![
            self.slider(SliderControl::WorkVolume),
            self.slider(SliderControl::BreakVolume),
        ]
        .spacing(12.0);

        let content = column![
            section_title(PANEL_TITLE),
            section_title("Timer Style"),
            style_row,
            section_title("Timer Durations (Minutes)"),
            durations,
            section_title("Visual Appearance"),
            visuals,
            section_title("Audio Levels"),
            audio,
            section_title("System"),
            labeled_toggler(
                "Run at Startup",
                self.controls.run_at_startup,
                PanelMessage::RunAtStartup
            ),
        ]
        .spacing(12.0);

        container(scrollable(content).height(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn slider(&self, control: SliderControl) -> Column<'_, PanelMessage> {
        labeled_slider(
            control.label(),
            self.controls.slider(control),
            control.range(),
            move |value| PanelMessage::SliderChanged(control, value),
        )
    }

    fn color_button(&self, target: ColorTarget) -> Element<'_, PanelMessage> {
        let editing = self.picker.as_ref().filter(|p| p.target() == target);
        let color = editing.map_or(self.controls.color(target), ColorPicker::color);
        let active = editing.is_some();
        button(
            Column::new()
                .spacing(4.0)
                .push(text(format!("{} Color", target.label())).size(11))
                .push(color_picker::swatch(color, active)),
        )
        .padding([6, 8])
        .style(|t, s| theme::chip_style(t, false, s))
        .on_press(PanelMessage::OpenColorPicker(target))
        .into()
    }
}

fn color_button(target: ColorTarget) -> Control {
    match target {
        ColorTarget::Work => Control::WorkColorButton,
        ColorTarget::Break => Control::BreakColorButton,
    }
}
