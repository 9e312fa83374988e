//! Tray menu state and the intents it sends to the host application.

use crate::ui::theme;
use async_channel::{Receiver, Sender};
use iced::widget::text::Wrapping;
use iced::widget::{Row, button, container, text};
use iced::{Element, Length};
use tracing::{debug, warn};

const TOOLTIP: &str = "TomodOrange";
const GHOST_TOOLTIP: &str = "TomodOrange (Ghost Mode)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIntent {
    ShowSettings,
    ToggleGhost(bool),
    ToggleMute(bool),
    ToggleWorkLog(bool),
    ReviewLogs,
    Quit,
}

/// Menu entries, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    Mute,
    WorkLog,
    ReviewLogs,
    Ghost,
    Settings,
    Exit,
}

impl TrayAction {
    pub const ALL: [TrayAction; 6] = [
        TrayAction::Mute,
        TrayAction::WorkLog,
        TrayAction::ReviewLogs,
        TrayAction::Ghost,
        TrayAction::Settings,
        TrayAction::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Mute => "Mute",
            Self::WorkLog => "Enable Work Logs",
            Self::ReviewLogs => "Review Logs",
            Self::Ghost => "Ghost Mode",
            Self::Settings => "Settings",
            Self::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationReason {
    Trigger,
    Context,
    DoubleClick,
    MiddleClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIcon {
    Normal,
    Grayscale,
}

/// A checkable menu entry. While notifications are blocked, state changes
/// report nothing.
#[derive(Debug, Clone, Copy, Default)]
struct CheckableAction {
    checked: bool,
    blocked: bool,
}

impl CheckableAction {
    fn set_checked(&mut self, checked: bool) -> Option<bool> {
        let changed = self.checked != checked;
        self.checked = checked;
        (changed && !self.blocked).then_some(checked)
    }

    fn toggle(&mut self) -> Option<bool> {
        self.set_checked(!self.checked)
    }

    fn set_checked_silently(&mut self, checked: bool) {
        let was_blocked = std::mem::replace(&mut self.blocked, true);
        let _ = self.set_checked(checked);
        self.blocked = was_blocked;
    }
}

#[derive(Debug)]
pub struct TrayMenu {
    intents: Sender<TrayIntent>,
    mute: CheckableAction,
    work_log: CheckableAction,
    ghost: CheckableAction,
    icon: TrayIcon,
}

impl TrayMenu {
    pub fn new() -> (Self, Receiver<TrayIntent>) {
        let (intents, receiver) = async_channel::unbounded();
        (
            Self {
                intents,
                mute: CheckableAction::default(),
                work_log: CheckableAction::default(),
                ghost: CheckableAction::default(),
                icon: TrayIcon::Normal,
            },
            receiver,
        )
    }

    /// User activation of a menu entry.
    pub fn trigger(&mut self, action: TrayAction) {
        let intent = match action {
            TrayAction::Mute => self.mute.toggle().map(TrayIntent::ToggleMute),
            TrayAction::WorkLog => self.work_log.toggle().map(TrayIntent::ToggleWorkLog),
            TrayAction::Ghost => self.ghost.toggle().map(TrayIntent::ToggleGhost),
            TrayAction::ReviewLogs => Some(TrayIntent::ReviewLogs),
            TrayAction::Settings => Some(TrayIntent::ShowSettings),
            TrayAction::Exit => Some(TrayIntent::Quit),
        };
        if let Some(intent) = intent {
            self.send(intent);
        }
    }

    /// Clicks on the tray icon itself. Only a primary click opens settings.
    pub fn activate(&mut self, reason: ActivationReason) {
        match reason {
            ActivationReason::Trigger => self.send(TrayIntent::ShowSettings),
            other => debug!("[tray] ignoring activation {other:?}"),
        }
    }

    pub fn update_ghost_state(&mut self, ghost: bool) {
        self.ghost.set_checked_silently(ghost);
        self.icon = if ghost {
            TrayIcon::Grayscale
        } else {
            TrayIcon::Normal
        };
    }

    pub fn update_mute_state(&mut self, muted: bool) {
        self.mute.set_checked_silently(muted);
    }

    pub fn update_work_log_state(&mut self, enabled: bool) {
        self.work_log.set_checked_silently(enabled);
    }

    pub fn is_checked(&self, action: TrayAction) -> Option<bool> {
        match action {
            TrayAction::Mute => Some(self.mute.checked),
            TrayAction::WorkLog => Some(self.work_log.checked),
            TrayAction::Ghost => Some(self.ghost.checked),
            _ => None,
        }
    }

    pub fn icon(&self) -> TrayIcon {
        self.icon
    }

    pub fn tooltip(&self) -> &'static str {
        match self.icon {
            TrayIcon::Normal => TOOLTIP,
            TrayIcon::Grayscale => GHOST_TOOLTIP,
        }
    }

    fn send(&self, intent: TrayIntent) {
        debug!("[tray] {intent:?}");
        if let Err(err) = self.intents.try_send(intent) {
            warn!("[tray] failed to send intent: {err}");
        }
    }

    pub fn view(&self) -> Element<'_, TrayAction> {
        TrayAction::ALL
            .into_iter()
            .fold(Row::new().spacing(6.0), |row, action| {
                let checked = self.is_checked(action);
                let label = match checked {
                    Some(true) => format!("[x] {}", action.label()),
                    Some(false) => format!("[ ] {}", action.label()),
                    None => action.label().to_string(),
                };
                row.push(
                    button(container(text(label).size(11).wrapping(Wrapping::None)).clip(true))
                        .padding([4, 6])
                        .width(Length::Shrink)
                        .style(move |t, s| {
                            theme::chip_style(t, checked.unwrap_or(false), s)
                        })
                        .on_press(action),
                )
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &Receiver<TrayIntent>) -> Vec<TrayIntent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn actions_emit_their_intents() {
        let (mut tray, rx) = TrayMenu::new();
        for action in TrayAction::ALL {
            tray.trigger(action);
        }
        assert_eq!(
            drain(&rx),
            [
                TrayIntent::ToggleMute(true),
                TrayIntent::ToggleWorkLog(true),
                TrayIntent::ReviewLogs,
                TrayIntent::ToggleGhost(true),
                TrayIntent::ShowSettings,
                TrayIntent::Quit,
            ]
        );
    }

    #[test]
    fn checkable_actions_toggle_back() {
        let (mut tray, rx) = TrayMenu::new();
        tray.trigger(TrayAction::Mute);
        tray.trigger(TrayAction::Mute);
        assert_eq!(
            drain(&rx),
            [TrayIntent::ToggleMute(true), TrayIntent::ToggleMute(false)]
        );
        assert_eq!(tray.is_checked(TrayAction::Mute), Some(false));
    }

    #[test]
    fn external_updates_are_silent() {
        let (mut tray, rx) = TrayMenu::new();
        tray.update_mute_state(true);
        tray.update_work_log_state(true);
        tray.update_ghost_state(true);
        tray.update_ghost_state(true);

        assert!(drain(&rx).is_empty());
        assert_eq!(tray.is_checked(TrayAction::Mute), Some(true));
        assert_eq!(tray.is_checked(TrayAction::WorkLog), Some(true));
        assert_eq!(tray.is_checked(TrayAction::Ghost), Some(true));

        // The next user click continues from the externally set state.
        tray.trigger(TrayAction::WorkLog);
        assert_eq!(drain(&rx), [TrayIntent::ToggleWorkLog(false)]);
    }

    #[test]
    fn ghost_state_switches_icon_and_tooltip() {
        let (mut tray, _rx) = TrayMenu::new();
        assert_eq!(tray.icon(), TrayIcon::Normal);
        assert_eq!(tray.tooltip(), "TomodOrange");

        tray.update_ghost_state(true);
        assert_eq!(tray.icon(), TrayIcon::Grayscale);
        assert_eq!(tray.tooltip(), "TomodOrange (Ghost Mode)");

        tray.update_ghost_state(false);
        assert_eq!(tray.icon(), TrayIcon::Normal);
    }

    #[test]
    fn only_primary_activation_opens_settings() {
        let (mut tray, rx) = TrayMenu::new();
        tray.activate(ActivationReason::Context);
        tray.activate(ActivationReason::DoubleClick);
        tray.activate(ActivationReason::MiddleClick);
        assert!(drain(&rx).is_empty());

        tray.activate(ActivationReason::Trigger);
        assert_eq!(drain(&rx), [TrayIntent::ShowSettings]);
    }

    #[test]
    fn plain_actions_are_not_checkable() {
        let (tray, _rx) = TrayMenu::new();
        assert_eq!(tray.is_checked(TrayAction::Settings), None);
        assert_eq!(tray.is_checked(TrayAction::Exit), None);
    }
}
