use crate::ui::panel::{PANEL_TITLE, PanelMessage, SettingsPanel};
use crate::ui::settings::{Settings, SettingsPaths, SettingsStore};
use crate::ui::theme;
use crate::ui::tray::{ActivationReason, TrayAction, TrayIcon, TrayIntent, TrayMenu};
use async_channel::Receiver as AsyncReceiver;
use iced::advanced::subscription::{EventStream, Hasher, Recipe, from_recipe};
use iced::futures::{self, StreamExt};
use iced::widget::text::Wrapping;
use iced::widget::{column, container, mouse_area, text};
use iced::{Element, Length, Result, Size, Subscription, Task, window};
use std::hash::Hasher as _;
use std::sync::Arc;
use tracing::info;

const APP_PADDING: f32 = 16.0;

#[derive(Debug, Clone)]
pub struct UiConfig {
    paths: SettingsPaths,
}

impl UiConfig {
    pub fn new(paths: SettingsPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &SettingsPaths {
        &self.paths
    }
}

pub fn run(config: UiConfig) -> Result {
    iced::application(move || UiApp::new(&config), update, view)
        .title(title)
        .window(window::Settings {
            size: Size::new(440.0, 680.0),
            exit_on_close_request: false,
            ..window::Settings::default()
        })
        .theme(|app: &UiApp| theme::theme(&app.display))
        .subscription(UiApp::subscription)
        .run()
}

#[derive(Debug)]
struct UiApp {
    panel: SettingsPanel,
    tray: TrayMenu,
    intents: Arc<AsyncReceiver<TrayIntent>>,
    settings_updates: Arc<AsyncReceiver<Settings>>,
    // What the timer display was last told.
    display: Settings,
    muted: bool,
}

#[derive(Debug, Clone)]
enum Message {
    Panel(PanelMessage),
    Tray(TrayAction),
    TrayActivated(ActivationReason),
    Intent(TrayIntent),
    SettingsChanged(Settings),
    CloseRequested,
}

impl UiApp {
    fn new(config: &UiConfig) -> Self {
        let mut panel = SettingsPanel::new(SettingsStore::new(config.paths().clone()));
        let settings_updates = Arc::new(panel.subscribe());
        let (mut tray, intents) = TrayMenu::new();
        tray.update_work_log_state(panel.work_log_enabled());

        Self {
            display: panel.current_settings(),
            panel,
            tray,
            intents: Arc::new(intents),
            settings_updates,
            muted: false,
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            from_recipe(ChannelSubscription {
                receiver: Arc::clone(&self.intents),
                map: Message::Intent,
            }),
            from_recipe(ChannelSubscription {
                receiver: Arc::clone(&self.settings_updates),
                map: Message::SettingsChanged,
            }),
            window::close_requests().map(|_| Message::CloseRequested),
        ])
    }

    fn handle_intent(&mut self, intent: TrayIntent) -> Task<Message> {
        match intent {
            TrayIntent::ShowSettings => self.panel.show(),
            TrayIntent::ToggleGhost(ghost) => {
                info!("[app] ghost mode {}", on_off(ghost));
                self.tray.update_ghost_state(ghost);
            }
            TrayIntent::ToggleMute(muted) => {
                info!("[app] mute {}", on_off(muted));
                self.muted = muted;
                self.tray.update_mute_state(muted);
            }
            TrayIntent::ToggleWorkLog(enabled) => {
                info!("[app] work log {}", on_off(enabled));
                self.panel.set_work_log_enabled(enabled);
                self.tray.update_work_log_state(enabled);
            }
            TrayIntent::ReviewLogs => info!("[app] log review requested"),
            TrayIntent::Quit => {
                info!("[app] quitting");
                return iced::exit();
            }
        }
        Task::none()
    }

    fn status_line(&self) -> String {
        let s = &self.display;
        let mut line = format!(
            "{} | {} | work {}m / break {}m",
            self.tray.tooltip(),
            s.timer_style,
            s.work_minutes,
            s.break_minutes
        );
        if self.muted {
            line.push_str(" | muted");
        }
        line
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn title(app: &UiApp) -> String {
    if app.panel.is_visible() {
        PANEL_TITLE.to_string()
    } else {
        app.tray.tooltip().to_string()
    }
}

fn update(app: &mut UiApp, message: Message) -> Task<Message> {
    match message {
        Message::Panel(msg) => {
            app.panel.update(msg);
        }
        Message::Tray(action) => app.tray.trigger(action),
        Message::TrayActivated(reason) => app.tray.activate(reason),
        Message::Intent(intent) => return app.handle_intent(intent),
        Message::SettingsChanged(settings) => app.display = settings,
        Message::CloseRequested => {
            // The panel only hides; with nothing left to hide the host exits.
            if !app.panel.is_visible() {
                return app.handle_intent(TrayIntent::Quit);
            }
            app.panel.update(PanelMessage::CloseRequested);
        }
    }
    Task::none()
}

fn view(app: &UiApp) -> Element<'_, Message> {
    let ghost = app.tray.icon() == TrayIcon::Grayscale;
    // Stands in for the tray icon, so it reports the same click kinds.
    let icon = container(text(app.status_line()).size(12).wrapping(Wrapping::None))
        .width(Length::Fill)
        .padding(8)
        .style(move |t| theme::tray_icon_style(t, ghost));
    let header = mouse_area(icon)
        .on_press(Message::TrayActivated(ActivationReason::Trigger))
        .on_right_press(Message::TrayActivated(ActivationReason::Context))
        .on_double_click(Message::TrayActivated(ActivationReason::DoubleClick))
        .on_middle_press(Message::TrayActivated(ActivationReason::MiddleClick));

    let body: Element<'_, Message> = if app.panel.is_visible() {
        app.panel.view().map(Message::Panel)
    } else {
        text("Settings are hidden. Open them from the tray.")
            .size(12)
            .style(theme::hint_text)
            .into()
    };

    let layout = column![
        header,
        app.tray.view().map(Message::Tray),
        container(body).width(Length::Fill).height(Length::Fill),
    ]
    .spacing(12);

    container(layout)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(APP_PADDING)
        .into()
}

struct ChannelSubscription<T> {
    receiver: Arc<AsyncReceiver<T>>,
    map: fn(T) -> Message,
}

impl<T: Send + 'static> Recipe for ChannelSubscription<T> {
    type Output = Message;

    fn hash(&self, state: &mut Hasher) {
        let ptr = Arc::as_ptr(&self.receiver) as usize;
        state.write(&ptr.to_ne_bytes());
    }

    fn stream(
        self: Box<Self>,
        _input: EventStream,
    ) -> futures::stream::BoxStream<'static, Self::Output> {
        let map = self.map;
        futures::stream::unfold(self.receiver, move |receiver| async move {
            match receiver.recv().await {
                Ok(value) => Some((map(value), receiver)),
                Err(_) => None,
            }
        })
        .boxed()
    }
}
