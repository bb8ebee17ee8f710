//! Application state and message handling
//!
//! The window, tray, and notifications all read from one state struct owned
//! by the iced runtime. Every VPN operation runs as an async task against the
//! shared session controller; the UI only reacts to the finished results.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use iced::{window, Element, Subscription, Task, Theme};
use tracing::{error, info, warn};

use hstray_core::config::AppConfig;
use hstray_core::error::SessionError;
use hstray_core::locale::{Lang, TextKey};
use hstray_core::types::{Credentials, Location};
use hstray_core::vpn::{ConnectionState, HttpProbe, SessionController, SystemRunner};

use crate::tray::{SystemTray, TrayCommand};
use crate::ui;

pub type Controller = SessionController<SystemRunner, HttpProbe>;

/// Command-line overrides applied on top of the configuration file
pub struct Flags {
    pub lang: Option<Lang>,
    pub command: Option<String>,
    pub auto_connect: bool,
}

/// In-progress login dialog input
#[derive(Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Inline error banner shown under the status frame
pub struct Banner {
    pub title: TextKey,
    pub body: TextKey,
}

#[derive(Debug, Clone)]
pub enum Message {
    PollTray,
    RefreshTick,
    StatusRefreshed(Result<ConnectionState, SessionError>),
    LocationsLoaded(Vec<Location>),
    ConnectPressed,
    DisconnectPressed,
    LocationPicked(String),
    ConnectFinished(Result<(), SessionError>),
    DisconnectFinished(Result<(), SessionError>),
    LoginPressed,
    LoginUsernameChanged(String),
    LoginPasswordChanged(String),
    LoginSubmitted,
    LoginCancelled,
    LoginFinished(bool),
    LogoutPressed,
    LogoutFinished(bool),
    LanguageToggled,
    WindowCloseRequested(window::Id),
    ShowWindowRequested,
    QuitRequested,
}

pub struct HstrayApp {
    controller: Arc<Controller>,
    pub lang: Lang,
    pub state: ConnectionState,
    pub locations: Vec<Location>,
    pub busy: bool,
    pub checked: bool,
    pub login: Option<LoginForm>,
    pub banner: Option<Banner>,
    retry_after_login: bool,
    pending_location: Option<String>,
    window_id: Option<window::Id>,
    window_hidden: bool,
    quitting: bool,
    tray: SystemTray,
    tray_rx: Receiver<TrayCommand>,
}

impl HstrayApp {
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let mut config = match hstray_core::config::load_or_default() {
            Ok(config) => config,
            Err(e) => {
                error!("failed to load configuration, using defaults: {e}");
                AppConfig::default()
            }
        };
        if let Some(command) = flags.command {
            config.command = command;
        }

        let lang = flags.lang.unwrap_or_else(|| config.default_language());

        let controller = match Controller::from_config(&config) {
            Ok(controller) => controller,
            Err(e) => {
                error!("invalid configuration, falling back to defaults: {e}");
                Controller::from_config(&AppConfig::default())
                    .expect("default configuration is valid")
            }
        };
        let controller = Arc::new(controller);

        let (tray, tray_rx) = SystemTray::new(lang);

        let mut app = HstrayApp {
            controller: controller.clone(),
            lang,
            state: ConnectionState::Disconnected,
            locations: Vec::new(),
            busy: false,
            checked: false,
            login: None,
            banner: None,
            retry_after_login: false,
            pending_location: None,
            window_id: None,
            window_hidden: false,
            quitting: false,
            tray,
            tray_rx,
        };

        let mut startup = vec![Task::perform(
            load_locations(controller.clone()),
            Message::LocationsLoaded,
        )];
        if flags.auto_connect {
            info!("auto-connecting on startup");
            app.busy = true;
            app.state = ConnectionState::Connecting;
            startup.push(Task::perform(
                run_connect(controller, None),
                Message::ConnectFinished,
            ));
        } else {
            startup.push(Task::perform(
                fetch_status(controller),
                Message::StatusRefreshed,
            ));
        }

        (app, Task::batch(startup))
    }

    pub fn title(&self) -> String {
        self.lang.text(TextKey::WindowTitle).to_string()
    }

    pub fn theme(&self) -> Theme {
        Theme::Light
    }

    pub fn view(&self) -> Element<'_, Message> {
        ui::view(self)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(Duration::from_millis(500)).map(|_| Message::PollTray),
            iced::time::every(Duration::from_secs(30)).map(|_| Message::RefreshTick),
            window::close_requests().map(Message::WindowCloseRequested),
        ])
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PollTray => {
                let mut tasks = Vec::new();
                while let Ok(command) = self.tray_rx.try_recv() {
                    tasks.push(self.handle_tray(command));
                }
                Task::batch(tasks)
            }
            Message::RefreshTick => {
                if self.busy {
                    Task::none()
                } else {
                    self.refresh_status()
                }
            }
            Message::StatusRefreshed(result) => {
                self.checked = true;
                match result {
                    // An operation in flight owns the state; drop stale reads
                    Ok(state) if !self.busy => self.apply_state(state),
                    Ok(_) => {}
                    Err(e) => warn!("status refresh failed: {e}"),
                }
                Task::none()
            }
            Message::LocationsLoaded(locations) => {
                self.locations = locations;
                Task::none()
            }
            Message::ConnectPressed => self.start_connect(None),
            Message::LocationPicked(code) => self.start_connect(Some(code)),
            Message::DisconnectPressed => self.start_disconnect(),
            Message::ConnectFinished(result) => self.finish_connect(result),
            Message::DisconnectFinished(result) => self.finish_disconnect(result),
            Message::LoginPressed => {
                if self.login.is_none() {
                    self.login = Some(LoginForm::default());
                    self.retry_after_login = false;
                }
                Task::none()
            }
            Message::LoginUsernameChanged(value) => {
                if let Some(form) = self.login.as_mut() {
                    form.username = value;
                }
                Task::none()
            }
            Message::LoginPasswordChanged(value) => {
                if let Some(form) = self.login.as_mut() {
                    form.password = value;
                }
                Task::none()
            }
            Message::LoginSubmitted => {
                let Some(form) = self.login.as_ref() else {
                    return Task::none();
                };
                if self.busy || form.username.trim().is_empty() || form.password.is_empty() {
                    return Task::none();
                }
                self.busy = true;
                self.banner = None;
                let credentials = Credentials::new(form.username.trim(), form.password.clone());
                Task::perform(
                    run_login(self.controller.clone(), credentials),
                    Message::LoginFinished,
                )
            }
            Message::LoginCancelled => {
                self.login = None;
                self.retry_after_login = false;
                Task::none()
            }
            Message::LoginFinished(success) => {
                self.busy = false;
                if success {
                    self.login = None;
                    if self.retry_after_login {
                        self.retry_after_login = false;
                        return self.start_connect(None);
                    }
                } else {
                    self.banner = Some(Banner {
                        title: TextKey::LoginFailed,
                        body: TextKey::ConnectionFailed,
                    });
                }
                Task::none()
            }
            Message::LogoutPressed => {
                if self.busy {
                    return Task::none();
                }
                self.busy = true;
                Task::perform(run_logout(self.controller.clone()), Message::LogoutFinished)
            }
            Message::LogoutFinished(success) => {
                self.busy = false;
                if success {
                    self.notify(TextKey::VpnConnection, self.lang.text(TextKey::LoggedOut));
                } else {
                    self.notify(TextKey::VpnConnection, self.lang.text(TextKey::LogoutFailed));
                }
                self.refresh_status()
            }
            Message::LanguageToggled => {
                self.lang = self.lang.toggled();
                self.tray.set_lang(self.lang);
                Task::none()
            }
            Message::WindowCloseRequested(id) => {
                // Closing the window minimizes to the tray; only Quit exits
                info!("window close intercepted, hiding to tray");
                self.window_id = Some(id);
                self.window_hidden = true;
                window::change_mode(id, window::Mode::Hidden)
            }
            Message::ShowWindowRequested => {
                let was_hidden = self.window_hidden;
                self.window_hidden = false;
                match self.window_id {
                    Some(id) if was_hidden => {
                        window::change_mode(id, window::Mode::Windowed)
                            .chain(window::gain_focus(id))
                    }
                    Some(id) => window::gain_focus(id),
                    // Never hidden yet, nothing to restore
                    None => Task::none(),
                }
            }
            Message::QuitRequested => {
                self.quitting = true;
                if self.state.is_connected() && !self.busy {
                    info!("disconnecting before exit");
                    self.busy = true;
                    self.state = ConnectionState::Disconnecting;
                    Task::perform(
                        run_disconnect(self.controller.clone()),
                        Message::DisconnectFinished,
                    )
                } else {
                    iced::exit()
                }
            }
        }
    }

    fn handle_tray(&mut self, command: TrayCommand) -> Task<Message> {
        match command {
            TrayCommand::ShowWindow => self.update(Message::ShowWindowRequested),
            TrayCommand::StatusCheck => self.update(Message::RefreshTick),
            TrayCommand::Connect => self.update(Message::ConnectPressed),
            TrayCommand::Disconnect => self.update(Message::DisconnectPressed),
            TrayCommand::Logout => self.update(Message::LogoutPressed),
            TrayCommand::Quit => self.update(Message::QuitRequested),
        }
    }

    fn start_connect(&mut self, location: Option<String>) -> Task<Message> {
        if self.busy {
            return Task::none();
        }
        self.busy = true;
        self.banner = None;
        self.state = ConnectionState::Connecting;
        self.pending_location = location.clone();
        Task::perform(
            run_connect(self.controller.clone(), location),
            Message::ConnectFinished,
        )
    }

    fn start_disconnect(&mut self) -> Task<Message> {
        if self.busy {
            return Task::none();
        }
        self.busy = true;
        self.banner = None;
        self.state = ConnectionState::Disconnecting;
        Task::perform(
            run_disconnect(self.controller.clone()),
            Message::DisconnectFinished,
        )
    }

    fn finish_connect(&mut self, result: Result<(), SessionError>) -> Task<Message> {
        self.busy = false;
        self.checked = true;
        let location = self.pending_location.take();
        match result {
            Ok(()) => {
                self.apply_state(ConnectionState::Connected);
                self.banner = None;
                let body = match location.and_then(|code| self.location_name(&code)) {
                    Some(name) => format!("{} {}", name, self.lang.text(TextKey::Connected)),
                    None => self.lang.text(TextKey::ConnectionSuccessful).to_string(),
                };
                self.notify(TextKey::VpnConnection, &body);
                Task::none()
            }
            Err(SessionError::NoNetwork) => {
                self.apply_state(ConnectionState::Disconnected);
                self.banner = Some(Banner {
                    title: TextKey::NoInternet,
                    body: TextKey::NoInternetMessage,
                });
                Task::none()
            }
            Err(SessionError::NotSignedIn) => {
                self.apply_state(ConnectionState::Disconnected);
                self.notify(TextKey::VpnConnection, self.lang.text(TextKey::NotSignedIn));
                self.login = Some(LoginForm::default());
                self.retry_after_login = true;
                Task::none()
            }
            Err(e) => {
                warn!("connect failed: {e}");
                self.state = ConnectionState::Error;
                self.tray.set_connected(false);
                self.banner = Some(Banner {
                    title: TextKey::ConnectionError,
                    body: TextKey::ConnectionFailedTryAgain,
                });
                self.refresh_status()
            }
        }
    }

    fn finish_disconnect(&mut self, result: Result<(), SessionError>) -> Task<Message> {
        self.busy = false;
        self.checked = true;
        if self.quitting {
            return iced::exit();
        }
        match result {
            Ok(()) => {
                self.apply_state(ConnectionState::Disconnected);
                self.notify(TextKey::VpnConnection, self.lang.text(TextKey::NotConnected));
                Task::none()
            }
            Err(e) => {
                warn!("disconnect failed: {e}");
                self.banner = Some(Banner {
                    title: TextKey::DisconnectError,
                    body: TextKey::ConnectionFailedTryAgain,
                });
                self.refresh_status()
            }
        }
    }

    fn refresh_status(&self) -> Task<Message> {
        Task::perform(fetch_status(self.controller.clone()), Message::StatusRefreshed)
    }

    fn apply_state(&mut self, state: ConnectionState) {
        self.state = state;
        self.tray.set_connected(state.is_connected());
    }

    fn location_name(&self, code: &str) -> Option<String> {
        self.locations
            .iter()
            .find(|location| location.code() == code)
            .map(|location| location.name().to_string())
    }

    fn notify(&self, title: TextKey, body: &str) {
        let result = notify_rust::Notification::new()
            .summary(self.lang.text(title))
            .body(body)
            .icon("network-vpn")
            .show();
        if let Err(e) = result {
            warn!("failed to show desktop notification: {e}");
        }
    }
}

async fn fetch_status(controller: Arc<Controller>) -> Result<ConnectionState, SessionError> {
    controller.status().await
}

async fn load_locations(controller: Arc<Controller>) -> Vec<Location> {
    controller.locations().await
}

async fn run_connect(
    controller: Arc<Controller>,
    location: Option<String>,
) -> Result<(), SessionError> {
    controller.connect(location.as_deref()).await
}

async fn run_disconnect(controller: Arc<Controller>) -> Result<(), SessionError> {
    controller.disconnect().await
}

async fn run_login(controller: Arc<Controller>, credentials: Credentials) -> bool {
    controller.login(&credentials).await
}

async fn run_logout(controller: Arc<Controller>) -> bool {
    controller.logout().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> HstrayApp {
        let flags = Flags {
            lang: Some(Lang::Tr),
            command: None,
            auto_connect: false,
        };
        HstrayApp::new(flags).0
    }

    #[test]
    fn test_close_request_hides_window_instead_of_quitting() {
        let mut app = app();
        let id = window::Id::unique();

        let _task = app.update(Message::WindowCloseRequested(id));

        assert!(app.window_hidden);
        assert!(!app.quitting);

        let _task = app.update(Message::ShowWindowRequested);
        assert!(!app.window_hidden);
    }

    #[test]
    fn test_tray_show_window_restores_hidden_window() {
        let mut app = app();
        let id = window::Id::unique();
        let _task = app.update(Message::WindowCloseRequested(id));

        let _task = app.handle_tray(TrayCommand::ShowWindow);
        assert!(!app.window_hidden);
    }

    #[test]
    fn test_failed_login_keeps_dialog_open_with_banner() {
        let mut app = app();
        app.login = Some(LoginForm::default());

        let _task = app.update(Message::LoginFinished(false));

        assert!(app.login.is_some());
        let banner = app.banner.as_ref().unwrap();
        assert_eq!(banner.title, TextKey::LoginFailed);
        assert_eq!(banner.body, TextKey::ConnectionFailed);
    }

    #[test]
    fn test_language_toggle_round_trips() {
        let mut app = app();
        assert_eq!(app.lang, Lang::Tr);

        let _task = app.update(Message::LanguageToggled);
        assert_eq!(app.lang, Lang::En);

        let _task = app.update(Message::LanguageToggled);
        assert_eq!(app.lang, Lang::Tr);
    }
}
