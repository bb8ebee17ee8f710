// System tray integration using ksni (Wayland/KDE compatible)

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use hstray_core::locale::{Lang, TextKey};

/// Actions requested from the tray menu, drained by the UI event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    ShowWindow,
    StatusCheck,
    Connect,
    Disconnect,
    Logout,
    Quit,
}

#[derive(Clone)]
struct TrayState {
    connected: bool,
    lang: Lang,
}

pub struct SystemTray {
    state: Arc<Mutex<TrayState>>,
    handle: Mutex<Option<ksni::blocking::Handle<VpnTray>>>,
    handle_rx: Receiver<ksni::blocking::Handle<VpnTray>>,
}

struct VpnTray {
    state: Arc<Mutex<TrayState>>,
    commands: Sender<TrayCommand>,
}

impl VpnTray {
    fn snapshot(&self) -> TrayState {
        self.state.lock().unwrap().clone()
    }

    fn send(&self, command: TrayCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("tray command receiver dropped");
        }
    }
}

impl ksni::Tray for VpnTray {
    fn id(&self) -> String {
        "hstray".into()
    }

    fn title(&self) -> String {
        self.snapshot().lang.text(TextKey::WindowTitle).into()
    }

    fn icon_name(&self) -> String {
        "network-vpn".into()
    }

    fn category(&self) -> ksni::Category {
        ksni::Category::ApplicationStatus
    }

    fn status(&self) -> ksni::Status {
        if self.snapshot().connected {
            ksni::Status::Active
        } else {
            ksni::Status::Passive
        }
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        use ksni::menu::*;

        let state = self.snapshot();
        let t = |key| state.lang.text(key).to_string();
        let status_line = format!(
            "{}: {}",
            t(TextKey::Status),
            if state.connected {
                t(TextKey::Connected)
            } else {
                t(TextKey::NotConnected)
            }
        );

        // Connect/disconnect stay clickable regardless of state; the
        // controller treats redundant requests as no-ops
        vec![
            StandardItem {
                label: status_line,
                enabled: false,
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: t(TextKey::ShowInterface),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::ShowWindow)),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: t(TextKey::StatusCheck),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::StatusCheck)),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: t(TextKey::Connect),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::Connect)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: t(TextKey::Disconnect),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::Disconnect)),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: t(TextKey::Logout),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::Logout)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: t(TextKey::Quit),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::Quit)),
                ..Default::default()
            }
            .into(),
        ]
    }
}

impl SystemTray {
    /// Spawn the tray service on its own thread
    ///
    /// Menu activations arrive on the returned receiver; the event loop
    /// drains it periodically.
    pub fn new(lang: Lang) -> (Self, Receiver<TrayCommand>) {
        let (tx, rx) = mpsc::channel();
        let (handle_tx, handle_rx) = mpsc::channel();
        let state = Arc::new(Mutex::new(TrayState {
            connected: false,
            lang,
        }));

        let service = VpnTray {
            state: state.clone(),
            commands: tx,
        };

        std::thread::spawn(move || {
            use ksni::blocking::TrayMethods;
            match service.spawn() {
                Ok(handle) => {
                    if handle_tx.send(handle).is_err() {
                        tracing::warn!("tray service handle receiver dropped");
                    }
                }
                Err(e) => tracing::warn!("failed to spawn tray service: {e}"),
            }
        });

        (
            SystemTray {
                state,
                handle: Mutex::new(None),
                handle_rx,
            },
            rx,
        )
    }

    pub fn set_connected(&self, connected: bool) {
        self.state.lock().unwrap().connected = connected;
        self.push_update();
    }

    pub fn set_lang(&self, lang: Lang) {
        self.state.lock().unwrap().lang = lang;
        self.push_update();
    }

    /// Signal the StatusNotifierItem host that status and menu changed
    ///
    /// ksni re-reads the tray and emits the DBus change signals only through
    /// its handle; mutating the shared state alone leaves hosts on their
    /// registration-time snapshot.
    fn push_update(&self) {
        let mut handle = self.handle.lock().unwrap();
        if handle.is_none() {
            // The service registers asynchronously at startup
            *handle = self.handle_rx.try_recv().ok();
        }
        if let Some(handle) = handle.as_ref() {
            handle.update(|_| {});
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksni::Tray;

    fn tray(lang: Lang, connected: bool) -> (VpnTray, Receiver<TrayCommand>) {
        let (tx, rx) = mpsc::channel();
        let state = Arc::new(Mutex::new(TrayState { connected, lang }));
        (
            VpnTray {
                state,
                commands: tx,
            },
            rx,
        )
    }

    #[test]
    fn test_status_follows_shared_state() {
        let (tray, _rx) = tray(Lang::En, false);
        assert!(matches!(tray.status(), ksni::Status::Passive));

        tray.state.lock().unwrap().connected = true;
        assert!(matches!(tray.status(), ksni::Status::Active));
    }

    #[test]
    fn test_menu_offers_all_commands() {
        let (tray, _rx) = tray(Lang::Tr, false);
        // Status line, show-interface, status check, connect, disconnect,
        // logout, quit, plus four separators
        assert_eq!(tray.menu().len(), 11);
    }

    #[test]
    fn test_send_delivers_commands_in_order() {
        let (tray, rx) = tray(Lang::Tr, false);
        tray.send(TrayCommand::ShowWindow);
        tray.send(TrayCommand::Quit);

        assert_eq!(rx.try_recv().unwrap(), TrayCommand::ShowWindow);
        assert_eq!(rx.try_recv().unwrap(), TrayCommand::Quit);
        assert!(rx.try_recv().is_err());
    }
}
