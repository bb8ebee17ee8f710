//! Desktop window and tray front-end for the Hotspot Shield CLI

mod app;
mod tray;
mod ui;

use clap::Parser;
use iced::{window, Size};
use tracing::info;

use hstray_core::locale::Lang;

use crate::app::{Flags, HstrayApp};

#[derive(Parser, Debug)]
#[command(
    name = "hstray",
    version,
    about = "Tray and window front-end for the Hotspot Shield command-line tool"
)]
struct Cli {
    /// Interface language (tr or en)
    #[arg(long)]
    lang: Option<Lang>,

    /// Override the external command name or path
    #[arg(long)]
    command: Option<String>,

    /// Do not connect automatically on startup
    #[arg(long)]
    no_auto_connect: bool,
}

fn main() -> iced::Result {
    let cli = Cli::parse();

    if let Err(e) = hstray_core::init_logging() {
        eprintln!("failed to initialize logging: {e}");
    }
    info!("starting hstray");

    let flags = Flags {
        lang: cli.lang,
        command: cli.command,
        auto_connect: !cli.no_auto_connect,
    };

    iced::application(HstrayApp::title, HstrayApp::update, HstrayApp::view)
        .subscription(HstrayApp::subscription)
        .theme(HstrayApp::theme)
        .window(window::Settings {
            size: Size::new(400.0, 500.0),
            position: window::Position::Centered,
            // Close requests hide to the tray instead of exiting
            exit_on_close_request: false,
            ..window::Settings::default()
        })
        .run_with(move || HstrayApp::new(flags))
}
