mod app;
mod archive;
mod browser;
mod command;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod input;
mod logging;
mod session;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::{App, Mode};
use crate::config::{AppConfig, GeneralConfig};
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// Browse, extract and create archives from the terminal.
#[derive(Parser, Debug)]
#[command(name = "am", version, about)]
struct Cli {
    /// Archives to open at startup (the last one stays open)
    paths: Vec<PathBuf>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in create mode
    #[arg(long)]
    create: bool,

    /// Show hidden files in the file browsers
    #[arg(long)]
    show_hidden: bool,
}

impl Cli {
    /// CLI flags as a partial config that overrides every file.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: self.show_hidden.then_some(true),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    let _log_file = logging::init(&config);

    let mode = if cli.create { Mode::Create } else { Mode::Extract };
    let mut app = App::new(&config, mode);
    // A later request replaces an earlier one, so the last path wins.
    for path in cli.paths {
        if path.exists() {
            app.extract.request_open(path);
        } else {
            app.report(error::AppError::InvalidPath(format!(
                "{} does not exist",
                path.display()
            )));
        }
    }

    install_panic_hook();

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(16));

    loop {
        // Every deferred command runs before the frame that follows it.
        app.process_pending();
        app.clear_expired_status();

        tui.terminal_mut().draw(|frame| {
            ui::render(&app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Paste(text) => app.paste(&text),
            Event::Tick | Event::Resize => {}
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    tracing::info!("exiting");
    Ok(())
}
