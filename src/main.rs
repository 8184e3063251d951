mod app;
mod browser;
mod components;
mod config;
mod error;
mod event;
mod format;
mod handler;
mod theme;
mod tui;
mod ui;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::MouseEventKind;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::browser::watcher::{FsWatcher, DEFAULT_IGNORE_PATTERNS};
use crate::config::{AppConfig, GeneralConfig, ThemeConfig, WatcherConfig};
use crate::event::{Event, EventHandler};
use crate::theme::resolve_theme;
use crate::tui::{install_panic_hook, Tui};

/// A lazy-loading filesystem tree browser for the terminal.
#[derive(Parser, Debug)]
#[command(name = "file_browser_tui", version, about)]
struct Cli {
    /// Root directory to browse (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file mapping paths to display names
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Show hidden files
    #[arg(long)]
    show_hidden: bool,

    /// Disable filesystem watcher (auto-refresh)
    #[arg(long)]
    no_watcher: bool,

    /// Skip delete confirmations
    #[arg(long)]
    no_confirm: bool,

    /// Theme scheme: dark, light, custom
    #[arg(long)]
    theme: Option<String>,

    /// Write tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Partial config derived from CLI flags; merged on top of files.
    fn as_config_overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: self.show_hidden.then_some(true),
                confirm_delete: self.no_confirm.then_some(false),
                ..Default::default()
            },
            watcher: WatcherConfig {
                enabled: self.no_watcher.then_some(false),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
            overrides: None,
        }
    }
}

/// Initialize file logging when requested. The returned guard flushes the
/// non-blocking writer on drop.
fn init_logging(path: &std::path::Path) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

/// Load the name-override entries: the config `[overrides]` table first,
/// then entries from the `--overrides` JSON file on top.
fn load_override_entries(cfg: &AppConfig, json_path: Option<&std::path::Path>) -> Vec<(PathBuf, String)> {
    let mut entries = cfg.override_entries();
    if let Some(path) = json_path {
        match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| {
                serde_json::from_str::<HashMap<String, String>>(&text).map_err(|e| e.to_string())
            }) {
            Ok(map) => entries.extend(map.into_iter().map(|(k, v)| (PathBuf::from(k), v))),
            Err(e) => eprintln!("Warning: failed to load overrides {}: {}", path.display(), e),
        }
    }
    entries
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let _log_guard = cli.log_file.as_deref().and_then(init_logging);

    let cfg = AppConfig::load(cli.config.as_deref(), Some(&cli.as_config_overrides()));

    let start_path = if cli.path == PathBuf::from(".") {
        cfg.general
            .default_path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.path.clone())
    } else {
        cli.path.clone()
    };
    let path = start_path
        .canonicalize()
        .map_err(|_| error::AppError::NotFound(start_path.clone()))?;

    let colors = resolve_theme(&cfg.theme);
    tracing::debug!(scheme = cfg.theme_scheme(), "theme resolved");
    let overrides = load_override_entries(&cfg, cli.overrides.as_deref());

    install_panic_hook();

    let mut tui = Tui::new(cfg.mouse_enabled())?;
    let mut app = App::new(&path, overrides, cfg.show_hidden())?;
    app.confirm_delete = cfg.confirm_delete();
    app.browser
        .set_on_change(Box::new(|| tracing::debug!("materialized tree changed")));

    let mut events = EventHandler::new(Duration::from_millis(16));
    let event_tx = events.sender();

    let _watcher = if cfg.watcher_enabled() {
        let ignore_patterns: Vec<String> = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|s| s.to_string())
            .collect();
        match FsWatcher::new(
            &path,
            Duration::from_millis(cfg.debounce_ms()),
            ignore_patterns,
            event_tx.clone(),
        ) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                app.watcher_active = false;
                app.set_status(format!("Watcher unavailable: {}", e), true);
                None
            }
        }
    } else {
        app.watcher_active = false;
        None
    };

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, &colors, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => app.select_next(),
                MouseEventKind::ScrollUp => app.select_previous(),
                _ => {}
            },
            Event::Tick => {}
            Event::Resize(_, _) => {}
            Event::Refresh => app.refresh(),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
