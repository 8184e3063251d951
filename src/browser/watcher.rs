//! Debounced filesystem watcher feeding auto-refresh.
//!
//! Change bursts are collapsed by a single-shot debounce window: events
//! arriving before the window fires reschedule it, so at most one refresh is
//! pending per burst. The browser rebuilds wholesale on refresh, so only one
//! signal is needed, not the changed paths themselves.

use std::path::Path;
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;
use tracing::debug;

use crate::event::Event;

/// Default patterns to ignore when watching the filesystem.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
    "target",
];

/// Watches a root directory and sends a debounced [`Event::Refresh`] when
/// anything under it changes.
pub struct FsWatcher {
    /// Dropped to stop watching.
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl FsWatcher {
    /// Watch `root` recursively. Changes matching `ignore_patterns` are
    /// dropped; anything else sends one `Refresh` per debounce window.
    pub fn new(
        root: &Path,
        debounce: Duration,
        ignore_patterns: Vec<String>,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let mut debouncer = new_debouncer(
            debounce,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                match result {
                    Ok(events) => {
                        let relevant = events.iter().any(|e| {
                            e.kind == DebouncedEventKind::Any
                                && !should_ignore(&e.path, &ignore_patterns)
                        });
                        if relevant {
                            let _ = event_tx.send(Event::Refresh);
                        }
                    }
                    Err(e) => {
                        // watcher errors are non-fatal
                        debug!(error = %e, "watcher error");
                    }
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(root, notify::RecursiveMode::Recursive)?;

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// A path is ignored when any of its components matches a pattern exactly.
pub fn should_ignore(path: &Path, patterns: &[String]) -> bool {
    path.components().any(|component| {
        matches!(
            component,
            std::path::Component::Normal(name)
                if patterns.iter().any(|p| name.to_string_lossy() == *p)
        )
    })
}
