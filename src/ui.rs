use ratatui::{
    layout::{Constraint, Layout},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::browser::tree::NodeKind;
use crate::components::dialog::DialogWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::format::{format_mtime, human_size, number_commas};
use crate::theme::ThemeColors;

/// Render the application UI: tree view, status bar, and any modal dialog
/// on top.
pub fn render(app: &mut App, theme: &ThemeColors, frame: &mut Frame) {
    let [tree_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    // keep the selected row visible (borders take two lines)
    let visible_height = tree_area.height.saturating_sub(2) as usize;
    app.update_scroll(visible_height);
    app.clear_expired_status();

    let title = app.browser.root_path().display().to_string();
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(ratatui::style::Style::default().fg(theme.border_fg));
    frame.render_widget(TreeWidget::new(app, theme).block(block), tree_area);

    let path_str = app
        .selected_item()
        .map(|item| item.path.display().to_string())
        .unwrap_or_default();

    // size and cached mtime for the focused row, then totals
    let selected_info = app
        .selected_item()
        .map(|item| {
            let node = app.browser.tree().node(item.id);
            match item.kind {
                NodeKind::Directory => "Directory".to_string(),
                _ => match node.modified {
                    Some(mtime) => {
                        format!("{} | {}", human_size(node.size), format_mtime(mtime))
                    }
                    None => human_size(node.size),
                },
            }
        })
        .unwrap_or_default();
    let mut item_info = format!(
        "{} | {} items",
        selected_info,
        number_commas(app.flat.len() as u64)
    );
    if !app.watcher_active {
        item_info.push_str(" | no watch");
    }
    let clipboard = app.clipboard_summary();

    let mut status_bar = StatusBarWidget::new(&path_str, &item_info, theme);
    if let Some(info) = clipboard.as_deref() {
        status_bar = status_bar.clipboard_info(info);
    }
    if let Some((msg, is_error, _)) = &app.status_message {
        status_bar = status_bar.status_message(msg, *is_error);
    }
    frame.render_widget(status_bar, status_area);

    if matches!(app.mode, AppMode::Dialog(_)) {
        frame.render_widget(
            DialogWidget::new(&app.mode, &app.dialog_state, theme),
            frame.area(),
        );
    }
}
