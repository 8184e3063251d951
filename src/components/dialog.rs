use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind, DialogState};
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    dialog_state: &'a DialogState,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, dialog_state: &'a DialogState, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            dialog_state,
            theme,
        }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = match &self.mode {
            AppMode::Dialog(kind) => kind,
            _ => return,
        };

        match kind {
            DialogKind::Rename { .. } => {
                render_input_dialog("Rename", self.dialog_state, self.theme, area, buf);
            }
            DialogKind::DeleteConfirm { targets } => {
                render_confirm_dialog(targets, self.theme, area, buf);
            }
            DialogKind::Error { message } => {
                render_error_dialog(message, self.theme, area, buf);
            }
        }
    }
}

fn render_input_dialog(
    title: &str,
    state: &DialogState,
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let dialog_width = 50.min(area.width.saturating_sub(4));
    let rect = DialogWidget::centered_rect(dialog_width, 5, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border_fg))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let input = &state.input;
    let cursor_pos = state.cursor_position;
    let select_end = state.selection_end.min(input.len());

    // selected prefix | plain text before cursor | cursor cell | rest
    let (cursor_char, after) = if cursor_pos < input.len() {
        let next = input[cursor_pos..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(1);
        (&input[cursor_pos..cursor_pos + next], &input[cursor_pos + next..])
    } else {
        (" ", "")
    };

    let input_style = Style::default().fg(theme.status_fg);
    let selection_style = Style::default()
        .bg(theme.accent_fg)
        .fg(theme.dialog_bg);
    let cursor_style = Style::default()
        .bg(theme.status_fg)
        .fg(theme.dialog_bg)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    if select_end > 0 {
        spans.push(Span::styled(&input[..select_end], selection_style));
        if cursor_pos > select_end {
            spans.push(Span::styled(&input[select_end..cursor_pos], input_style));
        }
    } else if cursor_pos > 0 {
        spans.push(Span::styled(&input[..cursor_pos], input_style));
    }
    spans.push(Span::styled(cursor_char, cursor_style));
    spans.push(Span::styled(after, input_style));

    let line = Line::from(spans);
    buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);

    let hint = "[Enter] Confirm  [Esc] Cancel";
    let hint_line = Line::from(Span::styled(
        hint,
        Style::default()
            .fg(theme.dim_fg)
            .add_modifier(Modifier::DIM),
    ));
    if inner.height > 1 {
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

fn render_confirm_dialog(
    targets: &[std::path::PathBuf],
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let max_name_len = targets
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().len())
        .max()
        .unwrap_or(10);

    let dialog_width = (max_name_len as u16 + 10)
        .max(40)
        .min(area.width.saturating_sub(4));
    let dialog_height = (targets.len() as u16 + 5).min(area.height.saturating_sub(2));
    let rect = DialogWidget::centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(" Delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error_fg))
        .padding(Padding::horizontal(1));
    let inner = block.inner(rect);
    block.render(rect, buf);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let header = format!(
        "Delete {} item{}? This cannot be undone.",
        targets.len(),
        if targets.len() == 1 { "" } else { "s" }
    );
    buf.set_line(
        inner.x,
        inner.y,
        &Line::from(Span::styled(header, Style::default().fg(theme.status_fg))),
        inner.width,
    );

    for (i, target) in targets.iter().enumerate() {
        let y = inner.y + 1 + i as u16;
        if y + 1 >= inner.y + inner.height {
            break;
        }
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| target.display().to_string());
        buf.set_line(
            inner.x,
            y,
            &Line::from(Span::styled(
                format!("  {}", name),
                Style::default().fg(theme.warning_fg),
            )),
            inner.width,
        );
    }

    let hint = "[Enter] Delete  [Esc] Cancel";
    buf.set_line(
        inner.x,
        inner.y + inner.height - 1,
        &Line::from(Span::styled(
            hint,
            Style::default()
                .fg(theme.dim_fg)
                .add_modifier(Modifier::DIM),
        )),
        inner.width,
    );
}

fn render_error_dialog(message: &str, theme: &ThemeColors, area: Rect, buf: &mut Buffer) {
    let lines: Vec<&str> = message.lines().collect();
    let widest = lines.iter().map(|l| l.len()).max().unwrap_or(0);

    let dialog_width = (widest as u16 + 6)
        .max(30)
        .min(area.width.saturating_sub(4));
    let dialog_height = (lines.len() as u16 + 4).min(area.height.saturating_sub(2));
    let rect = DialogWidget::centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error_fg))
        .padding(Padding::horizontal(1));
    let inner = block.inner(rect);
    block.render(rect, buf);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    for (i, text) in lines.iter().enumerate() {
        let y = inner.y + i as u16;
        if y + 1 >= inner.y + inner.height {
            break;
        }
        buf.set_line(
            inner.x,
            y,
            &Line::from(Span::styled(*text, Style::default().fg(theme.status_fg))),
            inner.width,
        );
    }

    let hint = "[Enter/Esc] Dismiss";
    buf.set_line(
        inner.x,
        inner.y + inner.height - 1,
        &Line::from(Span::styled(
            hint,
            Style::default()
                .fg(theme.dim_fg)
                .add_modifier(Modifier::DIM),
        )),
        inner.width,
    );
}
