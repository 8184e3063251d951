use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Status bar widget: root path on the left, item info center-right, key
/// hints on the right. A transient status message takes over the whole line.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    item_info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    clipboard_info: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, item_info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            item_info,
            theme,
            status_message: None,
            is_error: false,
            clipboard_info: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    pub fn clipboard_info(mut self, info: &'a str) -> Self {
        self.clipboard_info = Some(info);
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                Style::default().fg(self.theme.success_fg)
            };
            // only the first line of a multi-line message fits the bar
            let first = msg.lines().next().unwrap_or("");
            let display: String = if first.len() >= width {
                first[..width].to_string()
            } else {
                format!("{:<width$}", first, width = width)
            };
            buf.set_line(area.x, area.y, &Line::from(Span::styled(display, style)), area.width);
            return;
        }

        let key_hints = " a:new  A:dir  r:ren  d:del  x/y/p:clip ";
        let hints_len = key_hints.len();
        let remaining = width.saturating_sub(hints_len);

        let info_len = self.item_info.len();
        let path_budget = remaining.saturating_sub(info_len).saturating_sub(1);

        let path_display = if self.path_str.len() > path_budget {
            if path_budget > 3 {
                format!(
                    "...{}",
                    &self.path_str[self.path_str.len() - (path_budget - 3)..]
                )
            } else {
                self.path_str[..path_budget.min(self.path_str.len())].to_string()
            }
        } else {
            self.path_str.to_string()
        };

        let gap = remaining
            .saturating_sub(path_display.len())
            .saturating_sub(info_len);

        let mut spans = vec![
            Span::styled(path_display, Style::default().fg(self.theme.status_fg)),
            Span::raw(" ".repeat(gap)),
            Span::styled(self.item_info, Style::default().fg(self.theme.info_fg)),
        ];

        if let Some(info) = self.clipboard_info {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                info,
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let used: usize = spans.iter().map(|s| s.content.len()).sum();
        let pad = width.saturating_sub(used).saturating_sub(hints_len);
        if pad > 0 {
            spans.push(Span::raw(" ".repeat(pad)));
        }
        spans.push(Span::styled(
            key_hints,
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        ));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
