use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::App;
use crate::browser::tree::{FlatItem, NodeKind};
use crate::theme::ThemeColors;

/// Tree widget that renders the flattened browser rows with box-drawing
/// characters, open/closed affordances, and dimmed cut-marked entries.
pub struct TreeWidget<'a> {
    app: &'a App,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(app: &'a App, theme: &'a ThemeColors) -> Self {
        Self {
            app,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Build the prefix string for tree indentation using box-drawing
    /// characters. Ancestor levels draw continuation lines unless the
    /// ancestor was the last sibling at its depth.
    fn build_prefix(item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
        if item.depth == 0 {
            return String::new();
        }

        let mut parts: Vec<&str> = Vec::new();
        for d in 1..item.depth {
            // walk backwards to the ancestor at depth d
            let mut ancestor_is_last = false;
            for j in (0..item_index).rev() {
                if items[j].depth == d {
                    ancestor_is_last = items[j].is_last_sibling;
                    break;
                }
                if items[j].depth < d {
                    break;
                }
            }
            parts.push(if ancestor_is_last { "   " } else { "│  " });
        }
        parts.push(if item.is_last_sibling {
            "└──"
        } else {
            "├──"
        });
        parts.join("")
    }

    /// Open/closed/file indicator for a row.
    fn item_indicator(item: &FlatItem) -> &'static str {
        match item.kind {
            NodeKind::Directory if item.is_open => "▾ ",
            NodeKind::Directory => "▸ ",
            NodeKind::Symlink => "@ ",
            NodeKind::File => "  ",
            NodeKind::Placeholder => "  ",
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let items = &self.app.flat;
        let selected = self.app.selected_index;
        let visible_height = inner_area.height as usize;
        if items.is_empty() || visible_height == 0 {
            return;
        }

        let scroll = self.app.scroll_offset;
        let visible_items = items.iter().enumerate().skip(scroll).take(visible_height);

        for (i, (idx, item)) in visible_items.enumerate() {
            let y = inner_area.y + i as u16;
            let prefix = Self::build_prefix(item, items, idx);
            let indicator = Self::item_indicator(item);

            let is_selected = idx == selected;
            let is_multi_selected = self.app.multi_selected.contains(&idx);
            let is_cut_marked = self.app.browser.clipboard.is_marked(&item.path);

            let mut style = if is_selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if is_multi_selected {
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD)
            } else if item.is_hidden {
                Style::default().fg(self.theme.tree_hidden_fg)
            } else {
                match item.kind {
                    NodeKind::Directory => Style::default()
                        .fg(self.theme.tree_dir_fg)
                        .add_modifier(Modifier::BOLD),
                    NodeKind::Symlink => Style::default().fg(self.theme.info_fg),
                    _ => Style::default().fg(self.theme.tree_file_fg),
                }
            };
            if is_cut_marked {
                style = style.add_modifier(Modifier::DIM);
            }

            let marker = if is_multi_selected { "● " } else { "" };
            let content = format!("{}{}{}{}", prefix, marker, indicator, item.label);
            let line = Line::from(Span::styled(content, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        File::create(dir.path().join("alpha").join("inner.txt")).unwrap();
        File::create(dir.path().join("one.txt")).unwrap();
        let app = App::new(dir.path(), Vec::new(), false).unwrap();
        (dir, app)
    }

    fn render_to_strings(app: &App, width: u16, height: u16) -> Vec<String> {
        let theme = dark_theme();
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(app, &theme).render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn renders_rows_with_connectors() {
        let (_dir, app) = setup_app();
        let lines = render_to_strings(&app, 40, 5);
        assert!(lines[1].contains("├──"));
        assert!(lines[1].contains("alpha"));
        assert!(lines[2].contains("└──"));
        assert!(lines[2].contains("one.txt"));
    }

    #[test]
    fn closed_directory_shows_expand_affordance() {
        let (_dir, app) = setup_app();
        let lines = render_to_strings(&app, 40, 5);
        assert!(lines[1].contains('▸'));
    }

    #[test]
    fn open_directory_shows_collapse_affordance() {
        let (dir, mut app) = setup_app();
        app.select_path(&dir.path().join("alpha"));
        app.expand_selected();
        let lines = render_to_strings(&app, 40, 6);
        assert!(lines[1].contains('▾'));
        assert!(lines[2].contains("inner.txt"));
    }

    #[test]
    fn cut_marked_rows_render_dim() {
        let (dir, mut app) = setup_app();
        app.select_path(&dir.path().join("one.txt"));
        app.cut_selection();

        let theme = dark_theme();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&app, &theme).render(area, &mut buf);
        // the cut row's first cell carries the DIM modifier
        let row = app
            .flat
            .iter()
            .position(|i| i.path == dir.path().join("one.txt"))
            .unwrap() as u16;
        let cell = buf.cell((0, row)).unwrap();
        assert!(cell.modifier.contains(Modifier::DIM));
    }

    #[test]
    fn zero_area_does_not_panic() {
        let (_dir, app) = setup_app();
        let theme = dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&app, &theme).render(area, &mut buf);
    }
}
