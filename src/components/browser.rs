use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::browser::{FileBrowser, Policy, RowKind};

/// Centered file browser popup.
pub struct BrowserWidget<'a> {
    browser: &'a FileBrowser,
    title: &'a str,
    can_confirm: bool,
}

impl<'a> BrowserWidget<'a> {
    pub fn new(browser: &'a FileBrowser, title: &'a str) -> Self {
        Self {
            browser,
            title,
            can_confirm: browser.can_confirm(),
        }
    }

    /// Popup area: most of the screen, leaving a margin.
    pub fn popup_area(area: Rect) -> Rect {
        let w = area.width.saturating_sub(8).max(20).min(area.width);
        let h = area.height.saturating_sub(4).max(8).min(area.height);
        let x = area.x + area.width.saturating_sub(w) / 2;
        let y = area.y + area.height.saturating_sub(h) / 2;
        Rect::new(x, y, w, h)
    }

    /// First row index to draw so that `cursor` stays visible.
    fn scroll_offset(cursor: usize, visible: usize) -> usize {
        if visible == 0 || cursor < visible {
            0
        } else {
            cursor + 1 - visible
        }
    }

    fn key_hints(&self) -> &'static str {
        match self.browser.policy() {
            Policy::OpenOne { .. } => {
                "Enter:open  Space:choose  ←:up  ^B:back  F2:hidden  F3:order  F4:filter  F10:ok  Esc:cancel"
            }
            Policy::OpenMulti => {
                "Space:toggle  S-↑↓:range  ^A/^D:all/none  ←:up  ^B:back  F2:hidden  F3:order  F10:ok  Esc:cancel"
            }
            Policy::SaveMulti { .. } => {
                "Enter:open  Space:select  ←:up  ^B:back  F2:hidden  F3:order  F10:ok  Esc:cancel"
            }
            Policy::SaveOne { .. } => {
                "type:name  Tab:take name  Enter:open  ^B:back  F2:hidden  F3:order  F10:ok  Esc:cancel"
            }
        }
    }
}

impl<'a> Widget for BrowserWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = Self::popup_area(area);
        Clear.render(rect, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);

        // path, listing, footer field, hints
        if inner.height < 4 || inner.width == 0 {
            return;
        }

        let mut path_spans = vec![Span::styled(
            self.browser.current_path().display().to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )];
        let dropped = self.browser.snapshot().dropped_count();
        if dropped > 0 {
            path_spans.push(Span::styled(
                format!("  ({} unlisted)", dropped),
                Style::default().fg(Color::DarkGray),
            ));
        }
        let path_line = Line::from(path_spans);
        buf.set_line(inner.x, inner.y, &path_line, inner.width);

        let list_height = inner.height.saturating_sub(3) as usize;
        let rows = self.browser.rows();
        let cursor = self.browser.cursor();
        let scroll = Self::scroll_offset(cursor, list_height);

        for (i, (idx, row)) in rows
            .iter()
            .enumerate()
            .skip(scroll)
            .take(list_height)
            .enumerate()
        {
            let y = inner.y + 1 + i as u16;
            let is_cursor = idx == cursor;
            let base = match row.kind {
                RowKind::Parent | RowKind::Directory(_) => Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
                RowKind::File(_) => Style::default().fg(Color::White),
            };
            let style = if is_cursor {
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else if row.selected {
                base.fg(Color::Yellow)
            } else {
                base
            };
            let marker = if row.selected { "● " } else { "  " };
            let line = Line::from(Span::styled(format!("{}{}", marker, row.name), style));
            buf.set_line(inner.x, y, &line, inner.width);
        }

        let footer_y = inner.y + inner.height - 2;
        let confirm_style = if self.can_confirm {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let footer = Line::from(vec![
            Span::styled("> ", confirm_style),
            Span::styled(self.browser.footer_text(), Style::default().fg(Color::White)),
        ]);
        buf.set_line(inner.x, footer_y, &footer, inner.width);

        let hint_style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM);
        let hint_line = Line::from(Span::styled(self.key_hints(), hint_style));
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(BrowserWidget::scroll_offset(0, 5), 0);
        assert_eq!(BrowserWidget::scroll_offset(4, 5), 0);
        assert_eq!(BrowserWidget::scroll_offset(5, 5), 1);
        assert_eq!(BrowserWidget::scroll_offset(12, 5), 8);
        assert_eq!(BrowserWidget::scroll_offset(3, 0), 0);
    }

    #[test]
    fn renders_rows_and_footer() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("levels")).unwrap();
        File::create(dir.path().join("pack.zip")).unwrap();
        let mut browser = FileBrowser::new(Policy::open_multi(), dir.path(), false, true);
        browser.show().unwrap();

        let widget = BrowserWidget::new(&browser, "Add file(s)");
        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Add file(s)"));
        assert!(content.contains("levels/"));
        assert!(content.contains("pack.zip"));
        assert!(content.contains("0 files selected"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let dir = TempDir::new().unwrap();
        let mut browser = FileBrowser::new(Policy::save_multi(), dir.path(), false, true);
        browser.show().unwrap();
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        BrowserWidget::new(&browser, "x").render(area, &mut buf);
    }
}
