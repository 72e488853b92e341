use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};

use crate::input::TextInput;

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(x, y, w, h)
}

fn hint_line(hint: &str) -> Line<'_> {
    Line::from(Span::styled(
        hint,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
    ))
}

/// Draw a bordered, cleared box and return its inner area.
fn frame(title: &str, color: Color, rect: Rect, buf: &mut Buffer) -> Rect {
    Clear.render(rect, buf);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .padding(Padding::horizontal(1));
    let inner = block.inner(rect);
    block.render(rect, buf);
    inner
}

/// Modal showing the oldest queued error.
pub struct ErrorDialog<'a> {
    message: &'a str,
}

impl<'a> ErrorDialog<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl<'a> Widget for ErrorDialog<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_width = (self.message.chars().count() as u16 + 6)
            .clamp(30, 70)
            .min(area.width.saturating_sub(4));
        let text_width = dialog_width.saturating_sub(4).max(1) as usize;
        let text_lines = self.message.chars().count().div_ceil(text_width) as u16;
        let dialog_height = text_lines + 4;
        let rect = centered_rect(dialog_width, dialog_height, area);

        let inner = frame("Error", Color::Red, rect, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let text_area = Rect::new(
            inner.x,
            inner.y,
            inner.width,
            inner.height.saturating_sub(1),
        );
        Paragraph::new(self.message)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .render(text_area, buf);

        if inner.height > 1 {
            buf.set_line(
                inner.x,
                inner.y + inner.height - 1,
                &hint_line("[Enter/Esc] OK"),
                inner.width,
            );
        }
    }
}

/// Single-line text input popup.
pub struct InputDialog<'a> {
    title: &'a str,
    label: &'a str,
    input: &'a TextInput,
}

impl<'a> InputDialog<'a> {
    pub fn new(title: &'a str, label: &'a str, input: &'a TextInput) -> Self {
        Self {
            title,
            label,
            input,
        }
    }
}

impl<'a> Widget for InputDialog<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_width = 70.min(area.width.saturating_sub(4));
        let rect = centered_rect(dialog_width, 6, area);
        let inner = frame(self.title, Color::Cyan, rect, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let label = Line::from(Span::styled(self.label, Style::default().fg(Color::Gray)));
        buf.set_line(inner.x, inner.y, &label, inner.width);

        let value = self.input.value();
        let cursor_pos = self.input.cursor();
        let (before, rest) = value.split_at(cursor_pos);
        let (cursor_char, after) = match rest.chars().next() {
            Some(c) => rest.split_at(c.len_utf8()),
            None => (" ", ""),
        };

        // Keep the cursor in view by dropping characters from the left.
        let max_width = inner.width as usize;
        let before_display = if before.chars().count() + 1 > max_width {
            let skip = before.chars().count() + 1 - max_width;
            let start = before
                .char_indices()
                .nth(skip)
                .map(|(i, _)| i)
                .unwrap_or(before.len());
            &before[start..]
        } else {
            before
        };

        let input_style = Style::default().fg(Color::White);
        let cursor_style = Style::default()
            .bg(Color::White)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::styled(before_display, input_style),
            Span::styled(cursor_char, cursor_style),
            Span::styled(after, input_style),
        ]);
        if inner.height > 1 {
            buf.set_line(inner.x, inner.y + 1, &line, inner.width);
        }

        if inner.height > 2 {
            buf.set_line(
                inner.x,
                inner.y + inner.height - 1,
                &hint_line("[Enter] OK  [Esc] Cancel"),
                inner.width,
            );
        }
    }
}

/// Version and credits.
pub struct AboutDialog;

impl Widget for AboutDialog {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = centered_rect(44.min(area.width.saturating_sub(4)), 7, area);
        let inner = frame("About", Color::Cyan, rect, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines = [
            Line::from(Span::styled(
                env!("CARGO_PKG_NAME"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Version {}", env!("CARGO_PKG_VERSION"))),
        ];
        for (i, line) in lines.iter().enumerate() {
            if (i as u16) < inner.height {
                buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
            }
        }
        if inner.height > 2 {
            buf.set_line(
                inner.x,
                inner.y + inner.height - 1,
                &hint_line("[any key] Close"),
                inner.width,
            );
        }
    }
}
