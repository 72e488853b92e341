use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Bottom line: mode tag, current archive or staging summary, key hints,
/// or a transient status message.
pub struct StatusBarWidget<'a> {
    mode: &'a str,
    info: &'a str,
    key_hints: &'a str,
    status_message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(mode: &'a str, info: &'a str, key_hints: &'a str) -> Self {
        Self {
            mode,
            info,
            key_hints,
            status_message: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }
}

/// Keep the last `max` characters of `s`, marking the cut with `...`.
fn truncate_left(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().skip(len - max).collect();
    }
    let tail: String = s.chars().skip(len - (max - 3)).collect();
    format!("...{}", tail)
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let mode_span = Span::styled(
            format!(" {} ", self.mode),
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
        let used = self.mode.chars().count() + 3;

        if let Some(msg) = self.status_message {
            let line = Line::from(vec![
                mode_span,
                Span::raw(" "),
                Span::styled(msg.to_string(), Style::default().fg(Color::Green)),
            ]);
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let hints_len = self.key_hints.chars().count();
        let info_budget = width.saturating_sub(used).saturating_sub(hints_len + 1);
        let info = truncate_left(self.info, info_budget);
        let pad = width
            .saturating_sub(used)
            .saturating_sub(info.chars().count())
            .saturating_sub(hints_len);

        let line = Line::from(vec![
            mode_span,
            Span::raw(" "),
            Span::styled(info, Style::default().fg(Color::White)),
            Span::raw(" ".repeat(pad)),
            Span::styled(
                self.key_hints,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
