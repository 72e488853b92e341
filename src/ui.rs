use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, TableState},
    Frame,
};

use crate::app::{App, Mode, Popup};
use crate::components::browser::BrowserWidget;
use crate::components::dialog::{AboutDialog, ErrorDialog, InputDialog};
use crate::components::status_bar::StatusBarWidget;
use crate::components::tables::{manifest_table, staged_table};

const EXTRACT_HINTS: &str = " o:open  x:extract  e:csv  c:close  Tab:mode  ?:about  q:quit ";
const CREATE_HINTS: &str = " a:add  s:save  Enter:edit  d:remove  Tab:mode  ?:about  q:quit ";

/// Render the application UI.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let [header_area, table_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let title_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut table_state = TableState::default();
    if app.table_len() > 0 {
        table_state.select(Some(app.table_cursor));
    }

    let (mode_label, info, hints) = match app.mode {
        Mode::Extract => {
            let header = match app.extract.open_path() {
                Some(path) => path.display().to_string(),
                None => "No archive open. Press o to open one.".to_string(),
            };
            frame.render_widget(
                Line::from(Span::styled(header, title_style)),
                header_area,
            );
            let table = manifest_table(app.extract.manifest(), Block::default().title(" Files "));
            frame.render_stateful_widget(table, table_area, &mut table_state);
            let info = format!("{} file(s)", app.extract.manifest().len());
            ("EXTRACT", info, EXTRACT_HINTS)
        }
        Mode::Create => {
            let staged = app.create.staged();
            let header = if staged.is_empty() {
                "Nothing staged. Press a to add files.".to_string()
            } else if app.create.ready_to_create() {
                format!("{} file(s) staged, ready to save", staged.len())
            } else {
                format!("{} file(s) staged, some internal paths are empty", staged.len())
            };
            frame.render_widget(Line::from(Span::styled(header, title_style)), header_area);
            let table = staged_table(staged, Block::default().title(" Staged files "));
            frame.render_stateful_widget(table, table_area, &mut table_state);
            let info = format!("{} staged", staged.len());
            ("CREATE", info, CREATE_HINTS)
        }
    };

    let mut status = StatusBarWidget::new(mode_label, &info, hints);
    if let Some((msg, _)) = &app.status_message {
        status = status.status_message(msg);
    }
    frame.render_widget(status, status_area);

    match app.popup {
        Some(Popup::Browser(dialog)) => {
            frame.render_widget(BrowserWidget::new(app.browser(dialog), dialog.title()), area);
        }
        Some(Popup::EditPath) => {
            if let Some((entry, input)) = app.create.editing() {
                let label = format!("File: {}", entry.source.display());
                frame.render_widget(InputDialog::new("Edit internal path", &label, input), area);
            }
        }
        Some(Popup::About) => frame.render_widget(AboutDialog, area),
        None => {}
    }

    if let Some(message) = app.errors.front() {
        frame.render_widget(ErrorDialog::new(message), area);
    }
}
