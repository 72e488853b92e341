use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::archive::{ManifestEntry, StagedEntry};

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.iter().map(|c| Cell::from(*c))).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn highlight() -> Style {
    Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Contents of the open archive.
pub fn manifest_table<'a>(entries: &'a [ManifestEntry], block: Block<'a>) -> Table<'a> {
    let rows = entries.iter().map(|e| {
        Row::new(vec![
            Cell::from(e.filename.as_str()),
            Cell::from(e.compressed_size.to_string()),
            Cell::from(e.size.to_string()),
            Cell::from(e.internal_path.as_str()),
        ])
    });
    Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Fill(1),
        ],
    )
    .header(header(&["File", "Compressed Size", "Size", "Path"]))
    .block(block.borders(Borders::ALL))
    .row_highlight_style(highlight())
}

/// Files queued for a new archive. Empty internal paths are flagged.
pub fn staged_table<'a>(entries: &'a [StagedEntry], block: Block<'a>) -> Table<'a> {
    let rows = entries.iter().map(|e| {
        let name = e
            .source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| e.source.display().to_string());
        let internal = if e.internal_path.is_empty() {
            Cell::from(Span::styled("(empty)", Style::default().fg(Color::Red)))
        } else {
            Cell::from(e.internal_path.as_str())
        };
        Row::new(vec![Cell::from(name), internal])
    });
    Table::new(rows, [Constraint::Percentage(35), Constraint::Fill(1)])
        .header(header(&["File", "Internal Path"]))
        .block(block.borders(Borders::ALL))
        .row_highlight_style(highlight())
}
