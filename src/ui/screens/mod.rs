pub(crate) mod composition;
pub(crate) mod fees;
pub(crate) mod filters;
pub(crate) mod hierarchy;
pub(crate) mod overview;
pub(crate) mod suppliers;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::ui::theme::Palette;

pub(crate) fn titled_block<'a>(title: &str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .title(Span::styled(format!(" {title} "), palette.title_style()))
}

/// Split a screen into the chart area and a narrow insights column.
pub(crate) fn chart_with_insights(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(area);
    (chunks[0], chunks[1])
}

pub(crate) fn render_insights(f: &mut Frame, area: Rect, lines: &[String], palette: &Palette) {
    let mut text: Vec<Line> = Vec::with_capacity(lines.len() * 2);
    for line in lines {
        text.push(Line::from(vec![
            Span::styled("• ", palette.section_style()),
            Span::styled(line.clone(), palette.normal_style()),
        ]));
        text.push(Line::from(""));
    }
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(titled_block("Insights", palette));
    f.render_widget(widget, area);
}

pub(crate) fn render_empty(f: &mut Frame, area: Rect, title: &str, palette: &Palette) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No transactions match the current filters",
            palette.dim_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press 6 to adjust filters or :reset to clear them",
            palette.dim_style(),
        )),
    ])
    .centered()
    .block(titled_block(title, palette));
    f.render_widget(msg, area);
}
