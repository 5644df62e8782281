use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::ui::app::{App, FilterDimension};
use crate::ui::theme::Palette;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(45),
            Constraint::Percentage(30),
        ])
        .split(area);

    for (dimension, column) in FilterDimension::all().iter().zip(columns.iter()) {
        render_dimension(f, *column, app, *dimension, palette);
    }
}

fn render_dimension(
    f: &mut Frame,
    area: Rect,
    app: &App,
    dimension: FilterDimension,
    palette: &Palette,
) {
    let focused = app.filter_dimension == dimension;
    let (chosen, total) = app.chosen_count(dimension);
    let values = app.filter_values(dimension);
    let page = area.height.saturating_sub(2) as usize;
    let scroll = if focused { app.filter_scroll } else { 0 };
    let width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = values
        .iter()
        .enumerate()
        .skip(scroll)
        .take(page)
        .map(|(i, value)| {
            let checked = app.is_chosen(dimension, i);
            let mark = if checked { "[x] " } else { "[ ] " };
            let style = if focused && i == app.filter_index {
                palette.selected_style()
            } else if checked {
                palette.normal_style()
            } else {
                palette.dim_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, if checked { palette.good_style() } else { palette.dim_style() }),
                Span::raw(truncate(value, width)),
            ]))
            .style(style)
        })
        .collect();

    let border = if focused {
        Style::default().fg(palette.accent)
    } else {
        palette.border_style()
    };
    let title_style = if chosen == 0 {
        palette.bad_style().add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        palette.title_style()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(
                format!(" {dimension} ({chosen}/{total}) "),
                title_style,
            )),
    );
    f.render_widget(list, area);
}
