use indexmap::{IndexMap, IndexSet};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Paragraph, Wrap},
    Frame,
};
use rust_decimal::Decimal;

use super::{chart_with_insights, render_empty, render_insights, titled_block};
use crate::metrics::CategoryShare;
use crate::models::Sphere;
use crate::ui::app::App;
use crate::ui::narrative;
use crate::ui::theme::Palette;
use crate::ui::util::{bar_value, format_percent};

const TITLE: &str = "Category Share within each Sphere";

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let rows = &app.metrics.composition;
    if rows.is_empty() {
        render_empty(f, area, TITLE, palette);
        return;
    }
    let (chart_area, insights_area) = chart_with_insights(area);

    let categories: IndexSet<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    let mut spheres: IndexMap<&Sphere, Vec<&CategoryShare>> = IndexMap::new();
    for row in rows {
        spheres.entry(&row.sphere).or_default().push(row);
    }

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(chart_area);

    let legend: Vec<Span> = categories
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            [
                Span::styled("■ ", Style::default().fg(palette.series_color(i))),
                Span::styled(format!("{c}  "), palette.dim_style()),
            ]
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(legend)).wrap(Wrap { trim: true }),
        inner[0],
    );

    // Bar heights are hundredths of a percent so small shares stay visible.
    let scale = Decimal::ONE_HUNDRED;
    let mut chart = BarChart::default()
        .block(titled_block(TITLE, palette))
        .bar_width(7)
        .bar_gap(1)
        .group_gap(3)
        .max(bar_value(Decimal::ONE_HUNDRED.saturating_mul(scale)));
    for (sphere, shares) in &spheres {
        let bars: Vec<Bar> = shares
            .iter()
            .map(|share| {
                let color = palette.series_color(categories.get_index_of(share.category.as_str()).unwrap_or(0));
                Bar::default()
                    .value(bar_value(share.percent.saturating_mul(scale)))
                    .text_value(format_percent(share.percent))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(palette.header_bg).bg(color))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(
                    Line::from(Span::styled(
                        sphere.to_string(),
                        Style::default().fg(palette.sphere_color(sphere)),
                    ))
                    .centered(),
                )
                .bars(&bars),
        );
    }

    f.render_widget(chart, inner[1]);
    render_insights(
        f,
        insights_area,
        &narrative::composition_insights(rows),
        palette,
    );
}
