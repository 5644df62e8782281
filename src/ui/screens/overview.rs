use indexmap::IndexMap;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use super::{chart_with_insights, render_empty, render_insights, titled_block};
use crate::metrics::CategorySphereTotal;
use crate::models::Sphere;
use crate::ui::app::App;
use crate::ui::narrative;
use crate::ui::theme::Palette;
use crate::ui::util::{bar_value, format_amount, format_compact, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary cards
            Constraint::Min(10),   // Category chart
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app, palette);

    let rows = &app.metrics.category_totals;
    if rows.is_empty() {
        render_empty(f, chunks[1], "Spending by Category and Sphere", palette);
        return;
    }
    let (chart_area, insights_area) = chart_with_insights(chunks[1]);
    render_category_chart(f, chart_area, rows, palette);
    render_insights(f, insights_area, &narrative::category_insights(rows), palette);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(31),
            Constraint::Percentage(23),
            Constraint::Percentage(23),
            Constraint::Percentage(23),
        ])
        .split(area);

    let summary = &app.metrics.summary;
    let period = summary
        .period
        .map(|(first, last)| {
            format!("{} to {}", first.format("%d/%m/%Y"), last.format("%d/%m/%Y"))
        })
        .unwrap_or_else(|| "Period: N/A".into());

    render_card(
        f,
        cards[0],
        "Total Moved",
        format_amount(summary.total),
        if summary.total >= Decimal::ZERO {
            palette.green
        } else {
            palette.red
        },
        period,
        palette,
    );
    render_card(
        f,
        cards[1],
        "Transactions",
        summary.transactions.to_string(),
        palette.accent,
        format!("of {} loaded", app.base_summary.transactions),
        palette,
    );
    render_card(
        f,
        cards[2],
        "Parties",
        summary.parties.to_string(),
        palette.orange,
        format!("of {} loaded", app.base_summary.parties),
        palette,
    );
    render_card(
        f,
        cards[3],
        "Suppliers",
        summary.suppliers.to_string(),
        palette.yellow,
        "distinct counterparties".into(),
        palette,
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: String,
    color: Color,
    subtitle: String,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .title(Span::styled(format!(" {title} "), palette.title_style()));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(subtitle, palette.dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_category_chart(
    f: &mut Frame,
    area: Rect,
    rows: &[CategorySphereTotal],
    palette: &Palette,
) {
    let mut groups: IndexMap<&str, Vec<&CategorySphereTotal>> = IndexMap::new();
    let mut spheres: Vec<&Sphere> = Vec::new();
    for row in rows {
        groups.entry(row.category.as_str()).or_default().push(row);
        if !spheres.contains(&&row.sphere) {
            spheres.push(&row.sphere);
        }
    }

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(area);

    let legend: Vec<Span> = spheres
        .iter()
        .flat_map(|s| {
            [
                Span::styled("■ ", Style::default().fg(palette.sphere_color(s))),
                Span::styled(format!("{s}  "), palette.dim_style()),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(legend)), inner[0]);

    let bar_groups: Vec<BarGroup> = groups
        .iter()
        .map(|(category, members)| {
            let bars: Vec<Bar> = members
                .iter()
                .map(|row| {
                    Bar::default()
                        .value(bar_value(row.total))
                        .text_value(format_compact(row.total))
                        .style(Style::default().fg(palette.sphere_color(&row.sphere)))
                        .value_style(
                            Style::default()
                                .fg(palette.header_bg)
                                .bg(palette.sphere_color(&row.sphere)),
                        )
                })
                .collect();
            BarGroup::default()
                .label(Line::from(truncate(category, 18)).centered())
                .bars(&bars)
        })
        .collect();

    let mut chart = BarChart::default()
        .block(titled_block("Spending by Category and Sphere", palette))
        .bar_width(6)
        .bar_gap(0)
        .group_gap(2)
        .value_style(palette.normal_style());
    for group in bar_groups {
        chart = chart.data(group);
    }

    f.render_widget(chart, inner[1]);
}
