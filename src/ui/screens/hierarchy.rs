use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use super::{chart_with_insights, render_empty, render_insights, titled_block};
use crate::metrics::SphereNode;
use crate::ui::app::App;
use crate::ui::narrative;
use crate::ui::theme::Palette;
use crate::ui::util::{format_amount, format_percent, truncate};

/// One visible line of the sphere → party → category tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TreeRow<'a> {
    pub(crate) depth: usize,
    pub(crate) label: &'a str,
    pub(crate) total: Decimal,
    /// Share of the enclosing sphere, `None` on sphere rows.
    pub(crate) share: Option<Decimal>,
    pub(crate) sphere_index: usize,
}

pub(crate) fn flatten(tree: &[SphereNode]) -> Vec<TreeRow<'_>> {
    let mut rows = Vec::new();
    for (sphere_index, sphere) in tree.iter().enumerate() {
        let share = |total: Decimal| {
            total
                .checked_div(sphere.total)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        };
        rows.push(TreeRow {
            depth: 0,
            label: sphere.sphere.as_str(),
            total: sphere.total,
            share: None,
            sphere_index,
        });
        for party in &sphere.parties {
            rows.push(TreeRow {
                depth: 1,
                label: &party.party,
                total: party.total,
                share: share(party.total),
                sphere_index,
            });
            for (category, total) in &party.categories {
                rows.push(TreeRow {
                    depth: 2,
                    label: category,
                    total: *total,
                    share: share(*total),
                    sphere_index,
                });
            }
        }
    }
    rows
}

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let title = match app.config.metrics.hierarchy_parties {
        Some(n) => format!("Sphere → Party → Category (top {n} parties per sphere)"),
        None => "Sphere → Party → Category".to_string(),
    };
    if app.tree.is_empty() {
        render_empty(f, area, &title, palette);
        return;
    }
    let (table_area, insights_area) = chart_with_insights(area);

    let header = Row::new(
        ["Node", "Total", "% of sphere"]
            .iter()
            .map(|h| Cell::from(*h).style(palette.header_style())),
    )
    .height(1);

    let name_width = table_area.width.saturating_sub(36) as usize;
    let flat = flatten(&app.tree);
    let rows: Vec<Row> = flat
        .iter()
        .enumerate()
        .skip(app.list_scroll)
        .take(table_area.height.saturating_sub(3) as usize)
        .map(|(i, row)| {
            let indent = "  ".repeat(row.depth);
            let marker = match row.depth {
                0 => "▼ ",
                1 => "├ ",
                _ => "· ",
            };
            let name = truncate(
                &format!("{indent}{marker}{}", row.label),
                name_width.max(8),
            );
            let color = match row.depth {
                0 => palette.orange,
                1 => palette.yellow,
                _ => palette.text,
            };
            let mut name_style = Style::default().fg(color);
            if row.depth < 2 {
                name_style = name_style.add_modifier(Modifier::BOLD);
            }
            let share = row.share.map(format_percent).unwrap_or_default();

            let style = if i == app.list_index {
                palette.selected_style()
            } else if row.sphere_index % 2 == 1 {
                palette.alt_row_style()
            } else {
                palette.normal_style()
            };

            Row::new(vec![
                Cell::from(Span::styled(name, name_style)),
                Cell::from(Line::from(format_amount(row.total)).right_aligned()),
                Cell::from(Line::from(share).right_aligned()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(22),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(titled_block(&title, palette));

    f.render_widget(table, table_area);
    render_insights(
        f,
        insights_area,
        &narrative::hierarchy_insights(&app.tree),
        palette,
    );
}
