use ratatui::{
    layout::{Direction, Rect},
    style::Style,
    text::Line,
    widgets::{Bar, BarChart, BarGroup},
    Frame,
};
use rust_decimal::Decimal;

use super::{chart_with_insights, render_empty, render_insights, titled_block};
use crate::ui::app::App;
use crate::ui::narrative;
use crate::ui::theme::Palette;
use crate::ui::util::{bar_value, format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let rows = &app.metrics.diversification;
    let title = format!(
        "Supplier Diversification: suppliers per R$ 1M (spend > {})",
        format_amount(app.config.metrics.diversification_min_spend)
    );
    if rows.is_empty() {
        render_empty(f, area, &title, palette);
        return;
    }
    let (chart_area, insights_area) = chart_with_insights(area);

    let top = rows
        .first()
        .map(|r| r.diversification_index)
        .unwrap_or(Decimal::ZERO);
    let bars: Vec<Bar> = rows
        .iter()
        .skip(app.list_scroll)
        .map(|row| {
            // Stronger color for the more diversified half.
            let color = if row.diversification_index.saturating_mul(Decimal::TWO) >= top {
                palette.accent
            } else {
                palette.series_color(7)
            };
            Bar::default()
                .value(bar_value(row.diversification_index.saturating_mul(Decimal::ONE_HUNDRED)))
                .text_value(format!(
                    "{:.2}  ({} suppliers, {} txns, {})",
                    row.diversification_index.round_dp(2),
                    row.distinct_suppliers,
                    row.transactions,
                    format_amount(row.total_spend)
                ))
                .label(Line::from(truncate(&row.party, 10)))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(palette.text))
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block(&title, palette))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, chart_area);
    render_insights(
        f,
        insights_area,
        &narrative::diversification_insights(rows),
        palette,
    );
}
