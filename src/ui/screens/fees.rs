use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{chart_with_insights, render_empty, render_insights, titled_block};
use crate::metrics::FeeRatio;
use crate::ui::app::App;
use crate::ui::narrative::{self, EfficiencyBand};
use crate::ui::theme::Palette;
use crate::ui::util::{bar_value, format_amount, format_percent, truncate};

const SCATTER_TITLE: &str = "Bank Fees vs Total Spend";
const RANKING_TITLE: &str = "Efficiency Ranking: lowest % in fees";

/// Scatter points `(total spend in millions, fee ratio %)` split by band.
pub(crate) fn scatter_points(rows: &[FeeRatio]) -> [(EfficiencyBand, Vec<(f64, f64)>); 4] {
    let mut bands = [
        (EfficiencyBand::Excellent, Vec::new()),
        (EfficiencyBand::Good, Vec::new()),
        (EfficiencyBand::Regular, Vec::new()),
        (EfficiencyBand::Low, Vec::new()),
    ];
    for row in rows {
        let band = EfficiencyBand::classify(row.fee_ratio_percent);
        let x = (row.total_spend / Decimal::from(1_000_000)).to_f64().unwrap_or(0.0);
        let y = row.fee_ratio_percent.to_f64().unwrap_or(0.0);
        if let Some((_, points)) = bands.iter_mut().find(|(b, _)| *b == band) {
            points.push((x, y));
        }
    }
    bands
}

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let metrics = &app.metrics;
    if metrics.fee_ratios.is_empty() && metrics.efficiency.is_empty() {
        render_empty(f, area, SCATTER_TITLE, palette);
        return;
    }
    let (chart_area, insights_area) = chart_with_insights(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chart_area);

    render_scatter(f, chunks[0], &metrics.fee_ratios, palette);
    render_ranking(f, chunks[1], app, palette);
    render_insights(
        f,
        insights_area,
        &narrative::fee_insights(&metrics.fee_ratios, &metrics.efficiency),
        palette,
    );
}

fn band_color(band: EfficiencyBand, palette: &Palette) -> ratatui::style::Color {
    match band {
        EfficiencyBand::Excellent => palette.green,
        EfficiencyBand::Good => palette.yellow,
        EfficiencyBand::Regular => palette.orange,
        EfficiencyBand::Low => palette.red,
    }
}

fn render_scatter(f: &mut Frame, area: Rect, rows: &[FeeRatio], palette: &Palette) {
    let bands = scatter_points(rows);
    let all = bands.iter().flat_map(|(_, points)| points.iter());
    let (max_x, max_y) = all.fold((0.0_f64, 0.0_f64), |(mx, my), (x, y)| {
        (mx.max(*x), my.max(*y))
    });
    let x_bound = (max_x * 1.05).max(0.1);
    let y_bound = (max_y * 1.1).max(3.5);

    let references: Vec<(f64, Vec<(f64, f64)>)> = [1.0, 2.0, 3.0]
        .into_iter()
        .map(|level| (level, vec![(0.0, level), (x_bound, level)]))
        .collect();

    let mut datasets: Vec<Dataset> = references
        .iter()
        .zip([EfficiencyBand::Excellent, EfficiencyBand::Good, EfficiencyBand::Regular])
        .map(|((level, line), band)| {
            Dataset::default()
                .name(format!("{level:.0}%"))
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(band_color(band, palette)))
                .data(line)
        })
        .collect();
    for (band, points) in &bands {
        datasets.push(
            Dataset::default()
                .name(band.label())
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(band_color(*band, palette)))
                .data(points),
        );
    }

    let x_labels: Vec<Span> = [0.0, x_bound / 2.0, x_bound]
        .iter()
        .map(|v| Span::styled(format!("{v:.1}M"), palette.dim_style()))
        .collect();
    let y_labels: Vec<Span> = [0.0, y_bound / 2.0, y_bound]
        .iter()
        .map(|v| Span::styled(format!("{v:.1}%"), palette.dim_style()))
        .collect();

    let chart = Chart::new(datasets)
        .block(titled_block(SCATTER_TITLE, palette))
        .x_axis(
            Axis::default()
                .title(Span::styled("Total spend (R$ millions)", palette.dim_style()))
                .style(palette.border_style())
                .bounds([0.0, x_bound])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("% fees", palette.dim_style()))
                .style(palette.border_style())
                .bounds([0.0, y_bound])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

fn render_ranking(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let rows = &app.metrics.efficiency;
    let title = format!(
        "{RANKING_TITLE} (spend > {})",
        format_amount(app.config.metrics.efficiency_min_spend)
    );
    if rows.is_empty() {
        render_empty(f, area, &title, palette);
        return;
    }

    // Thousandths of a percent so ratios well under 1% still draw.
    let scale = Decimal::from(1_000);
    let bars: Vec<Bar> = rows
        .iter()
        .skip(app.list_scroll)
        .map(|row| {
            let color = band_color(EfficiencyBand::classify(row.fee_ratio_percent), palette);
            Bar::default()
                .value(bar_value(row.fee_ratio_percent.saturating_mul(scale)))
                .text_value(format!(
                    "{}  ({} of {})",
                    format_percent(row.fee_ratio_percent),
                    format_amount(row.fee_spend),
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
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use rust_decimal_macros::dec;

    use super::*;

    fn ratio(party: &str, total: Decimal, pct: Decimal) -> FeeRatio {
        FeeRatio {
            party: party.into(),
            total_spend: total,
            fee_spend: total * pct / dec!(100),
            fee_ratio_percent: pct,
        }
    }

    #[test]
    fn test_scatter_points_split_by_band() {
        let rows = vec![
            ratio("PT", dec!(2000000), dec!(0.5)),
            ratio("NOVO", dec!(500000), dec!(4)),
            ratio("PSOL", dec!(1500000), dec!(0.25)),
        ];
        let bands = scatter_points(&rows);
        assert_eq!(bands[0].0, EfficiencyBand::Excellent);
        assert_eq!(bands[0].1, vec![(2.0, 0.5), (1.5, 0.25)]);
        assert!(bands[1].1.is_empty());
        assert!(bands[2].1.is_empty());
        assert_eq!(bands[3].1, vec![(0.5, 4.0)]);
    }
}
