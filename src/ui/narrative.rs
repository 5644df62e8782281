//! Short insight lines shown next to each chart. They are derived from the
//! aggregate rows so they follow the active filters.

use indexmap::IndexMap;
use rust_decimal::Decimal;

use super::util::{format_amount, format_percent};
use crate::metrics::{CategoryShare, CategorySphereTotal, FeeRatio, SphereNode, SupplierDiversity};
use crate::models::Sphere;

pub(crate) const NO_DATA: &str = "No data for the current filters.";

/// Reference bands for the fee-ratio scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EfficiencyBand {
    Excellent,
    Good,
    Regular,
    Low,
}

impl EfficiencyBand {
    pub(crate) fn classify(fee_ratio_percent: Decimal) -> Self {
        if fee_ratio_percent < Decimal::ONE {
            Self::Excellent
        } else if fee_ratio_percent < Decimal::TWO {
            Self::Good
        } else if fee_ratio_percent <= Decimal::from(3) {
            Self::Regular
        } else {
            Self::Low
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent (<1%)",
            Self::Good => "good (1-2%)",
            Self::Regular => "regular (2-3%)",
            Self::Low => "low (>3%)",
        }
    }
}

pub(crate) fn category_insights(rows: &[CategorySphereTotal]) -> Vec<String> {
    if rows.is_empty() {
        return vec![NO_DATA.into()];
    }
    let mut by_category: IndexMap<&str, Decimal> = IndexMap::new();
    let mut by_sphere: IndexMap<&Sphere, Decimal> = IndexMap::new();
    for row in rows {
        let category = by_category.entry(row.category.as_str()).or_insert(Decimal::ZERO);
        *category = category.saturating_add(row.total);
        let sphere = by_sphere.entry(&row.sphere).or_insert(Decimal::ZERO);
        *sphere = sphere.saturating_add(row.total);
    }
    let grand = by_sphere
        .values()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(*t));

    let mut lines = Vec::new();
    if let Some((category, total)) = largest(&by_category) {
        lines.push(format!(
            "{category} is the largest category at {}.",
            format_amount(total)
        ));
    }
    if let Some((sphere, total)) = largest(&by_sphere) {
        match total.checked_div(grand) {
            Some(share) => lines.push(format!(
                "{sphere} concentrates {} of the charted spending.",
                format_percent(share.saturating_mul(Decimal::ONE_HUNDRED))
            )),
            None => lines.push(format!("{sphere} has the largest total.")),
        }
    }
    lines.push(format!(
        "{} categories compared across {} spheres.",
        by_category.len(),
        by_sphere.len()
    ));
    lines
}

pub(crate) fn hierarchy_insights(tree: &[SphereNode]) -> Vec<String> {
    let Some(top) = tree.iter().reduce(|best, n| if n.total > best.total { n } else { best }) else {
        return vec![NO_DATA.into()];
    };
    let mut lines = vec![format!(
        "{} holds the largest block ({}).",
        top.sphere,
        format_amount(top.total)
    )];
    if let Some(party) = top
        .parties
        .iter()
        .reduce(|best, p| if p.total > best.total { p } else { best })
    {
        lines.push(format!(
            "{} leads within {} with {}.",
            party.party,
            top.sphere,
            format_amount(party.total)
        ));
    }
    let blocks: usize = tree.iter().map(|s| s.parties.len()).sum();
    lines.push(format!(
        "{blocks} party blocks shown across {} spheres.",
        tree.len()
    ));
    lines
}

pub(crate) fn composition_insights(rows: &[CategoryShare]) -> Vec<String> {
    let mut leaders: IndexMap<&Sphere, &CategoryShare> = IndexMap::new();
    for row in rows {
        let entry = leaders.entry(&row.sphere).or_insert(row);
        if row.percent > entry.percent {
            *entry = row;
        }
    }
    if leaders.is_empty() {
        return vec![NO_DATA.into()];
    }
    leaders
        .into_iter()
        .map(|(sphere, row)| {
            format!(
                "{sphere}: {} is {} of spending.",
                row.category,
                format_percent(row.percent)
            )
        })
        .collect()
}

/// `scatter` is every party above the scatter threshold; `ranking` is the
/// efficiency top list, lowest ratio first.
pub(crate) fn fee_insights(scatter: &[FeeRatio], ranking: &[FeeRatio]) -> Vec<String> {
    if scatter.is_empty() && ranking.is_empty() {
        return vec![NO_DATA.into()];
    }
    let mut lines = Vec::new();
    if let Some(best) = ranking.first() {
        lines.push(format!(
            "{} is the most efficient, with {} of spending on fees.",
            best.party,
            format_percent(best.fee_ratio_percent)
        ));
    }
    if let Some(worst) = scatter
        .iter()
        .reduce(|w, r| if r.fee_ratio_percent > w.fee_ratio_percent { r } else { w })
    {
        lines.push(format!(
            "{} has the highest fee share at {}.",
            worst.party,
            format_percent(worst.fee_ratio_percent)
        ));
    }
    let bands = [
        EfficiencyBand::Excellent,
        EfficiencyBand::Good,
        EfficiencyBand::Regular,
        EfficiencyBand::Low,
    ];
    let counts: Vec<String> = bands
        .iter()
        .map(|band| {
            let n = scatter
                .iter()
                .filter(|r| EfficiencyBand::classify(r.fee_ratio_percent) == *band)
                .count();
            format!("{n} {}", band.label())
        })
        .collect();
    lines.push(format!("Parties by band: {}.", counts.join(", ")));
    lines
}

/// `rows` are ranked highest index first.
pub(crate) fn diversification_insights(rows: &[SupplierDiversity]) -> Vec<String> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return vec![NO_DATA.into()];
    };
    let mut lines = vec![format!(
        "{} is the most diversified: {:.2} suppliers per million ({} suppliers).",
        first.party,
        first.diversification_index.round_dp(2),
        first.distinct_suppliers
    )];
    if rows.len() > 1 {
        lines.push(format!(
            "{} is the most concentrated of those ranked: {:.2} per million.",
            last.party,
            last.diversification_index.round_dp(2)
        ));
    }
    lines
}

fn largest<K: Copy>(totals: &IndexMap<K, Decimal>) -> Option<(K, Decimal)> {
    totals
        .iter()
        .map(|(k, v)| (*k, *v))
        .reduce(|best, item| if item.1 > best.1 { item } else { best })
}
