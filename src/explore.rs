//! One-off statistics over a raw statement file, for getting to know a new
//! export before pointing the dashboard at it.

use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::load::{parse_decimal, RawTable};
use crate::store::nlargest;

#[derive(Debug, Clone)]
pub(crate) struct ExploreOptions {
    pub(crate) party_column: String,
    pub(crate) amount_column: String,
    pub(crate) entry_type_column: String,
    pub(crate) critical_columns: Vec<String>,
    pub(crate) sample_rows: usize,
    pub(crate) top_parties: usize,
}

impl Default for ExploreOptions {
    fn default() -> Self {
        Self {
            party_column: "SG_PARTIDO".into(),
            amount_column: "VR_LANCAMENTO".into(),
            entry_type_column: "TP_LANCAMENTO".into(),
            critical_columns: ["DS_LANCAMENTO", "NM_CONTRAPARTE", "DS_FONTE_RECURSO", "DS_TIPO_OPERACAO"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            sample_rows: 10,
            top_parties: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PartyMovement {
    pub(crate) party: String,
    pub(crate) total: Decimal,
    pub(crate) count: usize,
}

/// Describe-style summary of a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AmountStats {
    pub(crate) count: usize,
    pub(crate) mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub(crate) std: Option<f64>,
    pub(crate) min: f64,
    pub(crate) q1: f64,
    pub(crate) median: f64,
    pub(crate) q3: f64,
    pub(crate) max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ColumnProfile {
    pub(crate) name: String,
    /// `None` when the column is absent from the file.
    pub(crate) distinct: Option<usize>,
    pub(crate) examples: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ExploreReport {
    pub(crate) rows: usize,
    pub(crate) columns: Vec<String>,
    pub(crate) parties: usize,
    pub(crate) total: Decimal,
    pub(crate) sample: Vec<Vec<String>>,
    pub(crate) missing: Vec<(String, usize)>,
    pub(crate) entry_types: Option<Vec<(String, usize)>>,
    pub(crate) top_parties: Vec<PartyMovement>,
    pub(crate) amount_stats: Option<AmountStats>,
    pub(crate) critical: Vec<ColumnProfile>,
}

pub(crate) fn build_report(table: &RawTable, options: &ExploreOptions) -> Result<ExploreReport> {
    let party_col = table
        .column_index(&options.party_column)
        .ok_or_else(|| anyhow::anyhow!("Column {} not found", options.party_column))?;
    let amount_col = table
        .column_index(&options.amount_column)
        .ok_or_else(|| anyhow::anyhow!("Column {} not found", options.amount_column))?;

    let amounts: Vec<Option<Decimal>> = (0..table.rows.len())
        .map(|i| {
            let raw = table.cell(i, amount_col);
            if raw.is_empty() {
                None
            } else {
                parse_decimal(raw).ok()
            }
        })
        .collect();

    let parties: IndexSet<&str> = (0..table.rows.len())
        .map(|i| table.cell(i, party_col))
        .filter(|p| !p.is_empty())
        .collect();

    let missing = table
        .headers
        .iter()
        .enumerate()
        .map(|(c, name)| {
            let blanks = (0..table.rows.len())
                .filter(|&i| table.cell(i, c).is_empty())
                .count();
            (name.clone(), blanks)
        })
        .filter(|(_, blanks)| *blanks > 0)
        .collect();

    let entry_types = table
        .column_index(&options.entry_type_column)
        .map(|c| value_counts(table, c));

    let mut movement: IndexMap<&str, (Decimal, usize)> = IndexMap::new();
    for (i, amount) in amounts.iter().enumerate() {
        let party = table.cell(i, party_col);
        if party.is_empty() {
            continue;
        }
        let entry = movement.entry(party).or_insert((Decimal::ZERO, 0));
        if let Some(a) = amount {
            entry.0 = entry.0.saturating_add(*a);
            entry.1 += 1;
        }
    }
    let top_parties = nlargest(movement, options.top_parties, |(_, (total, _))| *total)
        .into_iter()
        .map(|(party, (total, count))| PartyMovement {
            party: party.to_string(),
            total: total.round_dp(2),
            count,
        })
        .collect();

    let critical = options
        .critical_columns
        .iter()
        .map(|name| profile_column(table, name))
        .collect();

    Ok(ExploreReport {
        rows: table.rows.len(),
        columns: table.headers.clone(),
        parties: parties.len(),
        total: amounts
            .iter()
            .flatten()
            .fold(Decimal::ZERO, |acc, a| acc.saturating_add(*a)),
        sample: table.rows.iter().take(options.sample_rows).cloned().collect(),
        missing,
        entry_types,
        top_parties,
        amount_stats: describe(&amounts.iter().flatten().copied().collect::<Vec<_>>()),
        critical,
    })
}

/// Non-blank values of a column with their frequency, most frequent first.
fn value_counts(table: &RawTable, column: usize) -> Vec<(String, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for i in 0..table.rows.len() {
        let value = table.cell(i, column);
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    nlargest(counts, usize::MAX, |(_, n)| *n)
        .into_iter()
        .map(|(value, n)| (value.to_string(), n))
        .collect()
}

fn profile_column(table: &RawTable, name: &str) -> ColumnProfile {
    let Some(c) = table.column_index(name) else {
        return ColumnProfile {
            name: name.to_string(),
            distinct: None,
            examples: Vec::new(),
        };
    };

    let values: IndexSet<&str> = (0..table.rows.len())
        .map(|i| table.cell(i, c))
        .filter(|v| !v.is_empty())
        .collect();
    let examples = (0..table.rows.len())
        .map(|i| table.cell(i, c))
        .filter(|v| !v.is_empty())
        .take(5)
        .map(str::to_string)
        .collect();

    ColumnProfile {
        name: name.to_string(),
        distinct: Some(values.len()),
        examples,
    }
}

pub(crate) fn describe(values: &[Decimal]) -> Option<AmountStats> {
    let mut sorted: Vec<f64> = values.iter().filter_map(|v| v.to_f64()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    });

    Some(AmountStats {
        count: n,
        mean,
        std,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
#[path = "explore_tests.rs"]
mod tests;
