use anyhow::Result;
use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::hash::Hash;

use crate::models::{Sphere, Transaction};

/// A groupable column of a [`Transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Sphere,
    Category,
    Party,
    Counterparty,
    Date,
}

impl Field {
    pub(crate) fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "sphere" | "esfera" => Ok(Self::Sphere),
            "category" | "categoria" => Ok(Self::Category),
            "party" | "partido" => Ok(Self::Party),
            "supplier" | "counterparty" | "fornecedor" => Ok(Self::Counterparty),
            "date" | "data" => Ok(Self::Date),
            other => anyhow::bail!("Unknown field: {other}"),
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Sphere => "Sphere",
            Self::Category => "Category",
            Self::Party => "Party",
            Self::Counterparty => "Supplier",
            Self::Date => "Date",
        }
    }

    /// The grouping key for a row, or `None` when the field is missing.
    pub(crate) fn value(&self, txn: &Transaction) -> Option<String> {
        match self {
            Self::Sphere => Some(txn.sphere.as_str().to_string()),
            Self::Category => Some(txn.category.clone()),
            Self::Party => Some(txn.party.clone()),
            Self::Counterparty => txn.counterparty.clone(),
            Self::Date => txn.date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Measure {
    /// Sum of `amount`; missing amounts add nothing.
    Amount,
    /// Number of rows.
    Count,
}

impl Measure {
    fn of(&self, txn: &Transaction) -> Decimal {
        match self {
            Self::Amount => txn.amount_or_zero(),
            Self::Count => Decimal::ONE,
        }
    }
}

/// Resolved filter sets. Every dimension must be non-empty; "select all" is
/// expressed by passing the full domain (see [`Selection::from_choices`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct Selection {
    pub(crate) spheres: BTreeSet<Sphere>,
    pub(crate) categories: BTreeSet<String>,
    pub(crate) parties: BTreeSet<String>,
}

impl Selection {
    pub(crate) fn all(domain: &Domain) -> Self {
        Self {
            spheres: domain.spheres.iter().cloned().collect(),
            categories: domain.categories.iter().cloned().collect(),
            parties: domain.parties.iter().cloned().collect(),
        }
    }

    /// Build a selection from user choices, where an empty choice means the
    /// whole dimension.
    pub(crate) fn from_choices(
        domain: &Domain,
        spheres: &BTreeSet<Sphere>,
        categories: &BTreeSet<String>,
        parties: &BTreeSet<String>,
    ) -> Self {
        let all = Self::all(domain);
        Self {
            spheres: if spheres.is_empty() { all.spheres } else { spheres.clone() },
            categories: if categories.is_empty() {
                all.categories
            } else {
                categories.clone()
            },
            parties: if parties.is_empty() { all.parties } else { parties.clone() },
        }
    }

    pub(crate) fn matches(&self, txn: &Transaction) -> bool {
        self.spheres.contains(&txn.sphere)
            && self.categories.contains(&txn.category)
            && self.parties.contains(&txn.party)
    }
}

/// Sorted distinct values of each filterable dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Domain {
    pub(crate) spheres: Vec<Sphere>,
    pub(crate) categories: Vec<String>,
    pub(crate) parties: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StoreSummary {
    pub(crate) total: Decimal,
    pub(crate) transactions: usize,
    pub(crate) parties: usize,
    pub(crate) suppliers: usize,
    pub(crate) period: Option<(NaiveDate, NaiveDate)>,
}

/// In-memory transaction rows. Rows are never edited; every operation
/// returns a new store.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RecordStore {
    rows: Vec<Transaction>,
}

impl RecordStore {
    pub(crate) fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub(crate) fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn exclude_uninformed(&self) -> Self {
        Self::new(
            self.rows
                .iter()
                .filter(|t| !t.is_uninformed())
                .cloned()
                .collect(),
        )
    }

    /// Rows matching `selection`. An empty store filters to an empty store
    /// whatever the selection, since its domain has nothing to choose from.
    pub(crate) fn filter(&self, selection: &Selection) -> Result<Self> {
        if self.rows.is_empty() {
            return Ok(Self::default());
        }
        anyhow::ensure!(!selection.spheres.is_empty(), "No spheres selected");
        anyhow::ensure!(!selection.categories.is_empty(), "No categories selected");
        anyhow::ensure!(!selection.parties.is_empty(), "No parties selected");

        Ok(Self::new(
            self.rows
                .iter()
                .filter(|t| selection.matches(t))
                .cloned()
                .collect(),
        ))
    }

    /// Group by `keys` and sum `measure`. Groups keep first-occurrence order;
    /// a row with any missing key value belongs to no group.
    pub(crate) fn group_sum(&self, keys: &[Field], measure: Measure) -> IndexMap<Vec<String>, Decimal> {
        checked_totals(self.rows.iter().filter_map(|txn| {
            let key: Option<Vec<String>> = keys.iter().map(|k| k.value(txn)).collect();
            key.map(|k| (k, measure.of(txn)))
        }))
    }

    pub(crate) fn domain(&self) -> Domain {
        let spheres: BTreeSet<Sphere> = self.rows.iter().map(|t| t.sphere.clone()).collect();
        let categories: BTreeSet<String> = self.rows.iter().map(|t| t.category.clone()).collect();
        let parties: BTreeSet<String> = self.rows.iter().map(|t| t.party.clone()).collect();
        Domain {
            spheres: spheres.into_iter().collect(),
            categories: categories.into_iter().collect(),
            parties: parties.into_iter().collect(),
        }
    }

    pub(crate) fn summary(&self) -> StoreSummary {
        let parties: IndexSet<&str> = self.rows.iter().map(|t| t.party.as_str()).collect();
        let suppliers: IndexSet<&str> = self
            .rows
            .iter()
            .filter_map(|t| t.counterparty.as_deref())
            .collect();
        let first = self.rows.iter().filter_map(|t| t.date).min();
        let last = self.rows.iter().filter_map(|t| t.date).max();

        StoreSummary {
            total: self
                .rows
                .iter()
                .map(Transaction::amount_or_zero)
                .fold(Decimal::ZERO, Decimal::saturating_add),
            transactions: self.rows.len(),
            parties: parties.len(),
            suppliers: suppliers.len(),
            period: first.zip(last),
        }
    }
}

/// Sum amounts per key in first-occurrence order. Rows mapped to `None` are
/// skipped.
pub(crate) fn sum_by<'a, K, F>(rows: impl IntoIterator<Item = &'a Transaction>, mut key: F) -> IndexMap<K, Decimal>
where
    K: Hash + Eq,
    F: FnMut(&Transaction) -> Option<K>,
{
    checked_totals(
        rows.into_iter()
            .filter_map(|txn| key(txn).map(|k| (k, txn.amount_or_zero()))),
    )
}

/// Sum values per key in first-occurrence order. A key whose sum overflows
/// is dropped.
pub(crate) fn checked_totals<K, I>(entries: I) -> IndexMap<K, Decimal>
where
    K: Hash + Eq,
    I: IntoIterator<Item = (K, Decimal)>,
{
    let mut totals: IndexMap<K, Option<Decimal>> = IndexMap::new();
    for (key, value) in entries {
        let slot = totals.entry(key).or_insert(Some(Decimal::ZERO));
        *slot = slot.and_then(|t| t.checked_add(value));
    }
    let before = totals.len();
    let sums: IndexMap<K, Decimal> = totals
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect();
    if sums.len() < before {
        log::warn!("Dropped {} group(s) whose sum overflowed", before - sums.len());
    }
    sums
}

/// Up to `n` items sorted descending by `by`. The sort is stable, so ties keep
/// their input order.
pub(crate) fn nlargest<T, V, F>(rows: impl IntoIterator<Item = T>, n: usize, by: F) -> Vec<T>
where
    V: Ord,
    F: Fn(&T) -> V,
{
    let mut items: Vec<T> = rows.into_iter().collect();
    items.sort_by(|a, b| by(b).cmp(&by(a)));
    items.truncate(n);
    items
}
