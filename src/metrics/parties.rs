use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;

use crate::store::RecordStore;

const PER_MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FeeRatio {
    pub(crate) party: String,
    pub(crate) total_spend: Decimal,
    pub(crate) fee_spend: Decimal,
    pub(crate) fee_ratio_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SupplierDiversity {
    pub(crate) party: String,
    pub(crate) distinct_suppliers: usize,
    pub(crate) total_spend: Decimal,
    /// Rows with a known date.
    pub(crate) transactions: usize,
    /// Distinct suppliers per million spent.
    pub(crate) diversification_index: Decimal,
}

/// Per-party total and fee spend, in first-seen order. Parties whose sums
/// overflow are left out.
fn party_fee_totals(store: &RecordStore, fee_category: &str) -> IndexMap<String, (Decimal, Decimal)> {
    let mut totals: IndexMap<String, (Option<Decimal>, Option<Decimal>)> = IndexMap::new();
    for txn in store.rows() {
        let entry = totals
            .entry(txn.party.clone())
            .or_insert((Some(Decimal::ZERO), Some(Decimal::ZERO)));
        let amount = txn.amount_or_zero();
        entry.0 = entry.0.and_then(|t| t.checked_add(amount));
        if txn.is_in_category(fee_category) {
            entry.1 = entry.1.and_then(|t| t.checked_add(amount));
        }
    }
    totals
        .into_iter()
        .filter_map(|(party, (total, fees))| Some((party, (total?, fees?))))
        .collect()
}

/// Fee spend as a percentage of total spend, for parties spending strictly
/// more than `min_spend`. Ratios are not clamped.
pub(crate) fn fee_ratios(store: &RecordStore, fee_category: &str, min_spend: Decimal) -> Vec<FeeRatio> {
    party_fee_totals(store, fee_category)
        .into_iter()
        .filter(|(_, (total, _))| *total > min_spend)
        .filter_map(|(party, (total_spend, fee_spend))| {
            let fee_ratio_percent = fee_spend
                .checked_div(total_spend)?
                .checked_mul(Decimal::ONE_HUNDRED)?;
            Some(FeeRatio {
                party,
                total_spend,
                fee_spend,
                fee_ratio_percent,
            })
        })
        .collect()
}

/// The `limit` parties with the lowest fee ratio among those spending
/// strictly more than `min_spend`, lowest first.
pub(crate) fn fee_efficiency(
    store: &RecordStore,
    fee_category: &str,
    min_spend: Decimal,
    limit: usize,
) -> Vec<FeeRatio> {
    let mut ranked = fee_ratios(store, fee_category, min_spend);
    ranked.sort_by(|a, b| a.fee_ratio_percent.cmp(&b.fee_ratio_percent));
    ranked.truncate(limit);
    ranked
}

/// The `limit` most diversified parties among those spending strictly more
/// than `min_spend`, highest index first.
pub(crate) fn supplier_diversification(
    store: &RecordStore,
    min_spend: Decimal,
    limit: usize,
) -> Vec<SupplierDiversity> {
    let mut parties: IndexMap<&str, (IndexSet<&str>, Option<Decimal>, usize)> = IndexMap::new();
    for txn in store.rows() {
        let entry = parties
            .entry(txn.party.as_str())
            .or_insert_with(|| (IndexSet::new(), Some(Decimal::ZERO), 0));
        if let Some(supplier) = txn.counterparty.as_deref() {
            entry.0.insert(supplier);
        }
        entry.1 = entry.1.and_then(|t| t.checked_add(txn.amount_or_zero()));
        if txn.date.is_some() {
            entry.2 += 1;
        }
    }

    let mut ranked: Vec<SupplierDiversity> = parties
        .into_iter()
        .filter_map(|(party, (suppliers, total_spend, transactions))| {
            let total_spend = total_spend.filter(|total| *total > min_spend)?;
            let distinct_suppliers = suppliers.len();
            let diversification_index = Decimal::from(distinct_suppliers)
                .checked_div(total_spend)?
                .checked_mul(PER_MILLION)?;
            Some(SupplierDiversity {
                party: party.to_string(),
                distinct_suppliers,
                total_spend,
                transactions,
                diversification_index,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.diversification_index.cmp(&a.diversification_index));
    ranked.truncate(limit);
    ranked
}
