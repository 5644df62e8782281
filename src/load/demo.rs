use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Sphere, Transaction};

/// Small fixed dataset used when the real file cannot be loaded.
pub(crate) fn demo_transactions() -> Vec<Transaction> {
    let rows: [(&str, Sphere, &str, &str, &str, i64); 6] = [
        ("2020-01-15", Sphere::National, "PESSOAL", "PT", "A", 500_000),
        ("2020-02-20", Sphere::State, "PROPAGANDA", "PSDB", "B", 200_000),
        ("2020-03-10", Sphere::Municipal, "OUTROS", "MDB", "C", 50_000),
        ("2020-04-05", Sphere::National, "ALUGUEL", "PT", "D", 300_000),
        ("2020-05-25", Sphere::State, "PESSOAL", "PSDB", "E", 150_000),
        ("2020-06-01", Sphere::Municipal, "PROPAGANDA", "MDB", "F", 75_000),
    ];

    rows.into_iter()
        .map(|(date, sphere, category, party, counterparty, amount)| Transaction {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            sphere,
            category: category.into(),
            party: party.into(),
            counterparty: Some(counterparty.into()),
            amount: Some(Decimal::from(amount)),
        })
        .collect()
}
