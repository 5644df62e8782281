#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::load::{demo_transactions, LoadOutcome};
use crate::models::Transaction;

fn demo_app() -> App {
    let config = Config::from_lookup(|_| None).unwrap();
    let outcome = LoadOutcome {
        store: RecordStore::new(demo_transactions()),
        notice: None,
        issues: Vec::new(),
    };
    App::new(config, outcome)
}

fn party_index(app: &App, party: &str) -> usize {
    app.domain.parties.iter().position(|p| p == party).unwrap()
}

#[test]
fn test_new_selects_everything() {
    let app = demo_app();
    assert!(app.is_unfiltered());
    assert_eq!(app.metrics.summary.total, dec!(1275000));
    assert_eq!(app.metrics.summary.transactions, 6);
    assert_eq!(app.base_summary, app.metrics.summary);
    assert!(app.status_message.is_empty());
}

#[test]
fn test_new_with_only_uninformed_rows_has_no_error() {
    let config = Config::from_lookup(|_| None).unwrap();
    let outcome = LoadOutcome {
        store: RecordStore::new(vec![Transaction {
            date: None,
            sphere: Sphere::Uninformed,
            category: "PESSOAL".into(),
            party: "PT".into(),
            counterparty: None,
            amount: Some(dec!(100)),
        }]),
        notice: None,
        issues: Vec::new(),
    };
    let app = App::new(config, outcome);
    assert!(app.domain.spheres.is_empty());
    assert!(app.status_message.is_empty());
    assert_eq!(*app.metrics, DashboardMetrics::default());
}

#[test]
fn test_toggle_party_recomputes() {
    let mut app = demo_app();
    let pt = party_index(&app, "PT");
    app.toggle_filter(FilterDimension::Parties, pt);
    assert!(!app.is_chosen(FilterDimension::Parties, pt));
    assert_eq!(app.metrics.summary.total, dec!(475000));
    assert!(!app.is_unfiltered());

    app.toggle_filter(FilterDimension::Parties, pt);
    assert_eq!(app.metrics.summary.total, dec!(1275000));
}

#[test]
fn test_empty_dimension_shows_error_and_no_data() {
    let mut app = demo_app();
    for i in 0..app.domain.spheres.len() {
        app.toggle_filter(FilterDimension::Spheres, i);
    }
    assert_eq!(app.status_message, "No spheres selected");
    assert_eq!(app.metrics.summary.total, Decimal::ZERO);
    assert!(app.metrics.category_totals.is_empty());
    assert!(app.tree.is_empty());
}

#[test]
fn test_choose_only_is_case_insensitive() {
    let mut app = demo_app();
    let picked = app.choose_only(FilterDimension::Parties, &["pt"]).unwrap();
    assert_eq!(picked, 1);
    assert_eq!(app.metrics.summary.total, dec!(800000));

    app.choose_only(FilterDimension::Spheres, &["state"]).unwrap();
    assert!(app.metrics.summary.total.is_zero());
}

#[test]
fn test_choose_only_unknown_value() {
    let mut app = demo_app();
    let err = app
        .choose_only(FilterDimension::Categories, &["NOPE"])
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown category: NOPE");
    assert!(app.is_unfiltered());
}

#[test]
fn test_choose_only_empty_selects_dimension() {
    let mut app = demo_app();
    app.choose_only(FilterDimension::Parties, &["MDB"]).unwrap();
    let all = app.choose_only(FilterDimension::Parties, &[]).unwrap();
    assert_eq!(all, 3);
    assert!(app.is_unfiltered());
}

#[test]
fn test_reset_filters() {
    let mut app = demo_app();
    app.choose_only(FilterDimension::Categories, &["PESSOAL"]).unwrap();
    app.reset_filters();
    assert!(app.is_unfiltered());
    assert_eq!(app.metrics.summary.total, dec!(1275000));
}

#[test]
fn test_hierarchy_list_len_counts_every_node() {
    let mut app = demo_app();
    app.switch_screen(Screen::Hierarchy);
    // 3 spheres, one party each, two categories per party
    assert_eq!(app.list_len(), 12);
}

#[test]
fn test_uninformed_rows_are_excluded() {
    let config = Config::from_lookup(|_| None).unwrap();
    let mut rows = demo_transactions();
    rows.push(Transaction {
        date: None,
        sphere: Sphere::Uninformed,
        category: "PESSOAL".into(),
        party: "PT".into(),
        counterparty: None,
        amount: Some(dec!(999)),
    });
    let app = App::new(
        config,
        LoadOutcome {
            store: RecordStore::new(rows),
            notice: None,
            issues: Vec::new(),
        },
    );
    assert!(!app.domain.spheres.contains(&Sphere::Uninformed));
    assert_eq!(app.metrics.summary.total, dec!(1275000));
}

#[test]
fn test_reload_missing_file_falls_back_to_demo() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = demo_app();
    app.config.data_path = dir.path().join("missing.csv");
    app.choose_only(FilterDimension::Parties, &["PT"]).unwrap();

    app.reload();
    assert_eq!(app.source_label, "demo data");
    assert!(app.status_message.starts_with("Using demonstration data"));
    assert!(app.is_unfiltered());
}

#[test]
fn test_filter_dimension_cycles() {
    let d = FilterDimension::Spheres;
    assert_eq!(d.next().next().next(), d);
    assert_eq!(d.prev(), FilterDimension::Parties);
}
