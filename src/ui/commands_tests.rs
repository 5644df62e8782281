#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::config::Config;
use crate::load::{demo_transactions, LoadOutcome};
use crate::store::RecordStore;

fn demo_app() -> App {
    let outcome = LoadOutcome {
        store: RecordStore::new(demo_transactions()),
        notice: None,
        issues: Vec::new(),
    };
    App::new(Config::from_lookup(|_| None).unwrap(), outcome)
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("fees", "fees"), 0);
    assert_eq!(levenshtein("feez", "fees"), 1);
    assert_eq!(levenshtein("açaí", "acai"), 2);
}

#[test]
fn test_unknown_command_suggests_closest() {
    let mut app = demo_app();
    handle_command("filtres", &mut app).unwrap();
    assert_eq!(
        app.status_message,
        "Unknown command: :filtres. Did you mean :filters?"
    );
}

#[test]
fn test_screen_commands() {
    let mut app = demo_app();
    handle_command("fees", &mut app).unwrap();
    assert_eq!(app.screen, Screen::Fees);
    handle_command("tree", &mut app).unwrap();
    assert_eq!(app.screen, Screen::Hierarchy);
    handle_command("  o  ", &mut app).unwrap();
    assert_eq!(app.screen, Screen::Overview);
}

#[test]
fn test_quit_and_help() {
    let mut app = demo_app();
    handle_command("help", &mut app).unwrap();
    assert!(app.show_help);
    handle_command("q", &mut app).unwrap();
    assert!(!app.running);
}

#[test]
fn test_party_command_filters_and_clears() {
    let mut app = demo_app();
    handle_command("party pt mdb", &mut app).unwrap();
    assert_eq!(app.chosen_parties.len(), 2);
    assert_eq!(app.metrics.summary.total, dec!(925000));
    assert_eq!(
        app.status_message,
        "Filtered Parties to 2: 4 transactions"
    );

    handle_command("party", &mut app).unwrap();
    assert!(app.is_unfiltered());
    assert_eq!(app.status_message, "Showing all Parties");
}

#[test]
fn test_category_command_keeps_spaces() {
    let mut app = demo_app();
    handle_command("category NOT A CATEGORY", &mut app).unwrap();
    assert_eq!(app.status_message, "Unknown category: NOT A CATEGORY");
    handle_command("category propaganda", &mut app).unwrap();
    assert_eq!(app.metrics.summary.total, dec!(275000));
}

#[test]
fn test_reset_command() {
    let mut app = demo_app();
    handle_command("sphere nacional", &mut app).unwrap();
    assert_eq!(app.metrics.summary.total, dec!(800000));
    handle_command("reset", &mut app).unwrap();
    assert!(app.is_unfiltered());
    assert_eq!(app.status_message, "Filters cleared");
}

#[test]
fn test_tree_limit_command() {
    let mut app = demo_app();
    handle_command("tree-limit all", &mut app).unwrap();
    assert_eq!(app.config.metrics.hierarchy_parties, None);
    handle_command("tree-limit 2", &mut app).unwrap();
    assert_eq!(app.config.metrics.hierarchy_parties, Some(2));
    handle_command("tree-limit 0", &mut app).unwrap();
    assert_eq!(app.config.metrics.hierarchy_parties, Some(2));
    assert!(app.status_message.starts_with("Usage"));
}

#[test]
fn test_fee_category_command_recomputes() {
    let mut app = demo_app();
    assert!(app.metrics.efficiency.iter().all(|r| r.fee_spend.is_zero()));
    handle_command("fee-category ALUGUEL", &mut app).unwrap();
    let pt = app
        .metrics
        .efficiency
        .iter()
        .find(|r| r.party == "PT")
        .unwrap();
    assert_eq!(pt.fee_spend, dec!(300000));
}

#[test]
fn test_min_spend_command() {
    let mut app = demo_app();
    handle_command("min-spend 250000", &mut app).unwrap();
    assert_eq!(app.config.metrics.efficiency_min_spend, dec!(250000));
    assert!(app
        .metrics
        .efficiency
        .iter()
        .all(|r| r.total_spend > dec!(250000)));
    handle_command("min-spend abc", &mut app).unwrap();
    assert_eq!(app.status_message, "Usage: :min-spend <amount>");
}
