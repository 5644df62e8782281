#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    }
}

fn statement() -> RawTable {
    table(
        &["SG_PARTIDO", "VR_LANCAMENTO", "TP_LANCAMENTO", "NM_CONTRAPARTE"],
        &[
            &["PT", "100,00", "D", "A"],
            &["PT", "50,50", "D", ""],
            &["PSDB", "300", "C", "B"],
            &["MDB", "", "D", "A"],
            &["", "10", "", "C"],
        ],
    )
}

#[test]
fn test_report_basic_counts() {
    let report = build_report(&statement(), &ExploreOptions::default()).unwrap();
    assert_eq!(report.rows, 5);
    assert_eq!(report.columns.len(), 4);
    assert_eq!(report.parties, 3);
    assert_eq!(report.total, dec!(460.50));
    assert_eq!(report.sample.len(), 5);
}

#[test]
fn test_report_missing_values() {
    let report = build_report(&statement(), &ExploreOptions::default()).unwrap();
    assert_eq!(
        report.missing,
        vec![
            ("SG_PARTIDO".to_string(), 1),
            ("VR_LANCAMENTO".to_string(), 1),
            ("TP_LANCAMENTO".to_string(), 1),
            ("NM_CONTRAPARTE".to_string(), 1),
        ]
    );
}

#[test]
fn test_report_entry_type_counts() {
    let report = build_report(&statement(), &ExploreOptions::default()).unwrap();
    assert_eq!(
        report.entry_types,
        Some(vec![("D".to_string(), 3), ("C".to_string(), 1)])
    );
}

#[test]
fn test_report_entry_types_absent() {
    let t = table(&["SG_PARTIDO", "VR_LANCAMENTO"], &[&["PT", "1"]]);
    let report = build_report(&t, &ExploreOptions::default()).unwrap();
    assert!(report.entry_types.is_none());
}

#[test]
fn test_report_top_parties() {
    let report = build_report(&statement(), &ExploreOptions::default()).unwrap();
    assert_eq!(report.top_parties.len(), 3);
    assert_eq!(report.top_parties[0].party, "PSDB");
    assert_eq!(report.top_parties[0].total, dec!(300));
    assert_eq!(report.top_parties[1].party, "PT");
    assert_eq!(report.top_parties[1].total, dec!(150.50));
    assert_eq!(report.top_parties[1].count, 2);
    assert_eq!(report.top_parties[2].count, 0);
}

#[test]
fn test_report_critical_columns() {
    let report = build_report(&statement(), &ExploreOptions::default()).unwrap();
    let contraparte = report
        .critical
        .iter()
        .find(|c| c.name == "NM_CONTRAPARTE")
        .unwrap();
    assert_eq!(contraparte.distinct, Some(3));
    assert_eq!(contraparte.examples, vec!["A", "B", "A", "C"]);

    let absent = report
        .critical
        .iter()
        .find(|c| c.name == "DS_FONTE_RECURSO")
        .unwrap();
    assert!(absent.distinct.is_none());
}

#[test]
fn test_report_requires_amount_column() {
    let t = table(&["SG_PARTIDO"], &[&["PT"]]);
    let err = build_report(&t, &ExploreOptions::default()).unwrap_err();
    assert!(err.to_string().contains("VR_LANCAMENTO"));
}

#[test]
fn test_describe_quartiles() {
    let stats = describe(&[dec!(1), dec!(2), dec!(3), dec!(4)]).unwrap();
    assert_eq!(stats.count, 4);
    assert!((stats.mean - 2.5).abs() < 1e-9);
    assert!((stats.q1 - 1.75).abs() < 1e-9);
    assert!((stats.median - 2.5).abs() < 1e-9);
    assert!((stats.q3 - 3.25).abs() < 1e-9);
    assert!((stats.std.unwrap() - 1.290_994_448_7).abs() < 1e-6);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 4.0);
}

#[test]
fn test_describe_single_value() {
    let stats = describe(&[dec!(-7)]).unwrap();
    assert!(stats.std.is_none());
    assert_eq!(stats.median, -7.0);
}

#[test]
fn test_describe_empty() {
    assert!(describe(&[]).is_none());
}
