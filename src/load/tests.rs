#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;
use std::io::Write;

use super::*;

#[test]
fn test_load_or_demo_missing_file_uses_demo() {
    let path = Path::new("/nonexistent/extrato_bancario_DASHBOARD.csv");
    let outcome = load_or_demo(path, &CsvLayout::default());

    assert!(outcome.is_demo());
    assert_eq!(outcome.store.len(), 6);
    assert!(outcome.issues.is_empty());
    assert!(matches!(
        &outcome.notice,
        Some(LoadNotice::SourceUnavailable { path: p, .. }) if p == path
    ));
}

#[test]
fn test_load_or_demo_reads_real_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "DT_LANCAMENTO,NM_ESFERA,CATEGORIA_GASTO,SG_PARTIDO,NM_CONTRAPARTE,VR_LANCAMENTO_NUM"
    )
    .unwrap();
    writeln!(file, "2020-01-15,NACIONAL,PESSOAL,PT,A,10.5").unwrap();
    writeln!(file, "bad,NACIONAL,PESSOAL,PT,A,1").unwrap();

    let outcome = load_or_demo(file.path(), &CsvLayout::default());
    assert!(!outcome.is_demo());
    assert_eq!(outcome.store.len(), 2);
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.store.rows()[0].amount, Some(dec!(10.5)));
}

#[test]
fn test_load_fails_on_unreadable_source() {
    assert!(load(Path::new("/nonexistent/x.csv"), &CsvLayout::default()).is_err());
}

#[test]
fn test_notice_message_names_path() {
    let notice = LoadNotice::SourceUnavailable {
        path: PathBuf::from("dados.csv"),
        reason: "not found".into(),
    };
    let msg = notice.to_string();
    assert!(msg.contains("dados.csv"));
    assert!(msg.contains("not found"));
}

#[test]
fn test_demo_dataset_is_fully_informed() {
    let store = RecordStore::new(demo_transactions());
    assert_eq!(store.exclude_uninformed().len(), 6);
    assert_eq!(store.summary().total, dec!(1275000));
}
