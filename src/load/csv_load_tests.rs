#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;
use std::io::Write;

const HEADER: &str =
    "DT_LANCAMENTO,NM_ESFERA,CATEGORIA_GASTO,SG_PARTIDO,NM_CONTRAPARTE,VR_LANCAMENTO_NUM";

fn make_csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn load_str(content: &str) -> (Vec<Transaction>, Vec<FieldIssue>) {
    let file = make_csv_file(content);
    let layout = CsvLayout::default();
    let table = CsvLoader::read_table(file.path(), &layout).unwrap();
    CsvLoader::parse(&table, &layout).unwrap()
}

// ── parse_decimal ─────────────────────────────────────────────

#[test]
fn test_parse_decimal_basic() {
    assert_eq!(parse_decimal("100.50").unwrap(), dec!(100.50));
    assert_eq!(parse_decimal("-42.99").unwrap(), dec!(-42.99));
}

#[test]
fn test_parse_decimal_brazilian_notation() {
    assert_eq!(parse_decimal("1.234,56").unwrap(), dec!(1234.56));
    assert_eq!(parse_decimal("1234,56").unwrap(), dec!(1234.56));
    assert_eq!(parse_decimal("R$ 1.234.567,89").unwrap(), dec!(1234567.89));
}

#[test]
fn test_parse_decimal_us_notation() {
    assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
    assert_eq!(parse_decimal("1,234,567").unwrap(), dec!(1234567));
}

#[test]
fn test_parse_decimal_thousands_dots_only() {
    assert_eq!(parse_decimal("1.234.567").unwrap(), dec!(1234567));
}

#[test]
fn test_parse_decimal_parentheses_negative() {
    assert_eq!(parse_decimal("(500.00)").unwrap(), dec!(-500.00));
}

#[test]
fn test_parse_decimal_currency_prefix_negative() {
    assert_eq!(parse_decimal("-R$ 99,90").unwrap(), dec!(-99.90));
}

#[test]
fn test_parse_decimal_scientific() {
    assert_eq!(parse_decimal("1.5e3").unwrap(), dec!(1500));
}

#[test]
fn test_parse_decimal_without_digits_is_an_error() {
    assert!(parse_decimal("").is_err());
    assert!(parse_decimal("  ").is_err());
    assert!(parse_decimal("R$").is_err());
    assert!(parse_decimal("()").is_err());
    assert!(parse_decimal("-R$ ").is_err());
}

#[test]
fn test_parse_decimal_invalid() {
    assert!(parse_decimal("not_a_number").is_err());
}

// ── parse_date ────────────────────────────────────────────────

#[test]
fn test_parse_date_iso() {
    let d = parse_date("2020-01-15").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2020, 1, 15).unwrap());
}

#[test]
fn test_parse_date_day_first() {
    let d = parse_date("05/02/2020").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2020, 2, 5).unwrap());
}

#[test]
fn test_parse_date_with_time() {
    let d = parse_date("2020-03-10 14:30:00").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2020, 3, 10).unwrap());

    let d = parse_date("10/03/2020 14:30").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2020, 3, 10).unwrap());
}

#[test]
fn test_parse_date_invalid() {
    assert!(parse_date("not-a-date").is_err());
    assert!(parse_date("2020-13-45").is_err());
}

// ── Encoding ──────────────────────────────────────────────────

#[test]
fn test_encoding_parse() {
    assert_eq!(Encoding::parse("UTF-8"), Some(Encoding::Utf8));
    assert_eq!(Encoding::parse("latin1"), Some(Encoding::Latin1));
    assert_eq!(Encoding::parse("ISO_8859-1"), Some(Encoding::Latin1));
    assert_eq!(Encoding::parse("ebcdic"), None);
}

#[test]
fn test_latin1_decoding() {
    let text = Encoding::Latin1.decode(b"N\xc3O INFORMADO").unwrap();
    assert_eq!(text, "NÃO INFORMADO");
}

#[test]
fn test_utf8_strips_bom() {
    let text = Encoding::Utf8.decode(b"\xEF\xBB\xBFabc").unwrap();
    assert_eq!(text, "abc");
}

#[test]
fn test_utf8_rejects_invalid_bytes() {
    assert!(Encoding::Utf8.decode(b"\xff\xfe").is_err());
}

// ── read_table ────────────────────────────────────────────────

#[test]
fn test_read_table_headers_and_rows() {
    let file = make_csv_file(&format!(
        "{HEADER}\n2020-01-15,NACIONAL,PESSOAL,PT,A,500000.00\n"
    ));
    let table = CsvLoader::read_table(file.path(), &CsvLayout::default()).unwrap();
    assert_eq!(table.headers.len(), 6);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.column_index("sg_partido"), Some(3));
    assert_eq!(table.cell(0, 3), "PT");
    assert_eq!(table.cell(5, 3), "");
}

#[test]
fn test_read_table_semicolon_latin1() {
    let mut bytes = b"SG_PARTIDO;VR_LANCAMENTO\nPT;1.234,56\nPSDB;N\xc3O INFORMADO\n".to_vec();
    bytes.extend_from_slice(b"MDB;10\n");
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();

    let layout = CsvLayout {
        delimiter: b';',
        encoding: Encoding::Latin1,
        ..CsvLayout::default()
    };
    let table = CsvLoader::read_table(file.path(), &layout).unwrap();
    assert_eq!(table.headers, vec!["SG_PARTIDO", "VR_LANCAMENTO"]);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.cell(1, 1), "NÃO INFORMADO");
}

#[test]
fn test_read_table_missing_file() {
    let result = CsvLoader::read_table(
        Path::new("/nonexistent/extrato.csv"),
        &CsvLayout::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_read_table_empty_file() {
    let file = make_csv_file("");
    assert!(CsvLoader::read_table(file.path(), &CsvLayout::default()).is_err());
}

// ── parse ─────────────────────────────────────────────────────

#[test]
fn test_parse_typed_rows() {
    let (txns, issues) = load_str(&format!(
        "{HEADER}\n\
         2020-01-15,NACIONAL,PESSOAL,PT,FORNECEDOR A,500000.00\n\
         2020-02-20,ESTADUAL,PROPAGANDA,PSDB,FORNECEDOR B,-200.50\n"
    ));
    assert!(issues.is_empty());
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[0].sphere, Sphere::National);
    assert_eq!(txns[0].party, "PT");
    assert_eq!(txns[0].counterparty.as_deref(), Some("FORNECEDOR A"));
    assert_eq!(txns[0].amount, Some(dec!(500000.00)));
    assert_eq!(txns[1].amount, Some(dec!(-200.50)));
    assert_eq!(txns[1].date, NaiveDate::from_ymd_opt(2020, 2, 20));
}

#[test]
fn test_parse_bad_date_becomes_null() {
    let (txns, issues) = load_str(&format!(
        "{HEADER}\nsometime,NACIONAL,PESSOAL,PT,A,10\n"
    ));
    assert_eq!(txns.len(), 1);
    assert!(txns[0].date.is_none());
    assert_eq!(txns[0].amount, Some(dec!(10)));
    assert_eq!(
        issues,
        vec![FieldIssue {
            row: 1,
            column: "DT_LANCAMENTO".into(),
            raw: "sometime".into(),
        }]
    );
}

#[test]
fn test_parse_bad_amount_becomes_null() {
    let (txns, issues) = load_str(&format!(
        "{HEADER}\n2020-01-15,NACIONAL,PESSOAL,PT,A,abc\n"
    ));
    assert_eq!(txns.len(), 1);
    assert!(txns[0].amount.is_none());
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].column, "VR_LANCAMENTO_NUM");
}

#[test]
fn test_parse_currency_symbol_alone_is_an_issue() {
    let (txns, issues) = load_str(&format!(
        "{HEADER}\n2020-01-15,NACIONAL,PESSOAL,PT,A,R$\n2020-01-16,NACIONAL,PESSOAL,PT,A,()\n"
    ));
    assert_eq!(txns.len(), 2);
    assert!(txns.iter().all(|t| t.amount.is_none()));
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].raw, "R$");
    assert_eq!(issues[1].raw, "()");
}

#[test]
fn test_parse_blank_fields_are_null_without_issue() {
    let (txns, issues) = load_str(&format!("{HEADER}\n,NACIONAL,PESSOAL,PT,,\n"));
    assert!(issues.is_empty());
    assert!(txns[0].date.is_none());
    assert!(txns[0].counterparty.is_none());
    assert!(txns[0].amount.is_none());
}

#[test]
fn test_parse_short_row_is_kept() {
    let (txns, _) = load_str(&format!("{HEADER}\n2020-01-15,MUNICIPAL\n"));
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].sphere, Sphere::Municipal);
    assert!(txns[0].party.is_empty());
}

#[test]
fn test_parse_columns_in_any_order() {
    let (txns, _) = load_str(
        "VR_LANCAMENTO_NUM,SG_PARTIDO,NM_CONTRAPARTE,CATEGORIA_GASTO,NM_ESFERA,DT_LANCAMENTO\n\
         42,PSOL,X,OUTROS,MUNICIPAL,2020-06-01\n",
    );
    assert_eq!(txns[0].party, "PSOL");
    assert_eq!(txns[0].amount, Some(dec!(42)));
    assert_eq!(txns[0].sphere, Sphere::Municipal);
}

#[test]
fn test_parse_missing_required_column() {
    let file = make_csv_file("DT_LANCAMENTO,NM_ESFERA\n2020-01-15,NACIONAL\n");
    let layout = CsvLayout::default();
    let table = CsvLoader::read_table(file.path(), &layout).unwrap();
    let err = CsvLoader::parse(&table, &layout).unwrap_err();
    assert!(err.to_string().contains("SG_PARTIDO"));
}
