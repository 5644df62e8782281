use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::{Sphere, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Encoding {
    Utf8,
    Latin1,
}

impl Encoding {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Some(Self::Latin1),
            _ => None,
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                String::from_utf8(bytes.to_vec()).context("File is not valid UTF-8")
            }
            // ISO-8859-1 maps every byte to the code point of the same value.
            Self::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf-8"),
            Self::Latin1 => write!(f, "latin-1"),
        }
    }
}

/// Where each transaction field lives in the source file.
#[derive(Debug, Clone)]
pub(crate) struct CsvLayout {
    pub(crate) date_column: String,
    pub(crate) sphere_column: String,
    pub(crate) category_column: String,
    pub(crate) party_column: String,
    pub(crate) counterparty_column: String,
    pub(crate) amount_column: String,
    pub(crate) delimiter: u8,
    pub(crate) encoding: Encoding,
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            date_column: "DT_LANCAMENTO".into(),
            sphere_column: "NM_ESFERA".into(),
            category_column: "CATEGORIA_GASTO".into(),
            party_column: "SG_PARTIDO".into(),
            counterparty_column: "NM_CONTRAPARTE".into(),
            amount_column: "VR_LANCAMENTO_NUM".into(),
            delimiter: b',',
            encoding: Encoding::Utf8,
        }
    }
}

/// Header plus string cells, before any typing.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of a header, compared case-insensitively.
    pub(crate) fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name.trim()))
    }

    pub(crate) fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|s| s.trim())
            .unwrap_or("")
    }
}

/// A single field that could not be coerced. The row is kept with the field
/// left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldIssue {
    /// 1-based data row, not counting the header.
    pub(crate) row: usize,
    pub(crate) column: String,
    pub(crate) raw: String,
}

pub(crate) struct CsvLoader;

impl CsvLoader {
    /// Read the whole file as a header row plus string records.
    pub(crate) fn read_table(path: &Path, layout: &CsvLayout) -> Result<RawTable> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let text = layout.encoding.decode(&bytes)?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .delimiter(layout.delimiter)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = rdr
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            anyhow::bail!("CSV file is empty");
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(RawTable { headers, rows })
    }

    /// Type the rows of `table` using `layout`. Fails only when a required
    /// column is missing; per-field problems come back as [`FieldIssue`]s.
    pub(crate) fn parse(
        table: &RawTable,
        layout: &CsvLayout,
    ) -> Result<(Vec<Transaction>, Vec<FieldIssue>)> {
        let required = [
            &layout.date_column,
            &layout.sphere_column,
            &layout.category_column,
            &layout.party_column,
            &layout.counterparty_column,
            &layout.amount_column,
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|c| table.column_index(c).is_none())
            .map(|c| c.as_str())
            .collect();
        if !missing.is_empty() {
            anyhow::bail!("Missing required column(s): {}", missing.join(", "));
        }

        let col = |name: &str| table.column_index(name).unwrap_or_default();
        let date_col = col(&layout.date_column);
        let sphere_col = col(&layout.sphere_column);
        let category_col = col(&layout.category_column);
        let party_col = col(&layout.party_column);
        let counterparty_col = col(&layout.counterparty_column);
        let amount_col = col(&layout.amount_column);

        let mut transactions = Vec::with_capacity(table.rows.len());
        let mut issues = Vec::new();

        for i in 0..table.rows.len() {
            let mut issue = |column: &str, raw: &str| {
                log::debug!("Row {}: could not coerce {column} '{raw}'", i + 1);
                issues.push(FieldIssue {
                    row: i + 1,
                    column: column.to_string(),
                    raw: raw.to_string(),
                });
            };

            let date_str = table.cell(i, date_col);
            let date = if date_str.is_empty() {
                None
            } else {
                match parse_date(date_str) {
                    Ok(d) => Some(d),
                    Err(_) => {
                        issue(&layout.date_column, date_str);
                        None
                    }
                }
            };

            let amount_str = table.cell(i, amount_col);
            let amount = if amount_str.is_empty() {
                None
            } else {
                match parse_decimal(amount_str) {
                    Ok(a) => Some(a),
                    Err(_) => {
                        issue(&layout.amount_column, amount_str);
                        None
                    }
                }
            };

            let counterparty = table.cell(i, counterparty_col);

            transactions.push(Transaction {
                date,
                sphere: Sphere::parse(table.cell(i, sphere_col)),
                category: table.cell(i, category_col).to_string(),
                party: table.cell(i, party_col).to_string(),
                counterparty: (!counterparty.is_empty()).then(|| counterparty.to_string()),
                amount,
            });
        }

        Ok((transactions, issues))
    }
}

/// Day-first formats come before year-first ones because the source data is
/// Brazilian.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%d/%m/%y", "%Y/%m/%d", "%d-%m-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    anyhow::bail!("Could not parse date: {}", s)
}

/// Parse an amount in either `1,234.56` or `1.234,56` notation, with an
/// optional `R$` prefix and accounting-style parentheses for negatives.
pub(crate) fn parse_decimal(s: &str) -> Result<Decimal> {
    let mut cleaned: String = s
        .replace("R$", "")
        .replace(['"', ' ', '\u{a0}'], "")
        .replace('(', "-")
        .replace(')', "");
    anyhow::ensure!(
        cleaned.chars().any(|c| c.is_ascii_digit()),
        "No digits in amount '{}'",
        s
    );

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');
    cleaned = match (last_dot, last_comma) {
        // Both present: whichever comes last is the decimal separator.
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) if cleaned.matches(',').count() == 1 => cleaned.replace(',', "."),
        (None, Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .with_context(|| format!("Failed to parse '{}' as decimal", s))
}

#[cfg(test)]
#[path = "csv_load_tests.rs"]
mod tests;
