mod csv_load;
mod demo;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::store::RecordStore;

pub(crate) use csv_load::{parse_decimal, CsvLayout, CsvLoader, Encoding, FieldIssue, RawTable};
pub(crate) use demo::demo_transactions;

/// Why the data shown is not the requested file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoadNotice {
    SourceUnavailable { path: PathBuf, reason: String },
}

impl std::fmt::Display for LoadNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceUnavailable { path, reason } => write!(
                f,
                "Using demonstration data: could not load {} ({reason})",
                path.display()
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LoadOutcome {
    pub(crate) store: RecordStore,
    pub(crate) notice: Option<LoadNotice>,
    pub(crate) issues: Vec<FieldIssue>,
}

impl LoadOutcome {
    pub(crate) fn is_demo(&self) -> bool {
        self.notice.is_some()
    }
}

/// Load and type the file at `path`. Fails only if the file cannot be read
/// or lacks a required column.
pub(crate) fn load(path: &Path, layout: &CsvLayout) -> Result<(RecordStore, Vec<FieldIssue>)> {
    let table = CsvLoader::read_table(path, layout)?;
    let (rows, issues) = CsvLoader::parse(&table, layout)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    log::info!(
        "Loaded {} rows from {} ({} field issue(s))",
        rows.len(),
        path.display(),
        issues.len()
    );
    Ok((RecordStore::new(rows), issues))
}

/// Like [`load`], but substitutes the demonstration dataset instead of
/// failing.
pub(crate) fn load_or_demo(path: &Path, layout: &CsvLayout) -> LoadOutcome {
    match load(path, layout) {
        Ok((store, issues)) => LoadOutcome {
            store,
            notice: None,
            issues,
        },
        Err(e) => {
            let notice = LoadNotice::SourceUnavailable {
                path: path.to_path_buf(),
                reason: format!("{e:#}"),
            };
            log::warn!("{notice}");
            LoadOutcome {
                store: RecordStore::new(demo_transactions()),
                notice: Some(notice),
                issues: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests;
