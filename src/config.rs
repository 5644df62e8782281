//! Runtime configuration: defaults, then `PARTIDASH_*` environment variables,
//! then command-line flags.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::load::{CsvLayout, Encoding};
use crate::metrics::MetricsConfig;

pub(crate) const DEFAULT_DATA_FILE: &str = "extrato_bancario_DASHBOARD.csv";

/// Flags that take a value and may appear before or after a command.
pub(crate) const VALUE_FLAGS: &[&str] = &["--data", "--delimiter", "--encoding", "--fee-category"];

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_path: PathBuf,
    pub(crate) layout: CsvLayout,
    pub(crate) metrics: MetricsConfig,
}

impl Config {
    /// Environment variables:
    /// - `PARTIDASH_DATA` (default: `extrato_bancario_DASHBOARD.csv`, see [`default_data_path`])
    /// - `PARTIDASH_DELIMITER` (default: `,`)
    /// - `PARTIDASH_ENCODING` (default: `utf-8`)
    /// - `PARTIDASH_FEE_CATEGORY` (default: `TARIFAS BANCÁRIAS`)
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self {
            data_path: lookup("PARTIDASH_DATA")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_path),
            layout: CsvLayout::default(),
            metrics: MetricsConfig::default(),
        };
        if let Some(d) = lookup("PARTIDASH_DELIMITER") {
            config.layout.delimiter = parse_delimiter(&d).context("Invalid PARTIDASH_DELIMITER")?;
        }
        if let Some(e) = lookup("PARTIDASH_ENCODING") {
            config.layout.encoding = parse_encoding(&e).context("Invalid PARTIDASH_ENCODING")?;
        }
        if let Some(fee) = lookup("PARTIDASH_FEE_CATEGORY") {
            config.metrics.fee_category = fee;
        }
        Ok(config)
    }

    /// Apply `--data`, `--delimiter`, `--encoding` and `--fee-category`
    /// flags found anywhere in `args`.
    pub(crate) fn apply_args(&mut self, args: &[String]) -> Result<()> {
        if let Some(path) = flag_value(args, "--data") {
            self.data_path = PathBuf::from(shellexpand(path));
        }
        if let Some(d) = flag_value(args, "--delimiter") {
            self.layout.delimiter = parse_delimiter(d)?;
        }
        if let Some(e) = flag_value(args, "--encoding") {
            self.layout.encoding = parse_encoding(e)?;
        }
        if let Some(fee) = flag_value(args, "--fee-category") {
            self.metrics.fee_category = fee.to_string();
        }
        Ok(())
    }
}

/// The dataset in the working directory if present, otherwise the same file
/// name under the platform data directory.
pub(crate) fn default_data_path() -> PathBuf {
    let local = Path::new(DEFAULT_DATA_FILE);
    if local.exists() {
        return local.to_path_buf();
    }
    directories::ProjectDirs::from("com", "partidash", "partidash")
        .map(|dirs| dirs.data_dir().join(DEFAULT_DATA_FILE))
        .unwrap_or_else(|| local.to_path_buf())
}

/// First value following `flag`.
pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Every value following an occurrence of `flag`.
pub(crate) fn flag_values<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .collect()
}

pub(crate) fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        _ => {
            let bytes = s.as_bytes();
            anyhow::ensure!(
                bytes.len() == 1,
                "Delimiter must be a single ASCII character, got '{s}'"
            );
            Ok(bytes[0])
        }
    }
}

pub(crate) fn parse_encoding(s: &str) -> Result<Encoding> {
    Encoding::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown encoding '{s}' (use utf-8 or latin-1)"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.layout.delimiter, b',');
        assert_eq!(config.layout.encoding, Encoding::Utf8);
        assert_eq!(config.metrics, MetricsConfig::default());
        assert!(config.data_path.ends_with(DEFAULT_DATA_FILE));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PARTIDASH_DATA", "/tmp/extrato.csv"),
            ("PARTIDASH_DELIMITER", ";"),
            ("PARTIDASH_ENCODING", "latin-1"),
            ("PARTIDASH_FEE_CATEGORY", "BANK FEES"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/extrato.csv"));
        assert_eq!(config.layout.delimiter, b';');
        assert_eq!(config.layout.encoding, Encoding::Latin1);
        assert_eq!(config.metrics.fee_category, "BANK FEES");
    }

    #[test]
    fn test_invalid_env_value() {
        let result = Config::from_lookup(|k| (k == "PARTIDASH_DELIMITER").then(|| ";;".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_args_override_env() {
        let mut config =
            Config::from_lookup(|k| (k == "PARTIDASH_DELIMITER").then(|| ";".to_string())).unwrap();
        config
            .apply_args(&args(&["summary", "--delimiter", "tab", "--data", "dados.csv"]))
            .unwrap();
        assert_eq!(config.layout.delimiter, b'\t');
        assert_eq!(config.data_path, PathBuf::from("dados.csv"));
    }

    #[test]
    fn test_flag_values_repeatable() {
        let a = args(&["metrics", "fees", "--party", "PT", "--party", "PSOL", "--sphere", "NACIONAL"]);
        assert_eq!(flag_values(&a, "--party"), vec!["PT", "PSOL"]);
        assert_eq!(flag_value(&a, "--sphere"), Some("NACIONAL"));
        assert_eq!(flag_value(&a, "--category"), None);
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ç").is_err());
    }

    #[test]
    fn test_parse_encoding_error_message() {
        let err = parse_encoding("koi8").unwrap_err();
        assert!(err.to_string().contains("koi8"));
    }

    #[test]
    fn test_shellexpand_plain_path() {
        assert_eq!(shellexpand("data/x.csv"), "data/x.csv");
    }
}
