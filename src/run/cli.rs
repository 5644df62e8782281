use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

use crate::config::{flag_value, flag_values, parse_delimiter, parse_encoding, shellexpand, Config};
use crate::explore::{self, ExploreOptions, ExploreReport};
use crate::load::{self, CsvLayout, CsvLoader, Encoding};
use crate::metrics::{hierarchy_tree, DashboardMetrics};
use crate::models::Sphere;
use crate::store::{Domain, Field, Measure, RecordStore, Selection};
use crate::ui::narrative;
use crate::ui::util::{format_amount, format_percent, truncate};

const RULE: usize = 72;

/// Flags that stand alone instead of taking a value.
const SWITCHES: &[&str] = &["--help", "-h", "--version", "-V", "--count"];

/// Arguments that are neither `--flag`s nor flag values.
pub(crate) fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if SWITCHES.contains(&arg.as_str()) || !arg.starts_with("--") {
            out.push(arg.as_str());
        } else {
            iter.next();
        }
    }
    out
}

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    let words = positional(args);
    match words.first().copied() {
        Some("summary" | "s") => cli_summary(args, config),
        Some("metrics" | "m") => cli_metrics(words.get(1).copied(), args, config),
        Some("explore" | "e") => cli_explore(words.get(1).copied(), args),
        Some("domain") => cli_domain(config),
        Some("group" | "g") => cli_group(words.get(1).copied(), args, config),
        Some("--help" | "-h" | "help") | None => {
            print_usage();
            Ok(())
        }
        Some("--version" | "-V" | "version") => {
            println!("partidash {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(other) => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("partidash - spending dashboard for party bank statements");
    println!();
    println!("Usage: partidash [command] [options]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary                       Print the overview and every chart table");
    println!("  metrics <name>                Print one table: categories, hierarchy,");
    println!("                                composition, fees, efficiency, suppliers");
    println!("    --sphere <name>             Only this sphere (repeatable): {}", sphere_names());
    println!("    --category <name>           Only this category (repeatable)");
    println!("    --party <code>              Only this party (repeatable)");
    println!("  explore <file.csv>            Exploratory statistics of a raw export");
    println!("    --delimiter <c>             Field delimiter (default: ;)");
    println!("    --encoding <enc>            utf-8 or latin-1 (default: latin-1)");
    println!("    --amount-column <name>      Amount column (default: VR_LANCAMENTO)");
    println!("  domain                        List spheres, categories and parties");
    println!("  group <fields>                Sum amounts grouped by comma-separated fields:");
    println!("                                sphere, category, party, supplier, date");
    println!("    --count                     Count rows instead of summing amounts");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Options:");
    println!("  --data <file.csv>             Statement file (env: PARTIDASH_DATA)");
    println!("  --delimiter <c>               Field delimiter (env: PARTIDASH_DELIMITER)");
    println!("  --encoding <enc>              File encoding (env: PARTIDASH_ENCODING)");
    println!("  --fee-category <name>         Bank fee category (env: PARTIDASH_FEE_CATEGORY)");
    println!();
    println!("Set RUST_LOG=debug for diagnostics.");
}

fn sphere_names() -> String {
    Sphere::all()
        .iter()
        .map(Sphere::as_str)
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Load the configured file, warning on stderr when falling back to the
/// demonstration rows.
fn load_store(config: &Config) -> RecordStore {
    let outcome = load::load_or_demo(&config.data_path, &config.layout);
    if let Some(notice) = &outcome.notice {
        eprintln!("Warning: {notice}");
    }
    if !outcome.issues.is_empty() {
        eprintln!(
            "Warning: {} field(s) could not be parsed and were left empty",
            outcome.issues.len()
        );
    }
    outcome.store.exclude_uninformed()
}

/// Build a selection from `--sphere`, `--category` and `--party` flags.
/// Unknown values are rejected.
pub(crate) fn selection_from_args(args: &[String], domain: &Domain) -> Result<Selection> {
    let spheres: BTreeSet<Sphere> = flag_values(args, "--sphere")
        .into_iter()
        .map(Sphere::parse)
        .collect();
    for sphere in &spheres {
        anyhow::ensure!(domain.spheres.contains(sphere), "Unknown sphere: {sphere}");
    }
    let categories = known_values(flag_values(args, "--category"), &domain.categories, "category")?;
    let parties = known_values(flag_values(args, "--party"), &domain.parties, "party")?;
    Ok(Selection::from_choices(domain, &spheres, &categories, &parties))
}

fn known_values(wanted: Vec<&str>, domain: &[String], noun: &str) -> Result<BTreeSet<String>> {
    wanted
        .into_iter()
        .map(|w| {
            domain
                .iter()
                .find(|d| d.to_lowercase() == w.to_lowercase())
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Unknown {noun}: {w}"))
        })
        .collect()
}

fn compute(args: &[String], config: &Config) -> Result<DashboardMetrics> {
    let store = load_store(config);
    let selection = selection_from_args(args, &store.domain())?;
    let filtered = store.filter(&selection)?;
    Ok(DashboardMetrics::compute(&filtered, &config.metrics))
}

fn cli_summary(args: &[String], config: &Config) -> Result<()> {
    let metrics = compute(args, config)?;
    print_overview(&metrics);
    for table in ["categories", "hierarchy", "composition", "fees", "efficiency", "suppliers"] {
        println!();
        print_table(table, &metrics, config)?;
    }
    Ok(())
}

fn cli_metrics(name: Option<&str>, args: &[String], config: &Config) -> Result<()> {
    let Some(name) = name else {
        anyhow::bail!(
            "Usage: partidash metrics <categories|hierarchy|composition|fees|efficiency|suppliers>"
        );
    };
    let metrics = compute(args, config)?;
    print_table(name, &metrics, config)
}

fn print_overview(metrics: &DashboardMetrics) {
    let s = &metrics.summary;
    println!("partidash: overview");
    println!("{}", "─".repeat(RULE));
    println!("  Total moved:  {}", format_amount(s.total));
    println!("  Transactions: {}", s.transactions);
    println!("  Parties:      {}", s.parties);
    println!("  Suppliers:    {}", s.suppliers);
    match s.period {
        Some((first, last)) => println!(
            "  Period:       {} to {}",
            first.format("%d/%m/%Y"),
            last.format("%d/%m/%Y")
        ),
        None => println!("  Period:       N/A"),
    }
}

fn print_insights(lines: &[String]) {
    println!();
    for line in lines {
        println!("  * {line}");
    }
}

fn print_table(name: &str, metrics: &DashboardMetrics, config: &Config) -> Result<()> {
    match name {
        "categories" => {
            println!("Spending by category and sphere (top {})", config.metrics.category_top);
            println!("{}", "─".repeat(RULE));
            println!("  {:<14} {:<32} {:>22}", "Sphere", "Category", "Total");
            for row in &metrics.category_totals {
                println!(
                    "  {:<14} {:<32} {:>22}",
                    row.sphere.as_str(),
                    truncate(&row.category, 32),
                    format_amount(row.total)
                );
            }
            print_insights(&narrative::category_insights(&metrics.category_totals));
        }
        "hierarchy" => {
            let tree = hierarchy_tree(&metrics.hierarchy);
            match config.metrics.hierarchy_parties {
                Some(n) => println!("Sphere > party > category (top {n} parties per sphere)"),
                None => println!("Sphere > party > category"),
            }
            println!("{}", "─".repeat(RULE));
            for sphere in &tree {
                println!("  {:<46} {:>22}", sphere.sphere.as_str(), format_amount(sphere.total));
                for party in &sphere.parties {
                    println!("    {:<44} {:>22}", party.party, format_amount(party.total));
                    for (category, total) in &party.categories {
                        println!(
                            "      {:<42} {:>22}",
                            truncate(category, 42),
                            format_amount(*total)
                        );
                    }
                }
            }
            print_insights(&narrative::hierarchy_insights(&tree));
        }
        "composition" => {
            println!(
                "Category share within each sphere (top {} categories)",
                config.metrics.composition_top
            );
            println!("{}", "─".repeat(RULE));
            println!("  {:<14} {:<32} {:>10}", "Sphere", "Category", "Share");
            for row in &metrics.composition {
                println!(
                    "  {:<14} {:<32} {:>10}",
                    row.sphere.as_str(),
                    truncate(&row.category, 32),
                    format_percent(row.percent)
                );
            }
            print_insights(&narrative::composition_insights(&metrics.composition));
        }
        "fees" | "efficiency" => {
            let (rows, threshold) = if name == "fees" {
                (&metrics.fee_ratios, config.metrics.scatter_min_spend)
            } else {
                (&metrics.efficiency, config.metrics.efficiency_min_spend)
            };
            println!(
                "Bank fees ({}) by party, spend > {}",
                config.metrics.fee_category,
                format_amount(threshold)
            );
            println!("{}", "─".repeat(RULE));
            println!("  {:<10} {:>22} {:>22} {:>10}", "Party", "Total", "Fees", "% fees");
            for row in rows {
                println!(
                    "  {:<10} {:>22} {:>22} {:>10}",
                    row.party,
                    format_amount(row.total_spend),
                    format_amount(row.fee_spend),
                    format_percent(row.fee_ratio_percent)
                );
            }
            print_insights(&narrative::fee_insights(&metrics.fee_ratios, &metrics.efficiency));
        }
        "suppliers" => {
            println!(
                "Supplier diversification, spend > {}",
                format_amount(config.metrics.diversification_min_spend)
            );
            println!("{}", "─".repeat(RULE));
            println!(
                "  {:<10} {:>9} {:>7} {:>22} {:>12}",
                "Party", "Suppliers", "Txns", "Total", "Per R$ 1M"
            );
            for row in &metrics.diversification {
                println!(
                    "  {:<10} {:>9} {:>7} {:>22} {:>12.2}",
                    row.party,
                    row.distinct_suppliers,
                    row.transactions,
                    format_amount(row.total_spend),
                    row.diversification_index.round_dp(2)
                );
            }
            print_insights(&narrative::diversification_insights(&metrics.diversification));
        }
        other => anyhow::bail!("Unknown metric: {other}"),
    }
    Ok(())
}

fn cli_domain(config: &Config) -> Result<()> {
    let domain = load_store(config).domain();
    let spheres: Vec<&str> = domain.spheres.iter().map(Sphere::as_str).collect();
    println!("Spheres ({}): {}", spheres.len(), spheres.join(", "));
    println!("Categories ({}):", domain.categories.len());
    for category in &domain.categories {
        println!("  {category}");
    }
    println!("Parties ({}): {}", domain.parties.len(), domain.parties.join(", "));
    Ok(())
}

pub(crate) fn parse_fields(list: &str) -> Result<Vec<Field>> {
    let fields = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(Field::parse)
        .collect::<Result<Vec<Field>>>()?;
    anyhow::ensure!(!fields.is_empty(), "No fields to group by");
    Ok(fields)
}

fn cli_group(list: Option<&str>, args: &[String], config: &Config) -> Result<()> {
    let Some(list) = list else {
        anyhow::bail!("Usage: partidash group <field[,field...]> [--count]");
    };
    let fields = parse_fields(list)?;
    let measure = if args.iter().any(|a| a == "--count") {
        Measure::Count
    } else {
        Measure::Amount
    };

    let store = load_store(config);
    let selection = selection_from_args(args, &store.domain())?;
    let groups = store.filter(&selection)?.group_sum(&fields, measure);

    let header: Vec<&str> = fields.iter().map(Field::label).collect();
    println!("{}", header.join(" > "));
    println!("{}", "─".repeat(RULE));
    for (key, value) in &groups {
        let shown = match measure {
            Measure::Amount => format_amount(*value),
            Measure::Count => value.to_string(),
        };
        println!("  {:<48} {:>22}", truncate(&key.join(" > "), 48), shown);
    }
    println!("{} group(s)", groups.len());
    Ok(())
}

/// `explore` reads the raw export, which is `;`-separated latin-1 by default.
fn cli_explore(file: Option<&str>, args: &[String]) -> Result<()> {
    let Some(file) = file else {
        anyhow::bail!("Usage: partidash explore <file.csv> [--delimiter ;] [--encoding latin-1]");
    };
    let path_str = shellexpand(file);
    let path = Path::new(&path_str);
    if !path.exists() {
        anyhow::bail!("File not found: {file}");
    }

    let layout = CsvLayout {
        delimiter: flag_value(args, "--delimiter")
            .map(parse_delimiter)
            .transpose()?
            .unwrap_or(b';'),
        encoding: flag_value(args, "--encoding")
            .map(parse_encoding)
            .transpose()?
            .unwrap_or(Encoding::Latin1),
        ..CsvLayout::default()
    };
    let mut options = ExploreOptions::default();
    if let Some(column) = flag_value(args, "--amount-column") {
        options.amount_column = column.to_string();
    }
    if let Some(column) = flag_value(args, "--party-column") {
        options.party_column = column.to_string();
    }

    let table = CsvLoader::read_table(path, &layout)?;
    let report = explore::build_report(&table, &options)?;
    print_report(&report, &options);
    Ok(())
}

fn print_report(report: &ExploreReport, options: &ExploreOptions) {
    println!("Dataset: {} rows x {} columns", report.rows, report.columns.len());
    println!("{}", "─".repeat(RULE));
    println!("  Rows:            {}", report.rows);
    println!("  Parties:         {}", report.parties);
    println!("  Total movement:  {}", format_amount(report.total));

    println!();
    println!("Columns:");
    for (i, column) in report.columns.iter().enumerate() {
        println!("  {:>3}. {column}", i + 1);
    }

    println!();
    println!("First {} rows:", report.sample.len());
    println!("  {}", report.columns.join(" | "));
    for row in &report.sample {
        println!("  {}", row.join(" | "));
    }

    println!();
    if report.missing.is_empty() {
        println!("Missing values: none");
    } else {
        println!("Missing values:");
        for (column, count) in &report.missing {
            println!("  {column:<32} {count}");
        }
    }

    if let Some(types) = &report.entry_types {
        println!();
        println!("{}:", options.entry_type_column);
        for (value, count) in types {
            println!("  {value:<32} {count}");
        }
    }

    println!();
    println!("Top {} parties by movement:", options.top_parties);
    println!("  {:<10} {:>22} {:>8}", "Party", "Total", "Count");
    for party in &report.top_parties {
        println!(
            "  {:<10} {:>22} {:>8}",
            party.party,
            format_amount(party.total),
            party.count
        );
    }

    println!();
    println!("{} statistics:", options.amount_column);
    match &report.amount_stats {
        Some(stats) => {
            println!("  count  {}", stats.count);
            println!("  mean   {:.2}", stats.mean);
            match stats.std {
                Some(std) => println!("  std    {std:.2}"),
                None => println!("  std    NaN"),
            }
            println!("  min    {:.2}", stats.min);
            println!("  25%    {:.2}", stats.q1);
            println!("  50%    {:.2}", stats.median);
            println!("  75%    {:.2}", stats.q3);
            println!("  max    {:.2}", stats.max);
        }
        None => println!("  no parseable values"),
    }

    println!();
    println!("Critical columns:");
    for profile in &report.critical {
        match profile.distinct {
            Some(distinct) => {
                println!("  {}: {distinct} distinct", profile.name);
                for example in &profile.examples {
                    println!("    - {}", truncate(example, 60));
                }
            }
            None => println!("  Warning: column {} not found", profile.name),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::load::demo_transactions;
    use std::io::Write;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn demo_domain() -> Domain {
        RecordStore::new(demo_transactions()).domain()
    }

    #[test]
    fn test_positional_skips_flag_values() {
        let a = args(&["--data", "x.csv", "metrics", "fees", "--party", "PT"]);
        assert_eq!(positional(&a), vec!["metrics", "fees"]);
    }

    #[test]
    fn test_positional_keeps_switches() {
        let a = args(&["--version"]);
        assert_eq!(positional(&a), vec!["--version"]);
        assert!(positional(&args(&["--data", "x.csv"])).is_empty());
    }

    #[test]
    fn test_selection_defaults_to_everything() {
        let domain = demo_domain();
        let selection = selection_from_args(&args(&["summary"]), &domain).unwrap();
        assert_eq!(selection, Selection::all(&domain));
    }

    #[test]
    fn test_selection_from_repeated_flags() {
        let domain = demo_domain();
        let a = args(&["metrics", "fees", "--party", "pt", "--party", "MDB", "--sphere", "nacional"]);
        let selection = selection_from_args(&a, &domain).unwrap();
        assert_eq!(
            selection.parties,
            ["MDB", "PT"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<String>>()
        );
        assert_eq!(
            selection.spheres,
            [Sphere::National].into_iter().collect::<BTreeSet<Sphere>>()
        );
        assert_eq!(selection.categories.len(), domain.categories.len());
    }

    #[test]
    fn test_selection_rejects_unknown_values() {
        let domain = demo_domain();
        let err = selection_from_args(&args(&["--party", "XYZ"]), &domain).unwrap_err();
        assert_eq!(err.to_string(), "Unknown party: XYZ");
        let err = selection_from_args(&args(&["--sphere", "DISTRITAL"]), &domain).unwrap_err();
        assert_eq!(err.to_string(), "Unknown sphere: DISTRITAL");
    }

    #[test]
    fn test_sphere_names_for_usage() {
        assert_eq!(sphere_names(), "NACIONAL, ESTADUAL, MUNICIPAL, DISTRITAL");
    }

    #[test]
    fn test_unknown_metric_name() {
        let config = Config::from_lookup(|_| None).unwrap();
        let metrics = DashboardMetrics::default();
        let err = print_table("pie", &metrics, &config).unwrap_err();
        assert_eq!(err.to_string(), "Unknown metric: pie");
    }

    #[test]
    fn test_parse_fields() {
        assert_eq!(
            parse_fields("sphere, Party").unwrap(),
            vec![Field::Sphere, Field::Party]
        );
        assert_eq!(parse_fields("fornecedor").unwrap(), vec![Field::Counterparty]);
        assert_eq!(parse_fields("nope").unwrap_err().to_string(), "Unknown field: nope");
        assert!(parse_fields(",").is_err());
    }

    #[test]
    fn test_positional_treats_count_as_switch() {
        let a = args(&["group", "party", "--count", "--party", "PT"]);
        assert_eq!(positional(&a), vec!["group", "party", "--count"]);
    }

    #[test]
    fn test_compute_with_only_uninformed_rows_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "DT_LANCAMENTO,NM_ESFERA,CATEGORIA_GASTO,SG_PARTIDO,NM_CONTRAPARTE,VR_LANCAMENTO_NUM"
        )
        .unwrap();
        writeln!(file, "15/01/2020,NÃO INFORMADO,PESSOAL,PT,FORNECEDOR,100.00").unwrap();
        let path = file.path().display().to_string();
        let config = Config::from_lookup(|k| (k == "PARTIDASH_DATA").then(|| path.clone())).unwrap();

        let metrics = compute(&args(&["summary"]), &config).unwrap();
        assert_eq!(metrics, DashboardMetrics::default());
        cli_group(Some("sphere,party"), &args(&["group", "sphere,party"]), &config).unwrap();
    }

    #[test]
    fn test_explore_missing_file() {
        let err = cli_explore(Some("/definitely/not/here.csv"), &[]).unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }
}
