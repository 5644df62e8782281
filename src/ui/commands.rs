use std::collections::HashMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;

use super::app::{App, FilterDimension, Screen};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit partidash", cmd_quit, r);
    register_command!("quit", "Quit partidash", cmd_quit, r);
    register_command!("o", "Go to Overview", cmd_overview, r);
    register_command!("overview", "Go to Overview", cmd_overview, r);
    register_command!("tree", "Go to Hierarchy", cmd_hierarchy, r);
    register_command!("hierarchy", "Go to Hierarchy", cmd_hierarchy, r);
    register_command!("composition", "Go to Composition", cmd_composition, r);
    register_command!("fees", "Go to Fees", cmd_fees, r);
    register_command!("suppliers", "Go to Suppliers", cmd_suppliers, r);
    register_command!("f", "Go to Filters", cmd_filters, r);
    register_command!("filters", "Go to Filters", cmd_filters, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "sphere",
        "Show only these spheres (e.g. :sphere NACIONAL ESTADUAL)",
        cmd_sphere,
        r
    );
    register_command!(
        "category",
        "Show only one category, none = all (e.g. :category PESSOAL)",
        cmd_category,
        r
    );
    register_command!(
        "party",
        "Show only these parties, none = all (e.g. :party PT PSOL)",
        cmd_party,
        r
    );
    register_command!("p", "Show only these parties", cmd_party, r);
    register_command!("reset", "Select every sphere, category and party", cmd_reset, r);
    register_command!("reload", "Reload the data file", cmd_reload, r);
    register_command!(
        "fee-category",
        "Category counted as bank fees (e.g. :fee-category TARIFAS BANCÁRIAS)",
        cmd_fee_category,
        r
    );
    register_command!(
        "tree-limit",
        "Parties per sphere in the hierarchy (e.g. :tree-limit 5, :tree-limit all)",
        cmd_tree_limit,
        r
    );
    register_command!(
        "min-spend",
        "Minimum spend for the efficiency ranking (e.g. :min-spend 50000)",
        cmd_min_spend,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if cmd_name.is_empty() {
        return Ok(());
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_overview(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.switch_screen(Screen::Overview);
    Ok(())
}

fn cmd_hierarchy(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.switch_screen(Screen::Hierarchy);
    Ok(())
}

fn cmd_composition(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.switch_screen(Screen::Composition);
    Ok(())
}

fn cmd_fees(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.switch_screen(Screen::Fees);
    Ok(())
}

fn cmd_suppliers(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.switch_screen(Screen::Suppliers);
    Ok(())
}

fn cmd_filters(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.switch_screen(Screen::Filters);
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_sphere(args: &str, app: &mut App) -> anyhow::Result<()> {
    let names: Vec<&str> = args.split_whitespace().collect();
    choose(app, FilterDimension::Spheres, &names);
    Ok(())
}

/// Categories may contain spaces, so the whole argument is one name.
fn cmd_category(args: &str, app: &mut App) -> anyhow::Result<()> {
    let names: Vec<&str> = if args.is_empty() { Vec::new() } else { vec![args] };
    choose(app, FilterDimension::Categories, &names);
    Ok(())
}

fn cmd_party(args: &str, app: &mut App) -> anyhow::Result<()> {
    let names: Vec<&str> = args.split_whitespace().collect();
    choose(app, FilterDimension::Parties, &names);
    Ok(())
}

fn choose(app: &mut App, dimension: FilterDimension, names: &[&str]) {
    match app.choose_only(dimension, names) {
        Ok(_) if names.is_empty() => app.set_status(format!("Showing all {dimension}")),
        Ok(n) => app.set_status(format!(
            "Filtered {dimension} to {n}: {} transactions",
            app.metrics.summary.transactions
        )),
        Err(e) => app.set_status(e.to_string()),
    }
}

fn cmd_reset(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.reset_filters();
    app.set_status("Filters cleared");
    Ok(())
}

fn cmd_reload(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.reload();
    Ok(())
}

fn cmd_fee_category(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!(
            "Fee category: {}. Usage: :fee-category <name>",
            app.config.metrics.fee_category
        ));
        return Ok(());
    }
    app.config.metrics.fee_category = args.to_string();
    app.invalidate_metrics();
    app.set_status(format!("Fee category set to: {args}"));
    Ok(())
}

fn cmd_tree_limit(args: &str, app: &mut App) -> anyhow::Result<()> {
    let limit = match args {
        "all" | "none" | "off" => None,
        _ => match args.parse::<usize>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                app.set_status("Usage: :tree-limit <n> or :tree-limit all");
                return Ok(());
            }
        },
    };
    app.config.metrics.hierarchy_parties = limit;
    app.invalidate_metrics();
    app.set_status(match limit {
        Some(n) => format!("Hierarchy shows the top {n} parties per sphere"),
        None => "Hierarchy shows every party".into(),
    });
    Ok(())
}

fn cmd_min_spend(args: &str, app: &mut App) -> anyhow::Result<()> {
    match crate::load::parse_decimal(args) {
        Ok(amount) if !args.is_empty() && amount >= Decimal::ZERO => {
            app.config.metrics.efficiency_min_spend = amount;
            app.invalidate_metrics();
            app.set_status(format!(
                "Efficiency ranking threshold: {}",
                super::util::format_amount(amount)
            ));
        }
        _ => app.set_status("Usage: :min-spend <amount>"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
