mod config;
mod explore;
mod load;
mod metrics;
mod models;
mod run;
mod store;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let interactive = run::positional(&args).is_empty();
    init_logging(interactive);

    let mut config = config::Config::from_env()?;
    config.apply_args(&args)?;
    log::debug!("Using data file {}", config.data_path.display());

    if interactive {
        let outcome = load::load_or_demo(&config.data_path, &config.layout);
        run::as_tui(config, outcome)
    } else {
        run::as_cli(&args, &config)
    }
}

/// Log to stderr. The TUI owns the terminal, so it stays silent unless
/// `RUST_LOG` asks otherwise.
fn init_logging(interactive: bool) {
    let default = if interactive { "off" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .target(env_logger::Target::Stderr)
        .init();
}
