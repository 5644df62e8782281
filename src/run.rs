mod cli;
mod tui;

pub(crate) use cli::{as_cli, positional};
pub(crate) use tui::as_tui;
