use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::config::Config;
use crate::load::LoadOutcome;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(config: Config, outcome: LoadOutcome) -> Result<()> {
    let mut app = App::new(config, outcome);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab + status + command bars, borders and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app),
                InputMode::Command => handle_command_input(key, app)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char(c @ '1'..='6') => {
            let idx = c as usize - '1' as usize;
            if let Some(screen) = Screen::all().get(idx) {
                app.switch_screen(*screen);
            }
        }
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            app.switch_screen(screens[(idx + 1) % screens.len()]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            app.switch_screen(screens[prev]);
        }
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        KeyCode::Char('x') => {
            app.reset_filters();
            app.set_status("Filters cleared");
        }
        _ if app.screen == Screen::Filters => handle_filter_keys(key, app),
        _ => {}
    }
}

fn handle_filter_keys(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => {
            app.filter_dimension = app.filter_dimension.prev();
            scroll_to_top(&mut app.filter_index, &mut app.filter_scroll);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.filter_dimension = app.filter_dimension.next();
            scroll_to_top(&mut app.filter_index, &mut app.filter_scroll);
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            app.toggle_filter(app.filter_dimension, app.filter_index);
        }
        KeyCode::Char('a') => {
            app.select_dimension(app.filter_dimension);
            app.refresh_metrics();
            app.set_status(format!("Selected all {}", app.filter_dimension));
        }
        _ => {}
    }
}

fn handle_command_input(key: event::KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn handle_move_down(app: &mut App) {
    let len = app.list_len();
    let page = app.visible_rows.max(1);
    if app.screen == Screen::Filters {
        scroll_down(&mut app.filter_index, &mut app.filter_scroll, len, page);
    } else {
        scroll_down(&mut app.list_index, &mut app.list_scroll, len, page);
    }
}

fn handle_move_up(app: &mut App) {
    if app.screen == Screen::Filters {
        scroll_up(&mut app.filter_index, &mut app.filter_scroll);
    } else {
        scroll_up(&mut app.list_index, &mut app.list_scroll);
    }
}

fn handle_goto_top(app: &mut App) {
    if app.screen == Screen::Filters {
        scroll_to_top(&mut app.filter_index, &mut app.filter_scroll);
    } else {
        scroll_to_top(&mut app.list_index, &mut app.list_scroll);
    }
}

fn handle_goto_bottom(app: &mut App) {
    let len = app.list_len();
    let page = app.visible_rows.max(1);
    if app.screen == Screen::Filters {
        scroll_to_bottom(&mut app.filter_index, &mut app.filter_scroll, len, page);
    } else {
        scroll_to_bottom(&mut app.list_index, &mut app.list_scroll, len, page);
    }
}
