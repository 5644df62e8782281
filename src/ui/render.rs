use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::screens;
use super::theme::Palette;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let palette = &app.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app, palette);
    render_screen(f, chunks[1], app, palette);
    render_status_bar(f, chunks[2], app, palette);
    render_command_bar(f, chunks[3], app, palette);

    if app.show_help {
        render_help_overlay(f, f.area(), palette);
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = format!("{}", i + 1);
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), palette.dim_style()),
                    Span::styled(
                        format!("{s}"),
                        Style::default()
                            .fg(palette.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(format!("{num}:{s}"), palette.dim_style()))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", palette.border_style()))
        .style(Style::default().bg(palette.header_bg));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    match app.screen {
        Screen::Overview => screens::overview::render(f, area, app, palette),
        Screen::Hierarchy => screens::hierarchy::render(f, area, app, palette),
        Screen::Composition => screens::composition::render(f, area, app, palette),
        Screen::Fees => screens::fees::render(f, area, app, palette),
        Screen::Suppliers => screens::suppliers::render(f, area, app, palette),
        Screen::Filters => screens::filters::render(f, area, app, palette),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default()
            .fg(palette.header_bg)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD),
        InputMode::Command => Style::default()
            .fg(palette.header_bg)
            .bg(palette.green)
            .add_modifier(Modifier::BOLD),
    };

    let filtered = if app.is_unfiltered() { "all" } else { "filtered" };
    let info = format!(
        " {} | {} | {}/{} txns ({filtered})",
        app.screen,
        app.source_label,
        app.metrics.summary.transactions,
        app.base_summary.transactions
    );

    let right = match app.screen {
        Screen::Filters => " h/l dimension | Space toggle | a all | x reset ",
        Screen::Overview => " Tab next | :party filter | ? help ",
        _ => " j/k scroll | Tab next | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.chars().count();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, palette.status_bar_style()),
        Span::styled(" ".repeat(pad), palette.status_bar_style()),
        Span::styled(right, palette.status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(palette.accent)),
                Span::styled(&app.command_input, palette.command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, 1-6 to switch screens, ? for help",
                    palette.dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    palette.command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(palette.command_bg));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn render_help_overlay(f: &mut Frame, area: Rect, palette: &Palette) {
    let key_line = |text: &'static str| Line::from(Span::styled(text, palette.normal_style()));
    let mut help_text = vec![
        Line::from(Span::styled(
            " partidash Help ",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", palette.section_style())),
        key_line("  j/k or Up/Down   Scroll                1-6        Switch screens"),
        key_line("  Tab/Shift-Tab    Cycle screens         g/G        Top/Bottom"),
        key_line("  Ctrl-d/u         Page Down/Up          q, Ctrl-c  Quit"),
        Line::from(""),
        Line::from(Span::styled(" Filters", palette.section_style())),
        key_line("  h/l              Switch dimension      Space      Toggle value"),
        key_line("  a                Select whole dim.     x          Reset all filters"),
        Line::from(""),
        Line::from(Span::styled(" Commands", palette.section_style())),
    ];

    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<14} {desc}"),
            palette.normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        palette.dim_style(),
    )));

    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 84.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent))
            .style(Style::default().bg(palette.header_bg)),
    );
    f.render_widget(help, popup_area);
}
