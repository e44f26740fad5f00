//! UI rendering

use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::{App, InputMode, Screen, ADD_SET_FIELDS};
use crate::commands::workout::month_bounds;
use crate::output::format_set_line;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    // Create vertical layout for status bar at the bottom
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    match app.screen {
        Screen::Calendar => draw_calendar_screen(frame, app, outer_chunks[0]),
        Screen::Workout => draw_workout_screen(frame, app, outer_chunks[0]),
    }

    draw_status_bar(frame, app, outer_chunks[1]);

    // Draw help overlay if visible
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the calendar screen: month grid plus the selected day's workouts
fn draw_calendar_screen(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(7)])
        .split(area);

    draw_month_grid(frame, app, chunks[0]);
    draw_day_list(frame, app, chunks[1]);
}

/// Draw the month grid, one cell per day
fn draw_month_grid(frame: &mut Frame, app: &App, area: Rect) {
    let (first, last) = month_bounds(app.month);

    let mut lines = vec![Line::from(Span::styled(
        " Mo  Tu  We  Th  Fr  Sa  Su",
        Style::default().add_modifier(Modifier::DIM),
    ))];

    let mut spans: Vec<Span> = Vec::new();
    // Pad the first week up to the month's starting weekday
    for _ in 0..first.weekday().num_days_from_monday() {
        spans.push(Span::raw("    "));
    }

    for day in 1..=last.day() {
        let date = first.with_day(day).unwrap_or(first);
        let has_workout = !app.workouts_on(date).is_empty();

        let mut style = Style::default();
        if has_workout {
            style = style.add_modifier(Modifier::BOLD).fg(Color::Green);
        }
        if date == app.selected_day {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let marker = if has_workout { "•" } else { " " };
        spans.push(Span::styled(format!(" {:>2}{}", day, marker), style));

        if date.weekday().num_days_from_monday() == 6 {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }

    let title = format!(" {} ", app.month.format("%B %Y"));
    let block = Block::default().title(title).borders(Borders::ALL);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw the list of workouts on the selected day
fn draw_day_list(frame: &mut Frame, app: &App, area: Rect) {
    let workouts = app.workouts_on(app.selected_day);

    let items: Vec<ListItem> = if workouts.is_empty() {
        vec![ListItem::new(Span::styled(
            "No workouts. Press n to create one.",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        workouts
            .iter()
            .map(|summary| {
                let title = summary
                    .notes
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or("Workout");
                ListItem::new(format!("{}  ({})", title, summary.id))
            })
            .collect()
    };

    let block = Block::default()
        .title(format!(" {} ", app.selected_day))
        .borders(Borders::ALL);

    frame.render_widget(List::new(items).block(block), area);
}

/// Draw the workout screen: header, grouped set list, input area
fn draw_workout_screen(frame: &mut Frame, app: &App, area: Rect) {
    let Some(editor) = &app.editor else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    // Header
    let busy = if editor.is_busy() { "  [saving...]" } else { "" };
    let header = vec![
        Line::from(Span::styled(
            format!("{}{}", editor.title(), busy),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{}  ·  Total sets: {}",
            editor.date(),
            editor.total_sets()
        )),
    ];
    frame.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    // Sets grouped by exercise; only set rows are selectable
    let mut items: Vec<ListItem> = Vec::new();
    let mut selectable: Vec<usize> = Vec::new();

    for group in editor.exercises() {
        items.push(ListItem::new(Span::styled(
            group.id.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for set in &group.sets {
            selectable.push(items.len());
            items.push(ListItem::new(format!("  {}", format_set_line(set))));
        }
    }

    if items.is_empty() {
        items.push(ListItem::new(Span::styled(
            "No sets yet. Press a to add one.",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    let list = List::new(items)
        .block(Block::default().title(" Sets ").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(selectable.get(app.set_index).copied());

    frame.render_stateful_widget(list, chunks[1], &mut state);

    draw_input_area(frame, app, chunks[2]);
}

/// Draw the mode-dependent input area below the set list
fn draw_input_area(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.input_mode {
        InputMode::AddSet => {
            let mut spans = Vec::new();
            for (index, name) in ADD_SET_FIELDS.iter().enumerate() {
                let style = if index == app.form.focus {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                spans.push(Span::raw(format!("{}: ", name)));
                spans.push(Span::styled(format!("[{}]", app.form.field(index)), style));
                spans.push(Span::raw("  "));
            }
            Line::from(spans)
        }
        InputMode::Rename => Line::from(format!("Title: {}_", app.input)),
        InputMode::ConfirmDelete => Line::from(Span::styled(
            "Delete this workout and all of its sets? (y/N)",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        _ => Line::from(Span::styled(
            "a add set · d delete set · R rename · D delete workout · Esc back",
            Style::default().add_modifier(Modifier::DIM),
        )),
    };

    frame.render_widget(
        Paragraph::new(content).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

/// Draw the bottom status bar
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(ref message) = app.status_message {
        message.clone()
    } else {
        match (app.screen, app.input_mode) {
            (Screen::Calendar, InputMode::NewWorkout) => {
                format!("New workout notes: {}_  (Enter to create, Esc to cancel)", app.input)
            }
            (Screen::Calendar, _) => {
                "hjkl move · [ ] month · Enter open · n new · L logout · ? help · q quit"
                    .to_string()
            }
            (Screen::Workout, InputMode::AddSet) => {
                "Tab next field · Enter submit · Esc cancel".to_string()
            }
            (Screen::Workout, _) => "j/k select · ? help · q quit".to_string(),
        }
    };

    frame.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default().add_modifier(Modifier::DIM),
        )),
        area,
    );
}

/// Draw the help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let lines = vec![
        Line::from(Span::styled(
            "Calendar",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  h/l ←/→     previous/next day"),
        Line::from("  j/k ↓/↑     next/previous week"),
        Line::from("  [ / ]       previous/next month"),
        Line::from("  Enter       open workout on day"),
        Line::from("  n           new workout on day"),
        Line::from("  L           logout"),
        Line::from(""),
        Line::from(Span::styled(
            "Workout",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  j/k ↓/↑     select set"),
        Line::from("  a           add set"),
        Line::from("  d           delete selected set"),
        Line::from("  R           rename workout"),
        Line::from("  D           delete workout"),
        Line::from("  Esc         back to calendar"),
        Line::from(""),
        Line::from("  q           quit"),
    ];

    let block = Block::default().title(" Help ").borders(Borders::ALL);

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

/// Centered rectangle taking the given percentages of the area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
