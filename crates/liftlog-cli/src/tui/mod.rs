//! liftlog TUI
//!
//! Terminal user interface for liftlog - workout tracking.
//!
//! ## Screens
//!
//! - Calendar: month grid of workouts, one cell per day
//! - Workout: set editor for the opened workout
//!
//! ## Navigation
//!
//! Calendar:
//! - h/l or ←/→: Previous/next day
//! - j/k or ↓/↑: Next/previous week
//! - [ / ]: Previous/next month
//! - Enter: Open workout on selected day
//! - n: New workout on selected day
//! - L: Logout
//! - q: Quit
//!
//! Workout:
//! - j/k or ↓/↑: Move set selection
//! - a: Add set (Tab cycles fields, Enter submits)
//! - d: Delete selected set
//! - R: Rename workout
//! - D: Delete workout (asks for confirmation)
//! - Esc: Back to calendar

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use liftlog_core::{ApiClient, Config};

use app::{App, InputMode, Screen};

/// Run the TUI application
pub async fn run(config: &Config) -> Result<()> {
    let api = ApiClient::new(config)?;

    // Initialize TUI logging (file-based, only if LIFTLOG_LOG is set)
    init_tui_logging(config);

    // The calendar is a protected view: probe the session before
    // taking over the terminal
    if let Err(e) = api.me().await {
        if e.is_unauthorized() {
            println!("Not logged in. Run `liftlog register` to create an account.");
            return Ok(());
        }
        return Err(e.into());
    }

    let mut app = App::new(Local::now().date_naive());
    app.load_month(&api).await?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Run app
    let result = run_app(&mut terminal, &mut app, &api).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, api: &ApiClient) -> Result<()> {
    loop {
        // Check for status message timeout
        app.check_status_timeout();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Check for terminal events
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // If help is showing, any key dismisses it
                if app.show_help {
                    app.show_help = false;
                    continue;
                }

                match app.screen {
                    Screen::Calendar => {
                        handle_calendar_key(app, api, key.code, key.modifiers).await?
                    }
                    Screen::Workout => {
                        handle_workout_key(app, api, key.code, key.modifiers).await?
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle key events on the calendar screen
async fn handle_calendar_key(
    app: &mut App,
    api: &ApiClient,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<()> {
    match app.input_mode {
        InputMode::Normal => match code {
            // Quit
            KeyCode::Char('q') => {
                app.should_quit = true;
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true;
            }

            // Day navigation
            KeyCode::Char('h') | KeyCode::Left => app.move_day(api, -1).await?,
            KeyCode::Char('l') | KeyCode::Right => app.move_day(api, 1).await?,
            KeyCode::Char('j') | KeyCode::Down => app.move_day(api, 7).await?,
            KeyCode::Char('k') | KeyCode::Up => app.move_day(api, -7).await?,

            // Month paging
            KeyCode::Char('[') => app.prev_month(api).await?,
            KeyCode::Char(']') => app.next_month(api).await?,

            // Open workout on selected day
            KeyCode::Enter => app.open_selected(api).await?,

            // New workout on selected day
            KeyCode::Char('n') => {
                app.input.clear();
                app.input_mode = InputMode::NewWorkout;
            }

            // Reload
            KeyCode::Char('r') => {
                app.load_month(api).await?;
                app.set_status("Reloaded");
            }

            // Logout
            KeyCode::Char('L') => app.logout(api).await?,

            // Help
            KeyCode::Char('?') => app.toggle_help(),

            _ => {}
        },

        InputMode::NewWorkout => match code {
            KeyCode::Esc => {
                app.input.clear();
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                app.create_workout(api).await?;
            }
            KeyCode::Char(c) => app.input.push(c),
            KeyCode::Backspace => {
                app.input.pop();
            }
            _ => {}
        },

        // AddSet/Rename/ConfirmDelete belong to the workout screen
        _ => {
            app.input_mode = InputMode::Normal;
        }
    }

    Ok(())
}

/// Handle key events on the workout screen
async fn handle_workout_key(
    app: &mut App,
    api: &ApiClient,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<()> {
    match app.input_mode {
        InputMode::Normal => match code {
            // Quit
            KeyCode::Char('q') => {
                app.should_quit = true;
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true;
            }

            // Back to calendar (discards the editor)
            KeyCode::Esc | KeyCode::Char('b') => app.back_to_calendar(api).await?,

            // Set selection
            KeyCode::Char('j') | KeyCode::Down => app.move_set_selection(1),
            KeyCode::Char('k') | KeyCode::Up => app.move_set_selection(-1),

            // Add set
            KeyCode::Char('a') => {
                app.input_mode = InputMode::AddSet;
            }

            // Delete selected set
            KeyCode::Char('d') => app.delete_selected_set(api).await?,

            // Rename workout
            KeyCode::Char('R') => app.begin_rename(),

            // Delete workout (with confirmation)
            KeyCode::Char('D') => {
                app.input_mode = InputMode::ConfirmDelete;
            }

            // Help
            KeyCode::Char('?') => app.toggle_help(),

            _ => {}
        },

        InputMode::AddSet => match code {
            KeyCode::Esc => {
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => app.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => app.form.prev_field(),
            KeyCode::Enter => app.submit_add_set(api).await?,
            KeyCode::Char(c) => app.form.focused_mut().push(c),
            KeyCode::Backspace => {
                app.form.focused_mut().pop();
            }
            _ => {}
        },

        InputMode::Rename => match code {
            KeyCode::Esc => app.cancel_rename(),
            KeyCode::Enter => app.save_rename(api).await?,
            KeyCode::Char(c) => app.input.push(c),
            KeyCode::Backspace => {
                app.input.pop();
            }
            _ => {}
        },

        InputMode::ConfirmDelete => match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.delete_workout(api).await?,
            _ => {
                app.input_mode = InputMode::Normal;
            }
        },

        // NewWorkout belongs to the calendar screen
        InputMode::NewWorkout => {
            app.input_mode = InputMode::Normal;
        }
    }

    Ok(())
}

/// Initialize logging for TUI mode
///
/// Only initializes if LIFTLOG_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    // Only log if LIFTLOG_LOG is set
    let Ok(log_level) = std::env::var("LIFTLOG_LOG") else {
        return;
    };

    // Determine log file path
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(|| config.data_dir.join("debug.log"));

    // Create log file
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "liftlog_core={},liftlog_cli={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
