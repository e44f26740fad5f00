//! liftlog CLI
//!
//! Command-line interface for liftlog - workout tracking against a
//! remote API. Running without a command starts the TUI.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use liftlog_core::{ApiClient, Config};

mod commands;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "liftlog - workout tracking from the terminal")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Create an account and start a session
    Register {
        /// Account email
        #[arg(long)]
        email: Option<String>,
        /// Account password
        #[arg(long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Check whether the saved session is valid
    Whoami,
    /// List workouts (defaults to the current month)
    #[command(alias = "ls")]
    List {
        /// Range start (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Range end (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Create a workout on a date
    Create {
        /// Workout date (YYYY-MM-DD)
        date: NaiveDate,
        /// Title/notes for the workout
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Show a workout with its sets
    Show {
        /// Workout ID
        id: String,
    },
    /// Update a workout's title
    Rename {
        /// Workout ID
        id: String,
        /// New title (empty clears it)
        notes: String,
    },
    /// Delete a workout and all of its sets
    #[command(alias = "rm")]
    Delete {
        /// Workout ID
        id: String,
    },
    /// Manage sets on a workout
    Set {
        #[command(subcommand)]
        command: SetCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum SetCommands {
    /// Log a set against a workout
    Add {
        /// Workout ID
        workout_id: String,
        /// Exercise identifier (e.g. ex_squat)
        exercise: String,
        /// Repetition count
        reps: u32,
        /// Working weight
        #[arg(short, long)]
        weight: Option<f64>,
        /// Rating of perceived exertion (0-10)
        #[arg(short, long)]
        rpe: Option<f64>,
    },
    /// Delete a set
    Rm {
        /// Set ID
        id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, data_dir)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need a client
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load()?;

    // TUI is the default when no command is given
    if matches!(&cli.command, Some(Commands::Tui) | None) {
        return tui::run(&config).await;
    }

    let api = ApiClient::new(&config)?;

    match cli.command.unwrap() {
        Commands::Tui => unreachable!(),           // Handled above
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Register { email, password } => {
            commands::auth::register(&api, email, password, &output).await
        }
        Commands::Logout => commands::auth::logout(&api, &output).await,
        Commands::Whoami => commands::auth::whoami(&api, &output).await,
        Commands::List { from, to } => commands::workout::list(&api, from, to, &output).await,
        Commands::Create { date, notes } => {
            commands::workout::create(&api, date, notes, &output).await
        }
        Commands::Show { id } => commands::workout::show(&api, id, &output).await,
        Commands::Rename { id, notes } => commands::workout::rename(&api, id, notes, &output).await,
        Commands::Delete { id } => commands::workout::delete(&api, id, &output).await,
        Commands::Set { command } => match command {
            SetCommands::Add {
                workout_id,
                exercise,
                reps,
                weight,
                rpe,
            } => commands::set::add(&api, workout_id, exercise, reps, weight, rpe, &output).await,
            SetCommands::Rm { id } => commands::set::rm(&api, id, &output).await,
        },
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
