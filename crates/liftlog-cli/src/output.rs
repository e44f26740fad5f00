//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use liftlog_core::{Workout, WorkoutSummary};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a full workout with its sets grouped by exercise
    pub fn print_workout(&self, workout: &Workout) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:    {}", workout.id);
                println!("Date:  {}", workout.date);
                println!("Title: {}", workout.title());

                if workout.exercises.is_empty() {
                    println!("\nNo sets yet.");
                    return;
                }

                for group in &workout.exercises {
                    println!("\n{} ({} set(s))", group.id, group.sets.len());
                    for set in &group.sets {
                        println!("  {} | {}", set.id, format_set_line(set));
                    }
                }

                let total: usize = workout.exercises.iter().map(|g| g.sets.len()).sum();
                println!("\nTotal sets: {}", total);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(workout).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", workout.id);
            }
        }
    }

    /// Print a list of workout summaries
    pub fn print_summaries(&self, summaries: &[WorkoutSummary]) {
        match self.format {
            OutputFormat::Human => {
                if summaries.is_empty() {
                    println!("No workouts found.");
                    return;
                }
                for summary in summaries {
                    let title = summary
                        .notes
                        .as_deref()
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .unwrap_or("Workout");
                    println!("{} | {} | {}", summary.date, &summary.id, truncate(title, 40));
                }
                println!("\n{} workout(s)", summaries.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(summaries).unwrap());
            }
            OutputFormat::Quiet => {
                for summary in summaries {
                    println!("{}", summary.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// One-line rendering of a set: reps, optional weight and RPE
pub fn format_set_line(set: &liftlog_core::WorkoutSet) -> String {
    let mut line = format!("{} reps", set.reps);
    if let Some(weight) = set.weight {
        line.push_str(&format!(" @ {}", weight));
    }
    if let Some(rpe) = set.rpe {
        line.push_str(&format!(" (RPE {})", rpe));
    }
    line
}

/// Truncate a string to max length in characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
