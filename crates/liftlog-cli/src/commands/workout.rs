//! Workout command handlers

use anyhow::{Context, Result};
use chrono::{Local, Months, NaiveDate};

use liftlog_core::ApiClient;

use crate::commands::confirm;
use crate::output::Output;

/// List workouts in a date range (defaults to the current month)
pub async fn list(
    api: &ApiClient,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    output: &Output,
) -> Result<()> {
    let (month_start, month_end) = month_bounds(Local::now().date_naive());
    let from = from.unwrap_or(month_start);
    let to = to.unwrap_or(month_end);

    let summaries = api
        .list_workouts(from, to)
        .await
        .context("Failed to list workouts")?;

    output.print_summaries(&summaries);
    Ok(())
}

/// Create a workout on a date
pub async fn create(
    api: &ApiClient,
    date: NaiveDate,
    notes: Option<String>,
    output: &Output,
) -> Result<()> {
    let workout = api
        .create_workout(date, notes.as_deref())
        .await
        .context("Failed to create workout")?;

    output.success(&format!("Created workout: {}", workout.id));
    output.print_workout(&workout);
    Ok(())
}

/// Show a workout with its sets
pub async fn show(api: &ApiClient, id: String, output: &Output) -> Result<()> {
    let workout = api
        .get_workout(&id)
        .await
        .with_context(|| format!("Failed to load workout {}", id))?;

    output.print_workout(&workout);
    Ok(())
}

/// Update a workout's title
pub async fn rename(api: &ApiClient, id: String, notes: String, output: &Output) -> Result<()> {
    // Trim the draft; an empty value means "no title"
    let workout = api
        .rename_workout(&id, notes.trim())
        .await
        .context("Failed to rename workout")?;

    output.success(&format!("Renamed workout: {}", workout.title()));
    Ok(())
}

/// Delete a workout and all of its sets
pub async fn delete(api: &ApiClient, id: String, output: &Output) -> Result<()> {
    if output.should_prompt() && !confirm("Delete this workout and all of its sets?")? {
        println!("Cancelled.");
        return Ok(());
    }

    api.delete_workout(&id)
        .await
        .context("Failed to delete workout")?;

    output.success(&format!("Deleted workout: {}", id));
    Ok(())
}

/// First and last day of the month containing `day`
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    use chrono::Datelike;

    let start = day.with_day(1).unwrap_or(day);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(start);
    (start, end)
}
