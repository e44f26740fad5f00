//! Set command handlers

use anyhow::{Context, Result};

use liftlog_core::{ApiClient, SetDraft};

use crate::output::{format_set_line, Output};

/// Log a set against a workout
pub async fn add(
    api: &ApiClient,
    workout_id: String,
    exercise: String,
    reps: u32,
    weight: Option<f64>,
    rpe: Option<f64>,
    output: &Output,
) -> Result<()> {
    let mut draft = SetDraft::new(exercise, reps);
    draft.weight = weight;
    draft.rpe = rpe;

    if !draft.is_valid() {
        output.message("Nothing to add: exercise must be non-empty and reps positive.");
        return Ok(());
    }

    let set = api
        .create_set(&workout_id, &draft)
        .await
        .context("Failed to create set")?;

    output.success(&format!(
        "Added set {} to {}: {}",
        set.id,
        set.exercise_id,
        format_set_line(&set)
    ));
    Ok(())
}

/// Delete a set by id
pub async fn rm(api: &ApiClient, set_id: String, output: &Output) -> Result<()> {
    api.delete_set(&set_id)
        .await
        .with_context(|| format!("Failed to delete set {}", set_id))?;

    output.success(&format!("Deleted set: {}", set_id));
    Ok(())
}
