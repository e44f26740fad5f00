//! Data models for liftlog
//!
//! Wire types for the workout API plus the client-side grouping types.
//! The server speaks camelCase JSON; ids are opaque strings assigned
//! server-side.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row in the calendar listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    /// Unique identifier
    pub id: String,
    /// Calendar date of the workout
    pub date: NaiveDate,
    /// Optional free-text notes, shown as the workout title
    #[serde(default)]
    pub notes: Option<String>,
}

/// A full workout with its nested exercise groupings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Unique identifier
    pub id: String,
    /// Calendar date of the workout
    pub date: NaiveDate,
    /// Optional free-text notes, shown as the workout title
    #[serde(default)]
    pub notes: Option<String>,
    /// Sets grouped by exercise
    #[serde(default)]
    pub exercises: Vec<ExerciseGroup>,
}

impl Workout {
    /// Display title: trimmed notes, or a placeholder when empty
    pub fn title(&self) -> &str {
        match self.notes.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => "Workout",
        }
    }
}

/// Client-side bucket of sets sharing one exercise identifier
///
/// Not a persisted entity: a grouping exists exactly while it has at
/// least one set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseGroup {
    /// Exercise identifier (matches the server-side exercise catalog)
    pub id: String,
    /// Ordered sets for this exercise
    pub sets: Vec<WorkoutSet>,
}

/// One logged performance unit for an exercise within a workout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    /// Unique identifier, assigned by the server on creation
    pub id: String,
    /// Exercise this set belongs to
    pub exercise_id: String,
    /// Repetition count
    pub reps: u32,
    /// Working weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Rating of perceived exertion, conventionally 0-10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

/// Candidate set, as entered by the user before the server confirms it
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetDraft {
    pub exercise_id: String,
    pub reps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

impl SetDraft {
    /// Create a draft from typed values
    pub fn new(exercise_id: impl Into<String>, reps: u32) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            reps,
            weight: None,
            rpe: None,
        }
    }

    /// Set the working weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the RPE
    pub fn with_rpe(mut self, rpe: f64) -> Self {
        self.rpe = Some(rpe);
        self
    }

    /// Build a draft from raw form input
    ///
    /// Unparseable reps become 0 (invalid); empty weight/RPE fields
    /// become `None`.
    pub fn parse(exercise_id: &str, reps: &str, weight: &str, rpe: &str) -> Self {
        Self {
            exercise_id: exercise_id.trim().to_string(),
            reps: reps.trim().parse().unwrap_or(0),
            weight: weight.trim().parse().ok(),
            rpe: rpe.trim().parse().ok(),
        }
    }

    /// A draft is submittable when the exercise id is non-empty and
    /// reps is a positive integer
    pub fn is_valid(&self) -> bool {
        !self.exercise_id.trim().is_empty() && self.reps >= 1
    }
}
