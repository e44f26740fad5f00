//! Optimistic workout editor
//!
//! In-memory model of one workout's exercise groupings, owned by the
//! view for the lifetime of a workout screen. Mutations call the API
//! first and apply the server-confirmed result locally only on success;
//! a failed call leaves the collection untouched. The local collection
//! is a cache of server state and is never re-fetched after a mutation.
//!
//! The model exposes a single `busy` flag covering any in-flight
//! mutating call. It performs no mutual exclusion itself; the view is
//! expected to disable triggers while busy. Discarding the editor (on
//! navigation away) drops it, so a response can never be applied to a
//! dead model.

use crate::api::{ApiResult, WorkoutApi};
use crate::models::{ExerciseGroup, SetDraft, Workout, WorkoutSet};
use chrono::NaiveDate;
use tracing::debug;

/// Editable state for one workout
#[derive(Debug, Clone)]
pub struct WorkoutEditor {
    workout_id: String,
    date: NaiveDate,
    notes: String,
    exercises: Vec<ExerciseGroup>,
    busy: bool,
    renaming: bool,
    title_draft: String,
}

impl WorkoutEditor {
    /// Build an editor from a fetched workout
    pub fn new(workout: Workout) -> Self {
        let notes = workout.notes.unwrap_or_default();
        Self {
            workout_id: workout.id,
            date: workout.date,
            title_draft: notes.clone(),
            notes,
            exercises: workout.exercises,
            busy: false,
            renaming: false,
        }
    }

    pub fn workout_id(&self) -> &str {
        &self.workout_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Raw notes value (may be empty)
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Display title: trimmed notes, or a placeholder when empty
    pub fn title(&self) -> &str {
        let trimmed = self.notes.trim();
        if trimmed.is_empty() {
            "Workout"
        } else {
            trimmed
        }
    }

    /// Current exercise groupings
    pub fn exercises(&self) -> &[ExerciseGroup] {
        &self.exercises
    }

    /// Whether a mutating call is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the title is being edited
    pub fn is_renaming(&self) -> bool {
        self.renaming
    }

    /// Current title draft (meaningful while renaming)
    pub fn title_draft(&self) -> &str {
        &self.title_draft
    }

    /// Total number of sets across all groupings
    ///
    /// Recomputed from the current collection on every call.
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|g| g.sets.len()).sum()
    }

    /// Add a set to this workout
    ///
    /// An invalid draft (empty exercise id or non-positive reps) is
    /// silently declined without a network call; returns `Ok(false)`.
    /// Otherwise the set is created server-side and, only on success,
    /// appended to its exercise grouping. A grouping is created at the
    /// end of the collection when this is the exercise's first set.
    pub async fn add_set(&mut self, api: &impl WorkoutApi, draft: &SetDraft) -> ApiResult<bool> {
        if !draft.is_valid() {
            debug!("Declining invalid set draft");
            return Ok(false);
        }

        self.busy = true;
        let result = api.create_set(&self.workout_id, draft).await;
        self.busy = false;

        let set = result?;
        insert_set(&mut self.exercises, set);
        Ok(true)
    }

    /// Delete a set from this workout
    ///
    /// Only on server confirmation is the set removed locally; a
    /// grouping whose last set goes is removed with it.
    pub async fn delete_set(
        &mut self,
        api: &impl WorkoutApi,
        exercise_id: &str,
        set_id: &str,
    ) -> ApiResult<()> {
        self.busy = true;
        let result = api.delete_set(set_id).await;
        self.busy = false;

        result?;
        remove_set(&mut self.exercises, exercise_id, set_id);
        Ok(())
    }

    /// Enter rename mode, seeding the draft from the current notes
    pub fn begin_rename(&mut self) {
        self.title_draft = self.notes.clone();
        self.renaming = true;
    }

    /// Replace the title draft
    pub fn set_title_draft(&mut self, draft: impl Into<String>) {
        self.title_draft = draft.into();
    }

    /// Leave rename mode without saving
    pub fn cancel_rename(&mut self) {
        self.title_draft = self.notes.clone();
        self.renaming = false;
    }

    /// Save the title draft
    ///
    /// The draft is trimmed before sending (empty is allowed, meaning
    /// "no title"). On success the server's returned notes are adopted
    /// verbatim, which may differ from the draft, and rename mode ends.
    pub async fn save_title(&mut self, api: &impl WorkoutApi) -> ApiResult<()> {
        let draft = self.title_draft.trim().to_string();

        self.busy = true;
        let result = api.rename_workout(&self.workout_id, &draft).await;
        self.busy = false;

        let updated = result?;
        self.notes = updated.notes.unwrap_or_default();
        self.title_draft = self.notes.clone();
        self.renaming = false;
        Ok(())
    }

    /// Delete this workout (the server cascades its sets)
    ///
    /// On success the caller is expected to discard the editor and
    /// navigate back to the calendar.
    pub async fn delete(&mut self, api: &impl WorkoutApi) -> ApiResult<()> {
        self.busy = true;
        let result = api.delete_workout(&self.workout_id).await;
        self.busy = false;

        result
    }
}

/// Append a server-confirmed set to its grouping, creating the
/// grouping when absent
fn insert_set(exercises: &mut Vec<ExerciseGroup>, set: WorkoutSet) {
    match exercises.iter_mut().find(|g| g.id == set.exercise_id) {
        Some(group) => group.sets.push(set),
        None => exercises.push(ExerciseGroup {
            id: set.exercise_id.clone(),
            sets: vec![set],
        }),
    }
}

/// Remove a set by id from its grouping; drop the grouping when empty
fn remove_set(exercises: &mut Vec<ExerciseGroup>, exercise_id: &str, set_id: &str) {
    if let Some(idx) = exercises.iter().position(|g| g.id == exercise_id) {
        exercises[idx].sets.retain(|s| s.id != set_id);
        if exercises[idx].sets.is_empty() {
            exercises.remove(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted stand-in for the API client
    #[derive(Default)]
    struct MockApi {
        /// Fail every call with a 500
        fail: bool,
        /// Override for the notes the rename call returns
        rename_response: Option<String>,
        /// Number of calls made
        calls: AtomicUsize,
        /// Notes values received by rename calls
        renamed_to: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn check_fail(&self) -> ApiResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ApiError::Http {
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    impl WorkoutApi for MockApi {
        async fn create_set(&self, _workout_id: &str, draft: &SetDraft) -> ApiResult<WorkoutSet> {
            self.check_fail()?;
            Ok(WorkoutSet {
                id: format!("set_{}", self.call_count()),
                exercise_id: draft.exercise_id.clone(),
                reps: draft.reps,
                weight: draft.weight,
                rpe: draft.rpe,
            })
        }

        async fn delete_set(&self, _set_id: &str) -> ApiResult<()> {
            self.check_fail()
        }

        async fn rename_workout(&self, workout_id: &str, notes: &str) -> ApiResult<Workout> {
            self.check_fail()?;
            self.renamed_to.lock().unwrap().push(notes.to_string());
            let notes = self
                .rename_response
                .clone()
                .unwrap_or_else(|| notes.to_string());
            Ok(Workout {
                id: workout_id.to_string(),
                date: "2024-03-01".parse().unwrap(),
                notes: Some(notes),
                exercises: Vec::new(),
            })
        }

        async fn delete_workout(&self, _workout_id: &str) -> ApiResult<()> {
            self.check_fail()
        }
    }

    fn empty_workout() -> Workout {
        Workout {
            id: "w1".to_string(),
            date: "2024-03-01".parse().unwrap(),
            notes: None,
            exercises: Vec::new(),
        }
    }

    fn set(id: &str, exercise_id: &str, reps: u32) -> WorkoutSet {
        WorkoutSet {
            id: id.to_string(),
            exercise_id: exercise_id.to_string(),
            reps,
            weight: None,
            rpe: None,
        }
    }

    #[tokio::test]
    async fn test_add_set_creates_grouping() {
        let api = MockApi::default();
        let mut editor = WorkoutEditor::new(empty_workout());

        let draft = SetDraft::new("ex_squat", 5).with_weight(100.0);
        let added = editor.add_set(&api, &draft).await.unwrap();

        assert!(added);
        assert_eq!(editor.total_sets(), 1);
        assert_eq!(editor.exercises().len(), 1);

        let group = &editor.exercises()[0];
        assert_eq!(group.id, "ex_squat");
        assert_eq!(group.sets[0].reps, 5);
        assert_eq!(group.sets[0].weight, Some(100.0));
        assert!(group.sets[0].rpe.is_none());
        assert!(!editor.is_busy());
    }

    #[tokio::test]
    async fn test_add_set_appends_to_existing_grouping() {
        let api = MockApi::default();
        let mut editor = WorkoutEditor::new(empty_workout());

        editor
            .add_set(&api, &SetDraft::new("ex_squat", 5))
            .await
            .unwrap();
        editor
            .add_set(&api, &SetDraft::new("ex_squat", 3))
            .await
            .unwrap();
        editor
            .add_set(&api, &SetDraft::new("ex_bench_press", 8))
            .await
            .unwrap();

        assert_eq!(editor.total_sets(), 3);
        assert_eq!(editor.exercises().len(), 2);
        // New grouping goes to the end of the collection
        assert_eq!(editor.exercises()[0].id, "ex_squat");
        assert_eq!(editor.exercises()[0].sets.len(), 2);
        assert_eq!(editor.exercises()[1].id, "ex_bench_press");
    }

    #[tokio::test]
    async fn test_add_set_invalid_draft_is_silent_noop() {
        let api = MockApi::default();
        let mut editor = WorkoutEditor::new(empty_workout());

        let added = editor
            .add_set(&api, &SetDraft::new("ex_squat", 0))
            .await
            .unwrap();
        assert!(!added);

        let added = editor.add_set(&api, &SetDraft::new("", 5)).await.unwrap();
        assert!(!added);

        // No network call was made and nothing changed
        assert_eq!(api.call_count(), 0);
        assert_eq!(editor.total_sets(), 0);
        assert!(!editor.is_busy());
    }

    #[tokio::test]
    async fn test_add_set_failure_leaves_state_unchanged() {
        let api = MockApi::failing();
        let mut editor = WorkoutEditor::new(Workout {
            exercises: vec![ExerciseGroup {
                id: "ex_squat".to_string(),
                sets: vec![set("s1", "ex_squat", 5)],
            }],
            ..empty_workout()
        });

        let before = editor.exercises().to_vec();
        let err = editor
            .add_set(&api, &SetDraft::new("ex_squat", 3))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(editor.exercises(), &before[..]);
        assert!(!editor.is_busy());
    }

    #[tokio::test]
    async fn test_delete_last_set_removes_grouping() {
        let api = MockApi::default();
        let mut editor = WorkoutEditor::new(Workout {
            exercises: vec![ExerciseGroup {
                id: "ex_squat".to_string(),
                sets: vec![set("s1", "ex_squat", 5)],
            }],
            ..empty_workout()
        });

        editor.delete_set(&api, "ex_squat", "s1").await.unwrap();

        assert!(editor.exercises().is_empty());
        assert_eq!(editor.total_sets(), 0);
        assert!(!editor.is_busy());
    }

    #[tokio::test]
    async fn test_delete_non_last_set_keeps_grouping() {
        let api = MockApi::default();
        let mut editor = WorkoutEditor::new(Workout {
            exercises: vec![ExerciseGroup {
                id: "ex_squat".to_string(),
                sets: vec![set("s1", "ex_squat", 5), set("s2", "ex_squat", 3)],
            }],
            ..empty_workout()
        });

        editor.delete_set(&api, "ex_squat", "s1").await.unwrap();

        assert_eq!(editor.exercises().len(), 1);
        assert_eq!(editor.exercises()[0].sets.len(), 1);
        assert_eq!(editor.exercises()[0].sets[0].id, "s2");
    }

    #[tokio::test]
    async fn test_delete_set_failure_leaves_state_unchanged() {
        let api = MockApi::failing();
        let mut editor = WorkoutEditor::new(Workout {
            exercises: vec![ExerciseGroup {
                id: "ex_squat".to_string(),
                sets: vec![set("s1", "ex_squat", 5)],
            }],
            ..empty_workout()
        });

        let before = editor.exercises().to_vec();
        assert!(editor.delete_set(&api, "ex_squat", "s1").await.is_err());

        assert_eq!(editor.exercises(), &before[..]);
        assert!(!editor.is_busy());
    }

    #[tokio::test]
    async fn test_rename_trims_draft_and_adopts_response() {
        let api = MockApi::default();
        let mut editor = WorkoutEditor::new(empty_workout());

        editor.begin_rename();
        assert!(editor.is_renaming());

        editor.set_title_draft("  Leg Day  ");
        editor.save_title(&api).await.unwrap();

        // Trimmed before sending
        assert_eq!(api.renamed_to.lock().unwrap().as_slice(), ["Leg Day"]);
        assert_eq!(editor.notes(), "Leg Day");
        assert_eq!(editor.title(), "Leg Day");
        assert!(!editor.is_renaming());
        assert!(!editor.is_busy());
    }

    #[tokio::test]
    async fn test_rename_adopts_server_normalization_verbatim() {
        let api = MockApi {
            rename_response: Some("leg day".to_string()),
            ..MockApi::default()
        };
        let mut editor = WorkoutEditor::new(empty_workout());

        editor.begin_rename();
        editor.set_title_draft("Leg Day");
        editor.save_title(&api).await.unwrap();

        // The server's value wins, not the draft
        assert_eq!(editor.notes(), "leg day");
        assert_eq!(editor.title_draft(), "leg day");
    }

    #[tokio::test]
    async fn test_rename_empty_draft_allowed() {
        let api = MockApi::default();
        let mut editor = WorkoutEditor::new(Workout {
            notes: Some("Old title".to_string()),
            ..empty_workout()
        });

        editor.begin_rename();
        editor.set_title_draft("   ");
        editor.save_title(&api).await.unwrap();

        assert_eq!(api.renamed_to.lock().unwrap().as_slice(), [""]);
        assert_eq!(editor.notes(), "");
        assert_eq!(editor.title(), "Workout");
    }

    #[tokio::test]
    async fn test_rename_failure_keeps_mode_and_notes() {
        let api = MockApi::failing();
        let mut editor = WorkoutEditor::new(Workout {
            notes: Some("Old title".to_string()),
            ..empty_workout()
        });

        editor.begin_rename();
        editor.set_title_draft("New title");
        assert!(editor.save_title(&api).await.is_err());

        assert_eq!(editor.notes(), "Old title");
        assert!(editor.is_renaming());
        assert!(!editor.is_busy());
    }

    #[tokio::test]
    async fn test_cancel_rename_restores_draft() {
        let api = MockApi::default();
        let mut editor = WorkoutEditor::new(Workout {
            notes: Some("Old title".to_string()),
            ..empty_workout()
        });

        editor.begin_rename();
        editor.set_title_draft("Half-typed");
        editor.cancel_rename();

        assert!(!editor.is_renaming());
        assert_eq!(editor.title_draft(), "Old title");
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_workout_clears_busy_on_both_paths() {
        let api = MockApi::default();
        let mut editor = WorkoutEditor::new(empty_workout());
        editor.delete(&api).await.unwrap();
        assert!(!editor.is_busy());

        let api = MockApi::failing();
        let mut editor = WorkoutEditor::new(empty_workout());
        assert!(editor.delete(&api).await.is_err());
        assert!(!editor.is_busy());
    }

    #[test]
    fn test_insert_set_into_missing_grouping() {
        let mut exercises = Vec::new();
        insert_set(&mut exercises, set("s1", "ex_squat", 5));

        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].id, "ex_squat");
        assert_eq!(exercises[0].sets.len(), 1);
    }

    #[test]
    fn test_remove_set_unknown_grouping_is_noop() {
        let mut exercises = vec![ExerciseGroup {
            id: "ex_squat".to_string(),
            sets: vec![set("s1", "ex_squat", 5)],
        }];
        let before = exercises.clone();

        remove_set(&mut exercises, "ex_deadlift", "s1");
        assert_eq!(exercises, before);

        // Unknown set id within a known grouping is also a no-op
        remove_set(&mut exercises, "ex_squat", "s99");
        assert_eq!(exercises, before);
    }
}
