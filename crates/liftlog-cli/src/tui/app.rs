//! Application state and logic

use anyhow::{Context, Result};
use chrono::{Datelike, Days, Months, NaiveDate};

use liftlog_core::{ApiClient, WorkoutEditor, WorkoutSummary};

use crate::commands::workout::month_bounds;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Month calendar of workouts
    Calendar,
    /// Set editor for one workout
    Workout,
}

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Entering notes for a new workout (calendar screen)
    NewWorkout,
    /// Editing the add-set form (workout screen)
    AddSet,
    /// Editing the workout title (workout screen)
    Rename,
    /// Confirming workout deletion (workout screen)
    ConfirmDelete,
}

/// Fields of the add-set form
pub const ADD_SET_FIELDS: [&str; 4] = ["exercise", "reps", "weight", "rpe"];

/// Form state for logging a new set
#[derive(Debug, Clone, Default)]
pub struct AddSetForm {
    pub exercise: String,
    pub reps: String,
    pub weight: String,
    pub rpe: String,
    /// Focused field, index into [`ADD_SET_FIELDS`]
    pub focus: usize,
}

impl AddSetForm {
    /// Mutable access to the focused field
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.exercise,
            1 => &mut self.reps,
            2 => &mut self.weight,
            _ => &mut self.rpe,
        }
    }

    /// Read access to a field by index
    pub fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.exercise,
            1 => &self.reps,
            2 => &self.weight,
            _ => &self.rpe,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % ADD_SET_FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + ADD_SET_FIELDS.len() - 1) % ADD_SET_FIELDS.len();
    }

    /// Build a draft from the current field values
    pub fn draft(&self) -> liftlog_core::SetDraft {
        liftlog_core::SetDraft::parse(&self.exercise, &self.reps, &self.weight, &self.rpe)
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Which screen is showing
    pub screen: Screen,
    /// Current input mode
    pub input_mode: InputMode,
    /// First day of the displayed month
    pub month: NaiveDate,
    /// Selected day in the calendar
    pub selected_day: NaiveDate,
    /// Workouts of the displayed month
    pub summaries: Vec<WorkoutSummary>,
    /// Editor for the open workout (workout screen only)
    pub editor: Option<WorkoutEditor>,
    /// Selected row in the flattened set list
    pub set_index: usize,
    /// Add-set form state
    pub form: AddSetForm,
    /// Text buffer for NewWorkout and Rename modes
    pub input: String,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<std::time::Instant>,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl App {
    /// Create an app showing the month of `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Calendar,
            input_mode: InputMode::Normal,
            month: today.with_day(1).unwrap_or(today),
            selected_day: today,
            summaries: Vec::new(),
            editor: None,
            set_index: 0,
            form: AddSetForm::default(),
            input: String::new(),
            status_message: None,
            status_message_time: None,
            show_help: false,
        }
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(std::time::Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > std::time::Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // --- Calendar screen ---

    /// Reload the displayed month's workouts
    pub async fn load_month(&mut self, api: &ApiClient) -> Result<()> {
        let (from, to) = month_bounds(self.month);
        self.summaries = api
            .list_workouts(from, to)
            .await
            .context("Failed to load workouts")?;
        Ok(())
    }

    /// Workouts on a given day, in listing order
    pub fn workouts_on(&self, day: NaiveDate) -> Vec<&WorkoutSummary> {
        self.summaries.iter().filter(|s| s.date == day).collect()
    }

    /// Move the day selection, paging the month when it crosses a boundary
    pub async fn move_day(&mut self, api: &ApiClient, days: i64) -> Result<()> {
        let moved = if days >= 0 {
            self.selected_day.checked_add_days(Days::new(days as u64))
        } else {
            self.selected_day.checked_sub_days(Days::new((-days) as u64))
        };
        let Some(day) = moved else {
            return Ok(());
        };

        self.selected_day = day;
        let month = day.with_day(1).unwrap_or(day);
        if month != self.month {
            self.month = month;
            self.load_month(api).await?;
        }
        Ok(())
    }

    /// Show the previous month
    pub async fn prev_month(&mut self, api: &ApiClient) -> Result<()> {
        if let Some(month) = self.month.checked_sub_months(Months::new(1)) {
            self.month = month;
            self.selected_day = month;
            self.load_month(api).await?;
        }
        Ok(())
    }

    /// Show the next month
    pub async fn next_month(&mut self, api: &ApiClient) -> Result<()> {
        if let Some(month) = self.month.checked_add_months(Months::new(1)) {
            self.month = month;
            self.selected_day = month;
            self.load_month(api).await?;
        }
        Ok(())
    }

    /// Open the first workout on the selected day
    pub async fn open_selected(&mut self, api: &ApiClient) -> Result<()> {
        let Some(summary) = self.workouts_on(self.selected_day).first().copied() else {
            self.set_status(format!("No workout on {}", self.selected_day));
            return Ok(());
        };

        let id = summary.id.clone();
        match api.get_workout(&id).await {
            Ok(workout) => self.open_editor(WorkoutEditor::new(workout)),
            Err(e) => self.set_status(format!("Failed to load workout: {}", e)),
        }
        Ok(())
    }

    /// Create a workout on the selected day from the input buffer
    pub async fn create_workout(&mut self, api: &ApiClient) -> Result<()> {
        let trimmed = self.input.trim();
        let notes = (!trimmed.is_empty()).then(|| trimmed.to_string());

        match api.create_workout(self.selected_day, notes.as_deref()).await {
            Ok(workout) => {
                self.load_month(api).await?;
                self.open_editor(WorkoutEditor::new(workout));
                self.set_status("Workout created");
            }
            Err(e) => self.set_status(format!("Failed to create workout: {}", e)),
        }
        self.input.clear();
        Ok(())
    }

    fn open_editor(&mut self, editor: WorkoutEditor) {
        self.editor = Some(editor);
        self.screen = Screen::Workout;
        self.input_mode = InputMode::Normal;
        self.set_index = 0;
        self.form = AddSetForm::default();
    }

    /// Discard the editor and return to the calendar
    pub async fn back_to_calendar(&mut self, api: &ApiClient) -> Result<()> {
        self.editor = None;
        self.screen = Screen::Calendar;
        self.input_mode = InputMode::Normal;
        // Titles may have changed while editing
        self.load_month(api).await
    }

    // --- Workout screen ---

    /// Flattened (exercise id, set id) rows in display order
    pub fn set_rows(&self) -> Vec<(String, String)> {
        let Some(editor) = &self.editor else {
            return Vec::new();
        };

        editor
            .exercises()
            .iter()
            .flat_map(|group| {
                group
                    .sets
                    .iter()
                    .map(|set| (group.id.clone(), set.id.clone()))
            })
            .collect()
    }

    /// Clamp the set selection to the current row count
    pub fn clamp_set_index(&mut self) {
        let rows = self.set_rows().len();
        if rows == 0 {
            self.set_index = 0;
        } else if self.set_index >= rows {
            self.set_index = rows - 1;
        }
    }

    pub fn move_set_selection(&mut self, delta: i64) {
        let rows = self.set_rows().len();
        if rows == 0 {
            return;
        }
        let index = self.set_index as i64 + delta;
        self.set_index = index.clamp(0, rows as i64 - 1) as usize;
    }

    /// Submit the add-set form
    ///
    /// Invalid drafts are declined by the editor without a call; keep
    /// the field values either way so the next set is quick to log.
    pub async fn submit_add_set(&mut self, api: &ApiClient) -> Result<()> {
        let Some(editor) = &mut self.editor else {
            return Ok(());
        };
        if editor.is_busy() {
            return Ok(());
        }

        let draft = self.form.draft();
        match editor.add_set(api, &draft).await {
            Ok(true) => self.set_status("Set added"),
            Ok(false) => self.set_status("Exercise and positive reps required"),
            Err(e) => self.set_status(format!("Failed to add set: {}", e)),
        }
        Ok(())
    }

    /// Delete the selected set
    pub async fn delete_selected_set(&mut self, api: &ApiClient) -> Result<()> {
        let Some((exercise_id, set_id)) = self.set_rows().get(self.set_index).cloned() else {
            return Ok(());
        };
        let Some(editor) = &mut self.editor else {
            return Ok(());
        };
        if editor.is_busy() {
            return Ok(());
        }

        match editor.delete_set(api, &exercise_id, &set_id).await {
            Ok(()) => self.set_status("Set deleted"),
            Err(e) => self.set_status(format!("Failed to delete set: {}", e)),
        }
        self.clamp_set_index();
        Ok(())
    }

    /// Enter rename mode, seeding the input buffer
    pub fn begin_rename(&mut self) {
        if let Some(editor) = &mut self.editor {
            editor.begin_rename();
            self.input = editor.title_draft().to_string();
            self.input_mode = InputMode::Rename;
        }
    }

    /// Save the title from the input buffer
    pub async fn save_rename(&mut self, api: &ApiClient) -> Result<()> {
        let Some(editor) = &mut self.editor else {
            return Ok(());
        };
        if editor.is_busy() {
            return Ok(());
        }

        editor.set_title_draft(self.input.clone());
        match editor.save_title(api).await {
            Ok(()) => {
                self.input_mode = InputMode::Normal;
                self.set_status("Workout renamed");
            }
            Err(e) => self.set_status(format!("Failed to rename: {}", e)),
        }
        Ok(())
    }

    pub fn cancel_rename(&mut self) {
        if let Some(editor) = &mut self.editor {
            editor.cancel_rename();
        }
        self.input.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Delete the open workout after confirmation
    pub async fn delete_workout(&mut self, api: &ApiClient) -> Result<()> {
        let Some(editor) = &mut self.editor else {
            return Ok(());
        };
        if editor.is_busy() {
            return Ok(());
        }

        match editor.delete(api).await {
            Ok(()) => {
                self.set_status("Workout deleted");
                self.back_to_calendar(api).await?;
            }
            Err(e) => {
                self.input_mode = InputMode::Normal;
                self.set_status(format!("Failed to delete workout: {}", e));
            }
        }
        Ok(())
    }

    /// End the session and quit
    pub async fn logout(&mut self, api: &ApiClient) -> Result<()> {
        match api.logout().await {
            Ok(()) => {
                self.should_quit = true;
            }
            Err(e) => self.set_status(format!("Logout failed: {}", e)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn summary(id: &str, day: &str) -> WorkoutSummary {
        WorkoutSummary {
            id: id.to_string(),
            date: date(day),
            notes: None,
        }
    }

    #[test]
    fn test_new_starts_on_current_month() {
        let app = App::new(date("2024-03-15"));
        assert_eq!(app.month, date("2024-03-01"));
        assert_eq!(app.selected_day, date("2024-03-15"));
        assert_eq!(app.screen, Screen::Calendar);
    }

    #[test]
    fn test_workouts_on_day() {
        let mut app = App::new(date("2024-03-15"));
        app.summaries = vec![
            summary("w1", "2024-03-15"),
            summary("w2", "2024-03-16"),
            summary("w3", "2024-03-15"),
        ];

        let on_day = app.workouts_on(date("2024-03-15"));
        assert_eq!(on_day.len(), 2);
        assert_eq!(on_day[0].id, "w1");
        assert!(app.workouts_on(date("2024-03-01")).is_empty());
    }

    #[test]
    fn test_add_set_form_focus_cycle() {
        let mut form = AddSetForm::default();
        assert_eq!(form.focus, 0);

        for _ in 0..ADD_SET_FIELDS.len() {
            form.next_field();
        }
        assert_eq!(form.focus, 0);

        form.prev_field();
        assert_eq!(form.focus, ADD_SET_FIELDS.len() - 1);
    }

    #[test]
    fn test_add_set_form_draft() {
        let form = AddSetForm {
            exercise: "ex_squat".to_string(),
            reps: "5".to_string(),
            weight: "100".to_string(),
            rpe: String::new(),
            focus: 0,
        };

        let draft = form.draft();
        assert_eq!(draft.exercise_id, "ex_squat");
        assert_eq!(draft.reps, 5);
        assert_eq!(draft.weight, Some(100.0));
        assert!(draft.rpe.is_none());
        assert!(draft.is_valid());
    }

    #[test]
    fn test_set_selection_bounds() {
        let mut app = App::new(date("2024-03-15"));
        // No editor, no rows
        assert!(app.set_rows().is_empty());

        app.move_set_selection(1);
        assert_eq!(app.set_index, 0);

        app.set_index = 5;
        app.clamp_set_index();
        assert_eq!(app.set_index, 0);
    }
}
