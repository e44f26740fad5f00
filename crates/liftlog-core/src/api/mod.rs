//! Typed client for the workout API
//!
//! Translates domain operations into authenticated HTTP requests and
//! typed results. The client mutates no local state; applying results
//! is the caller's job (see [`crate::editor`]).

mod client;
mod error;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};

use crate::models::{SetDraft, Workout, WorkoutSet};

/// The mutating operations the workout editor depends on
///
/// Abstracted so the editor's reconciliation logic can be exercised
/// without a network.
#[allow(async_fn_in_trait)]
pub trait WorkoutApi {
    /// Create a set within a workout; the server assigns the id
    async fn create_set(&self, workout_id: &str, draft: &SetDraft) -> ApiResult<WorkoutSet>;

    /// Delete a set by id
    async fn delete_set(&self, set_id: &str) -> ApiResult<()>;

    /// Update a workout's notes, returning the updated record
    async fn rename_workout(&self, workout_id: &str, notes: &str) -> ApiResult<Workout>;

    /// Delete a workout; the server cascades deletion of its sets
    async fn delete_workout(&self, workout_id: &str) -> ApiResult<()>;
}
