//! liftlog core library
//!
//! Client-side core for liftlog, a workout tracker backed by a remote
//! HTTP API with cookie-based sessions. The server is the sole
//! authority on data; this crate holds the typed API client and the
//! optimistic in-memory model the views edit through.
//!
//! # Architecture
//!
//! - `api`: authenticated HTTP wrapper with typed failures
//! - `editor`: per-workout optimistic state model (exercise groupings,
//!   busy flag, reconciliation with server-confirmed results)
//! - `session`: persisted session cookie, loaded into the client's jar
//! - `config`: API origin and local paths
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let api = ApiClient::new(&config)?;
//!
//! let workout = api.get_workout("w1").await?;
//! let mut editor = WorkoutEditor::new(workout);
//! editor.add_set(&api, &SetDraft::new("ex_squat", 5)).await?;
//! ```

pub mod api;
pub mod config;
pub mod editor;
pub mod models;
pub mod session;

pub use api::{ApiClient, ApiError, ApiResult, WorkoutApi};
pub use config::Config;
pub use editor::WorkoutEditor;
pub use models::{ExerciseGroup, SetDraft, Workout, WorkoutSet, WorkoutSummary};
pub use session::SessionStore;
