//! HTTP client implementation
//!
//! One reqwest client with a cookie jar per [`ApiClient`]. The jar is
//! seeded from the persisted session file at construction, so every
//! request forwards the session cookie the way a browser would.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, Url};
use serde_json::json;
use tracing::{debug, warn};

use super::error::{ApiError, ApiResult, BODY_EXCERPT_LEN};
use super::WorkoutApi;
use crate::config::Config;
use crate::models::{SetDraft, Workout, WorkoutSet, WorkoutSummary};
use crate::session::SessionStore;

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 10;

/// Client for the workout API
pub struct ApiClient {
    http: Client,
    /// API origin without trailing slash
    base: String,
    /// Parsed origin, used for jar operations
    base_url: Url,
    jar: Arc<Jar>,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client for the configured API origin
    ///
    /// Loads any persisted session cookies into the jar.
    pub fn new(config: &Config) -> Result<Self> {
        let base = config.api_url.trim_end_matches('/').to_string();
        let base_url = Url::parse(&base)
            .with_context(|| format!("Invalid API URL: {}", config.api_url))?;

        let session = SessionStore::new(config);
        let jar = Arc::new(Jar::default());
        for cookie in session.load() {
            jar.add_cookie_str(&cookie, &base_url);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .cookie_provider(jar.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base,
            base_url,
            jar,
            session,
        })
    }

    /// Register a new account
    ///
    /// On success the server sets the session cookie, which is persisted
    /// for later invocations. Validation failures arrive as an
    /// `{"errors": [...]}` body; see [`ApiError::messages`].
    pub async fn register(&self, email: &str, password: &str) -> ApiResult<()> {
        debug!("POST /v1/auth/register");
        let resp = self
            .http
            .post(self.url("/v1/auth/register"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        check(resp).await?;
        self.persist_session();
        Ok(())
    }

    /// Probe the current session
    ///
    /// Succeeds when authenticated; a 401 surfaces as
    /// `ApiError::Http { status: 401, .. }`.
    pub async fn me(&self) -> ApiResult<()> {
        debug!("GET /v1/auth/me");
        let resp = self.http.get(self.url("/v1/auth/me")).send().await?;
        check(resp).await?;
        Ok(())
    }

    /// Terminate the session
    ///
    /// The persisted session file is removed on success.
    pub async fn logout(&self) -> ApiResult<()> {
        debug!("POST /v1/auth/logout");
        let resp = self.http.post(self.url("/v1/auth/logout")).send().await?;
        check(resp).await?;

        if let Err(e) = self.session.clear() {
            warn!("Failed to clear persisted session: {}", e);
        }
        Ok(())
    }

    /// List workout summaries in an inclusive date range
    pub async fn list_workouts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<Vec<WorkoutSummary>> {
        debug!("GET /v1/workouts?from={}&to={}", from, to);
        let resp = self
            .http
            .get(self.url("/v1/workouts"))
            .query(&[("from", from.to_string()), ("to", to.to_string())])
            .send()
            .await?;

        Ok(check(resp).await?.json().await?)
    }

    /// Create a workout on a date, optionally with notes
    pub async fn create_workout(
        &self,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> ApiResult<Workout> {
        debug!("POST /v1/workouts date={}", date);
        let mut payload = json!({ "date": date });
        if let Some(notes) = notes {
            payload["notes"] = json!(notes);
        }

        let resp = self
            .http
            .post(self.url("/v1/workouts"))
            .json(&payload)
            .send()
            .await?;

        Ok(check(resp).await?.json().await?)
    }

    /// Fetch one workout with its nested exercises and sets
    pub async fn get_workout(&self, id: &str) -> ApiResult<Workout> {
        debug!("GET /v1/workouts/{}", id);
        let resp = self
            .http
            .get(self.url(&format!("/v1/workouts/{}", id)))
            .send()
            .await?;

        Ok(check(resp).await?.json().await?)
    }

    /// Update a workout's notes, returning the updated record
    ///
    /// The server may normalize the value further; callers should adopt
    /// the returned notes, not the sent draft.
    pub async fn rename_workout(&self, id: &str, notes: &str) -> ApiResult<Workout> {
        debug!("PATCH /v1/workouts/{}", id);
        let resp = self
            .http
            .patch(self.url(&format!("/v1/workouts/{}", id)))
            .json(&json!({ "notes": notes }))
            .send()
            .await?;

        Ok(check(resp).await?.json().await?)
    }

    /// Delete a workout; the server cascades deletion of its sets
    pub async fn delete_workout(&self, id: &str) -> ApiResult<()> {
        debug!("DELETE /v1/workouts/{}", id);
        let resp = self
            .http
            .delete(self.url(&format!("/v1/workouts/{}", id)))
            .send()
            .await?;

        check(resp).await?;
        Ok(())
    }

    /// Create a set within a workout; the server assigns the id
    pub async fn create_set(&self, workout_id: &str, draft: &SetDraft) -> ApiResult<WorkoutSet> {
        debug!("POST /v1/workouts/{}/sets", workout_id);
        let resp = self
            .http
            .post(self.url(&format!("/v1/workouts/{}/sets", workout_id)))
            .json(draft)
            .send()
            .await?;

        Ok(check(resp).await?.json().await?)
    }

    /// Delete a set by id
    pub async fn delete_set(&self, set_id: &str) -> ApiResult<()> {
        debug!("DELETE /v1/sets/{}", set_id);
        let resp = self
            .http
            .delete(self.url(&format!("/v1/sets/{}", set_id)))
            .send()
            .await?;

        check(resp).await?;
        Ok(())
    }

    /// Build a full URL from an API path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Write the jar's current cookies to the session file
    fn persist_session(&self) {
        let Some(header) = self.jar.cookies(&self.base_url) else {
            return;
        };
        let Ok(value) = header.to_str() else {
            return;
        };

        let cookies: Vec<String> = value.split("; ").map(String::from).collect();
        if let Err(e) = self.session.save(&cookies) {
            warn!("Failed to persist session: {}", e);
        }
    }
}

impl WorkoutApi for ApiClient {
    async fn create_set(&self, workout_id: &str, draft: &SetDraft) -> ApiResult<WorkoutSet> {
        ApiClient::create_set(self, workout_id, draft).await
    }

    async fn delete_set(&self, set_id: &str) -> ApiResult<()> {
        ApiClient::delete_set(self, set_id).await
    }

    async fn rename_workout(&self, workout_id: &str, notes: &str) -> ApiResult<Workout> {
        ApiClient::rename_workout(self, workout_id, notes).await
    }

    async fn delete_workout(&self, workout_id: &str) -> ApiResult<()> {
        ApiClient::delete_workout(self, workout_id).await
    }
}

/// Turn a non-2xx response into `ApiError::Http` with a body excerpt
async fn check(resp: Response) -> ApiResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Http {
        status: status.as_u16(),
        body: excerpt(body),
    })
}

/// Cap a body string at the excerpt length, on a character boundary
fn excerpt(body: String) -> String {
    if body.len() <= BODY_EXCERPT_LEN {
        return body;
    }
    body.chars().take(BODY_EXCERPT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response, returning the server's origin
    async fn spawn_stub(status_line: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 8192];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    fn test_config(api_url: String, dir: &tempfile::TempDir) -> Config {
        Config {
            api_url,
            data_dir: dir.path().to_path_buf(),
            log_file: None,
        }
    }

    #[tokio::test]
    async fn test_create_set_success() {
        let origin = spawn_stub(
            "200 OK",
            r#"{"id": "s9", "exerciseId": "ex_squat", "reps": 5, "weight": 100.0}"#,
        )
        .await;
        let tmp = tempfile::tempdir().unwrap();
        let client = ApiClient::new(&test_config(origin, &tmp)).unwrap();

        let draft = SetDraft::new("ex_squat", 5).with_weight(100.0);
        let set = client.create_set("w1", &draft).await.unwrap();

        assert_eq!(set.id, "s9");
        assert_eq!(set.exercise_id, "ex_squat");
        assert_eq!(set.reps, 5);
        assert_eq!(set.weight, Some(100.0));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_http_error() {
        let origin = spawn_stub("404 Not Found", "").await;
        let tmp = tempfile::tempdir().unwrap();
        let client = ApiClient::new(&test_config(origin, &tmp)).unwrap();

        let err = client.get_workout("missing").await.unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 404);
                assert!(body.is_empty());
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_carries_body_excerpt() {
        let origin = spawn_stub("422 Unprocessable Entity", "reps must be positive").await;
        let tmp = tempfile::tempdir().unwrap();
        let client = ApiClient::new(&test_config(origin, &tmp)).unwrap();

        let err = client
            .create_workout("2024-03-01".parse().unwrap(), None)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "HTTP 422: reps must be positive");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let tmp = tempfile::tempdir().unwrap();
        let client = ApiClient::new(&test_config(format!("http://{}", addr), &tmp)).unwrap();

        let err = client.me().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_invalid_base_url_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config("not a url".to_string(), &tmp);
        assert!(ApiClient::new(&config).is_err());
    }

    #[test]
    fn test_excerpt_caps_length() {
        let long = "x".repeat(BODY_EXCERPT_LEN * 2);
        assert_eq!(excerpt(long).len(), BODY_EXCERPT_LEN);

        let short = "short".to_string();
        assert_eq!(excerpt(short), "short");
    }
}
