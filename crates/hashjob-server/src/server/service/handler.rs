//! HTTP handlers for the hashing service.
//!
//! This module adapts the [`HashCoordinator`] API to the HTTP contract:
//!
//! - `POST /hash` - submit `password`, respond with the job ID as plain text.
//! - `GET /hash/{id}` - respond with base64 of the stored hex digest.
//! - `GET /stats` - respond with `{"total": .., "average": ..}`.
//!
//! Handlers never block on hashing; they only wait for the job store to answer.

use super::error::ApiError;
use crate::server::telemetry::{increment_lookups, increment_submissions};
use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    http::header,
    response::{IntoResponse, Response},
};
use hashjob::{HashCoordinator, JobId, digest::encode_for_wire};
use serde::Deserialize;

/// State shared by all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub coordinator: HashCoordinator,
}

impl AppState {
    pub fn new(coordinator: HashCoordinator) -> Self {
        Self { coordinator }
    }
}

#[derive(Debug, Deserialize)]
pub struct HashForm {
    #[serde(default)]
    password: Option<String>,
}

/// `POST /hash`
///
/// Responds with the decimal job ID and no trailing newline. A missing or
/// empty `password`, or a body that is not a urlencoded form, is a 400.
#[cfg_attr(feature = "tracing", tracing::instrument(name = "submit_hash", skip_all))]
pub async fn submit_hash(
    State(state): State<AppState>,
    form: Result<Form<HashForm>, FormRejection>,
) -> Result<String, ApiError> {
    let password = match form {
        Ok(Form(HashForm {
            password: Some(password),
        })) if !password.is_empty() => password,
        _ => return Err(ApiError::BadRequest("Bad Request")),
    };

    let id = state.coordinator.submit(password).await?;
    increment_submissions();

    #[cfg(feature = "tracing")]
    tracing::debug!("Accepted job {}", id);

    Ok(id.to_string())
}

/// `GET /hash/{id}`
///
/// `{id}` must parse as an integer. Pending and unknown IDs both yield 404.
#[cfg_attr(feature = "tracing", tracing::instrument(name = "get_hash", skip_all))]
pub async fn get_hash(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<String, ApiError> {
    let id: JobId = raw_id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid Job ID"))?;

    let digest = state.coordinator.lookup(id).await?;
    increment_lookups(digest.is_some());

    digest
        .map(|hex_digest| encode_for_wire(&hex_digest))
        .ok_or(ApiError::NotFound)
}

/// `GET /hash` and `GET /hash/`: a lookup without a job ID.
pub async fn missing_job_id() -> ApiError {
    ApiError::BadRequest("Invalid Job ID")
}

/// `GET /stats`
///
/// Responds with the statistics as a JSON object; a serialization failure is a
/// 500.
#[cfg_attr(feature = "tracing", tracing::instrument(name = "get_stats", skip_all))]
pub async fn get_stats(State(state): State<AppState>) -> Result<Response, ApiError> {
    let stats = state.coordinator.stats().await?;
    let body = serde_json::to_string(&stats)
        .map_err(|e| ApiError::Internal(format!("Unable to get statistics: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
