//! HTTP request handlers.

use super::types::{
    HealthResponse, LoginRequest, LoginResponse, RegisterResponse, RegistrationsResponse,
};
use super::AppState;
use crate::error::{ApiError, FieldViolation};
use crate::registry::Registration;
use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_DISPOSITION},
        HeaderMap,
    },
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::info;

/// Message returned on a successful registration.
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Anmeldung erfolgreich!";

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registrations = state.service.list().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        registration_count: registrations.len(),
    })
}

/// Public registration endpoint.
///
/// The body is taken as raw bytes so that malformed JSON still yields the
/// JSON error envelope instead of the framework's plain-text rejection.
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RegisterResponse>, ApiError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|_| {
        ApiError::Validation(vec![FieldViolation::new("body", "must be valid JSON")])
    })?;

    let record = state.service.register(&payload).await?;
    info!(id = %record.id, "Registration accepted");

    Ok(Json(RegisterResponse {
        success: true,
        message: REGISTRATION_SUCCESS_MESSAGE.to_string(),
    }))
}

/// Admin login: checks `{username, password}` from the body.
pub async fn admin_login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    let request: LoginRequest = serde_json::from_slice(&body).unwrap_or_default();

    state
        .gate
        .login(request.username.as_deref(), request.password.as_deref())?;
    info!("Admin login succeeded");

    Ok(Json(LoginResponse { success: true }))
}

/// Admin listing with summary statistics.
pub async fn list_registrations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RegistrationsResponse>, ApiError> {
    state
        .gate
        .authorize_header(authorization(&headers).as_deref())?;

    let (registrations, stats) = state.service.list_with_stats().await;

    Ok(Json(RegistrationsResponse {
        registrations,
        stats,
    }))
}

/// Admin export: the raw list of records as a JSON attachment.
pub async fn export_registrations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    state
        .gate
        .authorize_header(authorization(&headers).as_deref())?;

    let registrations: Vec<Registration> = state.service.list().await;
    info!(count = registrations.len(), "Registrations exported");

    Ok((
        [(
            CONTENT_DISPOSITION,
            "attachment; filename=\"registrations.json\"",
        )],
        Json(registrations),
    ))
}

/// Decode the `Authorization` header value.
///
/// Header bytes are not limited to ASCII: UTF-8 is tried first, anything else
/// is read as latin-1, which is what browsers send for non-ASCII credentials.
fn authorization(headers: &HeaderMap) -> Option<String> {
    let bytes = headers.get(AUTHORIZATION)?.as_bytes();

    match std::str::from_utf8(bytes) {
        Ok(value) => Some(value.to_string()),
        Err(_) => Some(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}
