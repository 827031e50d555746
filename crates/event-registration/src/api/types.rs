//! API request and response types.

use crate::registry::{Registration, RegistrationStats};
use serde::{Deserialize, Serialize};

/// Admin login body.
///
/// Both fields are optional so a partial body is a credential mismatch
/// rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response after a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
}

/// Response after a successful admin login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
}

/// Admin listing of all registrations.
#[derive(Debug, Serialize)]
pub struct RegistrationsResponse {
    pub registrations: Vec<Registration>,
    pub stats: RegistrationStats,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub registration_count: usize,
}
