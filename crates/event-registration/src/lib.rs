//! Event Registration - minimal registration backend.
//!
//! Accepts public registrations for an event, keeps them in a single JSON
//! document and exposes credential-gated admin endpoints to list and export
//! them:
//! - `POST /api/register` appends a validated registration
//! - `POST /api/admin/login` checks admin credentials
//! - `GET /api/admin/registrations` lists registrations with totals
//! - `GET /api/admin/export` returns the raw registration list

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod registry;

pub use auth::{AdminCredentials, AdminGate};
pub use config::Config;
pub use error::ApiError;
pub use registry::{Registration, RegistrationService, RegistrationStats, Store};
