//! Parsing of untrusted registration payloads.

use crate::error::{ApiError, FieldViolation};
use serde_json::{Map, Value};
use std::num::IntErrorKind;

/// Upper bound on `participants` for a single registration.
pub const MAX_PARTICIPANTS: i64 = 1_000;

/// A registration submission that passed schema checks.
///
/// Text fields are trimmed; `comments` defaults to an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub participants: i64,
    pub comments: String,
}

impl Submission {
    /// Validate a raw JSON payload.
    ///
    /// Missing or mistyped fields are collected and returned together as
    /// [`ApiError::Validation`]. `participants` must lie in
    /// `1..=MAX_PARTICIPANTS`; a value that cannot be coerced to an integer at
    /// all maps to [`ApiError::Persistence`], matching the registration
    /// endpoint contract.
    pub fn parse(payload: &Value) -> Result<Self, ApiError> {
        let Some(fields) = payload.as_object() else {
            return Err(ApiError::Validation(vec![FieldViolation::new(
                "body",
                "must be a JSON object",
            )]));
        };

        let mut violations = Vec::new();

        let name = required_text(fields, "name", &mut violations);
        let email = required_text(fields, "email", &mut violations);
        let phone = required_text(fields, "phone", &mut violations);

        let participants = match fields.get("participants") {
            None | Some(Value::Null) => {
                violations.push(FieldViolation::new("participants", "is required"));
                None
            }
            Some(value) => Some(coerce_participants(value)),
        };

        let comments = match fields.get("comments") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(_) => {
                violations.push(FieldViolation::new("comments", "must be a string"));
                String::new()
            }
        };

        let participants = match participants {
            Some(Ok(n)) if n < 1 => {
                violations.push(FieldViolation::new("participants", "must be at least 1"));
                None
            }
            Some(Ok(n)) if n > MAX_PARTICIPANTS => {
                violations.push(FieldViolation::new(
                    "participants",
                    format!("must be at most {}", MAX_PARTICIPANTS),
                ));
                None
            }
            Some(Ok(n)) => Some(n),
            Some(Err(e)) if violations.is_empty() => return Err(e),
            _ => None,
        };

        match (name, email, phone, participants) {
            (Some(name), Some(email), Some(phone), Some(participants)) if violations.is_empty() => {
                Ok(Self {
                    name,
                    email,
                    phone,
                    participants,
                    comments,
                })
            }
            _ => Err(ApiError::Validation(violations)),
        }
    }
}

fn required_text(
    fields: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match fields.get(field) {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(field, "is required"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            violations.push(FieldViolation::new(field, "must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            violations.push(FieldViolation::new(field, "must be a string"));
            None
        }
    }
}

/// Coerce `participants` to an integer.
///
/// Follows integer-conversion semantics: JSON numbers are truncated toward
/// zero (`2.5` becomes 2), booleans count as 1 and 0, and strings must hold
/// an integer with optional surrounding whitespace. Out-of-range values
/// saturate so the range check rejects them instead of the coercion.
fn coerce_participants(value: &Value) -> Result<i64, ApiError> {
    let coerced = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(n) => Some(n),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Some(i64::MAX),
                IntErrorKind::NegOverflow => Some(i64::MIN),
                _ => None,
            },
        },
        _ => None,
    };

    coerced.ok_or_else(|| {
        ApiError::Persistence(format!("participants not coercible to integer: {}", value))
    })
}
