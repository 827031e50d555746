//! Registration records with flat-file persistence.

mod service;
mod store;
mod submission;

pub use service::RegistrationService;
pub use store::{FileStore, MemoryStore, Store};
pub use submission::{Submission, MAX_PARTICIPANTS};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Format of the record id: local time down to microseconds, digits only.
const ID_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// Format of the record timestamp (ISO-8601, local time, no offset).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A single event registration.
///
/// Records are immutable once stored. Field order matches the persisted
/// document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Creation time as a 20-digit string, unique within the store
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Number of people covered by this registration
    pub participants: i64,
    #[serde(default)]
    pub comments: String,
    /// ISO-8601 creation time, stamped server-side
    pub timestamp: String,
}

impl Registration {
    /// Build a record from a validated submission, stamped with `now`.
    ///
    /// The id is derived from `now` and bumped until it does not collide with
    /// any id in `existing`.
    pub fn stamp(submission: Submission, now: DateTime<Local>, existing: &[Registration]) -> Self {
        let candidate = now.format(ID_FORMAT).to_string();

        Self {
            id: unique_id(candidate, existing),
            name: submission.name,
            email: submission.email,
            phone: submission.phone,
            participants: submission.participants,
            comments: submission.comments,
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

fn unique_id(candidate: String, existing: &[Registration]) -> String {
    let taken = |id: &str| existing.iter().any(|r| r.id == id);
    if !taken(&candidate) {
        return candidate;
    }

    // Ids are all-digit, so collisions are resolved numerically.
    let Ok(mut n) = candidate.parse::<u128>() else {
        let mut suffix = 1u32;
        loop {
            let id = format!("{}-{}", candidate, suffix);
            if !taken(&id) {
                return id;
            }
            suffix += 1;
        }
    };

    loop {
        n += 1;
        let id = format!("{:0width$}", n, width = candidate.len());
        if !taken(&id) {
            return id;
        }
    }
}

/// Summary statistics over the stored registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrationStats {
    pub total_registrations: usize,
    pub total_participants: i64,
}

impl RegistrationStats {
    pub fn from_records(records: &[Registration]) -> Self {
        Self {
            total_registrations: records.len(),
            // Stored documents are not bounded like new submissions.
            total_participants: records
                .iter()
                .fold(0i64, |total, r| total.saturating_add(r.participants)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission() -> Submission {
        Submission {
            name: "Anna".into(),
            email: "a@x.com".into(),
            phone: "123".into(),
            participants: 2,
            comments: String::new(),
        }
    }

    fn fixed_now() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 15)
            .unwrap()
    }

    #[test]
    fn test_stamp_formats_id_and_timestamp() {
        let record = Registration::stamp(submission(), fixed_now(), &[]);

        assert_eq!(record.id, "20240501093015000000");
        assert_eq!(record.timestamp, "2024-05-01T09:30:15.000000");
        assert_eq!(record.participants, 2);
        assert_eq!(record.comments, "");
    }

    #[test]
    fn test_stamp_bumps_colliding_id() {
        let first = Registration::stamp(submission(), fixed_now(), &[]);
        let second = Registration::stamp(submission(), fixed_now(), &[first.clone()]);
        let third =
            Registration::stamp(submission(), fixed_now(), &[first.clone(), second.clone()]);

        assert_eq!(second.id, "20240501093015000001");
        assert_eq!(third.id, "20240501093015000002");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_unique_id_with_non_numeric_existing() {
        let mut existing = Registration::stamp(submission(), fixed_now(), &[]);
        existing.id = "legacy".into();

        assert_eq!(unique_id("legacy".into(), &[existing]), "legacy-1");
    }

    #[test]
    fn test_stats() {
        let mut a = Registration::stamp(submission(), fixed_now(), &[]);
        a.participants = 3;
        let mut b = Registration::stamp(submission(), fixed_now(), &[a.clone()]);
        b.participants = 4;

        let stats = RegistrationStats::from_records(&[a, b]);
        assert_eq!(stats.total_registrations, 2);
        assert_eq!(stats.total_participants, 7);

        let empty = RegistrationStats::from_records(&[]);
        assert_eq!(empty.total_registrations, 0);
        assert_eq!(empty.total_participants, 0);
    }

    #[test]
    fn test_stats_saturate_instead_of_overflowing() {
        let mut a = Registration::stamp(submission(), fixed_now(), &[]);
        a.participants = i64::MAX;
        let mut b = Registration::stamp(submission(), fixed_now(), &[a.clone()]);
        b.participants = i64::MAX;

        let stats = RegistrationStats::from_records(&[a, b]);
        assert_eq!(stats.total_registrations, 2);
        assert_eq!(stats.total_participants, i64::MAX);
    }

    #[test]
    fn test_record_serialization_field_order() {
        let record = Registration::stamp(submission(), fixed_now(), &[]);
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.starts_with(r#"{"id":"20240501093015000000","name":"Anna""#));
        assert!(json.ends_with(r#""timestamp":"2024-05-01T09:30:15.000000"}"#));
    }
}
