//! Registration service: turns submissions into stored records.

use super::{Registration, RegistrationStats, Store, Submission};
use crate::error::ApiError;
use chrono::Local;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// Accepts registrations and appends them to the store.
///
/// Appends are serialized through a single writer lock so that concurrent
/// submissions cannot lose each other's records between load and save.
pub struct RegistrationService {
    store: Arc<Store>,
    write_lock: Mutex<()>,
}

impl RegistrationService {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Validate an untrusted payload and append it as a new record.
    #[instrument(skip_all)]
    pub async fn register(&self, payload: &Value) -> Result<Registration, ApiError> {
        let submission = Submission::parse(payload).map_err(|e| {
            warn!("Rejected registration: {}", e);
            e
        })?;

        let _guard = self.write_lock.lock().await;

        let mut records = self.store.load().await;
        let record = Registration::stamp(submission, Local::now(), &records);
        records.push(record.clone());
        self.store.save(&records).await?;

        info!(
            id = %record.id,
            participants = record.participants,
            total = records.len(),
            "Registration stored"
        );
        Ok(record)
    }

    /// All stored registrations, in insertion order.
    pub async fn list(&self) -> Vec<Registration> {
        self.store.load().await
    }

    /// All stored registrations together with summary statistics.
    pub async fn list_with_stats(&self) -> (Vec<Registration>, RegistrationStats) {
        let records = self.list().await;
        let stats = RegistrationStats::from_records(&records);
        (records, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn payload(name: &str) -> Value {
        json!({
            "name": name,
            "email": "a@x.com",
            "phone": "123",
            "participants": "2",
            "comments": ""
        })
    }

    fn service() -> RegistrationService {
        RegistrationService::new(Arc::new(Store::memory()))
    }

    #[tokio::test]
    async fn test_register_appends_record() {
        let service = service();

        let record = service.register(&payload("Anna")).await.unwrap();

        let records = service.list().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], record);
        assert_eq!(record.participants, 2);
    }

    #[tokio::test]
    async fn test_invalid_submission_leaves_store_untouched() {
        let service = service();
        service.register(&payload("Anna")).await.unwrap();

        let mut missing_phone = payload("Ben");
        missing_phone.as_object_mut().unwrap().remove("phone");
        let err = service.register(&missing_phone).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(service.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_are_not_lost() {
        let service = Arc::new(service());

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.register(&payload(&format!("Gast {}", i))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let records = service.list().await;
        assert_eq!(records.len(), 20);

        let ids: HashSet<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn test_list_with_stats() {
        let service = service();
        service.register(&payload("Anna")).await.unwrap();
        let mut four = payload("Ben");
        four["participants"] = json!(4);
        service.register(&four).await.unwrap();

        let (records, stats) = service.list_with_stats().await;
        assert_eq!(records.len(), 2);
        assert_eq!(stats.total_registrations, 2);
        assert_eq!(stats.total_participants, 6);
    }
}
