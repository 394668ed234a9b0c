use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::IncidentConfig;
use crate::features::incidents::dtos::{IncidentInputDto, IncidentResponseDto};
use crate::features::incidents::error::{IncidentError, Result};
use crate::features::incidents::models::NewIncident;
use crate::features::incidents::ownership::require_owner;
use crate::features::incidents::stores::IncidentStore;
use crate::features::incidents::validation::validate_incident;

/// Service for the incident lifecycle.
///
/// Each call runs validation, then the owner gate where required, then a
/// single store operation bounded by the configured deadline.
pub struct IncidentService {
    store: Arc<dyn IncidentStore>,
    operation_timeout: Duration,
}

impl std::fmt::Debug for IncidentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncidentService")
            .field("store", &"<dyn IncidentStore>")
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

impl IncidentService {
    pub fn new(store: Arc<dyn IncidentStore>, config: &IncidentConfig) -> Self {
        Self {
            store,
            operation_timeout: config.operation_timeout,
        }
    }

    async fn within_deadline<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "Incident {} timed out after {:?}",
                    operation,
                    self.operation_timeout
                );
                Err(IncidentError::Timeout(self.operation_timeout))
            }
        }
    }

    /// List all incidents, newest first
    pub async fn list(&self) -> Result<Vec<IncidentResponseDto>> {
        let incidents = self.within_deadline("list", self.store.list()).await?;
        Ok(incidents.into_iter().map(|i| i.into()).collect())
    }

    /// Create an incident owned by the caller
    pub async fn create(
        &self,
        owner: Option<&str>,
        input: IncidentInputDto,
    ) -> Result<IncidentResponseDto> {
        let fields = validate_incident(input)?;
        let owner = require_owner(owner)?;
        let owner_hint = owner.redacted();

        let incident = self
            .within_deadline("create", self.store.create(NewIncident { fields, owner }))
            .await?;

        tracing::info!(
            "Incident created: id={}, category={}, owner={}",
            incident.id,
            incident.category,
            owner_hint
        );

        Ok(incident.into())
    }

    /// Replace the mutable fields of an incident. Not owner-gated.
    pub async fn update(&self, id: i64, input: IncidentInputDto) -> Result<IncidentResponseDto> {
        let changes = validate_incident(input)?;

        let incident = self
            .within_deadline("update", self.store.update(id, changes))
            .await?;

        tracing::info!("Incident updated: id={}, status={}", incident.id, incident.status);

        Ok(incident.into())
    }

    /// Delete an incident if the caller owns it
    pub async fn delete(&self, id: i64, owner: Option<&str>) -> Result<()> {
        let owner = require_owner(owner)?;

        let removed = self
            .within_deadline("delete", self.store.delete(id, &owner))
            .await?;

        if removed == 0 {
            tracing::warn!(
                "Incident delete rejected: id={}, owner={}",
                id,
                owner.redacted()
            );
            return Err(IncidentError::Forbidden(id));
        }

        tracing::info!("Incident deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::incidents::models::{Incident, IncidentChanges, IncidentStatus};
    use crate::features::incidents::ownership::OwnerId;
    use crate::features::incidents::stores::InMemoryIncidentStore;
    use async_trait::async_trait;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    fn service_with_store() -> (IncidentService, Arc<InMemoryIncidentStore>) {
        let store = Arc::new(InMemoryIncidentStore::new());
        let service = IncidentService::new(store.clone(), &IncidentConfig::default());
        (service, store)
    }

    fn input(title: &str, category: &str, status: &str) -> IncidentInputDto {
        IncidentInputDto {
            title: title.to_string(),
            description: String::new(),
            category: category.to_string(),
            status: status.to_string(),
        }
    }

    fn random_input() -> IncidentInputDto {
        let mut payload = input(&Sentence(3..6).fake::<String>(), "Maintenance", "Open");
        payload.description = Sentence(5..12).fake();
        payload
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (service, _) = service_with_store();
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let (service, _) = service_with_store();

        let mut last_id = 0;
        for _ in 0..5 {
            let created = service.create(Some("alice"), random_input()).await.unwrap();
            assert!(created.id > last_id);
            assert_eq!(created.created_at, created.updated_at);
            last_id = created.id;
        }
    }

    #[tokio::test]
    async fn test_create_without_owner_writes_nothing() {
        let (service, store) = service_with_store();

        for owner in [None, Some("")] {
            let result = service.create(owner, random_input()).await;
            assert!(matches!(result, Err(IncidentError::MissingOwner)));
        }

        assert_eq!(store.row_count(), 0);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_store() {
        let (service, store) = service_with_store();
        let created = service
            .create(Some("alice"), input("Broken rail", "Safety", "Open"))
            .await
            .unwrap();
        let calls_before = store.calls();

        let cases = [
            (input("ab", "Safety", "Open"), "title"),
            (input("Broken rail", "Fire", "Open"), "category"),
            (input("Broken rail", "Safety", "Closed"), "status"),
        ];

        for (payload, field) in cases {
            let create = service.create(Some("alice"), payload.clone()).await;
            let update = service.update(created.id, payload).await;

            match field {
                "title" => {
                    assert!(matches!(create, Err(IncidentError::TitleTooShort)));
                    assert!(matches!(update, Err(IncidentError::TitleTooShort)));
                }
                "category" => {
                    assert!(matches!(create, Err(IncidentError::InvalidCategory(_))));
                    assert!(matches!(update, Err(IncidentError::InvalidCategory(_))));
                }
                _ => {
                    assert!(matches!(create, Err(IncidentError::InvalidStatus(_))));
                    assert!(matches!(update, Err(IncidentError::InvalidStatus(_))));
                }
            }
        }

        assert_eq!(store.calls(), calls_before);
        assert_eq!(store.row_count(), 1);
        assert_eq!(store.get(created.id).unwrap().title, "Broken rail");
    }

    #[tokio::test]
    async fn test_validation_checked_before_owner() {
        let (service, _) = service_with_store();
        let result = service.create(None, input("ab", "Safety", "Open")).await;
        assert!(matches!(result, Err(IncidentError::TitleTooShort)));
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let (service, _) = service_with_store();
        let result = service.update(42, random_input()).await;
        assert!(matches!(result, Err(IncidentError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_update_keeps_identity_and_owner() {
        let (service, store) = service_with_store();
        let created = service.create(Some("alice"), random_input()).await.unwrap();

        let updated = service
            .update(created.id, input("Rewired panel", "Safety", "In Progress"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.title, "Rewired panel");
        assert_eq!(updated.status, IncidentStatus::InProgress);
        assert_eq!(store.get(created.id).unwrap().owner_id, "alice");
    }

    #[tokio::test]
    async fn test_update_is_not_owner_gated() {
        let (service, _) = service_with_store();
        let created = service.create(Some("alice"), random_input()).await.unwrap();

        // any status may follow any other
        for status in ["Success", "Open", "In Progress", "Success"] {
            let updated = service
                .update(created.id, input("Still broken", "Maintenance", status))
                .await
                .unwrap();
            assert_eq!(updated.status.as_str(), status);
        }
    }

    #[tokio::test]
    async fn test_delete_by_owner_then_again() {
        let (service, store) = service_with_store();
        let created = service.create(Some("alice"), random_input()).await.unwrap();

        service.delete(created.id, Some("alice")).await.unwrap();
        assert_eq!(store.row_count(), 0);

        let again = service.delete(created.id, Some("alice")).await;
        assert!(matches!(again, Err(IncidentError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_by_other_owner_keeps_row() {
        let (service, store) = service_with_store();
        let created = service.create(Some("alice"), random_input()).await.unwrap();

        let result = service.delete(created.id, Some("bob")).await;
        assert!(matches!(result, Err(IncidentError::Forbidden(_))));
        assert!(store.get(created.id).is_some());
    }

    #[tokio::test]
    async fn test_delete_without_owner() {
        let (service, store) = service_with_store();
        let created = service.create(Some("alice"), random_input()).await.unwrap();
        let calls_before = store.calls();

        let result = service.delete(created.id, None).await;
        assert!(matches!(result, Err(IncidentError::MissingOwner)));
        assert_eq!(store.calls(), calls_before);
        assert_eq!(store.row_count(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (service, _) = service_with_store();
        for title in ["Incident A", "Incident B", "Incident C"] {
            service
                .create(Some("alice"), input(title, "Safety", "Open"))
                .await
                .unwrap();
        }

        let titles: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["Incident C", "Incident B", "Incident A"]);
    }

    #[tokio::test]
    async fn test_spill_scenario() {
        let (service, store) = service_with_store();

        let created = service
            .create(Some("alice"), input("Spill in bay 3", "Safety", "Open"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let updated = service
            .update(1, input("Spill in bay 3 - cleaned", "Safety", "Success"))
            .await
            .unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(updated.status, IncidentStatus::Success);

        assert!(matches!(
            service.delete(1, Some("bob")).await,
            Err(IncidentError::Forbidden(1))
        ));
        service.delete(1, Some("alice")).await.unwrap();
        assert_eq!(store.row_count(), 0);
    }

    struct SlowStore;

    #[async_trait]
    impl IncidentStore for SlowStore {
        async fn list(&self) -> Result<Vec<Incident>> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(Vec::new())
        }

        async fn create(&self, _incident: NewIncident) -> Result<Incident> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Err(IncidentError::StoreUnavailable(sqlx::Error::PoolClosed))
        }

        async fn update(&self, id: i64, _changes: IncidentChanges) -> Result<Incident> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Err(IncidentError::NotFound(id))
        }

        async fn delete(&self, _id: i64, _owner: &OwnerId) -> Result<u64> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(1)
        }
    }

    #[tokio::test]
    async fn test_store_deadline() {
        let config = IncidentConfig {
            operation_timeout: Duration::from_millis(20),
        };
        let service = IncidentService::new(Arc::new(SlowStore), &config);

        assert!(matches!(
            service.list().await,
            Err(IncidentError::Timeout(_))
        ));
        assert!(matches!(
            service.create(Some("alice"), random_input()).await,
            Err(IncidentError::Timeout(_))
        ));
        assert!(matches!(
            service.delete(1, Some("alice")).await,
            Err(IncidentError::Timeout(_))
        ));
    }

    struct UnavailableStore;

    #[async_trait]
    impl IncidentStore for UnavailableStore {
        async fn list(&self) -> Result<Vec<Incident>> {
            Err(sqlx::Error::PoolTimedOut.into())
        }

        async fn create(&self, _incident: NewIncident) -> Result<Incident> {
            Err(sqlx::Error::PoolTimedOut.into())
        }

        async fn update(&self, _id: i64, _changes: IncidentChanges) -> Result<Incident> {
            Err(sqlx::Error::PoolTimedOut.into())
        }

        async fn delete(&self, _id: i64, _owner: &OwnerId) -> Result<u64> {
            Err(sqlx::Error::PoolTimedOut.into())
        }
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_unchanged() {
        let service = IncidentService::new(Arc::new(UnavailableStore), &IncidentConfig::default());

        assert!(matches!(
            service.update(1, random_input()).await,
            Err(IncidentError::StoreUnavailable(_))
        ));
        assert!(matches!(
            service.delete(1, Some("alice")).await,
            Err(IncidentError::StoreUnavailable(_))
        ));
    }

    struct CanceledStore;

    #[async_trait]
    impl IncidentStore for CanceledStore {
        async fn list(&self) -> Result<Vec<Incident>> {
            Err(IncidentError::Timeout(Duration::from_millis(300)))
        }

        async fn create(&self, _incident: NewIncident) -> Result<Incident> {
            Err(IncidentError::Timeout(Duration::from_millis(300)))
        }

        async fn update(&self, _id: i64, _changes: IncidentChanges) -> Result<Incident> {
            Err(IncidentError::Timeout(Duration::from_millis(300)))
        }

        async fn delete(&self, _id: i64, _owner: &OwnerId) -> Result<u64> {
            Err(IncidentError::Timeout(Duration::from_millis(300)))
        }
    }

    #[tokio::test]
    async fn test_server_side_cancel_reported_as_timeout() {
        let service = IncidentService::new(Arc::new(CanceledStore), &IncidentConfig::default());

        assert!(matches!(
            service.update(1, random_input()).await,
            Err(IncidentError::Timeout(_))
        ));
        assert!(matches!(
            service.delete(1, Some("alice")).await,
            Err(IncidentError::Timeout(_))
        ));
    }

    struct NothingRemovedStore;

    #[async_trait]
    impl IncidentStore for NothingRemovedStore {
        async fn list(&self) -> Result<Vec<Incident>> {
            Ok(Vec::new())
        }

        async fn create(&self, _incident: NewIncident) -> Result<Incident> {
            Err(sqlx::Error::PoolClosed.into())
        }

        async fn update(&self, id: i64, _changes: IncidentChanges) -> Result<Incident> {
            Err(IncidentError::NotFound(id))
        }

        async fn delete(&self, _id: i64, _owner: &OwnerId) -> Result<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_zero_rows_removed_is_forbidden() {
        let service =
            IncidentService::new(Arc::new(NothingRemovedStore), &IncidentConfig::default());

        assert!(matches!(
            service.delete(9, Some("alice")).await,
            Err(IncidentError::Forbidden(9))
        ));
    }
}
