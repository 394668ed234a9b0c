use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::features::incidents::error::{IncidentError, Result};
use crate::features::incidents::models::{Incident, IncidentChanges, NewIncident};
use crate::features::incidents::ownership::OwnerId;
use crate::features::incidents::stores::IncidentStore;

#[derive(Default)]
struct State {
    last_id: i64,
    rows: Vec<Incident>,
}

/// Test store: one lock per call makes each operation atomic.
#[derive(Default)]
pub struct InMemoryIncidentStore {
    state: Mutex<State>,
    calls: AtomicUsize,
}

impl InMemoryIncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations invoked so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn row_count(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    /// Raw row including the owner, for assertions
    pub fn get(&self, id: i64) -> Option<Incident> {
        let state = self.state.lock().unwrap();
        state.rows.iter().find(|i| i.id == id).cloned()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl IncidentStore for InMemoryIncidentStore {
    async fn list(&self) -> Result<Vec<Incident>> {
        self.record_call();
        let state = self.state.lock().unwrap();

        // reverse insertion order first so equal timestamps keep newest first
        let mut rows: Vec<Incident> = state.rows.iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create(&self, incident: NewIncident) -> Result<Incident> {
        self.record_call();
        let mut state = self.state.lock().unwrap();

        state.last_id += 1;
        let now = Utc::now();
        let row = Incident {
            id: state.last_id,
            title: incident.fields.title,
            description: incident.fields.description,
            category: incident.fields.category,
            status: incident.fields.status,
            owner_id: incident.owner.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, changes: IncidentChanges) -> Result<Incident> {
        self.record_call();
        let mut state = self.state.lock().unwrap();

        let row = state
            .rows
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(IncidentError::NotFound(id))?;

        row.title = changes.title;
        row.description = changes.description;
        row.category = changes.category;
        row.status = changes.status;
        row.updated_at = Utc::now().max(row.created_at);
        Ok(row.clone())
    }

    async fn delete(&self, id: i64, owner: &OwnerId) -> Result<u64> {
        self.record_call();
        let mut state = self.state.lock().unwrap();

        let before = state.rows.len();
        state.rows.retain(|i| !(i.id == id && i.owner_id == owner.as_str()));

        Ok((before - state.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::incidents::models::{IncidentCategory, IncidentStatus};
    use crate::features::incidents::ownership::require_owner;

    #[tokio::test]
    async fn test_delete_reports_rows_removed() {
        let store = InMemoryIncidentStore::new();
        let created = store
            .create(NewIncident {
                fields: IncidentChanges {
                    title: "Loose cable".to_string(),
                    description: String::new(),
                    category: IncidentCategory::Safety,
                    status: IncidentStatus::Open,
                },
                owner: require_owner(Some("alice")).unwrap(),
            })
            .await
            .unwrap();

        let bob = require_owner(Some("bob")).unwrap();
        let alice = require_owner(Some("alice")).unwrap();

        assert_eq!(store.delete(created.id, &bob).await.unwrap(), 0);
        assert_eq!(store.delete(created.id, &alice).await.unwrap(), 1);
        assert_eq!(store.delete(created.id, &alice).await.unwrap(), 0);
    }
}
