//! Persistence for incidents.
//!
//! Every operation maps to exactly one data statement, so an operation
//! either fully happens or has no visible effect.

use async_trait::async_trait;

use crate::features::incidents::error::Result;
use crate::features::incidents::models::{Incident, IncidentChanges, NewIncident};
use crate::features::incidents::ownership::OwnerId;

#[cfg(test)]
pub mod memory_store;
pub mod pg_store;

#[cfg(test)]
pub use memory_store::InMemoryIncidentStore;
pub use pg_store::PgIncidentStore;

#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// All incidents, newest `created_at` first. Empty when there are none.
    async fn list(&self) -> Result<Vec<Incident>>;

    /// Insert a row; the store assigns `id`, `created_at` and `updated_at`.
    async fn create(&self, incident: NewIncident) -> Result<Incident>;

    /// Overwrite the mutable fields and refresh `updated_at`.
    ///
    /// Fails with `NotFound` when no row has this id.
    async fn update(&self, id: i64, changes: IncidentChanges) -> Result<Incident>;

    /// Conditional delete on id and owner in one step.
    ///
    /// Returns the number of rows removed: 0 when the row is missing or
    /// belongs to someone else, 1 otherwise.
    async fn delete(&self, id: i64, owner: &OwnerId) -> Result<u64>;
}
