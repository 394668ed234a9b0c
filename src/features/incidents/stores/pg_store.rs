use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::core::config::IncidentConfig;
use crate::features::incidents::error::{IncidentError, Result};
use crate::features::incidents::models::{Incident, IncidentChanges, NewIncident};
use crate::features::incidents::ownership::OwnerId;
use crate::features::incidents::stores::IncidentStore;

/// SQLSTATE raised when `statement_timeout` cancels a statement
const QUERY_CANCELED: &str = "57014";

/// Postgres-backed incident store.
///
/// Each operation runs in its own transaction with a local
/// `statement_timeout`, so Postgres cancels a statement that outlives the
/// operation deadline. A caller that gives up early drops the transaction
/// before it commits, which rolls it back.
pub struct PgIncidentStore {
    pool: PgPool,
    operation_timeout: Duration,
}

impl std::fmt::Debug for PgIncidentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgIncidentStore")
            .field("pool", &"<PgPool>")
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

impl PgIncidentStore {
    pub fn new(pool: PgPool, config: &IncidentConfig) -> Self {
        Self {
            pool,
            operation_timeout: config.operation_timeout,
        }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(|e| self.store_error(e))?;

        // is_local = true: the setting ends with the transaction
        sqlx::query("SELECT set_config('statement_timeout', $1, true)")
            .bind(format!("{}ms", self.operation_timeout.as_millis()))
            .execute(&mut *tx)
            .await
            .map_err(|e| self.store_error(e))?;

        Ok(tx)
    }

    async fn commit(&self, tx: Transaction<'static, Postgres>) -> Result<()> {
        tx.commit().await.map_err(|e| self.store_error(e))
    }

    /// Server-side cancellation becomes `Timeout`; anything else means the
    /// store is unavailable. Logging happens where the error is rendered.
    fn store_error(&self, e: sqlx::Error) -> IncidentError {
        let canceled = e
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == QUERY_CANCELED);

        if canceled {
            IncidentError::Timeout(self.operation_timeout)
        } else {
            IncidentError::StoreUnavailable(e)
        }
    }
}

#[async_trait]
impl IncidentStore for PgIncidentStore {
    async fn list(&self) -> Result<Vec<Incident>> {
        let mut tx = self.begin().await?;

        let incidents = sqlx::query_as::<_, Incident>(
            r#"
            SELECT id, title, description, category, status, owner_id, created_at, updated_at
            FROM incidents
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| self.store_error(e))?;

        self.commit(tx).await?;
        Ok(incidents)
    }

    async fn create(&self, incident: NewIncident) -> Result<Incident> {
        let NewIncident { fields, owner } = incident;
        let mut tx = self.begin().await?;

        let created = sqlx::query_as::<_, Incident>(
            r#"
            INSERT INTO incidents (title, description, category, status, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, category, status, owner_id, created_at, updated_at
            "#,
        )
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.category.as_str())
        .bind(fields.status.as_str())
        .bind(owner.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| self.store_error(e))?;

        self.commit(tx).await?;
        Ok(created)
    }

    async fn update(&self, id: i64, changes: IncidentChanges) -> Result<Incident> {
        let mut tx = self.begin().await?;

        let updated = sqlx::query_as::<_, Incident>(
            r#"
            UPDATE incidents
            SET title = $1, description = $2, category = $3, status = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, title, description, category, status, owner_id, created_at, updated_at
            "#,
        )
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.category.as_str())
        .bind(changes.status.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| self.store_error(e))?
        .ok_or(IncidentError::NotFound(id))?;

        self.commit(tx).await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64, owner: &OwnerId) -> Result<u64> {
        let mut tx = self.begin().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM incidents
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| self.store_error(e))?;

        self.commit(tx).await?;
        Ok(result.rows_affected())
    }
}
