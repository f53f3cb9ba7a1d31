//! `PostgreSQL` implementation of the `DocumentBackend` trait.
//!
//! Documents live in one `documents` table keyed by
//! `(app_id, actor_id, collection, id)` with the fields in a `JSONB`
//! column. A row trigger announces every change on the
//! [`CHANGE_CHANNEL`] notification channel; each listener re-reads its
//! collection when a change for its path arrives, so snapshots are full
//! and arrive in commit order.

use async_trait::async_trait;
use docflow_core::backend::{
    CollectionPath, Document, DocumentBackend, Fields, Snapshot, SnapshotFeed,
};
use docflow_core::error::DomainError;
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use sqlx::types::Json;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Notification channel the change trigger publishes on.
pub const CHANGE_CHANNEL: &str = "docflow_documents";

/// Payload published by the change trigger.
#[derive(Debug, Deserialize)]
struct ChangeNotice {
    app_id: String,
    actor_id: Uuid,
    collection: String,
}

impl ChangeNotice {
    fn concerns(&self, path: &CollectionPath) -> bool {
        self.app_id == path.app_id
            && self.actor_id == path.actor_id.0
            && self.collection == path.collection.as_str()
    }
}

/// PostgreSQL-backed document backend.
#[derive(Debug, Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    /// Creates a new `PgBackend`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn load_snapshot(pool: &PgPool, path: &CollectionPath) -> Result<Snapshot, DomainError> {
    let rows: Vec<(Uuid, Json<Fields>)> = sqlx::query_as(
        "SELECT id, fields FROM documents \
         WHERE app_id = $1 AND actor_id = $2 AND collection = $3 \
         ORDER BY seq",
    )
    .bind(&path.app_id)
    .bind(path.actor_id.0)
    .bind(path.collection.as_str())
    .fetch_all(pool)
    .await
    .map_err(|e| DomainError::sync(path.collection, e))?;

    Ok(Snapshot {
        documents: rows
            .into_iter()
            .map(|(id, Json(fields))| Document { id, fields })
            .collect(),
    })
}

async fn forward_changes(
    pool: PgPool,
    mut listener: PgListener,
    path: CollectionPath,
    tx: mpsc::UnboundedSender<Result<Snapshot, DomainError>>,
) {
    loop {
        let notification = tokio::select! {
            n = listener.recv() => n,
            () = tx.closed() => break,
        };
        let item = match notification {
            Ok(notification) => {
                match serde_json::from_str::<ChangeNotice>(notification.payload()) {
                    Ok(notice) if notice.concerns(&path) => load_snapshot(&pool, &path).await,
                    Ok(_) => continue,
                    Err(e) => {
                        warn!(error = %e, "ignoring malformed change notification");
                        continue;
                    }
                }
            }
            Err(e) => Err(DomainError::sync(path.collection, e)),
        };
        if tx.send(item).is_err() {
            break;
        }
    }
    debug!(path = %path, "change feed closed");
}

#[async_trait]
impl DocumentBackend for PgBackend {
    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO documents (app_id, actor_id, collection, id, fields) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&path.app_id)
        .bind(path.actor_id.0)
        .bind(path.collection.as_str())
        .bind(id)
        .bind(Json(&fields))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::sync(path.collection, e))?;
        Ok(id)
    }

    async fn fetch(&self, path: &CollectionPath, id: Uuid) -> Result<Option<Fields>, DomainError> {
        let row: Option<(Json<Fields>,)> = sqlx::query_as(
            "SELECT fields FROM documents \
             WHERE app_id = $1 AND actor_id = $2 AND collection = $3 AND id = $4",
        )
        .bind(&path.app_id)
        .bind(path.actor_id.0)
        .bind(path.collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::sync(path.collection, e))?;
        Ok(row.map(|(Json(fields),)| fields))
    }

    async fn merge(
        &self,
        path: &CollectionPath,
        id: Uuid,
        patch: Fields,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE documents SET fields = fields || $5, updated_at = now() \
             WHERE app_id = $1 AND actor_id = $2 AND collection = $3 AND id = $4",
        )
        .bind(&path.app_id)
        .bind(path.actor_id.0)
        .bind(path.collection.as_str())
        .bind(id)
        .bind(Json(&patch))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::sync(path.collection, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RecordNotFound {
                collection: path.collection,
                id,
            });
        }
        Ok(())
    }

    async fn remove(&self, path: &CollectionPath, id: Uuid) -> Result<(), DomainError> {
        sqlx::query(
            "DELETE FROM documents \
             WHERE app_id = $1 AND actor_id = $2 AND collection = $3 AND id = $4",
        )
        .bind(&path.app_id)
        .bind(path.actor_id.0)
        .bind(path.collection.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::sync(path.collection, e))?;
        Ok(())
    }

    async fn listen(&self, path: &CollectionPath) -> Result<SnapshotFeed, DomainError> {
        // Start listening before the initial read so no commit falls between.
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(|e| DomainError::sync(path.collection, e))?;
        listener
            .listen(CHANGE_CHANNEL)
            .await
            .map_err(|e| DomainError::sync(path.collection, e))?;

        let initial = load_snapshot(&self.pool, path).await?;
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(Ok(initial));

        tokio::spawn(forward_changes(self.pool.clone(), listener, path.clone(), tx));
        Ok(rx)
    }
}
