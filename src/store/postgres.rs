// src/store/postgres.rs - JSONB documents in a single Postgres table

use deadpool_postgres::Pool;
use futures::future::BoxFuture;
use log::info;
use serde_json::Value;
use uuid::Uuid;

use super::{parse_id, DocumentStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id         UUID NOT NULL,
    body       JSONB NOT NULL,
    PRIMARY KEY (collection, id)
)";

#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Creates the documents table if missing. Run once at startup; also
    /// fails fast when the database is unreachable.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client.batch_execute(SCHEMA).await?;
        info!("documents table ready");
        Ok(())
    }
}

impl DocumentStore for PgStore {
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            client
                .execute(
                    "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)",
                    &[&collection, &id, &document],
                )
                .await?;
            Ok(())
        })
    }

    fn find_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Value>, StoreError>> {
        Box::pin(async move {
            let client = self.pool.get().await?;
            let rows = client
                .query("SELECT body FROM documents WHERE collection = $1", &[&collection])
                .await?;
            rows.iter()
                .map(|row| row.try_get::<_, Value>("body").map_err(StoreError::from))
                .collect()
        })
    }

    fn find_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
        Box::pin(async move {
            let id = parse_id(id)?;
            let client = self.pool.get().await?;
            let row = client
                .query_opt(
                    "SELECT body FROM documents WHERE collection = $1 AND id = $2",
                    &[&collection, &id],
                )
                .await?;
            Ok(row.map(|row| row.try_get::<_, Value>("body")).transpose()?)
        })
    }

    fn replace_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        document: Value,
    ) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
        Box::pin(async move {
            let id = parse_id(id)?;
            let client = self.pool.get().await?;
            let row = client
                .query_opt(
                    "UPDATE documents SET body = $3 WHERE collection = $1 AND id = $2 RETURNING body",
                    &[&collection, &id, &document],
                )
                .await?;
            Ok(row.map(|row| row.try_get::<_, Value>("body")).transpose()?)
        })
    }

    fn delete_by_id<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(async move {
            let id = parse_id(id)?;
            let client = self.pool.get().await?;
            let deleted = client
                .execute(
                    "DELETE FROM documents WHERE collection = $1 AND id = $2",
                    &[&collection, &id],
                )
                .await?;
            Ok(deleted > 0)
        })
    }
}
