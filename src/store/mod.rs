// src/store/mod.rs - document store abstraction shared by every repository

pub mod memory;
pub mod postgres;

use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cast to identifier failed for value \"{0}\" at path \"_id\"")]
    MalformedId(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Collections of JSON documents keyed by an opaque id.
///
/// Every call is a single unit of work; nothing here spans more than one
/// document. Ids arrive as raw strings from the path and are parsed by the
/// store, which reports `MalformedId` for anything it cannot read.
pub trait DocumentStore: Send + Sync {
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    /// All documents of a collection, in whatever order the backend yields them.
    fn find_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Value>, StoreError>>;

    fn find_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Value>, StoreError>>;

    /// Swaps the stored document for `document`. `None` when no document has the id.
    fn replace_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        document: Value,
    ) -> BoxFuture<'a, Result<Option<Value>, StoreError>>;

    /// `false` when no document has the id.
    fn delete_by_id<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Result<bool, StoreError>>;
}

/// Only the lowercase hyphenated spelling that ids are generated in is accepted,
/// so each record has exactly one id string.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    match Uuid::try_parse(raw) {
        Ok(id) if id.hyphenated().to_string() == raw => Ok(id),
        _ => Err(StoreError::MalformedId(raw.to_string())),
    }
}
