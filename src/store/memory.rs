use std::collections::HashMap;

use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{parse_id, DocumentStore, StoreError};

/// Process-local document store. Documents keep their insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(Uuid, Value)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: Value,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .push((id, document));
            Ok(())
        })
    }

    fn find_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Value>, StoreError>> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            Ok(collections
                .get(collection)
                .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
                .unwrap_or_default())
        })
    }

    fn find_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
        Box::pin(async move {
            let id = parse_id(id)?;
            let collections = self.collections.read().await;
            Ok(collections
                .get(collection)
                .and_then(|docs| docs.iter().find(|(key, _)| *key == id))
                .map(|(_, doc)| doc.clone()))
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
            let mut collections = self.collections.write().await;
            let Some(slot) = collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|(key, _)| *key == id))
            else {
                return Ok(None);
            };
            slot.1 = document;
            Ok(Some(slot.1.clone()))
        })
    }

    fn delete_by_id<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(async move {
            let id = parse_id(id)?;
            let mut collections = self.collections.write().await;
            let Some(docs) = collections.get_mut(collection) else {
                return Ok(false);
            };
            let before = docs.len();
            docs.retain(|(key, _)| *key != id);
            Ok(docs.len() != before)
        })
    }
}
