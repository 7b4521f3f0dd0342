// src/repositories/resource_repository.rs - one CRUD contract for every entity

use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;
use uuid::Uuid;

use crate::models::Entity;
use crate::repositories::RepoError;
use crate::store::DocumentStore;

/// CRUD over the collection of `E`. Holds only the injected store handle, so
/// building one per request is cheap.
pub struct ResourceRepository<E> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> ResourceRepository<E> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn create(&self, fields: E::Fields) -> Result<E, RepoError> {
        let record = E::from_fields(Uuid::new_v4(), fields)?;
        let document = serde_json::to_value(&record)?;
        self.store.insert(E::COLLECTION, record.id(), document).await?;
        debug!("inserted {} {}", E::NAME, record.id());
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<E>, RepoError> {
        let documents = self.store.find_all(E::COLLECTION).await?;
        let records = documents
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<E>, _>>()?;
        Ok(records)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<E, RepoError> {
        let document = self
            .store
            .find_by_id(E::COLLECTION, id)
            .await?
            .ok_or(RepoError::NotFound)?;
        Ok(serde_json::from_value(document)?)
    }

    pub async fn update_by_id(&self, id: &str, fields: E::Fields) -> Result<E, RepoError> {
        let mut record = self.get_by_id(id).await?;
        record.replace_fields(fields)?;

        let document = serde_json::to_value(&record)?;
        // the record can vanish between the read and the write
        let stored = self
            .store
            .replace_by_id(E::COLLECTION, id, document)
            .await?
            .ok_or(RepoError::NotFound)?;
        debug!("replaced {} {}", E::NAME, id);
        Ok(serde_json::from_value(stored)?)
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), RepoError> {
        if self.store.delete_by_id(E::COLLECTION, id).await? {
            debug!("deleted {} {}", E::NAME, id);
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}
