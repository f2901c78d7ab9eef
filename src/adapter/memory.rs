//! Implements a service adapter that keeps records in memory.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{
    EntityId, Error,
    adapter::{AdapterError, DataResponse, MutationResponse, ServiceAdapter},
    models::Entity,
    schema::Validate,
};

/// Stores the records of one collection in memory, in insertion order.
///
/// Each instance owns its records; share it behind an `Arc` to give several
/// controllers the same data.
#[derive(Debug)]
pub struct InMemoryAdapter<E> {
    records: Mutex<Vec<E>>,
}

impl<E: Entity> InMemoryAdapter<E> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a collection holding `records`.
    pub fn with_records(records: Vec<E>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<E>>, AdapterError> {
        self.records.lock().map_err(|_| Error::LockError.into())
    }

    fn insert(&self, entity: E) -> Result<E, AdapterError> {
        let mut records = self.lock()?;

        if records.iter().any(|record| record.id() == entity.id()) {
            return Err(AdapterError {
                message: format!("a record with id \"{}\" already exists", entity.id()),
                code: Some("duplicate".to_owned()),
            });
        }

        records.push(entity.clone());
        Ok(entity)
    }

    fn modify(&self, id: &EntityId, changes: E::Changes) -> Result<E, AdapterError> {
        let mut records = self.lock()?;

        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| AdapterError::not_found(E::COLLECTION, id))?;

        let updated = record.update(changes);
        updated
            .validate()
            .map_err(|errors| AdapterError::invalid(E::COLLECTION, id, &errors))?;

        *record = updated;
        Ok(record.clone())
    }

    fn remove(&self, id: &EntityId) -> Result<(), AdapterError> {
        let mut records = self.lock()?;

        let position = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| AdapterError::not_found(E::COLLECTION, id))?;

        records.remove(position);
        Ok(())
    }
}

impl<E: Entity> Default for InMemoryAdapter<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> ServiceAdapter<E> for InMemoryAdapter<E> {
    async fn get_all(&self) -> DataResponse<Vec<E>> {
        self.lock().map(|records| records.clone()).into()
    }

    async fn get_by_id(&self, id: &EntityId) -> DataResponse<E> {
        self.lock()
            .and_then(|records| {
                records
                    .iter()
                    .find(|record| record.id() == id)
                    .cloned()
                    .ok_or_else(|| AdapterError::not_found(E::COLLECTION, id))
            })
            .into()
    }

    async fn create(&self, entity: E) -> DataResponse<E> {
        self.insert(entity).into()
    }

    async fn update(&self, id: &EntityId, changes: E::Changes) -> DataResponse<E> {
        self.modify(id, changes).into()
    }

    async fn delete(&self, id: &EntityId) -> MutationResponse {
        self.remove(id).into()
    }
}
