//! A service adapter for tests that records every call and can be scripted to fail.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    EntityId,
    adapter::{AdapterError, DataResponse, InMemoryAdapter, MutationResponse, ServiceAdapter},
    models::Entity,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call<E: Entity> {
    GetAll,
    GetById(EntityId),
    Create(E),
    Update(EntityId, E::Changes),
    Delete(EntityId),
}

pub(crate) struct ScriptedAdapter<E: Entity> {
    records: InMemoryAdapter<E>,
    failure: Option<AdapterError>,
    update_failure: Option<AdapterError>,
    get_all_response: Option<DataResponse<Vec<E>>>,
    delete_response: Option<MutationResponse>,
    calls: Mutex<Vec<Call<E>>>,
}

impl<E: Entity> ScriptedAdapter<E> {
    pub(crate) fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub(crate) fn with_records(records: Vec<E>) -> Self {
        Self {
            records: InMemoryAdapter::with_records(records),
            failure: None,
            update_failure: None,
            get_all_response: None,
            delete_response: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call answers with `error`.
    pub(crate) fn failing(error: AdapterError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    /// Only updates answer with `error`.
    pub(crate) fn with_update_failure(self, error: AdapterError) -> Self {
        Self {
            update_failure: Some(error),
            ..self
        }
    }

    pub(crate) fn with_get_all_response(self, response: DataResponse<Vec<E>>) -> Self {
        Self {
            get_all_response: Some(response),
            ..self
        }
    }

    pub(crate) fn with_delete_response(self, response: MutationResponse) -> Self {
        Self {
            delete_response: Some(response),
            ..self
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call<E>> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Create(_)))
            .count()
    }

    pub(crate) fn created(&self) -> Vec<E> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create(entity) => Some(entity),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn update_calls(&self) -> Vec<(EntityId, E::Changes)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update(id, changes) => Some((id, changes)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call<E>) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl<E: Entity> ServiceAdapter<E> for ScriptedAdapter<E> {
    async fn get_all(&self) -> DataResponse<Vec<E>> {
        self.record(Call::GetAll);

        if let Some(response) = &self.get_all_response {
            return response.clone();
        }

        match &self.failure {
            Some(error) => DataResponse::err(error.clone()),
            None => self.records.get_all().await,
        }
    }

    async fn get_by_id(&self, id: &EntityId) -> DataResponse<E> {
        self.record(Call::GetById(id.clone()));

        match &self.failure {
            Some(error) => DataResponse::err(error.clone()),
            None => self.records.get_by_id(id).await,
        }
    }

    async fn create(&self, entity: E) -> DataResponse<E> {
        self.record(Call::Create(entity.clone()));

        match &self.failure {
            Some(error) => DataResponse::err(error.clone()),
            None => self.records.create(entity).await,
        }
    }

    async fn update(&self, id: &EntityId, changes: E::Changes) -> DataResponse<E> {
        self.record(Call::Update(id.clone(), changes.clone()));

        match self.failure.as_ref().or(self.update_failure.as_ref()) {
            Some(error) => DataResponse::err(error.clone()),
            None => self.records.update(id, changes).await,
        }
    }

    async fn delete(&self, id: &EntityId) -> MutationResponse {
        self.record(Call::Delete(id.clone()));

        if let Some(error) = &self.failure {
            return MutationResponse::err(error.clone());
        }

        match &self.delete_response {
            Some(response) => response.clone(),
            None => self.records.delete(id).await,
        }
    }
}
