//! Implements a SQLite backed service adapter.
//!
//! Every collection shares one `entity` table; records are stored as JSON text keyed by
//! collection name and identity.

use std::{
    marker::PhantomData,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};

use crate::{
    EntityId, Error,
    adapter::{AdapterError, DataResponse, MutationResponse, ServiceAdapter},
    models::Entity,
    schema::Validate,
};

/// Create the table shared by all SQLite adapters.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_entity_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS entity (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            body TEXT NOT NULL,
            PRIMARY KEY (collection, id)
        )",
        (),
    )?;

    Ok(())
}

/// Creates, retrieves, updates and deletes the records of one collection in a SQLite database.
#[derive(Debug)]
pub struct SqliteAdapter<E> {
    connection: Arc<Mutex<Connection>>,
    entity: PhantomData<fn() -> E>,
}

impl<E> Clone for SqliteAdapter<E> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: Entity> SqliteAdapter<E> {
    /// Create an adapter for the collection of `E` on a shared connection.
    ///
    /// The connection must have been set up with [create_entity_table].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            entity: PhantomData,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::LockError)
    }

    fn select_all(&self) -> Result<Vec<E>, Error> {
        let connection = self.lock()?;
        let mut statement = connection
            .prepare("SELECT body FROM entity WHERE collection = ?1 ORDER BY rowid;")?;

        let bodies = statement
            .query_map((E::COLLECTION,), |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        bodies.iter().map(|body| Self::decode(body)).collect()
    }

    /// Parse a stored body, refusing records that break the schema rules of `E`.
    fn decode(body: &str) -> Result<E, Error> {
        let record: E = serde_json::from_str(body)?;

        record
            .validate()
            .map_err(|errors| Error::InvalidRecord(E::COLLECTION, errors))?;

        Ok(record)
    }

    fn select(connection: &Connection, id: &EntityId) -> Result<Option<E>, Error> {
        let body: Option<String> = connection
            .query_row(
                "SELECT body FROM entity WHERE collection = ?1 AND id = ?2;",
                (E::COLLECTION, id.as_str()),
                |row| row.get(0),
            )
            .optional()?;

        body.map(|body| Self::decode(&body)).transpose()
    }

    fn select_by_id(&self, id: &EntityId) -> Result<E, AdapterError> {
        let connection = self.lock()?;

        Self::select(&connection, id)?.ok_or_else(|| AdapterError::not_found(E::COLLECTION, id))
    }

    fn insert(&self, entity: E) -> Result<E, AdapterError> {
        let body = serde_json::to_string(&entity).map_err(Error::from)?;
        let connection = self.lock()?;

        connection
            .execute(
                "INSERT INTO entity (collection, id, body) VALUES (?1, ?2, ?3);",
                (E::COLLECTION, entity.id().as_str(), &body),
            )
            .map_err(|error| map_insert_error(error, entity.id()))?;

        Ok(entity)
    }

    fn modify(&self, id: &EntityId, changes: E::Changes) -> Result<E, AdapterError> {
        let connection = self.lock()?;

        let updated = Self::select(&connection, id)?
            .ok_or_else(|| AdapterError::not_found(E::COLLECTION, id))?
            .update(changes);
        updated
            .validate()
            .map_err(|errors| AdapterError::invalid(E::COLLECTION, id, &errors))?;
        let body = serde_json::to_string(&updated).map_err(Error::from)?;

        connection
            .execute(
                "UPDATE entity SET body = ?1 WHERE collection = ?2 AND id = ?3;",
                (&body, E::COLLECTION, id.as_str()),
            )
            .map_err(Error::from)?;

        Ok(updated)
    }

    fn remove(&self, id: &EntityId) -> Result<(), AdapterError> {
        let connection = self.lock()?;

        let rows_affected = connection
            .execute(
                "DELETE FROM entity WHERE collection = ?1 AND id = ?2;",
                (E::COLLECTION, id.as_str()),
            )
            .map_err(Error::from)?;

        if rows_affected == 0 {
            return Err(AdapterError::not_found(E::COLLECTION, id));
        }

        Ok(())
    }
}

fn map_insert_error(error: rusqlite::Error, id: &EntityId) -> AdapterError {
    match error {
        // Code 1555 occurs when a PRIMARY KEY constraint failed, 2067 when a UNIQUE one did.
        rusqlite::Error::SqliteFailure(sql_error, _)
            if sql_error.extended_code == 1555 || sql_error.extended_code == 2067 =>
        {
            AdapterError {
                message: format!("a record with id \"{id}\" already exists"),
                code: Some("duplicate".to_owned()),
            }
        }
        error => {
            tracing::error!("an unhandled SQL error occurred: {}", error);
            Error::SqlError(error).into()
        }
    }
}

#[async_trait]
impl<E: Entity> ServiceAdapter<E> for SqliteAdapter<E> {
    async fn get_all(&self) -> DataResponse<Vec<E>> {
        self.select_all().map_err(AdapterError::from).into()
    }

    async fn get_by_id(&self, id: &EntityId) -> DataResponse<E> {
        self.select_by_id(id).into()
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
