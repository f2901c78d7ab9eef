//! Contains the service adapter trait and implementations for objects that persist the domain
//! [models](crate::models).
//!
//! Adapters answer with the `{data, error}` and `{success, error}` shapes used by the
//! persistence backend rather than a `Result`, so controllers see exactly what the backend
//! reported, including responses that fail without saying why.

use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{EntityId, ValidationErrors, models::Entity};

mod memory;
mod sqlite;

pub use memory::InMemoryAdapter;
pub use sqlite::{SqliteAdapter, create_entity_table};

/// An error reported by the persistence backend.
///
/// The message is meant for logs, not for end users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterError {
    /// What went wrong.
    pub message: String,
    /// A backend specific error code, if there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl AdapterError {
    /// Create an error with a message and no code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Create an error for a record that does not exist.
    pub fn not_found(collection: &str, id: &EntityId) -> Self {
        Self {
            message: format!("no record with id \"{id}\" in {collection}"),
            code: Some("not_found".to_owned()),
        }
    }

    /// Create an error for a record that would break the schema rules of its type.
    pub fn invalid(collection: &str, id: &EntityId, errors: &ValidationErrors) -> Self {
        Self {
            message: format!("record \"{id}\" in {collection} is invalid: {errors}"),
            code: Some("invalid".to_owned()),
        }
    }
}

impl Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<crate::Error> for AdapterError {
    fn from(error: crate::Error) -> Self {
        Self::new(error.to_string())
    }
}

/// The answer to a read, create or update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    /// The requested or written data, if any.
    pub data: Option<T>,
    /// The error, if the request failed.
    pub error: Option<AdapterError>,
}

impl<T> DataResponse<T> {
    /// A successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// A failed response.
    pub fn err(error: AdapterError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// Convert into a `Result`, treating any reported error as a failure.
    ///
    /// A response with neither data nor error is `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, AdapterError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}

impl<T> From<Result<T, AdapterError>> for DataResponse<T> {
    fn from(result: Result<T, AdapterError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::err(error),
        }
    }
}

/// The answer to a delete request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    /// Whether the request took effect.
    pub success: bool,
    /// The error, if the request failed.
    pub error: Option<AdapterError>,
}

impl MutationResponse {
    /// A successful response.
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failed response.
    pub fn err(error: AdapterError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }

    /// Convert into a `Result`.
    ///
    /// A reported error and `success: false` are both failures; the latter
    /// gets a generic error when the backend did not give one.
    pub fn into_result(self) -> Result<(), AdapterError> {
        match (self.success, self.error) {
            (_, Some(error)) => Err(error),
            (false, None) => Err(AdapterError::new("the request was not successful")),
            (true, None) => Ok(()),
        }
    }
}

impl From<Result<(), AdapterError>> for MutationResponse {
    fn from(result: Result<(), AdapterError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(error) => Self::err(error),
        }
    }
}

/// Fetches, creates, updates and deletes the records of one collection.
///
/// Implementations talk to the actual persistence backend, whether that is a
/// network service, a database or memory.
#[async_trait]
pub trait ServiceAdapter<E: Entity>: Send + Sync {
    /// Get every record in the collection.
    async fn get_all(&self) -> DataResponse<Vec<E>>;

    /// Get the record with identity `id`.
    async fn get_by_id(&self, id: &EntityId) -> DataResponse<E>;

    /// Store a new record.
    ///
    /// The record is stored as given, identity included.
    async fn create(&self, entity: E) -> DataResponse<E>;

    /// Apply `changes` to the record with identity `id`, leaving the other
    /// fields untouched.
    async fn update(&self, id: &EntityId, changes: E::Changes) -> DataResponse<E>;

    /// Delete the record with identity `id`.
    async fn delete(&self, id: &EntityId) -> MutationResponse;
}

#[cfg(test)]
mod response_tests {
    use super::{AdapterError, DataResponse, MutationResponse};

    #[test]
    fn data_response_with_error_is_a_failure() {
        let response: DataResponse<i32> = DataResponse {
            data: Some(1),
            error: Some(AdapterError::new("boom")),
        };

        assert!(response.into_result().is_err());
    }

    #[test]
    fn empty_data_response_is_ok_none() {
        let response: DataResponse<i32> = DataResponse {
            data: None,
            error: None,
        };

        assert_eq!(response.into_result(), Ok(None));
    }

    #[test]
    fn unsuccessful_mutation_without_error_is_a_failure() {
        let response = MutationResponse {
            success: false,
            error: None,
        };

        assert!(response.into_result().is_err());
    }

    #[test]
    fn mutation_error_wins_over_success_flag() {
        let response = MutationResponse {
            success: true,
            error: Some(AdapterError::new("not found")),
        };

        assert_eq!(response.into_result(), Err(AdapterError::new("not found")));
    }

    #[test]
    fn serializes_to_backend_shape() {
        let response = MutationResponse::err(AdapterError::new("not found"));

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": {"message": "not found"}})
        );
    }
}
