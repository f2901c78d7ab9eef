//! Defines the crate level error type.
//!
//! Controllers never return these errors: they absorb adapter and validation
//! failures into an [Outcome](crate::Outcome). This type covers the
//! programmer-facing paths instead, i.e. wiring, configuration and the
//! concrete adapters' internals.

/// The errors that may occur while setting up or wiring the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No factory was registered under the requested name.
    ///
    /// This is a programming error and should surface during development.
    #[error("dependency not found: \"{0}\"")]
    DependencyNotFound(String),

    /// A factory was registered under the requested name, but it produced a
    /// value of a different type than the one asked for.
    #[error("dependency \"{0}\" does not have the requested type")]
    DependencyTypeMismatch(String),

    /// A configuration value could not be parsed.
    ///
    /// Callers should pass in the name of the setting and the offending value.
    #[error("invalid value \"{1}\" for setting {0}")]
    InvalidConfig(&'static str, String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(#[from] rusqlite::Error),

    /// An entity could not be converted to or from JSON.
    #[error("could not (de)serialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The global logger could not be installed, usually because one is
    /// already set.
    #[error("could not set up logging: {0}")]
    LoggingError(String),

    /// A stored record breaks the schema rules of its type.
    #[error("stored record in {0} is invalid: {1}")]
    InvalidRecord(&'static str, crate::ValidationErrors),

    /// Could not acquire a lock guarding shared storage.
    #[error("could not acquire the storage lock")]
    LockError,
}
