//! Entity identity type definition.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::ValidationErrors;

/// The identity of a stored entity.
///
/// Freshly created entities get a random UUID. Fixture entities, such as the
/// default categories, use short numeric identities like `"1"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a new, globally unique identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create an identity from a string.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `id` is not [well-formed](EntityId::is_well_formed).
    pub fn new(id: &str) -> Result<Self, ValidationErrors> {
        let id = Self::new_unchecked(id);

        if id.is_well_formed() {
            Ok(id)
        } else {
            Err(ValidationErrors::single("id", "identity is not well-formed"))
        }
    }

    /// Create an identity without validation.
    ///
    /// The caller should ensure that the string is well-formed. This is not
    /// `unsafe`, a malformed identity is only caught later by validation.
    pub fn new_unchecked(id: &str) -> Self {
        Self(id.to_owned())
    }

    /// Whether the identity is non-empty and made only of ASCII letters,
    /// digits and dashes.
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for EntityId {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityId::new(s)
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
