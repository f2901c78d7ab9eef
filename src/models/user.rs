//! This file defines a user of the application and its profile fields.

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    EntityId,
    models::{Entity, deserialize_some},
    schema::{Validate, ValidationErrors, Validator},
};

/// The currency used when a user has not picked one.
pub const DEFAULT_CURRENCY: &str = "BRL";

/// A user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The identity of the user.
    pub id: EntityId,
    /// The display name.
    pub name: String,
    /// The email address used to sign in.
    pub email: String,
    /// A contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// A link to the profile picture.
    #[serde(default)]
    pub photo_url: Option<String>,
    /// The preferred currency as an ISO 4217 code, e.g. "BRL".
    pub currency: String,
}

/// The data needed to create a [User].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    /// The display name.
    pub name: String,
    /// The email address used to sign in.
    pub email: String,
    /// A contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// A link to the profile picture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// The preferred currency; [DEFAULT_CURRENCY] when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// The fields of a [User] to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserChanges {
    /// A new display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A new email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// A new phone number; `Some(None)` removes it.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<Option<String>>,
    /// A new profile picture; `Some(None)` removes it.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_url: Option<Option<String>>,
    /// A new preferred currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

fn is_valid_phone(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    allowed && digits >= 8
}

fn is_valid_photo_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Whether `code` looks like an ISO 4217 currency code, e.g. "BRL".
pub(crate) fn is_valid_currency(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// The rules shared by every shape of a user; `None` skips a rule.
fn check_profile(
    validator: Validator,
    email: Option<&str>,
    phone: Option<&str>,
    photo_url: Option<&str>,
    currency: Option<&str>,
) -> Validator {
    validator
        .check(
            email.is_none_or(EmailAddress::is_valid),
            "email",
            "is not a valid email address",
        )
        .check(
            phone.is_none_or(is_valid_phone),
            "phone",
            "must contain at least 8 digits and only digits, spaces, +, -, ( or )",
        )
        .check(
            photo_url.is_none_or(is_valid_photo_url),
            "photoUrl",
            "must be an http or https URL",
        )
        .check(
            currency.is_none_or(is_valid_currency),
            "currency",
            "must be a three letter upper-case currency code",
        )
}

impl Validate for User {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let validator = Validator::new()
            .identity("id", &self.id)
            .non_empty("name", self.name.as_str());

        check_profile(
            validator,
            Some(&self.email),
            self.phone.as_deref(),
            self.photo_url.as_deref(),
            Some(&self.currency),
        )
        .finish()
    }
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let validator = Validator::new().non_empty("name", self.name.as_str());

        check_profile(
            validator,
            Some(&self.email),
            self.phone.as_deref(),
            self.photo_url.as_deref(),
            self.currency.as_deref(),
        )
        .finish()
    }
}

impl Validate for UserChanges {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let validator = Validator::new().non_empty("name", self.name.as_deref());

        check_profile(
            validator,
            self.email.as_deref(),
            self.phone.as_ref().and_then(Option::as_deref),
            self.photo_url.as_ref().and_then(Option::as_deref),
            self.currency.as_deref(),
        )
        .finish()
    }
}

impl Entity for User {
    type Draft = NewUser;
    type Changes = UserChanges;

    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn create(draft: NewUser) -> Self {
        Self {
            id: EntityId::generate(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            photo_url: draft.photo_url,
            currency: draft
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
        }
    }

    fn update(&self, changes: UserChanges) -> Self {
        Self {
            id: self.id.clone(),
            name: changes.name.unwrap_or_else(|| self.name.clone()),
            email: changes.email.unwrap_or_else(|| self.email.clone()),
            phone: changes.phone.unwrap_or_else(|| self.phone.clone()),
            photo_url: changes.photo_url.unwrap_or_else(|| self.photo_url.clone()),
            currency: changes.currency.unwrap_or_else(|| self.currency.clone()),
        }
    }
}
