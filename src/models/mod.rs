//! This module defines the domain data types.
//!
//! Each entity comes in three shapes: the stored entity itself, a draft used
//! to create it (no identity, no timestamps) and a set of changes used to
//! update it (every field optional).

use std::fmt::Debug;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use time::OffsetDateTime;

use crate::{EntityId, schema::Validate};

pub use budget::{Budget, BudgetChanges, BudgetPeriod, NewBudget};
pub use category::{Category, CategoryChanges, CategoryType, NewCategory, default_categories};
pub use goal::{Goal, GoalChanges, NewGoal};
pub use investment::{
    Investment, InvestmentChanges, InvestmentReturn, InvestmentReturnChanges, NewInvestment,
    NewInvestmentReturn,
};
pub use transaction::{NewTransaction, Transaction, TransactionChanges, TransactionType};
pub use user::{DEFAULT_CURRENCY, NewUser, User, UserChanges};

pub(crate) use user::is_valid_currency;

mod budget;
mod category;
mod goal;
mod investment;
mod transaction;
mod user;

/// A stored domain record with an identity.
///
/// Implementors double as their own factory: [Entity::create] turns a draft
/// into a new record and [Entity::update] applies a set of changes.
pub trait Entity:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Validate + Send + Sync + 'static
{
    /// The payload used to create a new record.
    type Draft: Clone
        + Debug
        + PartialEq
        + Serialize
        + DeserializeOwned
        + Validate
        + Send
        + Sync
        + 'static;

    /// The partial payload used to update a record.
    type Changes: Clone
        + Debug
        + Default
        + PartialEq
        + Serialize
        + DeserializeOwned
        + Validate
        + Send
        + Sync
        + 'static;

    /// The name of the collection holding records of this type.
    const COLLECTION: &'static str;

    /// The human-readable name of this type, e.g. "Category".
    const LABEL: &'static str;

    /// The identity of the record.
    fn id(&self) -> &EntityId;

    /// Build a new record from `draft`.
    ///
    /// The record gets a freshly generated identity, its timestamps (if any)
    /// are set to the current instant and defaultable amounts start at zero.
    fn create(draft: Self::Draft) -> Self;

    /// Return a copy of the record with `changes` applied.
    ///
    /// Identity and creation time are preserved; the modification time (if
    /// any) is refreshed.
    fn update(&self, changes: Self::Changes) -> Self;
}

/// The timestamp to use when a record is modified.
///
/// Never earlier than `previous`, so `updated_at` only moves forward even if
/// the system clock steps back.
pub(crate) fn touched(previous: OffsetDateTime) -> OffsetDateTime {
    OffsetDateTime::now_utc().max(previous)
}

/// Deserialize a present field as `Some`, including an explicit `null`.
///
/// Paired with `#[serde(default)]` this lets `Option<Option<T>>` fields tell
/// apart "leave unchanged" (field absent) from "clear" (field is `null`).
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");
