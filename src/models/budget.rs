//! Defines the `Budget` type: a spending limit for a category over a period.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    EntityId,
    models::{Entity, deserialize_some, touched},
    schema::{Validate, ValidationErrors, Validator},
};

/// How often a budget resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// Resets every calendar month.
    #[serde(alias = "mensal")]
    Monthly,
    /// Resets every calendar year.
    #[serde(alias = "anual")]
    Yearly,
}

/// A spending limit for a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The identity of the budget.
    pub id: EntityId,
    /// The display name.
    pub name: String,
    /// The limit for one period.
    pub amount: f64,
    /// The category the limit applies to.
    pub category_id: EntityId,
    /// How much has been spent so far in the current period.
    pub spent_amount: f64,
    /// How often the budget resets.
    pub period: BudgetPeriod,
    /// Free-form notes.
    #[serde(default)]
    pub description: Option<String>,
    /// When the budget was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the budget was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The data needed to create a [Budget].
///
/// New budgets always start with nothing spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBudget {
    /// The display name.
    pub name: String,
    /// The limit for one period.
    pub amount: f64,
    /// The category the limit applies to.
    pub category_id: EntityId,
    /// How often the budget resets.
    pub period: BudgetPeriod,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The fields of a [Budget] to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BudgetChanges {
    /// A new display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A new limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// A new category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    /// A new spent amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent_amount: Option<f64>,
    /// A new period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetPeriod>,
    /// New notes; `Some(None)` clears them.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

impl Validate for Budget {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .identity("id", &self.id)
            .non_empty("name", self.name.as_str())
            .positive("amount", self.amount)
            .identity("categoryId", &self.category_id)
            .non_negative("spentAmount", self.spent_amount)
            .finish()
    }
}

impl Validate for NewBudget {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .non_empty("name", self.name.as_str())
            .positive("amount", self.amount)
            .identity("categoryId", &self.category_id)
            .finish()
    }
}

impl Validate for BudgetChanges {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .non_empty("name", self.name.as_deref())
            .positive("amount", self.amount)
            .identity("categoryId", self.category_id.as_ref())
            .non_negative("spentAmount", self.spent_amount)
            .finish()
    }
}

impl Entity for Budget {
    type Draft = NewBudget;
    type Changes = BudgetChanges;

    const COLLECTION: &'static str = "budgets";
    const LABEL: &'static str = "Budget";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn create(draft: NewBudget) -> Self {
        let now = OffsetDateTime::now_utc();

        Self {
            id: EntityId::generate(),
            name: draft.name,
            amount: draft.amount,
            category_id: draft.category_id,
            spent_amount: 0.0,
            period: draft.period,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }

    fn update(&self, changes: BudgetChanges) -> Self {
        Self {
            id: self.id.clone(),
            name: changes.name.unwrap_or_else(|| self.name.clone()),
            amount: changes.amount.unwrap_or(self.amount),
            category_id: changes
                .category_id
                .unwrap_or_else(|| self.category_id.clone()),
            spent_amount: changes.spent_amount.unwrap_or(self.spent_amount),
            period: changes.period.unwrap_or(self.period),
            description: changes
                .description
                .unwrap_or_else(|| self.description.clone()),
            created_at: self.created_at,
            updated_at: touched(self.updated_at),
        }
    }
}
