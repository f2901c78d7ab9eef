//! Defines the `Investment` type and its append-only `InvestmentReturn` records.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    EntityId,
    models::{Entity, deserialize_some, iso_date, touched},
    schema::{Validate, ValidationErrors, Validator},
};

/// Money put into an investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    /// The identity of the investment.
    pub id: EntityId,
    /// The display name.
    pub name: String,
    /// The amount invested.
    pub amount: f64,
    /// The category that classifies the investment.
    pub category_id: EntityId,
    /// Free-form notes.
    #[serde(default)]
    pub description: Option<String>,
    /// The sum of the returns recorded for this investment.
    pub total_returns: f64,
    /// When the investment was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the investment was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The data needed to create an [Investment].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewInvestment {
    /// The display name.
    pub name: String,
    /// The amount invested.
    pub amount: f64,
    /// The category that classifies the investment.
    pub category_id: EntityId,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The fields of an [Investment] to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InvestmentChanges {
    /// A new display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A new invested amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// A new category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    /// New notes; `Some(None)` clears them.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    /// A new total of returns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_returns: Option<f64>,
}

impl Validate for Investment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .identity("id", &self.id)
            .non_empty("name", self.name.as_str())
            .positive("amount", self.amount)
            .identity("categoryId", &self.category_id)
            .non_negative("totalReturns", self.total_returns)
            .finish()
    }
}

impl Validate for NewInvestment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .non_empty("name", self.name.as_str())
            .positive("amount", self.amount)
            .identity("categoryId", &self.category_id)
            .finish()
    }
}

impl Validate for InvestmentChanges {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .non_empty("name", self.name.as_deref())
            .positive("amount", self.amount)
            .identity("categoryId", self.category_id.as_ref())
            .non_negative("totalReturns", self.total_returns)
            .finish()
    }
}

impl Entity for Investment {
    type Draft = NewInvestment;
    type Changes = InvestmentChanges;

    const COLLECTION: &'static str = "investments";
    const LABEL: &'static str = "Investment";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn create(draft: NewInvestment) -> Self {
        let now = OffsetDateTime::now_utc();

        Self {
            id: EntityId::generate(),
            name: draft.name,
            amount: draft.amount,
            category_id: draft.category_id,
            description: draft.description,
            total_returns: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    fn update(&self, changes: InvestmentChanges) -> Self {
        Self {
            id: self.id.clone(),
            name: changes.name.unwrap_or_else(|| self.name.clone()),
            amount: changes.amount.unwrap_or(self.amount),
            category_id: changes
                .category_id
                .unwrap_or_else(|| self.category_id.clone()),
            description: changes
                .description
                .unwrap_or_else(|| self.description.clone()),
            total_returns: changes.total_returns.unwrap_or(self.total_returns),
            created_at: self.created_at,
            updated_at: touched(self.updated_at),
        }
    }
}

/// A return earned by an [Investment], e.g. a dividend or interest payment.
///
/// Returns are append-only: they are recorded and deleted, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentReturn {
    /// The identity of the return.
    pub id: EntityId,
    /// The investment that earned the return.
    pub investment_id: EntityId,
    /// The amount earned.
    pub amount: f64,
    /// When the return was paid.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// When the return was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The data needed to record an [InvestmentReturn].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewInvestmentReturn {
    /// The investment that earned the return.
    pub investment_id: EntityId,
    /// The amount earned.
    pub amount: f64,
    /// When the return was paid.
    #[serde(with = "iso_date")]
    pub date: Date,
}

/// Investment returns cannot be edited, so there is nothing to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvestmentReturnChanges {}

impl Validate for InvestmentReturn {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .identity("id", &self.id)
            .identity("investmentId", &self.investment_id)
            .positive("amount", self.amount)
            .finish()
    }
}

impl Validate for NewInvestmentReturn {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .identity("investmentId", &self.investment_id)
            .positive("amount", self.amount)
            .finish()
    }
}

impl Validate for InvestmentReturnChanges {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl Entity for InvestmentReturn {
    type Draft = NewInvestmentReturn;
    type Changes = InvestmentReturnChanges;

    const COLLECTION: &'static str = "investment_returns";
    const LABEL: &'static str = "Investment return";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn create(draft: NewInvestmentReturn) -> Self {
        Self {
            id: EntityId::generate(),
            investment_id: draft.investment_id,
            amount: draft.amount,
            date: draft.date,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn update(&self, _changes: InvestmentReturnChanges) -> Self {
        self.clone()
    }
}
