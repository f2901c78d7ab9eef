//! Defines the `Goal` type: an amount of money to save by a target date.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    EntityId,
    models::{Entity, deserialize_some, iso_date, touched},
    schema::{Validate, ValidationErrors, Validator},
};

/// A savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// The identity of the goal.
    pub id: EntityId,
    /// The display name.
    pub name: String,
    /// How much money the goal needs.
    pub target_amount: f64,
    /// How much money has been saved so far.
    pub current_amount: f64,
    /// When saving started.
    #[serde(with = "iso_date")]
    pub start_date: Date,
    /// When the target amount should be reached.
    #[serde(with = "iso_date")]
    pub target_date: Date,
    /// Free-form notes.
    #[serde(default)]
    pub description: Option<String>,
    /// When the goal was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the goal was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The data needed to create a [Goal].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewGoal {
    /// The display name.
    pub name: String,
    /// How much money the goal needs.
    pub target_amount: f64,
    /// Money already saved; zero when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<f64>,
    /// When saving starts.
    #[serde(with = "iso_date")]
    pub start_date: Date,
    /// When the target amount should be reached.
    #[serde(with = "iso_date")]
    pub target_date: Date,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The fields of a [Goal] to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GoalChanges {
    /// A new display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A new target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    /// A new saved amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<f64>,
    /// A new start date.
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    /// A new target date.
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub target_date: Option<Date>,
    /// New notes; `Some(None)` clears them.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

fn check_dates(validator: Validator, start: Option<Date>, target: Option<Date>) -> Validator {
    let in_order = match (start, target) {
        (Some(start), Some(target)) => target >= start,
        _ => true,
    };

    validator.check(in_order, "targetDate", "must not be before the start date")
}

impl Validate for Goal {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let validator = Validator::new()
            .identity("id", &self.id)
            .non_empty("name", self.name.as_str())
            .positive("targetAmount", self.target_amount)
            .non_negative("currentAmount", self.current_amount);

        check_dates(validator, Some(self.start_date), Some(self.target_date)).finish()
    }
}

impl Validate for NewGoal {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let validator = Validator::new()
            .non_empty("name", self.name.as_str())
            .positive("targetAmount", self.target_amount)
            .non_negative("currentAmount", self.current_amount);

        check_dates(validator, Some(self.start_date), Some(self.target_date)).finish()
    }
}

impl Validate for GoalChanges {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let validator = Validator::new()
            .non_empty("name", self.name.as_deref())
            .positive("targetAmount", self.target_amount)
            .non_negative("currentAmount", self.current_amount);

        check_dates(validator, self.start_date, self.target_date).finish()
    }
}

impl Entity for Goal {
    type Draft = NewGoal;
    type Changes = GoalChanges;

    const COLLECTION: &'static str = "goals";
    const LABEL: &'static str = "Goal";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn create(draft: NewGoal) -> Self {
        let now = OffsetDateTime::now_utc();

        Self {
            id: EntityId::generate(),
            name: draft.name,
            target_amount: draft.target_amount,
            current_amount: draft.current_amount.unwrap_or(0.0),
            start_date: draft.start_date,
            target_date: draft.target_date,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }

    fn update(&self, changes: GoalChanges) -> Self {
        Self {
            id: self.id.clone(),
            name: changes.name.unwrap_or_else(|| self.name.clone()),
            target_amount: changes.target_amount.unwrap_or(self.target_amount),
            current_amount: changes.current_amount.unwrap_or(self.current_amount),
            start_date: changes.start_date.unwrap_or(self.start_date),
            target_date: changes.target_date.unwrap_or(self.target_date),
            description: changes
                .description
                .unwrap_or_else(|| self.description.clone()),
            created_at: self.created_at,
            updated_at: touched(self.updated_at),
        }
    }
}
