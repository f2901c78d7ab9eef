//! This file defines the type `Transaction`, the core type of the budgeting part of the
//! application.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    EntityId,
    models::{Entity, iso_date},
    schema::{Validate, ValidationErrors, Validator},
};

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    #[serde(alias = "receita")]
    Income,
    /// Money spent.
    #[serde(alias = "despesa")]
    Expense,
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The amount is always positive; [Transaction::transaction_type] carries the
/// direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The identity of the transaction.
    pub id: EntityId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category that classifies the transaction.
    pub category_id: EntityId,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl Transaction {
    /// The amount with its sign: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// The data needed to create a [Transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category that classifies the transaction.
    pub category_id: EntityId,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
}

/// The fields of a [Transaction] to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransactionChanges {
    /// A new description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// A new amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// A new direction.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// A new category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    /// A new date.
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
}

impl Validate for Transaction {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .identity("id", &self.id)
            .non_empty("description", self.description.as_str())
            .positive("amount", self.amount)
            .identity("categoryId", &self.category_id)
            .finish()
    }
}

impl Validate for NewTransaction {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .non_empty("description", self.description.as_str())
            .positive("amount", self.amount)
            .identity("categoryId", &self.category_id)
            .finish()
    }
}

impl Validate for TransactionChanges {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .non_empty("description", self.description.as_deref())
            .positive("amount", self.amount)
            .identity("categoryId", self.category_id.as_ref())
            .finish()
    }
}

impl Entity for Transaction {
    type Draft = NewTransaction;
    type Changes = TransactionChanges;

    const COLLECTION: &'static str = "transactions";
    const LABEL: &'static str = "Transaction";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn create(draft: NewTransaction) -> Self {
        Self {
            id: EntityId::generate(),
            description: draft.description,
            amount: draft.amount,
            transaction_type: draft.transaction_type,
            category_id: draft.category_id,
            date: draft.date,
        }
    }

    fn update(&self, changes: TransactionChanges) -> Self {
        Self {
            id: self.id.clone(),
            description: changes
                .description
                .unwrap_or_else(|| self.description.clone()),
            amount: changes.amount.unwrap_or(self.amount),
            transaction_type: changes.transaction_type.unwrap_or(self.transaction_type),
            category_id: changes
                .category_id
                .unwrap_or_else(|| self.category_id.clone()),
            date: changes.date.unwrap_or(self.date),
        }
    }
}

#[cfg(test)]
mod transaction_tests {
    use time::macros::date;

    use crate::{
        EntityId,
        models::Entity,
        schema::{Validate, decode},
    };

    use super::{NewTransaction, Transaction, TransactionChanges, TransactionType};

    fn new_transaction() -> NewTransaction {
        NewTransaction {
            description: "Coffee beans".to_owned(),
            amount: 12.5,
            transaction_type: TransactionType::Expense,
            category_id: EntityId::new_unchecked("3"),
            date: date!(2025 - 03 - 14),
        }
    }

    #[test]
    fn create_preserves_provided_fields() {
        let draft = new_transaction();

        let transaction = Transaction::create(draft.clone());

        assert!(transaction.id.is_well_formed());
        assert_eq!(transaction.description, draft.description);
        assert_eq!(transaction.amount, draft.amount);
        assert_eq!(transaction.transaction_type, draft.transaction_type);
        assert_eq!(transaction.category_id, draft.category_id);
        assert_eq!(transaction.date, draft.date);
        assert_eq!(transaction.validate(), Ok(()));
    }

    #[test]
    fn zero_amount_fails_validation() {
        let draft = NewTransaction {
            amount: 0.0,
            ..new_transaction()
        };

        assert!(draft.validate().unwrap_err().has_field("amount"));
    }

    #[test]
    fn update_overwrites_only_given_fields() {
        let transaction = Transaction::create(new_transaction());

        let updated = transaction.update(TransactionChanges {
            amount: Some(20.0),
            ..Default::default()
        });

        assert_eq!(updated.amount, 20.0);
        assert_eq!(updated.id, transaction.id);
        assert_eq!(updated.description, transaction.description);
        assert_eq!(updated.date, transaction.date);
    }

    #[test]
    fn signed_amount_is_negative_for_expenses() {
        let transaction = Transaction::create(new_transaction());

        assert_eq!(transaction.signed_amount(), -12.5);
    }

    #[test]
    fn decode_reads_iso_dates() {
        let draft: NewTransaction = decode(
            r#"{"description": "Invoice 12", "amount": 300, "type": "receita",
                "categoryId": "1", "date": "2025-01-31"}"#,
        )
        .unwrap();

        assert_eq!(draft.date, date!(2025 - 01 - 31));
        assert_eq!(draft.transaction_type, TransactionType::Income);
    }

    #[test]
    fn changes_serialize_only_present_fields() {
        let changes = TransactionChanges {
            date: Some(date!(2025 - 02 - 01)),
            ..Default::default()
        };

        let json = serde_json::to_string(&changes).unwrap();

        assert_eq!(json, r#"{"date":"2025-02-01"}"#);
    }
}
