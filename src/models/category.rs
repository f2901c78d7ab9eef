//! This file defines the `Category` type and the types needed to create and update a category.
//! A category classifies transactions, budgets and investments.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    EntityId,
    models::Entity,
    schema::{Validate, ValidationErrors, Validator},
};

/// The kind of money movement a category applies to.
///
/// Portuguese names are accepted as aliases on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money coming in.
    #[serde(alias = "receita")]
    Income,
    /// Money going out.
    #[serde(alias = "despesa")]
    Expense,
    /// Either direction.
    #[serde(alias = "ambos")]
    Both,
    /// Money set aside in an investment.
    #[serde(alias = "investimento")]
    Investment,
}

impl CategoryType {
    /// The canonical name of the category type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
            CategoryType::Both => "both",
            CategoryType::Investment => "investment",
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "receita" => Ok(CategoryType::Income),
            "expense" | "despesa" => Ok(CategoryType::Expense),
            "both" | "ambos" => Ok(CategoryType::Both),
            "investment" | "investimento" => Ok(CategoryType::Investment),
            _ => Err(ValidationErrors::single(
                "type",
                format!("must be one of income, expense, both or investment, got \"{s}\""),
            )),
        }
    }
}

/// A category for expenses and income, e.g., 'Groceries', 'Rent', 'Sales'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The identity of the category.
    pub id: EntityId,
    /// The display name.
    pub name: String,
    /// What kind of money movement the category classifies.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl Category {
    /// Create a category with a fixed identity, as used by fixtures.
    pub fn new(id: &str, name: &str, category_type: CategoryType) -> Self {
        Self {
            id: EntityId::new_unchecked(id),
            name: name.to_owned(),
            category_type,
        }
    }
}

/// The data needed to create a [Category].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCategory {
    /// The display name.
    pub name: String,
    /// What kind of money movement the category classifies.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl NewCategory {
    /// Create a draft for a new category.
    pub fn new(name: &str, category_type: CategoryType) -> Self {
        Self {
            name: name.to_owned(),
            category_type,
        }
    }
}

/// The fields of a [Category] to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryChanges {
    /// A new display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A new category type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub category_type: Option<CategoryType>,
}

impl Validate for Category {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .identity("id", &self.id)
            .non_empty("name", self.name.as_str())
            .finish()
    }
}

impl Validate for NewCategory {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .non_empty("name", self.name.as_str())
            .finish()
    }
}

impl Validate for CategoryChanges {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .non_empty("name", self.name.as_deref())
            .finish()
    }
}

impl Entity for Category {
    type Draft = NewCategory;
    type Changes = CategoryChanges;

    const COLLECTION: &'static str = "categories";
    const LABEL: &'static str = "Category";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn create(draft: NewCategory) -> Self {
        Self {
            id: EntityId::generate(),
            name: draft.name,
            category_type: draft.category_type,
        }
    }

    fn update(&self, changes: CategoryChanges) -> Self {
        Self {
            id: self.id.clone(),
            name: changes.name.unwrap_or_else(|| self.name.clone()),
            category_type: changes.category_type.unwrap_or(self.category_type),
        }
    }
}

/// The categories seeded for new MEI (micro-entrepreneur) users, in order.
///
/// This is a fixed fixture: the identities "1" to "9" and the names never
/// change.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("1", "Vendas", CategoryType::Income),
        Category::new("2", "Serviços", CategoryType::Income),
        Category::new("3", "Fornecedores", CategoryType::Expense),
        Category::new("4", "Impostos", CategoryType::Expense),
        Category::new("5", "Aluguel", CategoryType::Expense),
        Category::new("6", "Transporte", CategoryType::Expense),
        Category::new("7", "Marketing", CategoryType::Expense),
        Category::new("8", "Equipamentos", CategoryType::Investment),
        Category::new("9", "Outros", CategoryType::Both),
    ]
}
