//! Aggregates over already fetched records for dashboards and reports.
//!
//! Everything here is a pure function: fetch the records through the
//! controllers first, then summarise them.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use time::Date;

use crate::{
    EntityId,
    models::{Budget, Category, Goal, Transaction, TransactionType, iso_date},
};

/// The label used for expenses whose category no longer exists.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Income and expense totals over a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses, as a positive number.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// How many transactions were summarised.
    pub transaction_count: usize,
}

/// The expenses booked against one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The category, or `None` for [UNCATEGORIZED_LABEL].
    pub category_id: Option<EntityId>,
    /// The category name.
    pub name: String,
    /// The summed expenses, as a positive number.
    pub total: f64,
}

/// Income and expenses of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    /// The first day of the month.
    #[serde(with = "iso_date")]
    pub month: Date,
    /// The sum of income in the month.
    pub income: f64,
    /// The sum of expenses in the month, as a positive number.
    pub expenses: f64,
}

impl MonthlyTotal {
    /// Income minus expenses.
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// How much of a budget has been used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    /// The amount left to spend, negative when over budget.
    pub remaining: f64,
    /// The fraction of the budget spent, e.g. 0.5 for half.
    pub ratio_spent: f64,
    /// Whether more than the budgeted amount has been spent.
    pub over_budget: bool,
}

/// Sum the income and expenses of `transactions`.
pub fn summarize_transactions(transactions: &[Transaction]) -> TransactionSummary {
    let mut summary = TransactionSummary {
        transaction_count: transactions.len(),
        ..Default::default()
    };

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => summary.total_income += transaction.amount,
            TransactionType::Expense => summary.total_expenses += transaction.amount,
        }
    }

    summary.balance = summary.total_income - summary.total_expenses;
    summary
}

/// Total the expenses of `transactions` per category, largest first.
///
/// Expenses pointing at a category missing from `categories` are grouped
/// under [UNCATEGORIZED_LABEL]. Ties are ordered by name.
pub fn expenses_by_category(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    let names: HashMap<&EntityId, &str> = categories
        .iter()
        .map(|category| (&category.id, category.name.as_str()))
        .collect();

    let mut totals: HashMap<Option<&EntityId>, f64> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
    {
        let key = names
            .contains_key(&transaction.category_id)
            .then_some(&transaction.category_id);
        *totals.entry(key).or_insert(0.0) += transaction.amount;
    }

    let mut totals: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category_id, total)| CategoryTotal {
            name: category_id
                .and_then(|id| names.get(id).copied())
                .unwrap_or(UNCATEGORIZED_LABEL)
                .to_owned(),
            category_id: category_id.cloned(),
            total,
        })
        .collect();

    totals.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    totals
}

/// Total income and expenses per calendar month, oldest month first.
///
/// Months without transactions are left out.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<Date, MonthlyTotal> = BTreeMap::new();

    for transaction in transactions {
        let month = first_of_month(transaction.date);
        let total = months.entry(month).or_insert(MonthlyTotal {
            month,
            income: 0.0,
            expenses: 0.0,
        });

        match transaction.transaction_type {
            TransactionType::Income => total.income += transaction.amount,
            TransactionType::Expense => total.expenses += transaction.amount,
        }
    }

    months.into_values().collect()
}

fn first_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

/// How much of `budget` has been spent.
pub fn budget_usage(budget: &Budget) -> BudgetUsage {
    let ratio_spent = if budget.amount > 0.0 {
        budget.spent_amount / budget.amount
    } else {
        0.0
    };

    BudgetUsage {
        remaining: budget.amount - budget.spent_amount,
        ratio_spent,
        over_budget: budget.spent_amount > budget.amount,
    }
}

/// The percentage of the target amount saved towards `goal`, between 0 and 100.
pub fn goal_progress(goal: &Goal) -> f64 {
    if goal.target_amount <= 0.0 {
        return 0.0;
    }

    (goal.current_amount / goal.target_amount * 100.0).clamp(0.0, 100.0)
}
