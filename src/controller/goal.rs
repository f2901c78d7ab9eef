//! Goal specific controller operations.

use crate::{
    EntityId, Outcome,
    controller::Controller,
    models::{Goal, GoalChanges},
    outcome::Action,
    schema::ValidationErrors,
};

impl Controller<Goal> {
    /// Add `amount` to the amount saved towards a goal.
    ///
    /// The goal is read first and the sum is written back, so concurrent
    /// progress updates on the same goal may overwrite each other. A negative
    /// `amount` records a withdrawal, but the saved amount can never drop
    /// below zero.
    pub async fn update_progress(&self, id: &EntityId, amount: f64) -> Outcome<Goal> {
        if !amount.is_finite() {
            return self.reject(&ValidationErrors::single("amount", "must be a number"));
        }

        let goal = match self.fetch(id).await {
            Ok(goal) => goal,
            Err(error) => return self.conclude(Action::Update, Err(error)),
        };

        let changes = GoalChanges {
            current_amount: Some(goal.current_amount + amount),
            ..Default::default()
        };

        self.apply(&goal, changes).await
    }
}
