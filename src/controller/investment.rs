//! The investment controller, including the returns recorded for each investment.

use std::sync::Arc;

use crate::{
    EntityId, Outcome,
    adapter::{AdapterError, ServiceAdapter},
    alert::Notifier,
    controller::Controller,
    models::{
        Entity, Investment, InvestmentChanges, InvestmentReturn, NewInvestment,
        NewInvestmentReturn,
    },
    outcome::Action,
    schema::Validate,
};

/// Manages investments and their returns.
///
/// Recording or deleting a return keeps the parent's
/// [total_returns](Investment::total_returns) in step.
pub struct InvestmentController {
    investments: Controller<Investment>,
    returns: Controller<InvestmentReturn>,
}

impl InvestmentController {
    /// Create a controller persisting investments and returns through their own adapters.
    pub fn new(
        investments: Arc<dyn ServiceAdapter<Investment>>,
        returns: Arc<dyn ServiceAdapter<InvestmentReturn>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            investments: Controller::new(investments, notifier.clone()),
            returns: Controller::new(returns, notifier),
        }
    }

    /// Get every investment.
    pub async fn list(&self) -> Vec<Investment> {
        self.investments.list().await
    }

    /// Get the investment with identity `id`.
    pub async fn get_by_id(&self, id: &EntityId) -> Option<Investment> {
        self.investments.get_by_id(id).await
    }

    /// Create an investment.
    pub async fn create(&self, draft: NewInvestment) -> Outcome<Investment> {
        self.investments.create(draft).await
    }

    /// Overwrite the fields present in `changes` on an investment.
    pub async fn update(&self, id: &EntityId, changes: InvestmentChanges) -> Outcome<Investment> {
        self.investments.update(id, changes).await
    }

    /// Delete an investment.
    ///
    /// Its returns are left in place.
    pub async fn delete(&self, id: &EntityId) -> Outcome {
        self.investments.delete(id).await
    }

    /// Get the returns recorded for the investment with identity `investment_id`, oldest first.
    pub async fn list_returns(&self, investment_id: &EntityId) -> Vec<InvestmentReturn> {
        let mut returns: Vec<InvestmentReturn> = self
            .returns
            .list()
            .await
            .into_iter()
            .filter(|investment_return| &investment_return.investment_id == investment_id)
            .collect();

        returns.sort_by_key(|investment_return| investment_return.date);
        returns
    }

    /// Record a return and add it to the investment's total.
    pub async fn add_investment_return(
        &self,
        draft: NewInvestmentReturn,
    ) -> Outcome<InvestmentReturn> {
        if let Err(errors) = draft.validate() {
            return self.returns.reject(&errors);
        }

        let result = self.record_return(draft).await;
        self.returns.conclude(Action::Create, result)
    }

    /// Delete a return and take it off the investment's total.
    pub async fn delete_investment_return(&self, id: &EntityId) -> Outcome {
        let result = self.remove_return(id).await;
        self.returns.conclude(Action::Delete, result)
    }

    async fn fetch_investment(&self, id: &EntityId) -> Result<Investment, AdapterError> {
        self.investments
            .adapter()
            .get_by_id(id)
            .await
            .into_result()?
            .ok_or_else(|| AdapterError::not_found(Investment::COLLECTION, id))
    }

    async fn set_total_returns(
        &self,
        investment: &Investment,
        total_returns: f64,
    ) -> Result<(), AdapterError> {
        let changes = InvestmentChanges {
            total_returns: Some(total_returns.max(0.0)),
            ..Default::default()
        };

        self.investments
            .adapter()
            .update(&investment.id, changes)
            .await
            .into_result()
            .map(|_| ())
    }

    async fn record_return(
        &self,
        draft: NewInvestmentReturn,
    ) -> Result<InvestmentReturn, AdapterError> {
        let investment = self.fetch_investment(&draft.investment_id).await?;

        let investment_return = InvestmentReturn::create(draft);
        let created = self
            .returns
            .adapter()
            .create(investment_return.clone())
            .await
            .into_result()?
            .unwrap_or(investment_return);

        let total = investment.total_returns + created.amount;
        if let Err(error) = self.set_total_returns(&investment, total).await {
            tracing::error!(
                "could not add return \"{}\" to the total of investment \"{}\", removing it",
                created.id,
                investment.id
            );

            let undo = self.returns.adapter().delete(&created.id).await;
            if let Err(undo_error) = undo.into_result() {
                tracing::error!("could not remove return \"{}\": {undo_error}", created.id);
            }

            return Err(error);
        }

        Ok(created)
    }

    async fn remove_return(&self, id: &EntityId) -> Result<(), AdapterError> {
        let investment_return = self
            .returns
            .adapter()
            .get_by_id(id)
            .await
            .into_result()?
            .ok_or_else(|| AdapterError::not_found(InvestmentReturn::COLLECTION, id))?;
        let investment = self
            .fetch_investment(&investment_return.investment_id)
            .await?;

        self.returns.adapter().delete(id).await.into_result()?;

        let total = investment.total_returns - investment_return.amount;
        if let Err(error) = self.set_total_returns(&investment, total).await {
            tracing::error!(
                "could not take return \"{id}\" off the total of investment \"{}\", restoring it",
                investment.id
            );

            let undo = self.returns.adapter().create(investment_return).await;
            if let Err(undo_error) = undo.into_result() {
                tracing::error!("could not restore return \"{id}\": {undo_error}");
            }

            return Err(error);
        }

        Ok(())
    }
}

#[cfg(test)]
mod investment_controller_tests {
    use std::sync::Arc;

    use time::macros::date;

    use crate::{
        EntityId, OutcomeKind,
        adapter::{AdapterError, ServiceAdapter},
        alert::RecordingNotifier,
        models::{Entity, Investment, InvestmentReturn, NewInvestment, NewInvestmentReturn},
        test_utils::ScriptedAdapter,
    };

    use super::InvestmentController;

    struct Fixture {
        investment: Investment,
        investments: Arc<ScriptedAdapter<Investment>>,
        returns: Arc<ScriptedAdapter<InvestmentReturn>>,
        notifier: Arc<RecordingNotifier>,
        controller: InvestmentController,
    }

    fn fixture() -> Fixture {
        let investment = Investment::create(NewInvestment {
            name: "Index fund".to_owned(),
            amount: 2000.0,
            category_id: EntityId::new_unchecked("8"),
            description: None,
        });
        let investments = Arc::new(ScriptedAdapter::with_records(vec![investment.clone()]));
        let returns = Arc::new(ScriptedAdapter::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller =
            InvestmentController::new(investments.clone(), returns.clone(), notifier.clone());

        Fixture {
            investment,
            investments,
            returns,
            notifier,
            controller,
        }
    }

    fn new_return(investment_id: &EntityId, amount: f64) -> NewInvestmentReturn {
        NewInvestmentReturn {
            investment_id: investment_id.clone(),
            amount,
            date: date!(2025 - 04 - 30),
        }
    }

    #[tokio::test]
    async fn adding_a_return_updates_the_total() {
        let f = fixture();

        let outcome = f
            .controller
            .add_investment_return(new_return(&f.investment.id, 25.0))
            .await;

        assert!(outcome.is_success());
        let total = f
            .investments
            .get_by_id(&f.investment.id)
            .await
            .data
            .unwrap()
            .total_returns;
        assert_eq!(total, 25.0);
        assert_eq!(f.returns.create_count(), 1);
        assert_eq!(f.notifier.notifications().len(), 1);
        assert_eq!(f.notifier.success_count(), 1);
    }

    #[tokio::test]
    async fn returns_are_listed_per_investment_in_date_order() {
        let f = fixture();
        let late = NewInvestmentReturn {
            date: date!(2025 - 09 - 30),
            ..new_return(&f.investment.id, 10.0)
        };
        let first = f.controller.add_investment_return(late).await;
        let second = f
            .controller
            .add_investment_return(new_return(&f.investment.id, 5.0))
            .await;
        assert!(first.is_success() && second.is_success());

        let returns = f.controller.list_returns(&f.investment.id).await;

        let amounts: Vec<f64> = returns.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, [5.0, 10.0]);
        assert!(
            f.controller
                .list_returns(&EntityId::generate())
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn return_for_unknown_investment_fails() {
        let f = fixture();

        let outcome = f
            .controller
            .add_investment_return(new_return(&EntityId::generate(), 25.0))
            .await;

        assert_eq!(outcome.kind(), OutcomeKind::AdapterError);
        assert_eq!(f.returns.create_count(), 0);
        assert_eq!(f.notifier.destructive_count(), 1);
    }

    #[tokio::test]
    async fn invalid_return_is_rejected() {
        let f = fixture();

        let outcome = f
            .controller
            .add_investment_return(new_return(&f.investment.id, 0.0))
            .await;

        assert_eq!(outcome.kind(), OutcomeKind::ValidationError);
        assert!(f.investments.calls().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_return_reduces_the_total() {
        let f = fixture();
        let first = f
            .controller
            .add_investment_return(new_return(&f.investment.id, 25.0))
            .await
            .into_data()
            .unwrap();
        let second = f
            .controller
            .add_investment_return(new_return(&f.investment.id, 10.0))
            .await;
        assert!(second.is_success());

        let outcome = f.controller.delete_investment_return(&first.id).await;

        assert!(outcome.is_success());
        let investment = f.controller.get_by_id(&f.investment.id).await.unwrap();
        assert_eq!(investment.total_returns, 10.0);
        assert_eq!(f.controller.list_returns(&f.investment.id).await.len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_missing_return_fails_softly() {
        let f = fixture();

        let outcome = f
            .controller
            .delete_investment_return(&EntityId::generate())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(f.notifier.destructive_count(), 1);
    }

    #[tokio::test]
    async fn failed_total_update_leaves_no_return_behind() {
        let investment = fixture().investment;
        let investments = Arc::new(
            ScriptedAdapter::with_records(vec![investment.clone()])
                .with_update_failure(AdapterError::new("read only")),
        );
        let returns = Arc::new(ScriptedAdapter::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller =
            InvestmentController::new(investments.clone(), returns.clone(), notifier.clone());

        let outcome = controller
            .add_investment_return(new_return(&investment.id, 5.0))
            .await;

        assert!(!outcome.is_success());
        assert_eq!(returns.get_all().await.data, Some(vec![]));
        assert_eq!(notifier.destructive_count(), 1);
        assert_eq!(notifier.notifications().len(), 1);
    }

    #[tokio::test]
    async fn failed_total_update_restores_deleted_return() {
        let investment = fixture().investment;
        let investment_return = InvestmentReturn::create(new_return(&investment.id, 5.0));
        let investments = Arc::new(
            ScriptedAdapter::with_records(vec![investment.clone()])
                .with_update_failure(AdapterError::new("read only")),
        );
        let returns = Arc::new(ScriptedAdapter::with_records(vec![
            investment_return.clone(),
        ]));
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = InvestmentController::new(investments, returns.clone(), notifier.clone());

        let outcome = controller
            .delete_investment_return(&investment_return.id)
            .await;

        assert!(!outcome.is_success());
        assert_eq!(
            returns.get_all().await.data,
            Some(vec![investment_return])
        );
        assert_eq!(notifier.destructive_count(), 1);
    }

    #[tokio::test]
    async fn returns_backend_failure_is_absorbed() {
        let investment = fixture().investment;
        let investments = Arc::new(ScriptedAdapter::with_records(vec![investment.clone()]));
        let returns = Arc::new(ScriptedAdapter::failing(AdapterError::new("offline")));
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = InvestmentController::new(investments.clone(), returns, notifier.clone());

        let outcome = controller
            .add_investment_return(new_return(&investment.id, 25.0))
            .await;

        assert!(!outcome.is_success());
        assert!(investments.update_calls().is_empty());
        assert_eq!(notifier.destructive_count(), 1);
    }
}
