//! Controllers bridge user intent to a [ServiceAdapter].
//!
//! Every operation absorbs validation and backend failures: callers get a
//! record, an empty list, `None` or an [Outcome], never an error. Mutations
//! and failed reads also emit one notification through the injected
//! [Notifier].

use std::sync::Arc;

use crate::{
    EntityId,
    adapter::{AdapterError, ServiceAdapter},
    alert::Notifier,
    models::{Budget, Entity, Transaction, User},
    outcome::{Action, Outcome},
    schema::Validate,
};

mod category;
mod goal;
mod investment;

pub use category::CategoryController;
pub use investment::InvestmentController;

/// Manages transactions.
pub type TransactionController = Controller<Transaction>;

/// Manages budgets.
pub type BudgetController = Controller<Budget>;

/// Manages goals, see [Controller::update_progress].
pub type GoalController = Controller<crate::models::Goal>;

/// Manages user profiles.
pub type UserController = Controller<User>;

/// Lists, reads, creates, updates and deletes the records of one entity type.
pub struct Controller<E: Entity> {
    adapter: Arc<dyn ServiceAdapter<E>>,
    notifier: Arc<dyn Notifier>,
}

impl<E: Entity> Clone for Controller<E> {
    fn clone(&self) -> Self {
        Self {
            adapter: self.adapter.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<E: Entity> Controller<E> {
    /// Create a controller that persists through `adapter` and reports to `notifier`.
    pub fn new(adapter: Arc<dyn ServiceAdapter<E>>, notifier: Arc<dyn Notifier>) -> Self {
        Self { adapter, notifier }
    }

    /// The adapter this controller persists through.
    pub fn adapter(&self) -> &Arc<dyn ServiceAdapter<E>> {
        &self.adapter
    }

    /// Get every record, or an empty list if the backend fails.
    ///
    /// A failure is notified; success is not.
    pub async fn list(&self) -> Vec<E> {
        self.load().await.unwrap_or_default()
    }

    /// Get every record, or `None` if the backend fails.
    ///
    /// Like [Controller::list], but lets the caller tell an empty collection
    /// apart from a failed read.
    pub async fn load(&self) -> Option<Vec<E>> {
        match self.adapter.get_all().await.into_result() {
            Ok(records) => Some(records.unwrap_or_default()),
            Err(error) => {
                tracing::error!("could not load {}: {error}", E::COLLECTION);
                self.notify(&Outcome::<()>::failed(Action::Load, E::LABEL));
                None
            }
        }
    }

    /// Get the record with identity `id`.
    ///
    /// Reads by identity run in the background, so failures are only logged.
    pub async fn get_by_id(&self, id: &EntityId) -> Option<E> {
        match self.adapter.get_by_id(id).await.into_result() {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!("could not get {} \"{id}\": {error}", E::COLLECTION);
                None
            }
        }
    }

    /// Create a record from `draft`.
    ///
    /// The draft is validated before anything is sent to the backend. On
    /// success the outcome carries the created record, identity included.
    pub async fn create(&self, draft: E::Draft) -> Outcome<E> {
        if let Err(errors) = draft.validate() {
            return self.reject(&errors);
        }

        let entity = E::create(draft);
        tracing::debug!("creating {} \"{}\"", E::COLLECTION, entity.id());

        let result = self
            .adapter
            .create(entity.clone())
            .await
            .into_result()
            .map(|created| created.unwrap_or(entity));

        self.conclude(Action::Create, result)
    }

    /// Overwrite the fields present in `changes` on the record with identity `id`.
    ///
    /// The stored record is read first so that rules spanning several fields,
    /// e.g. a goal's date order, are checked on the record as it would be
    /// stored.
    pub async fn update(&self, id: &EntityId, changes: E::Changes) -> Outcome<E> {
        if let Err(errors) = changes.validate() {
            return self.reject(&errors);
        }

        match self.fetch(id).await {
            Ok(current) => self.apply(&current, changes).await,
            Err(error) => self.conclude(Action::Update, Err(error)),
        }
    }

    /// Delete the record with identity `id`.
    pub async fn delete(&self, id: &EntityId) -> Outcome {
        tracing::debug!("deleting {} \"{id}\"", E::COLLECTION);
        let result = self.adapter.delete(id).await.into_result();

        self.conclude(Action::Delete, result)
    }

    /// Read the record with identity `id`, treating a missing record as an error.
    async fn fetch(&self, id: &EntityId) -> Result<E, AdapterError> {
        self.adapter
            .get_by_id(id)
            .await
            .into_result()?
            .ok_or_else(|| AdapterError::not_found(E::COLLECTION, id))
    }

    /// Send `changes` to the backend if `current` with them applied is still valid.
    async fn apply(&self, current: &E, changes: E::Changes) -> Outcome<E> {
        if let Err(errors) = current.update(changes.clone()).validate() {
            return self.reject(&errors);
        }

        let id = current.id();
        tracing::debug!("updating {} \"{id}\"", E::COLLECTION);
        let result = self.adapter.update(id, changes).await.into_result();

        self.conclude(Action::Update, result).flatten()
    }

    /// Decide, log and notify the outcome of a backend call.
    fn conclude<T>(&self, action: Action, result: Result<T, AdapterError>) -> Outcome<T> {
        if let Err(error) = &result {
            tracing::error!("could not {action} {}: {error}", E::LABEL.to_lowercase());
        }

        let outcome = Outcome::decide(action, E::LABEL, result);
        self.notify(&outcome);
        outcome
    }

    /// Notify and return the outcome of input that broke schema rules.
    fn reject<T>(&self, errors: &crate::ValidationErrors) -> Outcome<T> {
        tracing::debug!("rejected invalid {}: {errors}", E::LABEL.to_lowercase());

        let outcome = Outcome::invalid(E::LABEL, errors);
        self.notify(&outcome);
        outcome
    }

    fn notify<T>(&self, outcome: &Outcome<T>) {
        self.notifier.notify(outcome.notification());
    }
}

#[cfg(test)]
mod controller_tests {
    use std::sync::Arc;

    use time::macros::date;

    use crate::{
        EntityId, OutcomeKind,
        adapter::{AdapterError, MutationResponse},
        alert::RecordingNotifier,
        models::{
            Budget, BudgetChanges, BudgetPeriod, Entity, Goal, GoalChanges, NewBudget, NewGoal,
            NewTransaction, Transaction, TransactionType,
        },
        test_utils::{Call, ScriptedAdapter},
    };

    use super::Controller;

    fn new_budget() -> NewBudget {
        NewBudget {
            name: "Fuel".to_owned(),
            amount: 400.0,
            category_id: EntityId::new_unchecked("6"),
            period: BudgetPeriod::Monthly,
            description: None,
        }
    }

    fn controller<E: Entity>(
        adapter: &Arc<ScriptedAdapter<E>>,
        notifier: &Arc<RecordingNotifier>,
    ) -> Controller<E> {
        Controller::new(adapter.clone(), notifier.clone())
    }

    #[tokio::test]
    async fn list_returns_records_without_notifying() {
        let budget = Budget::create(new_budget());
        let adapter = Arc::new(ScriptedAdapter::with_records(vec![budget.clone()]));
        let notifier = Arc::new(RecordingNotifier::new());

        let budgets = controller(&adapter, &notifier).list().await;

        assert_eq!(budgets, vec![budget]);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn list_fails_soft_to_empty() {
        let adapter = Arc::new(ScriptedAdapter::<Budget>::failing(AdapterError::new("offline")));
        let notifier = Arc::new(RecordingNotifier::new());

        let budgets = controller(&adapter, &notifier).list().await;

        assert!(budgets.is_empty());
        assert_eq!(notifier.destructive_count(), 1);
    }

    #[tokio::test]
    async fn load_tells_failure_from_empty() {
        let notifier = Arc::new(RecordingNotifier::new());
        let empty = Arc::new(ScriptedAdapter::<Budget>::new());
        let failing = Arc::new(ScriptedAdapter::<Budget>::failing(AdapterError::new("offline")));

        assert_eq!(controller(&empty, &notifier).load().await, Some(vec![]));
        assert_eq!(controller(&failing, &notifier).load().await, None);
    }

    #[tokio::test]
    async fn get_by_id_failure_is_not_notified() {
        let adapter = Arc::new(ScriptedAdapter::<Budget>::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let budget = controller(&adapter, &notifier)
            .get_by_id(&EntityId::generate())
            .await;

        assert_eq!(budget, None);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn create_returns_created_record_and_notifies_once() {
        let adapter = Arc::new(ScriptedAdapter::<Budget>::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let outcome = controller(&adapter, &notifier).create(new_budget()).await;

        assert!(outcome.is_success());
        let created = outcome.into_data().unwrap();
        assert_eq!(created.spent_amount, 0.0);
        assert_eq!(adapter.create_count(), 1);
        assert_eq!(notifier.success_count(), 1);
        assert_eq!(notifier.destructive_count(), 0);
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_the_adapter() {
        let adapter = Arc::new(ScriptedAdapter::<Transaction>::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let draft = NewTransaction {
            description: String::new(),
            amount: -5.0,
            transaction_type: TransactionType::Expense,
            category_id: EntityId::new_unchecked("3"),
            date: date!(2025 - 05 - 01),
        };

        let outcome = controller(&adapter, &notifier).create(draft).await;

        assert_eq!(outcome.kind(), OutcomeKind::ValidationError);
        assert_eq!(
            outcome.message(),
            "description must not be empty; amount must be greater than zero"
        );
        assert!(adapter.calls().is_empty());
        assert_eq!(notifier.destructive_count(), 1);
    }

    #[tokio::test]
    async fn create_failure_returns_false_with_one_destructive_notification() {
        let adapter = Arc::new(ScriptedAdapter::<Budget>::failing(AdapterError::new("timeout")));
        let notifier = Arc::new(RecordingNotifier::new());

        let outcome = controller(&adapter, &notifier).create(new_budget()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.kind(), OutcomeKind::AdapterError);
        assert!(!outcome.message().contains("timeout"));
        assert_eq!(notifier.notifications().len(), 1);
        assert_eq!(notifier.destructive_count(), 1);
    }

    #[tokio::test]
    async fn update_sends_only_the_given_fields() {
        let budget = Budget::create(new_budget());
        let adapter = Arc::new(ScriptedAdapter::with_records(vec![budget.clone()]));
        let notifier = Arc::new(RecordingNotifier::new());
        let changes = BudgetChanges {
            spent_amount: Some(55.0),
            ..Default::default()
        };

        let outcome = controller(&adapter, &notifier)
            .update(&budget.id, changes.clone())
            .await;

        assert!(outcome.is_success());
        assert_eq!(adapter.update_calls(), vec![(budget.id.clone(), changes)]);
        let updated = outcome.into_data().unwrap();
        assert_eq!(updated.spent_amount, 55.0);
        assert_eq!(updated.name, budget.name);
        assert_eq!(notifier.success_count(), 1);
    }

    #[tokio::test]
    async fn invalid_update_is_rejected() {
        let budget = Budget::create(new_budget());
        let adapter = Arc::new(ScriptedAdapter::with_records(vec![budget.clone()]));
        let notifier = Arc::new(RecordingNotifier::new());
        let changes = BudgetChanges {
            spent_amount: Some(-1.0),
            ..Default::default()
        };

        let outcome = controller(&adapter, &notifier)
            .update(&budget.id, changes)
            .await;

        assert_eq!(outcome.kind(), OutcomeKind::ValidationError);
        assert!(adapter.update_calls().is_empty());
    }

    fn stored_goal() -> Goal {
        Goal::create(NewGoal {
            name: "Car".to_owned(),
            target_amount: 20_000.0,
            current_amount: None,
            start_date: date!(2025 - 06 - 01),
            target_date: date!(2025 - 12 - 01),
            description: None,
        })
    }

    #[tokio::test]
    async fn update_moving_target_date_before_stored_start_is_rejected() {
        let goal = stored_goal();
        let adapter = Arc::new(ScriptedAdapter::with_records(vec![goal.clone()]));
        let notifier = Arc::new(RecordingNotifier::new());
        let changes = GoalChanges {
            target_date: Some(date!(2025 - 01 - 01)),
            ..Default::default()
        };

        let outcome = controller(&adapter, &notifier)
            .update(&goal.id, changes)
            .await;

        assert_eq!(outcome.kind(), OutcomeKind::ValidationError);
        assert!(adapter.update_calls().is_empty());
        assert_eq!(notifier.destructive_count(), 1);
    }

    #[tokio::test]
    async fn update_moving_start_date_past_stored_target_is_rejected() {
        let goal = stored_goal();
        let adapter = Arc::new(ScriptedAdapter::with_records(vec![goal.clone()]));
        let notifier = Arc::new(RecordingNotifier::new());
        let changes = GoalChanges {
            start_date: Some(date!(2026 - 01 - 01)),
            ..Default::default()
        };

        let outcome = controller(&adapter, &notifier)
            .update(&goal.id, changes)
            .await;

        assert_eq!(outcome.kind(), OutcomeKind::ValidationError);
        assert!(outcome.message().contains("targetDate"));
        assert!(adapter.update_calls().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_record_fails_without_writing() {
        let adapter = Arc::new(ScriptedAdapter::<Budget>::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let outcome = controller(&adapter, &notifier)
            .update(&EntityId::generate(), BudgetChanges::default())
            .await;

        assert_eq!(outcome.kind(), OutcomeKind::AdapterError);
        assert!(adapter.update_calls().is_empty());
        assert_eq!(notifier.destructive_count(), 1);
    }

    #[tokio::test]
    async fn delete_not_found_returns_false_without_panicking() {
        let adapter = Arc::new(
            ScriptedAdapter::<Budget>::new().with_delete_response(MutationResponse {
                success: false,
                error: Some(AdapterError::new("not found")),
            }),
        );
        let notifier = Arc::new(RecordingNotifier::new());

        let outcome = controller(&adapter, &notifier)
            .delete(&EntityId::generate())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(notifier.notifications().len(), 1);
        assert_eq!(notifier.destructive_count(), 1);
    }

    #[tokio::test]
    async fn delete_unsuccessful_without_error_is_a_failure() {
        let adapter = Arc::new(
            ScriptedAdapter::<Budget>::new().with_delete_response(MutationResponse {
                success: false,
                error: None,
            }),
        );
        let notifier = Arc::new(RecordingNotifier::new());

        let outcome = controller(&adapter, &notifier)
            .delete(&EntityId::generate())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(notifier.destructive_count(), 1);
    }

    #[tokio::test]
    async fn delete_success_notifies_once() {
        let budget = Budget::create(new_budget());
        let adapter = Arc::new(ScriptedAdapter::with_records(vec![budget.clone()]));
        let notifier = Arc::new(RecordingNotifier::new());

        let outcome = controller(&adapter, &notifier).delete(&budget.id).await;

        assert!(outcome.is_success());
        assert_eq!(adapter.calls(), vec![Call::Delete(budget.id)]);
        assert_eq!(notifier.success_count(), 1);
    }
}
