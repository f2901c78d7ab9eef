//! The result of a controller operation, decided without side effects.
//!
//! An [Outcome] says what happened and carries the user-facing wording for it. Whoever holds
//! it decides how to present it; controllers forward [Outcome::notification] to their
//! [Notifier](crate::alert::Notifier).

use std::fmt::Display;

use crate::{adapter::AdapterError, alert::Notification, schema::ValidationErrors};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The operation took effect.
    Success,
    /// The input broke a schema rule, nothing was sent to the backend.
    ValidationError,
    /// The backend reported a failure.
    AdapterError,
}

/// The user intent behind an operation, used to word messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Reading records.
    Load,
    /// Creating a record.
    Create,
    /// Changing a record.
    Update,
    /// Deleting a record.
    Delete,
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Action::Load => "load",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            Action::Load => "loaded",
            Action::Create => "created",
            Action::Update => "updated",
            Action::Delete => "deleted",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.verb())
    }
}

/// The result of a controller operation.
///
/// `T` is the record produced by the operation, `()` for operations that produce nothing.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Outcome<T = ()> {
    kind: OutcomeKind,
    title: String,
    message: String,
    data: Option<T>,
}

impl<T> Outcome<T> {
    /// Decide the outcome of `action` on a record of type `label` from the backend's answer.
    ///
    /// Backend error details are not included in the message; log them separately.
    pub fn decide(action: Action, label: &str, result: Result<T, AdapterError>) -> Self {
        match result {
            Ok(data) => Self {
                kind: OutcomeKind::Success,
                title: format!("{label} {}", action.past_tense()),
                message: format!(
                    "The {} was {} successfully.",
                    label.to_lowercase(),
                    action.past_tense()
                ),
                data: Some(data),
            },
            Err(_) => Self::failed(action, label),
        }
    }

    /// The outcome of `action` when the backend failed.
    pub fn failed(action: Action, label: &str) -> Self {
        Self {
            kind: OutcomeKind::AdapterError,
            title: "Error".to_owned(),
            message: format!(
                "Could not {} the {}. Please try again.",
                action.verb(),
                label.to_lowercase()
            ),
            data: None,
        }
    }

    /// The outcome of an operation whose input broke schema rules.
    pub fn invalid(label: &str, errors: &ValidationErrors) -> Self {
        Self {
            kind: OutcomeKind::ValidationError,
            title: format!("Invalid {}", label.to_lowercase()),
            message: errors.to_string(),
            data: None,
        }
    }

    /// What happened.
    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    /// Whether the operation took effect.
    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }

    /// A short headline describing the outcome.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// A user-facing sentence describing the outcome.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The record produced by the operation, if it succeeded.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Take the record produced by the operation, if it succeeded.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Change the record carried by a successful outcome, keeping the wording.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            kind: self.kind,
            title: self.title,
            message: self.message,
            data: self.data.map(f),
        }
    }

    /// The notification to show for this outcome.
    pub fn notification(&self) -> Notification {
        match self.kind {
            OutcomeKind::Success => Notification::success(&self.title, &self.message),
            OutcomeKind::ValidationError | OutcomeKind::AdapterError => {
                Notification::error(&self.title, &self.message)
            }
        }
    }
}

impl<T> Outcome<Option<T>> {
    /// Collapse a successful outcome that may not carry a record.
    pub fn flatten(self) -> Outcome<T> {
        Outcome {
            kind: self.kind,
            title: self.title,
            message: self.message,
            data: self.data.flatten(),
        }
    }
}

#[cfg(test)]
mod outcome_tests {
    use crate::{
        adapter::AdapterError, alert::NotificationVariant, schema::ValidationErrors,
    };

    use super::{Action, Outcome, OutcomeKind};

    #[test]
    fn success_carries_data_and_confirming_notification() {
        let outcome = Outcome::decide(Action::Create, "Category", Ok(7));

        assert!(outcome.is_success());
        assert_eq!(outcome.data(), Some(&7));
        assert_eq!(outcome.title(), "Category created");
        assert_eq!(
            outcome.notification().variant,
            NotificationVariant::Default
        );
    }

    #[test]
    fn adapter_failure_hides_backend_detail() {
        let outcome: Outcome<i32> = Outcome::decide(
            Action::Delete,
            "Goal",
            Err(AdapterError::new("relation \"goals\" does not exist")),
        );

        assert_eq!(outcome.kind(), OutcomeKind::AdapterError);
        assert_eq!(outcome.message(), "Could not delete the goal. Please try again.");
        assert!(outcome.notification().is_destructive());
        assert_eq!(outcome.into_data(), None);
    }

    #[test]
    fn validation_failure_lists_the_messages() {
        let errors = ValidationErrors::single("name", "must not be empty");

        let outcome: Outcome = Outcome::invalid("Budget", &errors);

        assert_eq!(outcome.kind(), OutcomeKind::ValidationError);
        assert_eq!(outcome.title(), "Invalid budget");
        assert_eq!(outcome.message(), "name must not be empty");
        assert!(outcome.notification().is_destructive());
    }

    #[test]
    fn map_keeps_the_wording() {
        let outcome = Outcome::decide(Action::Update, "Goal", Ok(1)).map(|n| n + 1);

        assert_eq!(outcome.title(), "Goal updated");
        assert_eq!(outcome.into_data(), Some(2));
    }
}
