use serde::Serialize;

use crate::error::FormError;
use crate::validation::FormErrors;

/// Lifecycle of a form submission.
///
/// Idle -> Invalid | Submitting -> Submitted, with `reset` returning to Idle
/// from anywhere. A form that is submitting cannot be resubmitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum FormState<T> {
    Idle,
    Invalid(FormErrors),
    Submitting,
    Submitted(T),
}

impl<T> Default for FormState<T> {
    fn default() -> Self {
        FormState::Idle
    }
}

impl<T> FormState<T> {
    pub fn name(&self) -> &'static str {
        match self {
            FormState::Idle => "idle",
            FormState::Invalid(_) => "invalid",
            FormState::Submitting => "submitting",
            FormState::Submitted(_) => "submitted",
        }
    }

    /// Apply a validation outcome. Valid input moves to Submitting and
    /// returns the validated value for the caller to send.
    pub fn validated<V>(&mut self, result: Result<V, FormErrors>) -> Result<Option<V>, FormError> {
        match self {
            FormState::Idle | FormState::Invalid(_) => {}
            other => {
                return Err(FormError::InvalidTransition {
                    action: "submit",
                    state: other.name(),
                })
            }
        }

        match result {
            Ok(value) => {
                *self = FormState::Submitting;
                Ok(Some(value))
            }
            Err(errors) => {
                *self = FormState::Invalid(errors);
                Ok(None)
            }
        }
    }

    /// Finish a submission in flight.
    pub fn complete(&mut self, confirmation: T) -> Result<(), FormError> {
        match self {
            FormState::Submitting => {
                *self = FormState::Submitted(confirmation);
                Ok(())
            }
            other => Err(FormError::InvalidTransition {
                action: "complete",
                state: other.name(),
            }),
        }
    }

    /// Back to a blank form.
    pub fn reset(&mut self) {
        *self = FormState::Idle;
    }

    pub fn errors(&self) -> Option<&FormErrors> {
        match self {
            FormState::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn some_errors() -> FormErrors {
        let mut errors = FormErrors::new();
        errors.push("email", ValidationError::InvalidEmail);
        errors
    }

    #[test]
    fn test_happy_path() {
        let mut state: FormState<&str> = FormState::default();
        assert_eq!(state.name(), "idle");

        let value = state.validated(Ok::<_, FormErrors>(42)).unwrap();
        assert_eq!(value, Some(42));
        assert_eq!(state, FormState::Submitting);

        state.complete("booked").unwrap();
        assert_eq!(state, FormState::Submitted("booked"));
    }

    #[test]
    fn test_invalid_then_fixed() {
        let mut state: FormState<()> = FormState::Idle;

        let value = state.validated::<u8>(Err(some_errors())).unwrap();
        assert_eq!(value, None);
        assert_eq!(
            state.errors().and_then(|e| e.message("email")).as_deref(),
            Some("Please enter a valid email")
        );

        assert_eq!(state.validated::<u8>(Ok(1)).unwrap(), Some(1));
        assert_eq!(state, FormState::Submitting);
        assert!(state.errors().is_none());
    }

    #[test]
    fn test_cannot_resubmit_while_submitting() {
        let mut state: FormState<()> = FormState::Submitting;
        let err = state.validated::<u8>(Ok(1)).unwrap_err();
        assert_eq!(
            err,
            FormError::InvalidTransition {
                action: "submit",
                state: "submitting"
            }
        );
        assert_eq!(state, FormState::Submitting);
    }

    #[test]
    fn test_cannot_complete_unless_submitting() {
        let mut state: FormState<()> = FormState::Idle;
        assert!(state.complete(()).is_err());

        let mut state: FormState<()> = FormState::Submitted(());
        assert!(state.complete(()).is_err());
    }

    #[test]
    fn test_reset_from_submitted() {
        let mut state: FormState<()> = FormState::Submitted(());
        state.reset();
        assert_eq!(state, FormState::Idle);
        assert!(state.validated::<u8>(Ok(1)).is_ok());
    }

    #[test]
    fn test_serialize_shape() {
        let state: FormState<u8> = FormState::Submitting;
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({"status": "submitting"})
        );

        let state: FormState<u8> = FormState::Invalid(some_errors());
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({"status": "invalid", "detail": {"email": "Please enter a valid email"}})
        );
    }
}
