//! Error types for the guestlist core.

use crate::model::MemberId;
use crate::wizard::WizardPhase;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Directory/submission collaborator errors.
///
/// The wizard recovers locally from every variant: state is left untouched
/// and the failure is surfaced as a retry message, never a crash.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Directory backend failed: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Wizard transition errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// `advance()` or `submit()` attempted while the current step's
    /// completion predicate is false. The UI renders this as a disabled
    /// affordance, not as user-facing error text.
    #[error("Step {step} is not complete")]
    ValidationBlocked { step: usize },

    #[error("Action {action} is not valid in the {phase} phase")]
    InvalidTransition {
        phase: WizardPhase,
        action: &'static str,
    },

    #[error("Member {0} is not part of the selected party")]
    UnknownMember(MemberId),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
