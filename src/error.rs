//! Error types for the onboarding wizard.

use uuid::Uuid;

use crate::onboarding::fields::ProfileField;
use crate::onboarding::model::Role;

/// Top-level error type for the onboarding core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Handoff error: {0}")]
    Handoff(#[from] HandoffError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Structural errors raised by the wizard state machine.
///
/// None of these reflect field *content*; the wizard never blocks on what a
/// user typed, only on requests that do not fit the record's shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Step {step} is outside the wizard range 1..={total}")]
    InvalidStep { step: u32, total: u32 },

    #[error("Unknown profile field: {name}")]
    UnknownField { name: String },

    #[error("Unknown role selection: {token}")]
    UnknownRole { token: String },

    #[error("Field {field} does not belong to a {role} profile")]
    FieldNotForRole { field: ProfileField, role: Role },
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Onboarding session {id} not found")]
    NotFound { id: Uuid },

    #[error("Maximum concurrent onboarding sessions ({max}) reached")]
    LimitReached { max: usize },

    #[error("Onboarding session {id} is already completing")]
    Completing { id: Uuid },
}

/// Completion handoff errors.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("Completion receiver has been dropped")]
    ChannelClosed,

    #[error("Completion handoff rejected the profile: {reason}")]
    Rejected { reason: String },
}

/// Result type alias for the onboarding core.
pub type Result<T> = std::result::Result<T, Error>;
