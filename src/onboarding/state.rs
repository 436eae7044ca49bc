//! Wizard state machine: step position plus the record being assembled.
//!
//! Every operation returns a new value instead of mutating in place, so any
//! two snapshots of a session can be compared directly.

use super::fields::ProfileField;
use super::model::{ProfileRecord, Role};
use super::steps::{StepKind, TOTAL_STEPS, resolve_step};
use crate::error::WizardError;

/// A wizard session in progress.
///
/// `current_step` always lies in `1..=total_steps`; the only way past the last
/// step is [`WizardState::advance`] returning [`Advance::Completed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    current_step: u32,
    total_steps: u32,
    record: ProfileRecord,
}

/// Outcome of [`WizardState::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next step.
    InProgress(WizardState),
    /// The last step was confirmed; the session is over.
    Completed(ProfileRecord),
}

impl Advance {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// The next state, if the session continues.
    pub fn into_state(self) -> Option<WizardState> {
        match self {
            Self::InProgress(state) => Some(state),
            Self::Completed(_) => None,
        }
    }

    /// The finished record, if the session ended.
    pub fn into_record(self) -> Option<ProfileRecord> {
        match self {
            Self::InProgress(_) => None,
            Self::Completed(record) => Some(record),
        }
    }
}

impl WizardState {
    /// Start a session for `role` at step 1 with an empty record.
    pub fn initialize(role: Role) -> Self {
        Self {
            current_step: 1,
            total_steps: TOTAL_STEPS,
            record: ProfileRecord::new(role),
        }
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn record(&self) -> &ProfileRecord {
        &self.record
    }

    pub fn role(&self) -> Role {
        self.record.role()
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 1
    }

    /// Whether the next [`advance`](Self::advance) completes the session.
    pub fn is_final_step(&self) -> bool {
        self.current_step == self.total_steps
    }

    /// The step shown at the current position.
    pub fn step_kind(&self) -> Result<StepKind, WizardError> {
        resolve_step(self.current_step, self.role())
    }

    /// Return a copy with `field` set to `value`; set-valued fields toggle.
    ///
    /// Any role-appropriate field may be written at any step. Fields of the
    /// other role are rejected and `self` is left as it was.
    pub fn update_field(
        &self,
        field: ProfileField,
        value: impl Into<String>,
    ) -> Result<Self, WizardError> {
        let mut next = self.clone();
        next.record.apply(field, value.into())?;
        Ok(next)
    }

    /// [`update_field`](Self::update_field) keyed by the field's name.
    pub fn update_field_by_name(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Self, WizardError> {
        let field: ProfileField = name.parse()?;
        self.update_field(field, value)
    }

    /// Move forward one step, or complete the session from the last step.
    ///
    /// Field contents are never checked here.
    pub fn advance(self) -> Advance {
        if self.current_step < self.total_steps {
            Advance::InProgress(Self {
                current_step: self.current_step + 1,
                ..self
            })
        } else {
            Advance::Completed(self.record)
        }
    }

    /// Move back one step, keeping every field. A no-op at step 1.
    pub fn retreat(self) -> Self {
        if self.current_step > 1 {
            Self {
                current_step: self.current_step - 1,
                ..self
            }
        } else {
            self
        }
    }

    /// Completion percentage, unrounded, in `(0, 100]`.
    pub fn progress(&self) -> f64 {
        f64::from(self.current_step) / f64::from(self.total_steps) * 100.0
    }
}
