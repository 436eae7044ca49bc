//! Onboarding wizard: the three-step profile setup that runs after a user
//! picks a role on the entry screen.
//!
//! Step 1 collects credentials; steps 2 and 3 collect brand or creator
//! details depending on the role. [`WizardState`] is the pure state machine;
//! [`OnboardingManager`] keeps one per session and hands the finished
//! [`ProfileRecord`] to a [`CompletionHandoff`].

pub mod fields;
pub mod handoff;
pub mod manager;
pub mod model;
pub mod state;
pub mod steps;

pub use fields::{ChoiceOption, FieldInput, ProfileField};
pub use handoff::{ChannelHandoff, CompletedProfile, CompletionHandoff, LogHandoff};
pub use manager::{OnboardingManager, OnboardingStatus, SessionAdvance};
pub use model::{BrandDetails, CreatorDetails, FieldValue, ProfileRecord, Role, RoleDetails};
pub use state::{Advance, WizardState};
pub use steps::{StepKind, TOTAL_STEPS, resolve_step};
