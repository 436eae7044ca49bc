//! Step resolution: which screen, and which fields, apply at each position.

use serde::{Deserialize, Serialize};

use super::fields::ProfileField;
use super::model::Role;
use crate::error::WizardError;

/// Number of steps in the wizard. Fixed for both roles.
pub const TOTAL_STEPS: u32 = 3;

/// The screen shown at a given step.
///
/// Step 1 is shared; steps 2 and 3 branch on role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Auth,
    BrandDetails,
    CreatorDetails,
    BrandProfile,
    CreatorProfile,
}

/// Map a 1-based step index and role to its step.
///
/// Indices outside `1..=TOTAL_STEPS` are a caller bug and are reported, never
/// mapped to a fallback step.
pub fn resolve_step(step: u32, role: Role) -> Result<StepKind, WizardError> {
    match (step, role) {
        (1, _) => Ok(StepKind::Auth),
        (2, Role::Brand) => Ok(StepKind::BrandDetails),
        (2, Role::Creator) => Ok(StepKind::CreatorDetails),
        (3, Role::Brand) => Ok(StepKind::BrandProfile),
        (3, Role::Creator) => Ok(StepKind::CreatorProfile),
        _ => Err(WizardError::InvalidStep {
            step,
            total: TOTAL_STEPS,
        }),
    }
}

impl StepKind {
    /// Fields this step collects, in display order.
    pub fn fields(&self) -> &'static [ProfileField] {
        use ProfileField::*;
        match self {
            Self::Auth => &[Email, Password],
            Self::BrandDetails => &[CompanyName, Industry, Website, TargetAudience],
            Self::BrandProfile => &[Description, BudgetRange],
            Self::CreatorDetails => &[FullName, Username, Platforms, Niches],
            Self::CreatorProfile => &[ProfileImage, Bio, Followers, Rates],
        }
    }

    /// The role this step is specific to, or `None` for shared steps.
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Auth => None,
            Self::BrandDetails | Self::BrandProfile => Some(Role::Brand),
            Self::CreatorDetails | Self::CreatorProfile => Some(Role::Creator),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Auth => "Create your account",
            Self::BrandDetails => "Tell us about your brand",
            Self::CreatorDetails => "Your creator details",
            Self::BrandProfile | Self::CreatorProfile => "Complete your profile",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::Auth => "Enter your email and choose a secure password",
            Self::BrandDetails => "Help influencers understand what you're looking for",
            Self::CreatorDetails => "Help brands discover your unique value",
            Self::BrandProfile => "Add details that help you stand out",
            Self::CreatorProfile => "Showcase what makes you unique",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Auth => "auth",
            Self::BrandDetails => "brand_details",
            Self::CreatorDetails => "creator_details",
            Self::BrandProfile => "brand_profile",
            Self::CreatorProfile => "creator_profile",
        };
        write!(f, "{s}")
    }
}
