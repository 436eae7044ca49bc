//! Profile field identifiers and the metadata a rendering layer needs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::Role;
use crate::error::WizardError;

/// Every field a [`ProfileRecord`](super::model::ProfileRecord) can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Email,
    Password,
    // Brand
    CompanyName,
    Industry,
    Website,
    Description,
    TargetAudience,
    BudgetRange,
    // Creator
    FullName,
    Username,
    Niches,
    Followers,
    Platforms,
    Rates,
    Bio,
    ProfileImage,
}

/// How a field is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldInput {
    Text,
    Email,
    Password,
    Url,
    TextArea,
    /// Toggled membership in a set of catalog values.
    MultiSelect,
    /// Exactly one catalog value.
    SingleChoice,
    Image,
}

/// A selectable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn same(value: &'static str) -> ChoiceOption {
    ChoiceOption {
        value,
        label: value,
    }
}

pub const PLATFORMS: &[ChoiceOption] = &[
    same("Instagram"),
    same("TikTok"),
    same("YouTube"),
    same("Twitter"),
    same("LinkedIn"),
];

pub const NICHES: &[ChoiceOption] = &[
    same("Fashion"),
    same("Beauty"),
    same("Fitness"),
    same("Tech"),
    same("Travel"),
    same("Food"),
    same("Lifestyle"),
    same("Gaming"),
];

pub const BUDGET_RANGES: &[ChoiceOption] = &[
    ChoiceOption {
        value: "under-1k",
        label: "Under $1,000 per campaign",
    },
    ChoiceOption {
        value: "1k-5k",
        label: "$1,000 - $5,000 per campaign",
    },
    ChoiceOption {
        value: "5k-10k",
        label: "$5,000 - $10,000 per campaign",
    },
    ChoiceOption {
        value: "10k-plus",
        label: "$10,000+ per campaign",
    },
];

pub const RATES: &[ChoiceOption] = &[
    ChoiceOption {
        value: "under-500",
        label: "Under $500 per post",
    },
    ChoiceOption {
        value: "500-1k",
        label: "$500 - $1,000 per post",
    },
    ChoiceOption {
        value: "1k-5k",
        label: "$1,000 - $5,000 per post",
    },
    ChoiceOption {
        value: "5k-plus",
        label: "$5,000+ per post",
    },
];

impl ProfileField {
    pub const ALL: [ProfileField; 16] = [
        Self::Email,
        Self::Password,
        Self::CompanyName,
        Self::Industry,
        Self::Website,
        Self::Description,
        Self::TargetAudience,
        Self::BudgetRange,
        Self::FullName,
        Self::Username,
        Self::Niches,
        Self::Followers,
        Self::Platforms,
        Self::Rates,
        Self::Bio,
        Self::ProfileImage,
    ];

    /// Wire name, matching the serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::CompanyName => "companyName",
            Self::Industry => "industry",
            Self::Website => "website",
            Self::Description => "description",
            Self::TargetAudience => "targetAudience",
            Self::BudgetRange => "budgetRange",
            Self::FullName => "fullName",
            Self::Username => "username",
            Self::Niches => "niches",
            Self::Followers => "followers",
            Self::Platforms => "platforms",
            Self::Rates => "rates",
            Self::Bio => "bio",
            Self::ProfileImage => "profileImage",
        }
    }

    /// The role this field belongs to, or `None` for common fields.
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Email | Self::Password => None,
            Self::CompanyName
            | Self::Industry
            | Self::Website
            | Self::Description
            | Self::TargetAudience
            | Self::BudgetRange => Some(Role::Brand),
            Self::FullName
            | Self::Username
            | Self::Niches
            | Self::Followers
            | Self::Platforms
            | Self::Rates
            | Self::Bio
            | Self::ProfileImage => Some(Role::Creator),
        }
    }

    /// Whether a record of `role` can hold this field.
    pub fn applies_to(&self, role: Role) -> bool {
        self.role().is_none_or(|owner| owner == role)
    }

    /// Set-valued fields are updated by toggling membership.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Niches | Self::Platforms)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
            Self::CompanyName => "Company Name",
            Self::Industry => "Industry",
            Self::Website => "Website",
            Self::Description => "Brand Description",
            Self::TargetAudience => "Target Audience",
            Self::BudgetRange => "Budget Range",
            Self::FullName => "Full Name",
            Self::Username => "Username/Handle",
            Self::Niches => "Content Niches",
            Self::Followers => "Total Followers (across all platforms)",
            Self::Platforms => "Primary Platforms",
            Self::Rates => "Collaboration Rates",
            Self::Bio => "Bio",
            Self::ProfileImage => "Profile Image",
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Email => Some("you@example.com"),
            Self::Password => Some("Choose a secure password"),
            Self::CompanyName => Some("Your company name"),
            Self::Industry => Some("e.g., Fashion, Tech, Food & Beverage"),
            Self::Website => Some("https://your-website.com"),
            Self::Description => Some("Tell influencers what makes your brand special"),
            Self::TargetAudience => {
                Some("Describe your ideal customer demographics and interests")
            }
            Self::FullName => Some("Your full name"),
            Self::Username => Some("@yourusername"),
            Self::Followers => Some("e.g., 50K, 100K, 1M"),
            Self::Bio => Some("Tell brands about your content style and audience"),
            Self::BudgetRange
            | Self::Niches
            | Self::Platforms
            | Self::Rates
            | Self::ProfileImage => None,
        }
    }

    pub fn input_kind(&self) -> FieldInput {
        match self {
            Self::Email => FieldInput::Email,
            Self::Password => FieldInput::Password,
            Self::Website => FieldInput::Url,
            Self::Description | Self::TargetAudience | Self::Bio => FieldInput::TextArea,
            Self::Niches | Self::Platforms => FieldInput::MultiSelect,
            Self::BudgetRange | Self::Rates => FieldInput::SingleChoice,
            Self::ProfileImage => FieldInput::Image,
            Self::CompanyName
            | Self::Industry
            | Self::FullName
            | Self::Username
            | Self::Followers => FieldInput::Text,
        }
    }

    /// Suggested values. Advisory only: writes are not checked against them.
    pub fn options(&self) -> &'static [ChoiceOption] {
        match self {
            Self::Platforms => PLATFORMS,
            Self::Niches => NICHES,
            Self::BudgetRange => BUDGET_RANGES,
            Self::Rates => RATES,
            _ => &[],
        }
    }
}

impl FromStr for ProfileField {
    type Err = WizardError;

    /// Accepts the camelCase wire name or its snake_case spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.name() == wanted || snake_case(field.name()) == wanted)
            .ok_or_else(|| WizardError::UnknownField {
                name: wanted.to_string(),
            })
    }
}

/// `companyName` -> `company_name`.
fn snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for c in camel.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
