//! Role and profile record data models.

use std::collections::BTreeSet;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::fields::ProfileField;
use crate::error::WizardError;

/// Which side of the marketplace the user is onboarding as.
///
/// Chosen on the entry screen and fixed for the lifetime of a wizard session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Brand,
    #[default]
    #[serde(alias = "influencer")]
    Creator,
}

impl Role {
    /// Interpret the entry screen's selection.
    ///
    /// An absent or blank selection falls back to [`Role::Creator`].
    pub fn from_selection(selection: Option<&str>) -> Result<Self, WizardError> {
        match selection.map(str::trim).filter(|s| !s.is_empty()) {
            Some(token) => token.parse(),
            None => Ok(Self::default()),
        }
    }

    /// Badge label shown above the wizard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Brand => "Brand",
            Self::Creator => "Influencer",
        }
    }
}

impl FromStr for Role {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("brand") {
            Ok(Self::Brand)
        } else if token.eq_ignore_ascii_case("creator") || token.eq_ignore_ascii_case("influencer")
        {
            Ok(Self::Creator)
        } else {
            Err(WizardError::UnknownRole {
                token: token.to_string(),
            })
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brand => write!(f, "brand"),
            Self::Creator => write!(f, "creator"),
        }
    }
}

/// Fields collected from brands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    /// One of the budget range catalog values, e.g. `"1k-5k"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
}

impl BrandDetails {
    fn apply(&mut self, field: ProfileField, value: String) -> Result<(), WizardError> {
        let slot = match field {
            ProfileField::CompanyName => &mut self.company_name,
            ProfileField::Industry => &mut self.industry,
            ProfileField::Website => &mut self.website,
            ProfileField::Description => &mut self.description,
            ProfileField::TargetAudience => &mut self.target_audience,
            ProfileField::BudgetRange => &mut self.budget_range,
            _ => {
                return Err(WizardError::FieldNotForRole {
                    field,
                    role: Role::Brand,
                });
            }
        };
        *slot = Some(value);
        Ok(())
    }

    fn value(&self, field: ProfileField) -> FieldValue<'_> {
        let slot = match field {
            ProfileField::CompanyName => &self.company_name,
            ProfileField::Industry => &self.industry,
            ProfileField::Website => &self.website,
            ProfileField::Description => &self.description,
            ProfileField::TargetAudience => &self.target_audience,
            ProfileField::BudgetRange => &self.budget_range,
            _ => return FieldValue::Unset,
        };
        FieldValue::from_slot(slot)
    }
}

/// Fields collected from creators.
///
/// `niches` and `platforms` are toggled membership sets; an empty set is the
/// unset state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub niches: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub platforms: BTreeSet<String>,
    /// One of the rate catalog values, e.g. `"500-1k"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl CreatorDetails {
    /// Character shown in the avatar when no profile image is set.
    pub fn avatar_initial(&self) -> char {
        self.full_name
            .as_deref()
            .and_then(|name| name.chars().next())
            .unwrap_or('U')
    }

    fn apply(&mut self, field: ProfileField, value: String) -> Result<(), WizardError> {
        let slot = match field {
            ProfileField::Niches => {
                toggle(&mut self.niches, value);
                return Ok(());
            }
            ProfileField::Platforms => {
                toggle(&mut self.platforms, value);
                return Ok(());
            }
            ProfileField::FullName => &mut self.full_name,
            ProfileField::Username => &mut self.username,
            ProfileField::Followers => &mut self.followers,
            ProfileField::Rates => &mut self.rates,
            ProfileField::Bio => &mut self.bio,
            ProfileField::ProfileImage => &mut self.profile_image,
            _ => {
                return Err(WizardError::FieldNotForRole {
                    field,
                    role: Role::Creator,
                });
            }
        };
        *slot = Some(value);
        Ok(())
    }

    fn value(&self, field: ProfileField) -> FieldValue<'_> {
        let slot = match field {
            ProfileField::Niches => return FieldValue::from_set(&self.niches),
            ProfileField::Platforms => return FieldValue::from_set(&self.platforms),
            ProfileField::FullName => &self.full_name,
            ProfileField::Username => &self.username,
            ProfileField::Followers => &self.followers,
            ProfileField::Rates => &self.rates,
            ProfileField::Bio => &self.bio,
            ProfileField::ProfileImage => &self.profile_image,
            _ => return FieldValue::Unset,
        };
        FieldValue::from_slot(slot)
    }
}

fn toggle(set: &mut BTreeSet<String>, value: String) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// Role-specific part of a [`ProfileRecord`], tagged by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleDetails {
    Brand(BrandDetails),
    #[serde(alias = "influencer")]
    Creator(CreatorDetails),
}

impl RoleDetails {
    fn empty(role: Role) -> Self {
        match role {
            Role::Brand => Self::Brand(BrandDetails::default()),
            Role::Creator => Self::Creator(CreatorDetails::default()),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Brand(_) => Role::Brand,
            Self::Creator(_) => Role::Creator,
        }
    }
}

/// Read view of a single record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Never written, or not part of this record's role.
    Unset,
    Text(&'a str),
    Set(&'a BTreeSet<String>),
    /// The password; only whether it has been written is visible here.
    Secret { is_set: bool },
}

impl<'a> FieldValue<'a> {
    fn from_slot(slot: &'a Option<String>) -> Self {
        slot.as_deref().map_or(Self::Unset, Self::Text)
    }

    fn from_set(set: &'a BTreeSet<String>) -> Self {
        if set.is_empty() {
            Self::Unset
        } else {
            Self::Set(set)
        }
    }
}

/// The profile accumulated across wizard steps.
///
/// Common credentials plus exactly one role's details. Serializes flat: the
/// common fields, a `role` tag, then the role's fields, with unset fields
/// omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    email: String,
    #[serde(with = "secret_string")]
    password: SecretString,
    #[serde(flatten)]
    details: RoleDetails,
}

impl ProfileRecord {
    /// Empty record for `role`: blank credentials, no role fields written.
    pub fn new(role: Role) -> Self {
        Self {
            email: String::new(),
            password: SecretString::from(String::new()),
            details: RoleDetails::empty(role),
        }
    }

    pub fn role(&self) -> Role {
        self.details.role()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn details(&self) -> &RoleDetails {
        &self.details
    }

    /// Brand details, if this is a brand record.
    pub fn brand(&self) -> Option<&BrandDetails> {
        match &self.details {
            RoleDetails::Brand(brand) => Some(brand),
            RoleDetails::Creator(_) => None,
        }
    }

    /// Creator details, if this is a creator record.
    pub fn creator(&self) -> Option<&CreatorDetails> {
        match &self.details {
            RoleDetails::Creator(creator) => Some(creator),
            RoleDetails::Brand(_) => None,
        }
    }

    /// Current value of `field`. Fields of the other role read as unset.
    pub fn value(&self, field: ProfileField) -> FieldValue<'_> {
        match field {
            ProfileField::Email => FieldValue::Text(&self.email),
            ProfileField::Password => FieldValue::Secret {
                is_set: !self.password.expose_secret().is_empty(),
            },
            _ => match &self.details {
                RoleDetails::Brand(brand) => brand.value(field),
                RoleDetails::Creator(creator) => creator.value(field),
            },
        }
    }

    /// Write `value` into `field` in place. Set-valued fields toggle.
    pub(crate) fn apply(&mut self, field: ProfileField, value: String) -> Result<(), WizardError> {
        match field {
            ProfileField::Email => self.email = value,
            ProfileField::Password => self.password = SecretString::from(value),
            _ => match &mut self.details {
                RoleDetails::Brand(brand) => brand.apply(field, value)?,
                RoleDetails::Creator(creator) => creator.apply(field, value)?,
            },
        }
        Ok(())
    }
}

// SecretString has no PartialEq; compare on the exposed value.
impl PartialEq for ProfileRecord {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
            && self.password.expose_secret() == other.password.expose_secret()
            && self.details == other.details
    }
}

impl Eq for ProfileRecord {}

mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(secret.expose_secret())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
        String::deserialize(deserializer).map(SecretString::from)
    }
}
