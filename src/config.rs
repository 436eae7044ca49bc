//! Configuration types.

use crate::error::ConfigError;
use crate::onboarding::model::Role;

/// Environment variable selecting the role used when none is supplied.
pub const ENV_DEFAULT_ROLE: &str = "COLLAB_ONBOARDING_DEFAULT_ROLE";
/// Environment variable capping concurrent wizard sessions.
pub const ENV_MAX_SESSIONS: &str = "COLLAB_ONBOARDING_MAX_SESSIONS";

/// Onboarding configuration.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Role used when the entry screen supplies none.
    pub default_role: Role,
    /// Maximum number of wizard sessions held at once.
    pub max_sessions: usize,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            default_role: Role::Creator,
            max_sessions: 1024,
        }
    }
}

impl OnboardingConfig {
    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DEFAULT_ROLE) {
            config.default_role = raw.parse::<Role>().map_err(|e| ConfigError::InvalidValue {
                key: ENV_DEFAULT_ROLE.to_string(),
                message: format!("{e}"),
            })?;
        }

        if let Some(raw) = lookup(ENV_MAX_SESSIONS) {
            let max = raw.trim().parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                key: ENV_MAX_SESSIONS.to_string(),
                message: format!("{e}"),
            })?;
            if max == 0 {
                return Err(ConfigError::InvalidValue {
                    key: ENV_MAX_SESSIONS.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
            config.max_sessions = max;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = OnboardingConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.default_role, Role::Creator);
        assert_eq!(config.max_sessions, 1024);
    }

    #[test]
    fn reads_overrides() {
        let config = OnboardingConfig::from_lookup(lookup_from(&[
            (ENV_DEFAULT_ROLE, "brand"),
            (ENV_MAX_SESSIONS, " 16 "),
        ]))
        .unwrap();
        assert_eq!(config.default_role, Role::Brand);
        assert_eq!(config.max_sessions, 16);
    }

    #[test]
    fn rejects_bad_values() {
        let err = OnboardingConfig::from_lookup(lookup_from(&[(ENV_DEFAULT_ROLE, "agency")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_DEFAULT_ROLE));

        let err = OnboardingConfig::from_lookup(lookup_from(&[(ENV_MAX_SESSIONS, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_MAX_SESSIONS));

        assert!(OnboardingConfig::from_lookup(lookup_from(&[(ENV_MAX_SESSIONS, "0")])).is_err());
    }
}
