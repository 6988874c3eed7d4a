use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adaptive::AdaptivePolicy;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("diagnostic length must be between 1 and {max}, got {provided}")]
    InvalidLength { provided: usize, max: usize },
}

/// What kind of run a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionMode {
    /// Fixed-length assessment that ends with a scored result.
    Diagnostic { length: usize },
    /// Open-ended practice; ends when the pool runs dry or the learner stops.
    Practice,
}

impl SessionMode {
    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, SessionMode::Diagnostic { .. })
    }

    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match self {
            SessionMode::Diagnostic { length } => Some(*length),
            SessionMode::Practice => None,
        }
    }
}

/// Session settings: run kind plus the adaptation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    mode: SessionMode,
    policy: AdaptivePolicy,
}

impl SessionConfig {
    pub const DEFAULT_DIAGNOSTIC_LENGTH: usize = 8;
    pub const MAX_DIAGNOSTIC_LENGTH: usize = 50;

    /// Diagnostic of the default length with the default policy.
    #[must_use]
    pub fn diagnostic() -> Self {
        Self {
            mode: SessionMode::Diagnostic {
                length: Self::DEFAULT_DIAGNOSTIC_LENGTH,
            },
            policy: AdaptivePolicy::default(),
        }
    }

    /// Diagnostic with a custom question count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLength` outside `1..=MAX_DIAGNOSTIC_LENGTH`.
    pub fn diagnostic_with_length(length: usize) -> Result<Self, ConfigError> {
        if !(1..=Self::MAX_DIAGNOSTIC_LENGTH).contains(&length) {
            return Err(ConfigError::InvalidLength {
                provided: length,
                max: Self::MAX_DIAGNOSTIC_LENGTH,
            });
        }
        Ok(Self {
            mode: SessionMode::Diagnostic { length },
            policy: AdaptivePolicy::default(),
        })
    }

    #[must_use]
    pub fn practice() -> Self {
        Self {
            mode: SessionMode::Practice,
            policy: AdaptivePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AdaptivePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn policy(&self) -> &AdaptivePolicy {
        &self.policy
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_diagnostic() {
        let cfg = SessionConfig::default();
        assert_eq!(
            cfg.mode().length(),
            Some(SessionConfig::DEFAULT_DIAGNOSTIC_LENGTH)
        );
    }

    #[test]
    fn length_bounds_are_checked() {
        assert!(SessionConfig::diagnostic_with_length(0).is_err());
        assert!(SessionConfig::diagnostic_with_length(51).is_err());
        assert_eq!(
            SessionConfig::diagnostic_with_length(10)
                .unwrap()
                .mode()
                .length(),
            Some(10)
        );
    }

    #[test]
    fn practice_has_no_length() {
        assert!(!SessionConfig::practice().mode().is_diagnostic());
        assert_eq!(SessionConfig::practice().mode().length(), None);
    }
}
