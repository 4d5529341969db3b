//! Session key value objects
//!
//! Sessions are addressed by a composite key `{external_id}_{role}`, so one
//! external conversation (e.g. a browser cookie) maps to several sessions
//! that play different roles.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Role a session plays for an external conversation (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    /// Answers the user's messages
    Expert,
    /// Reviews the expert's answers
    Judge,
    /// Any other role label
    #[serde(untagged)]
    Other(String),
}

impl SessionRole {
    pub fn as_str(&self) -> &str {
        match self {
            SessionRole::Expert => "expert",
            SessionRole::Judge => "judge",
            SessionRole::Other(label) => label,
        }
    }
}

impl std::fmt::Display for SessionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for SessionRole {
    fn from(s: &str) -> Self {
        match s {
            "expert" => SessionRole::Expert,
            "judge" => SessionRole::Judge,
            other => SessionRole::Other(other.to_string()),
        }
    }
}

/// Registry key of a session (Value Object)
///
/// # Example
///
/// ```
/// use verdict_domain::{SessionKey, SessionRole};
///
/// let key = SessionKey::for_role("3f2a", &SessionRole::Judge).unwrap();
/// assert_eq!(key.as_str(), "3f2a_judge");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Wrap a raw key. Fails on an empty or whitespace-only key.
    pub fn new(key: impl Into<String>) -> Result<Self, DomainError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(DomainError::InvalidSessionKey(key));
        }
        Ok(Self(key))
    }

    /// Build the conventional `{external_id}_{role}` key.
    pub fn for_role(external_id: &str, role: &SessionRole) -> Result<Self, DomainError> {
        if external_id.trim().is_empty() {
            return Err(DomainError::InvalidSessionKey(external_id.to_string()));
        }
        Ok(Self(format!("{}_{}", external_id, role.as_str())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
