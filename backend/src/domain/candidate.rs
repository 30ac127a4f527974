//! Guild and candidate identifiers.
//!
//! Both identifiers are opaque strings handed to us by the chat platform. The
//! only invariant enforced here is that they carry content: an empty or
//! whitespace-only identifier is never a valid pool member or tenant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned when constructing identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierValidationError {
    EmptyGuildId,
    EmptyCandidateId,
}

impl fmt::Display for IdentifierValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGuildId => write!(f, "guild id must not be empty"),
            Self::EmptyCandidateId => write!(f, "candidate id must not be empty"),
        }
    }
}

impl std::error::Error for IdentifierValidationError {}

/// Tenant whose members are matched independently of every other guild.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GuildId(String);

impl GuildId {
    /// Validate and construct a [`GuildId`].
    ///
    /// # Examples
    /// ```
    /// use guild_matcher::domain::GuildId;
    ///
    /// let guild = GuildId::new("880345121").expect("valid guild id");
    /// assert_eq!(guild.as_ref(), "880345121");
    /// assert!(GuildId::new("   ").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IdentifierValidationError::EmptyGuildId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for GuildId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<GuildId> for String {
    fn from(value: GuildId) -> Self {
        value.0
    }
}

impl TryFrom<String> for GuildId {
    type Error = IdentifierValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Pool member eligible for pairing within one guild.
///
/// Ordering is lexicographic on the raw identifier; every deterministic
/// ordering in the matcher derives from it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CandidateId(String);

impl CandidateId {
    /// Validate and construct a [`CandidateId`].
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IdentifierValidationError::EmptyCandidateId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for CandidateId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CandidateId> for String {
    fn from(value: CandidateId) -> Self {
        value.0
    }
}

impl TryFrom<String> for CandidateId {
    type Error = IdentifierValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
