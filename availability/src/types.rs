//! Identifier types for the availability domain.
//!
//! Both identifiers are opaque strings compared by value. `new()` and `From`
//! perform no validation (trusted, application-controlled input); `FromStr`
//! validates external input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an identifier from external input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    /// The identifier was empty or whitespace only.
    #[error("{kind} cannot be empty")]
    Empty {
        /// Which identifier was being parsed
        kind: &'static str,
    },

    /// The owner identifier collides with a reserved sentinel value.
    #[error("owner id '{0}' is reserved")]
    ReservedOwner(String),
}

/// Unique identifier of an asset.
///
/// # Examples
///
/// ```
/// use asset_availability::types::AssetId;
///
/// let id = AssetId::new("A1");
/// assert_eq!(id.as_str(), "A1");
///
/// let parsed: AssetId = "A1".parse().unwrap();
/// assert_eq!(parsed, id);
/// assert!("".parse::<AssetId>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Create a new `AssetId` without validation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the asset ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseIdError::Empty { kind: "asset id" });
        }
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identity on whose behalf an asset is locked.
///
/// Two values are reserved: [`OwnerId::withdrawal()`] and
/// [`OwnerId::maintenance()`] tag the non-owner lock states. Parsing rejects
/// them, so an owner derived from a principal can never equal a sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    const WITHDRAWAL: &'static str = "WITHDRAWAL";
    const MAINTENANCE: &'static str = "MAINTENANCE";

    /// Create a new `OwnerId` without validation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Sentinel owner of a withdrawal lock.
    #[must_use]
    pub fn withdrawal() -> Self {
        Self(Self::WITHDRAWAL.to_string())
    }

    /// Sentinel owner of a maintenance lock.
    #[must_use]
    pub fn maintenance() -> Self {
        Self(Self::MAINTENANCE.to_string())
    }

    /// Derive the owner from an authenticated principal.
    ///
    /// # Errors
    ///
    /// Returns [`ParseIdError`] if the principal's name is empty or reserved.
    pub fn of(principal: &Principal) -> Result<Self, ParseIdError> {
        principal.name().parse()
    }

    /// Whether this is one of the reserved sentinel values.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.0 == Self::WITHDRAWAL || self.0 == Self::MAINTENANCE
    }

    /// Get the owner ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OwnerId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseIdError::Empty { kind: "owner id" });
        }
        let owner = Self(s.to_string());
        if owner.is_sentinel() {
            return Err(ParseIdError::ReservedOwner(s.to_string()));
        }
        Ok(owner)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An authenticated caller, as resolved by whatever sits in front of the
/// controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    name: String,
}

impl Principal {
    /// Create a principal with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The principal's name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
