//! Typed commands decoded from JSON requests.
//!
//! A request is a JSON object with a `type` tag naming the command and the
//! command's fields in camelCase:
//!
//! ```json
//! { "type": "LOCK", "assetId": "A1", "durationInMinutes": 35 }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error decoding a request into a [`Command`].
#[derive(Error, Debug)]
pub enum CommandError {
    /// The payload is not valid JSON or does not match any command.
    #[error("invalid command: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Every command the controller accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum Command {
    /// Register a new asset
    Register {
        /// Asset to register
        asset_id: String,
    },
    /// Take an asset out of maintenance
    Activate {
        /// Asset to activate
        asset_id: String,
    },
    /// Withdraw an asset
    Withdraw {
        /// Asset to withdraw
        asset_id: String,
    },
    /// Lock an asset for the caller
    Lock {
        /// Asset to lock
        asset_id: String,
        /// Lock length
        duration_in_minutes: u32,
    },
    /// Extend the caller's lock indefinitely
    LockIndefinitely {
        /// Asset whose lock to extend
        asset_id: String,
    },
    /// Release the caller's lock
    Unlock {
        /// Asset to unlock
        asset_id: String,
    },
}

impl Command {
    /// Decode a command from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Invalid`] for malformed JSON, an unknown
    /// `type`, or missing fields.
    pub fn from_json(json: &str) -> Result<Self, CommandError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The command's type tag, e.g. `"LOCK_INDEFINITELY"`.
    #[must_use]
    pub const fn command_type(&self) -> &'static str {
        match self {
            Self::Register { .. } => "REGISTER",
            Self::Activate { .. } => "ACTIVATE",
            Self::Withdraw { .. } => "WITHDRAW",
            Self::Lock { .. } => "LOCK",
            Self::LockIndefinitely { .. } => "LOCK_INDEFINITELY",
            Self::Unlock { .. } => "UNLOCK",
        }
    }

    /// The asset the command targets.
    #[must_use]
    pub fn asset_id(&self) -> &str {
        match self {
            Self::Register { asset_id }
            | Self::Activate { asset_id }
            | Self::Withdraw { asset_id }
            | Self::Lock { asset_id, .. }
            | Self::LockIndefinitely { asset_id }
            | Self::Unlock { asset_id } => asset_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_lock_with_duration() {
        let command =
            Command::from_json(r#"{"type":"LOCK","assetId":"A1","durationInMinutes":35}"#)
                .unwrap();

        assert_eq!(
            command,
            Command::Lock {
                asset_id: "A1".to_string(),
                duration_in_minutes: 35,
            }
        );
        assert_eq!(command.command_type(), "LOCK");
        assert_eq!(command.asset_id(), "A1");
    }

    #[test]
    fn type_tag_matches_serialized_form() {
        let command = Command::LockIndefinitely {
            asset_id: "A1".to_string(),
        };

        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["type"], command.command_type());
        assert_eq!(json["assetId"], "A1");
    }

    #[test]
    fn rejects_unknown_types_and_missing_fields() {
        assert!(Command::from_json(r#"{"type":"EXPLODE","assetId":"A1"}"#).is_err());
        assert!(Command::from_json(r#"{"type":"LOCK","assetId":"A1"}"#).is_err());
        assert!(Command::from_json("not json").is_err());
    }
}
