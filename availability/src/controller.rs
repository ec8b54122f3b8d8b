//! Request controller: decodes commands, dispatches them to the service and
//! folds each outcome into a status-coded [`Response`].
//!
//! | Outcome | Status |
//! |---|---|
//! | success event | `202 Accepted` |
//! | rejection | `422 Unprocessable Entity` |
//! | undecodable request, invalid id or principal | `400 Bad Request` |

use crate::application::AvailabilityService;
use crate::commands::{Command, CommandError};
use crate::types::{AssetId, OwnerId, Principal};
use asset_availability_core::environment::Clock;
use asset_availability_core::event::Event;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Status for an applied command.
pub const ACCEPTED: u16 = 202;
/// Status for a rejected command.
pub const UNPROCESSABLE_ENTITY: u16 = 422;
/// Status for a request that never reached the service.
pub const BAD_REQUEST: u16 = 400;
/// Status for a response that could not be encoded.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// A command plus the principal issuing it.
///
/// The wire form is the command object with an optional `principal` field:
///
/// ```json
/// { "type": "UNLOCK", "assetId": "A1", "principal": "bob" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Request {
    /// Caller name; absent means the controller's default principal.
    #[serde(default)]
    pub principal: Option<String>,
    /// The command itself
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Decode a request from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Invalid`] when the payload is not a known command.
    pub fn from_json(json: &str) -> Result<Self, CommandError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Outcome of one request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Response {
    /// HTTP-style status code
    pub status: u16,
    /// Event, rejection, or `{ "error": ... }`
    pub payload: serde_json::Value,
}

impl Response {
    fn accepted<E: Event + Serialize>(event: &E) -> Self {
        Self::tagged(ACCEPTED, event)
    }

    fn rejected<R: Event + Serialize>(rejection: &R) -> Self {
        Self::tagged(UNPROCESSABLE_ENTITY, rejection)
    }

    fn bad_request(message: impl fmt::Display) -> Self {
        Self {
            status: BAD_REQUEST,
            payload: serde_json::json!({ "error": message.to_string() }),
        }
    }

    // Flattens the value's fields next to its type tag.
    fn tagged<T: Event + Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(serde_json::Value::Object(mut fields)) => {
                fields.insert("type".to_string(), value.event_type().into());
                Self {
                    status,
                    payload: serde_json::Value::Object(fields),
                }
            }
            Ok(other) => Self {
                status,
                payload: serde_json::json!({ "type": value.event_type(), "value": other }),
            },
            Err(error) => {
                tracing::warn!(event_type = value.event_type(), %error, "Failed to encode response");
                Self {
                    status: INTERNAL_SERVER_ERROR,
                    payload: serde_json::json!({ "error": error.to_string() }),
                }
            }
        }
    }

    /// Whether the command was applied.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.status == ACCEPTED
    }

    /// The payload's `type` tag, if any.
    #[must_use]
    pub fn payload_type(&self) -> Option<&str> {
        self.payload.get("type").and_then(serde_json::Value::as_str)
    }

    /// Multi-line JSON rendering.
    ///
    /// # Errors
    ///
    /// Returns the encoder's error, which only happens for non-string map keys.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Single-line JSON rendering, for line-oriented transports.
    ///
    /// # Errors
    ///
    /// See [`Response::to_json`].
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Thin adapter between requests and [`AvailabilityService`].
#[derive(Clone)]
pub struct AssetAvailabilityController {
    service: Arc<AvailabilityService>,
    clock: Arc<dyn Clock>,
}

impl AssetAvailabilityController {
    /// Create a controller. `clock` supplies the release time of unlocks.
    #[must_use]
    pub fn new(service: Arc<AvailabilityService>, clock: Arc<dyn Clock>) -> Self {
        Self { service, clock }
    }

    /// Decode and handle one JSON request.
    ///
    /// Requests without a `principal` run as `default_principal`.
    pub fn handle_json(&self, json: &str, default_principal: &Principal) -> Response {
        match Request::from_json(json) {
            Ok(request) => {
                let principal = request
                    .principal
                    .map_or_else(|| default_principal.clone(), Principal::new);
                self.handle(request.command, &principal)
            }
            Err(error) => {
                tracing::debug!(%error, "Undecodable request");
                Response::bad_request(error)
            }
        }
    }

    /// Handle one command on behalf of `principal`.
    pub fn handle(&self, command: Command, principal: &Principal) -> Response {
        tracing::debug!(
            command_type = command.command_type(),
            asset_id = command.asset_id(),
            principal = principal.name(),
            "Handling command"
        );
        let asset_id: AssetId = match command.asset_id().parse() {
            Ok(asset_id) => asset_id,
            Err(error) => return Response::bad_request(error),
        };

        match command {
            Command::Register { .. } => match self.service.register_asset_with(asset_id) {
                Ok(event) => Response::accepted(&event),
                Err(rejection) => Response::rejected(&rejection),
            },
            Command::Activate { .. } => match self.service.activate(&asset_id) {
                Ok(event) => Response::accepted(&event),
                Err(rejection) => Response::rejected(&rejection),
            },
            Command::Withdraw { .. } => match self.service.withdraw(&asset_id) {
                Ok(event) => Response::accepted(&event),
                Err(rejection) => Response::rejected(&rejection),
            },
            Command::Lock {
                duration_in_minutes,
                ..
            } => {
                let owner_id = match OwnerId::of(principal) {
                    Ok(owner_id) => owner_id,
                    Err(error) => return Response::bad_request(error),
                };
                let duration = Duration::minutes(i64::from(duration_in_minutes));
                match self.service.lock(&asset_id, owner_id, duration) {
                    Ok(event) => Response::accepted(&event),
                    Err(rejection) => Response::rejected(&rejection),
                }
            }
            Command::LockIndefinitely { .. } => {
                let owner_id = match OwnerId::of(principal) {
                    Ok(owner_id) => owner_id,
                    Err(error) => return Response::bad_request(error),
                };
                match self.service.lock_indefinitely(&asset_id, owner_id) {
                    Ok(event) => Response::accepted(&event),
                    Err(rejection) => Response::rejected(&rejection),
                }
            }
            Command::Unlock { .. } => {
                let owner_id = match OwnerId::of(principal) {
                    Ok(owner_id) => owner_id,
                    Err(error) => return Response::bad_request(error),
                };
                match self.service.unlock(&asset_id, owner_id, self.clock.now()) {
                    Ok(event) => Response::accepted(&event),
                    Err(rejection) => Response::rejected(&rejection),
                }
            }
        }
    }
}

impl fmt::Debug for AssetAvailabilityController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetAvailabilityController")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}
