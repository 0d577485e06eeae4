use serde::Serialize;

use crate::{JsonMap, Settings};

/// Version reported in the `eyewitness_version` field.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A single ping: the route it targets and the caller's event data.
#[derive(Clone, Debug, PartialEq)]
pub struct PingRequest {
    pub route: String,
    pub payload: JsonMap,
}

impl PingRequest {
    pub fn new(route: impl Into<String>, payload: JsonMap) -> Self {
        Self {
            route: route.into(),
            payload,
        }
    }
}

/// Credentials and environment metadata attached to every ping.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct IdentityFields {
    pub app_token: String,
    pub secret_key: String,
    #[serde(rename = "application_environment")]
    pub environment: String,
    #[serde(rename = "eyewitness_version")]
    pub client_version: String,
}

impl IdentityFields {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        Self {
            app_token: settings.app_token.clone(),
            secret_key: settings.secret_key.clone(),
            environment: settings.environment.clone(),
            client_version: CLIENT_VERSION.to_owned(),
        }
    }
}

impl std::fmt::Debug for IdentityFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityFields")
            .field("app_token", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("client_version", &self.client_version)
            .finish()
    }
}

/// Result of a ping call.
///
/// The retrying dispatcher surfaces only the final attempt's outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PingOutcome {
    /// The server answered. Any status code lands here, not only 200.
    Success { status: u16, reason: String },
    /// Telemetry is switched off in settings; nothing was sent.
    Disabled,
    /// The request never produced a response.
    TransportFailure(String),
}

impl PingOutcome {
    /// `true` only for an exact HTTP 200.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Success { status: 200, .. })
    }

    /// Status code and reason phrase. Outcomes without a response have no
    /// status; `Disabled` reports `"api disabled"`.
    pub fn as_tuple(&self) -> (Option<u16>, &str) {
        match self {
            Self::Success { status, reason } => (Some(*status), reason.as_str()),
            Self::Disabled => (None, "api disabled"),
            Self::TransportFailure(message) => (None, message.as_str()),
        }
    }
}
