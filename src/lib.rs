//! `eyewitness` is an async reporting client for the Eyewitness monitoring API.
//!
//! The client notifies the monitoring service of application lifecycle
//! events:
//! - [`EyewitnessClient::ping`] / [`EyewitnessClient::notify`] for events,
//!   retried with a linear backoff
//! - [`EyewitnessClient::install`] for one-time registration
//! - [`EyewitnessClient::check_dependency_lock`] for the advisory lock-file scan

mod backoff;
mod client;
mod error;
mod lock;
mod notification;
mod options;
mod settings;
mod types;
mod wire;

pub use backoff::LinearBackoff;
pub use client::EyewitnessClient;
pub use error::EyewitnessError;
pub use lock::{is_legacy_transport, LockEncoding, LOCK_FIELD};
pub use notification::Notification;
pub use options::{ClientOptions, DEFAULT_DEPENDENCY_CHECK_URL};
pub use settings::Settings;
pub use types::{IdentityFields, PingOutcome, PingRequest, CLIENT_VERSION};

/// JSON object used for ping payloads and decoded responses.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

pub type Result<T> = std::result::Result<T, EyewitnessError>;
