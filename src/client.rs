use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use hyper::ext::ReasonPhrase;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::{
    backoff::LinearBackoff,
    types::CLIENT_VERSION,
    wire::{build_ping_payload, decode_json_map},
    ClientOptions, EyewitnessError, IdentityFields, JsonMap, Notification, PingOutcome, Result,
    Settings,
};

#[derive(Clone)]
/// HTTP client for the Eyewitness monitoring API.
pub struct EyewitnessClient {
    http: reqwest::Client,
    settings: Arc<RwLock<Settings>>,
    options: ClientOptions,
}

impl fmt::Debug for EyewitnessClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EyewitnessClient")
            .field("settings", &self.settings())
            .field("options", &self.options)
            .finish()
    }
}

impl EyewitnessClient {
    /// Creates a client with default timeouts and retry behavior.
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_options(settings, ClientOptions::default())
    }

    /// Creates a client with explicit transport options.
    ///
    /// Options are fixed for the lifetime of the client.
    pub fn with_options(settings: Settings, options: ClientOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(format!("eyewitness-rust/{CLIENT_VERSION}"))
            .connect_timeout(Duration::from_millis(options.connect_timeout_ms))
            .timeout(Duration::from_millis(options.timeout_ms))
            .connection_verbose(options.debug)
            .build()
            .map_err(EyewitnessError::Transport)?;

        Ok(Self {
            http,
            settings: Arc::new(RwLock::new(settings)),
            options,
        })
    }

    /// Creates a client from environment variables.
    ///
    /// See [`Settings::from_env`] for the variables read.
    pub fn from_env() -> Result<Self> {
        Self::new(Settings::from_env()?)
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Toggles telemetry. Takes effect on the next call.
    pub fn set_enabled(&self, enabled: bool) {
        self.update_settings(|settings| settings.enabled = enabled);
    }

    /// Replaces the application token and secret key used by later pings.
    pub fn rotate_credentials(&self, app_token: impl Into<String>, secret_key: impl Into<String>) {
        let app_token = app_token.into();
        let secret_key = secret_key.into();
        self.update_settings(|settings| {
            settings.app_token = app_token;
            settings.secret_key = secret_key;
        });
    }

    fn update_settings(&self, apply: impl FnOnce(&mut Settings)) {
        let mut settings = self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        apply(&mut settings);
    }

    /// Registers the application and returns the decoded response body.
    ///
    /// `setup` is sent as the whole body, without identity fields. The call
    /// is made once and any failure is returned to the caller.
    pub async fn install(&self, setup: &JsonMap) -> Result<JsonMap> {
        let url = self.settings().route_url("install");
        let response = self
            .http
            .post(url)
            .json(setup)
            .send()
            .await
            .map_err(EyewitnessError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(EyewitnessError::Transport)?;
        if !status.is_success() {
            return Err(EyewitnessError::Http {
                status: status.as_u16(),
                body,
            });
        }
        decode_json_map(&body)
    }

    /// Sends a named lifecycle event.
    pub async fn notify(&self, notification: Notification) -> PingOutcome {
        let request = notification.into_request();
        self.ping(&request.route, request.payload).await
    }

    /// Posts `data` merged with the identity fields to `route`.
    ///
    /// Up to `max_attempts` requests are made with a linear backoff between
    /// them. Only an exact HTTP 200 ends the sequence early; any other status
    /// is retried like a transport failure. The last attempt's outcome is
    /// returned when none succeeds.
    pub async fn ping(&self, route: &str, data: JsonMap) -> PingOutcome {
        let settings = self.settings();
        if !settings.enabled {
            return PingOutcome::Disabled;
        }

        let url = settings.route_url(route);
        let payload = match build_ping_payload(data, &IdentityFields::from_settings(&settings)) {
            Ok(payload) => payload,
            Err(err) => return PingOutcome::TransportFailure(err.to_string()),
        };
        let schedule = LinearBackoff::new(
            self.options.max_attempts,
            Duration::from_millis(self.options.retry_backoff_ms),
        );

        let mut last = PingOutcome::TransportFailure("no attempts made".to_owned());
        for (attempt, delay) in schedule.enumerate() {
            if !delay.is_zero() {
                debug!(route, attempt, delay_ms = delay.as_millis() as u64, "retrying ping");
                sleep(delay).await;
            }

            last = self.send_ping(&url, &payload).await;
            if last.is_delivered() {
                return last;
            }
        }

        warn!(route, outcome = ?last, "ping not delivered after retries");
        last
    }

    async fn send_ping(&self, url: &str, payload: &JsonMap) -> PingOutcome {
        match self.http.post(url).json(payload).send().await {
            Ok(response) => PingOutcome::Success {
                status: response.status().as_u16(),
                reason: reason_phrase(&response),
            },
            Err(err) => PingOutcome::TransportFailure(describe_transport_error(&err)),
        }
    }

    /// Uploads the configured lock file to the security advisory service.
    ///
    /// Advisory only: every failure is logged and yields `None`.
    pub async fn check_dependency_lock(&self) -> Option<Value> {
        match self.try_check_dependency_lock().await {
            Ok(report) => Some(report),
            Err(err) => {
                error!(error = %err, "dependency lock check failed");
                None
            }
        }
    }

    async fn try_check_dependency_lock(&self) -> Result<Value> {
        let path = self.settings().lock_file_path;
        let form = self.options.lock_encoding.encode(&path).await?;

        let response = self
            .http
            .post(&self.options.dependency_check_url)
            .multipart(form)
            .send()
            .await
            .map_err(EyewitnessError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(EyewitnessError::Transport)?;
        if !status.is_success() {
            return Err(EyewitnessError::Http {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|err| {
            EyewitnessError::Decode(format!("invalid advisory response JSON: {err}; body: {body}"))
        })
    }
}

/// Reason phrase as sent by the server, falling back to the canonical one.
fn reason_phrase(response: &reqwest::Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
        .or_else(|| response.status().canonical_reason())
        .unwrap_or_default()
        .to_owned()
}

/// `reqwest` keeps the cause (timeout, refused connection) in the source
/// chain rather than in its own message.
fn describe_transport_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::EyewitnessClient;
    use crate::{PingOutcome, Settings};

    fn client() -> EyewitnessClient {
        EyewitnessClient::new(Settings::new("http://127.0.0.1:9", "app-token", "secret-key"))
            .expect("client must build")
    }

    #[test]
    fn debug_redacts_credentials() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("app-token"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn rotated_credentials_are_visible_immediately() {
        let client = client();
        client.rotate_credentials("new-token", "new-secret");
        let settings = client.settings();
        assert_eq!(settings.app_token, "new-token");
        assert_eq!(settings.secret_key, "new-secret");
    }

    #[tokio::test]
    async fn disabled_ping_short_circuits() {
        let client = client();
        client.set_enabled(false);
        let outcome = client.ping("server/ping", Default::default()).await;
        assert_eq!(outcome, PingOutcome::Disabled);
        assert_eq!(outcome.as_tuple(), (None, "api disabled"));
    }
}
