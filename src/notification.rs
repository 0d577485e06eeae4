use serde_json::{json, Value};

use crate::{JsonMap, PingRequest};

/// Application lifecycle events reported to the monitoring API.
///
/// Each variant maps to a fixed route and payload shape; see
/// [`Notification::route`].
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// Sends the installation confirmation email.
    InstallEmail { email: String },
    TestPing,
    QueuePing {
        connection: String,
        tube: String,
        pending: u64,
    },
    /// Server health snapshot. `data` is forwarded as-is.
    ServerPing { data: JsonMap },
    FailingQueue {
        connection: String,
        tube: String,
        job: Value,
    },
    ExceptionAlert { level: String, message: String },
    SchedulerStart { scheduler: String },
    SchedulerFinish { scheduler: String, data: Value },
    WebhookPing { event: String, data: Value },
    MaintenanceDown,
    MaintenanceUp,
}

impl Notification {
    pub fn route(&self) -> &'static str {
        match self {
            Self::InstallEmail { .. } => "install/email",
            Self::TestPing => "test/ping",
            Self::QueuePing { .. } => "queue/ping",
            Self::ServerPing { .. } => "server/ping",
            Self::FailingQueue { .. } => "queue/failing",
            Self::ExceptionAlert { .. } => "log/exception",
            Self::SchedulerStart { .. } => "scheduler/start",
            Self::SchedulerFinish { .. } => "scheduler/finish",
            Self::WebhookPing { .. } => "webhook/ping",
            Self::MaintenanceDown => "maintenance/down",
            Self::MaintenanceUp => "maintenance/up",
        }
    }

    pub fn into_request(self) -> PingRequest {
        let route = self.route();
        let payload = match self {
            Self::InstallEmail { email } => object(json!({ "email": email })),
            Self::TestPing | Self::MaintenanceDown | Self::MaintenanceUp => JsonMap::new(),
            Self::QueuePing {
                connection,
                tube,
                pending,
            } => object(json!({
                "connection": connection,
                "tube": tube,
                "pending": pending,
            })),
            Self::ServerPing { data } => data,
            Self::FailingQueue {
                connection,
                tube,
                job,
            } => object(json!({
                "connection": connection,
                "tube": tube,
                "job": job,
            })),
            Self::ExceptionAlert { level, message } => {
                object(json!({ "level": level, "message": message }))
            }
            Self::SchedulerStart { scheduler } => object(json!({ "scheduler": scheduler })),
            Self::SchedulerFinish { scheduler, data } => {
                object(json!({ "scheduler": scheduler, "data": data }))
            }
            Self::WebhookPing { event, data } => object(json!({ "event": event, "data": data })),
        };
        PingRequest::new(route, payload)
    }
}

fn object(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        _ => JsonMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Notification;

    #[test]
    fn queue_ping_carries_connection_and_tube() {
        let request = Notification::QueuePing {
            connection: "redis".to_owned(),
            tube: "emails".to_owned(),
            pending: 4,
        }
        .into_request();

        assert_eq!(request.route, "queue/ping");
        assert_eq!(request.payload["connection"], "redis");
        assert_eq!(request.payload["tube"], "emails");
        assert_eq!(request.payload["pending"], 4);
    }

    #[test]
    fn maintenance_events_have_empty_payloads() {
        for notification in [Notification::MaintenanceDown, Notification::MaintenanceUp] {
            let route = notification.route();
            let request = notification.into_request();
            assert_eq!(request.route, route);
            assert!(request.payload.is_empty());
        }
    }

    #[test]
    fn webhook_ping_nests_data() {
        let request = Notification::WebhookPing {
            event: "deploy".to_owned(),
            data: json!({ "sha": "abc123" }),
        }
        .into_request();

        assert_eq!(request.route, "webhook/ping");
        assert_eq!(request.payload["event"], "deploy");
        assert_eq!(request.payload["data"]["sha"], "abc123");
    }
}
