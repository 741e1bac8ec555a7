use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

/// Default Bugsnag notify endpoint.
pub const BUGSNAG_NOTIFY_URL: &str = "https://notify.bugsnag.com";

/// A single failure observed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Error kind, usually the Rust type name of the failing error.
    pub error_class: String,
    pub message: String,
    /// Where the failure happened (route or client name).
    pub context: Option<String>,
}

impl ErrorReport {
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let class = std::any::type_name_of_val(err);
        Self {
            error_class: short_type_name(class).to_string(),
            message: err.to_string(),
            context: None,
        }
    }

    /// Report a failure that has no error value (e.g. an unexpected HTTP status).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error_class: "Error".to_string(),
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Error-tracking collaborator.
///
/// `notify` never fails and never blocks on the network; reporting must not
/// change the outcome of the request that observed the failure.
pub trait ErrorReporter: Send + Sync {
    fn notify(&self, report: ErrorReport);
}

impl<R> ErrorReporter for Arc<R>
where
    R: ErrorReporter + ?Sized,
{
    fn notify(&self, report: ErrorReport) {
        (**self).notify(report)
    }
}

/// Reporter that only writes structured `error` log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn notify(&self, report: ErrorReport) {
        ::tracing::error!(
            error_class = %report.error_class,
            context = report.context.as_deref().unwrap_or(""),
            "{}",
            report.message
        );
    }
}

/// Bugsnag connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugsnagConfig {
    pub api_key: String,
    pub release_stage: String,
    pub notify_url: String,
}

impl BugsnagConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            release_stage: "development".to_string(),
            notify_url: BUGSNAG_NOTIFY_URL.to_string(),
        }
    }
}

/// Reporter that logs locally and forwards each report to Bugsnag.
///
/// Delivery is fire-and-forget on the current Tokio runtime. Delivery failures
/// are logged at `warn` and otherwise dropped.
#[derive(Debug, Clone)]
pub struct BugsnagReporter {
    config: Arc<BugsnagConfig>,
    http: reqwest::Client,
}

impl BugsnagReporter {
    pub fn new(config: BugsnagConfig) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }

    fn payload(config: &BugsnagConfig, report: &ErrorReport) -> serde_json::Value {
        json!({
            "apiKey": config.api_key,
            "payloadVersion": "5",
            "notifier": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "url": "https://docs.bugsnag.com/api/error-reporting/",
            },
            "events": [{
                "exceptions": [{
                    "errorClass": report.error_class,
                    "message": report.message,
                    "stacktrace": [],
                }],
                "context": report.context,
                "severity": "error",
                "unhandled": false,
                "severityReason": { "type": "handledException" },
                "app": { "releaseStage": config.release_stage },
                "device": { "time": Utc::now().to_rfc3339() },
            }],
        })
    }
}

impl ErrorReporter for BugsnagReporter {
    fn notify(&self, report: ErrorReport) {
        TracingReporter.notify(report.clone());

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            ::tracing::warn!("no tokio runtime; bugsnag report not delivered");
            return;
        };

        let http = self.http.clone();
        let config = Arc::clone(&self.config);
        runtime.spawn(async move {
            let body = Self::payload(&config, &report);
            let res = http
                .post(&config.notify_url)
                .header("Bugsnag-Api-Key", &config.api_key)
                .header("Bugsnag-Payload-Version", "5")
                .header("Bugsnag-Sent-At", Utc::now().to_rfc3339())
                .json(&body)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status);

            if let Err(e) = res {
                ::tracing::warn!(error = %e, "bugsnag delivery failed");
            }
        });
    }
}

/// Reporter that keeps every report in memory (tests, local debugging).
#[derive(Debug, Default)]
pub struct RecordingReporter {
    inner: Mutex<Vec<ErrorReport>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        match self.inner.lock() {
            Ok(v) => v.clone(),
            Err(_) => vec![],
        }
    }

    pub fn count(&self) -> usize {
        self.reports().len()
    }
}

impl ErrorReporter for RecordingReporter {
    fn notify(&self, report: ErrorReport) {
        if let Ok(mut v) = self.inner.lock() {
            v.push(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
    use tokio::sync::mpsc;

    #[derive(Debug)]
    struct SheetDown;

    impl core::fmt::Display for SheetDown {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("sheet is down")
        }
    }

    impl std::error::Error for SheetDown {}

    #[test]
    fn report_from_error_uses_short_type_name() {
        let report = ErrorReport::from_error(&SheetDown).with_context("POST /ai/products/check");
        assert_eq!(report.error_class, "SheetDown");
        assert_eq!(report.message, "sheet is down");
        assert_eq!(report.context.as_deref(), Some("POST /ai/products/check"));
    }

    #[test]
    fn recording_reporter_keeps_reports_in_order() {
        let reporter = RecordingReporter::new();
        reporter.notify(ErrorReport::message("first"));
        reporter.notify(ErrorReport::message("second"));

        let messages: Vec<_> = reporter.reports().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn bugsnag_payload_carries_exception_and_stage() {
        let mut config = BugsnagConfig::new("key-123");
        config.release_stage = "production".to_string();
        let report = ErrorReport::message("Gemini API error: 500 boom");

        let payload = BugsnagReporter::payload(&config, &report);
        assert_eq!(payload["apiKey"], "key-123");
        assert_eq!(payload["payloadVersion"], "5");
        assert_eq!(payload["events"][0]["exceptions"][0]["message"], "Gemini API error: 500 boom");
        assert_eq!(payload["events"][0]["app"]["releaseStage"], "production");
    }

    #[tokio::test]
    async fn bugsnag_reporter_posts_to_notify_endpoint() {
        let (tx, mut rx) = mpsc::unbounded_channel::<(Option<String>, serde_json::Value)>();

        async fn capture(
            State(tx): State<mpsc::UnboundedSender<(Option<String>, serde_json::Value)>>,
            headers: HeaderMap,
            Json(body): Json<serde_json::Value>,
        ) {
            let key = headers
                .get("Bugsnag-Api-Key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let _ = tx.send((key, body));
        }

        let app = Router::new().route("/", post(capture)).with_state(tx);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut config = BugsnagConfig::new("key-123");
        config.notify_url = format!("http://{addr}/");
        let reporter = BugsnagReporter::new(config);
        reporter.notify(ErrorReport::message("boom").with_context("test"));

        let (key, body) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("bugsnag notify not received in time")
            .expect("channel closed");
        assert_eq!(key.as_deref(), Some("key-123"));
        assert_eq!(body["events"][0]["exceptions"][0]["message"], "boom");
        assert_eq!(body["events"][0]["context"], "test");

        server.abort();
    }
}
