//! Gemini `generateContent` client.
//!
//! Wire types mirror the subset of the REST API this service reads and writes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use intake_observability::{ErrorReport, ErrorReporter};

use crate::result::{Generation, GenerationError, TextGenerator};

/// Public Gemini API origin.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Explicit Gemini settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Per-request timeout. `None` waits as long as the server does.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present and non-blank.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

/// Gemini-backed [`TextGenerator`].
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
    reporter: Arc<dyn ErrorReporter>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(
        config: GeminiConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self, GenerationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            config,
            http,
            reporter,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn generate_content(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        Ok(parsed.first_text())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Generation {
        match self.generate_content(prompt).await {
            Ok(Some(text)) => Generation::Text(text),
            Ok(None) => {
                tracing::warn!(model = %self.config.model, "gemini returned no text");
                Generation::Fallback
            }
            Err(err) => {
                self.reporter
                    .notify(ErrorReport::from_error(&err).with_context("gemini.generate_content"));
                Generation::Fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::post,
    };
    use intake_observability::RecordingReporter;
    use serde_json::json;

    #[derive(Clone)]
    struct Mock {
        status: StatusCode,
        body: String,
        seen: Arc<Mutex<Vec<(String, Option<String>, serde_json::Value)>>>,
    }

    async fn generate_content(
        State(mock): State<Mock>,
        Path(model_action): Path<String>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> impl IntoResponse {
        let key = headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        mock.seen.lock().unwrap().push((model_action, key, body));
        (mock.status, mock.body)
    }

    async fn spawn_mock(status: StatusCode, body: impl Into<String>) -> (String, Mock) {
        let mock = Mock {
            status,
            body: body.into(),
            seen: Arc::default(),
        };
        let app = Router::new()
            .route("/v1beta/models/:model_action", post(generate_content))
            .with_state(mock.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), mock)
    }

    fn client(base_url: &str, reporter: Arc<RecordingReporter>) -> GeminiClient {
        let config = GeminiConfig::new("test-key", "gemini-test").with_base_url(base_url);
        GeminiClient::new(config, reporter).unwrap()
    }

    #[tokio::test]
    async fn sends_single_user_turn_and_returns_first_text() {
        let response = json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Widget added!" }, { "text": "ignored" }] } },
                { "content": { "parts": [{ "text": "second candidate" }] } }
            ]
        });
        let (base, mock) = spawn_mock(StatusCode::OK, response.to_string()).await;
        let reporter = Arc::new(RecordingReporter::new());

        let out = client(&base, reporter.clone()).generate("hello").await;
        assert_eq!(out, Generation::Text("Widget added!".to_string()));
        assert_eq!(reporter.count(), 0);

        let seen = mock.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (model_action, key, body) = &seen[0];
        assert_eq!(model_action, "gemini-test:generateContent");
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(
            body,
            &json!({ "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }] })
        );
    }

    #[tokio::test]
    async fn missing_text_falls_back_without_report() {
        let (base, _mock) = spawn_mock(StatusCode::OK, json!({ "candidates": [] }).to_string()).await;
        let reporter = Arc::new(RecordingReporter::new());

        let out = client(&base, reporter.clone()).generate("hello").await;
        assert_eq!(out, Generation::Fallback);
        assert_eq!(reporter.count(), 0);
    }

    #[tokio::test]
    async fn error_status_falls_back_and_reports() {
        let (base, _mock) = spawn_mock(StatusCode::SERVICE_UNAVAILABLE, "overloaded").await;
        let reporter = Arc::new(RecordingReporter::new());

        let out = client(&base, reporter.clone()).generate("hello").await;
        assert_eq!(out.into_message(), "No response from Gemini.");

        let reports = reporter.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].message, "Gemini API error: 503 overloaded");
    }

    #[tokio::test]
    async fn unparsable_body_falls_back_and_reports() {
        let (base, _mock) = spawn_mock(StatusCode::OK, "<html>not json</html>").await;
        let reporter = Arc::new(RecordingReporter::new());

        let out = client(&base, reporter.clone()).generate("hello").await;
        assert!(out.is_fallback());
        assert_eq!(reporter.count(), 1);
    }

    #[tokio::test]
    async fn unreachable_server_falls_back_and_reports() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let reporter = Arc::new(RecordingReporter::new());
        let out = client(&format!("http://{addr}"), reporter.clone())
            .generate("hello")
            .await;
        assert!(out.is_fallback());
        assert_eq!(reporter.count(), 1);
    }

    #[tokio::test]
    async fn transport_failure_report_does_not_leak_api_key() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let reporter = Arc::new(RecordingReporter::new());
        let config = GeminiConfig::new("SECRET-KEY-123", "m").with_base_url(format!("http://{addr}"));
        let out = GeminiClient::new(config, reporter.clone())
            .unwrap()
            .generate("hello")
            .await;
        assert!(out.is_fallback());

        let reports = reporter.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].message.starts_with("Gemini request failed"));
        assert!(!reports[0].message.contains("SECRET-KEY-123"), "{}", reports[0].message);
        assert!(!reports[0].message.contains("generateContent"), "{}", reports[0].message);
    }

    #[tokio::test]
    async fn api_key_is_not_sent_in_the_query_string() {
        let seen_query: Arc<Mutex<Option<String>>> = Arc::default();
        let captured = seen_query.clone();
        let app = Router::new().route(
            "/v1beta/models/:model_action",
            post(move |uri: axum::http::Uri| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(uri.query().unwrap_or_default().to_string());
                    (StatusCode::OK, "{}")
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let reporter = Arc::new(RecordingReporter::new());
        let config = GeminiConfig::new("SECRET-KEY-123", "m").with_base_url(format!("http://{addr}"));
        GeminiClient::new(config, reporter).unwrap().generate("hello").await;

        assert_eq!(seen_query.lock().unwrap().as_deref(), Some(""));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let config = GeminiConfig::new("k", "gemini-2.0-flash").with_base_url("http://x/");
        assert_eq!(
            config.endpoint(),
            "http://x/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
