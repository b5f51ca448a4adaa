//! Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use worksync_api::AiInsight;
use worksync_config::InsightSettings;

use crate::{InsightError, InsightProvider, InsightRequest, InsightResult};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the Gemini structured-output endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> InsightResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from config; the key is read from the configured
    /// environment variable
    pub fn from_settings(settings: &InsightSettings) -> InsightResult<Self> {
        if !settings.enabled {
            return Err(InsightError::Disabled);
        }
        let api_key = settings
            .api_key()
            .ok_or_else(|| InsightError::MissingApiKey(settings.api_key_env.clone()))?;

        Self::new(&settings.endpoint, &settings.model, api_key, settings.timeout)
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl InsightProvider for GeminiClient {
    async fn generate(&self, request: &InsightRequest) -> InsightResult<AiInsight> {
        let body = request_body(request)?;

        debug!(model = %self.model, samples = request.len(), "Requesting insight");

        let response = self
            .http
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateContentResponse = response.json().await?;
        let insight = parse_insight(&envelope.text()?)?;

        info!(
            efficiency_score = insight.efficiency_score,
            recommendations = insight.recommendations.len(),
            "Insight received"
        );
        Ok(insight)
    }
}

/// Request body asking for JSON matching the `AiInsight` shape
pub fn request_body(request: &InsightRequest) -> InsightResult<Value> {
    Ok(json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt()? }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "summary": {
                        "type": "STRING",
                        "description": "Overall analysis of team health and productivity."
                    },
                    "efficiencyScore": {
                        "type": "NUMBER",
                        "description": "A score from 0-100 representing team efficiency."
                    },
                    "recommendations": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "List of actionable management recommendations."
                    }
                },
                "required": ["summary", "efficiencyScore", "recommendations"]
            }
        }
    }))
}

/// Strictly parse the generated text into an insight
pub fn parse_insight(text: &str) -> InsightResult<AiInsight> {
    let insight: AiInsight =
        serde_json::from_str(text).map_err(|e| InsightError::Malformed(e.to_string()))?;

    if !insight.efficiency_score.is_finite() || !(0.0..=100.0).contains(&insight.efficiency_score) {
        return Err(InsightError::ScoreOutOfRange(insight.efficiency_score));
    }
    Ok(insight)
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated
    fn text(&self) -> InsightResult<String> {
        let content = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .ok_or_else(|| InsightError::Malformed("response has no candidates".into()))?;

        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            return Err(InsightError::Malformed("candidate has no text".into()));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worksync_api::AttendanceRecord;
    use worksync_util::EmployeeId;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(server.uri(), "test-model", "secret", Duration::from_secs(5)).unwrap()
    }

    fn request() -> InsightRequest {
        let record = AttendanceRecord::open(EmployeeId::new("2001"), worksync_util::now());
        InsightRequest::from_records(&[record], 50)
    }

    fn envelope(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    const GOOD: &str = r#"{"summary":"Team is steady.","efficiencyScore":82,"recommendations":["Rotate on-call","Cap overtime"]}"#;

    #[tokio::test]
    async fn generate_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(GOOD)))
            .expect(1)
            .mount(&server)
            .await;

        let insight = client(&server).generate(&request()).await.unwrap();
        assert_eq!(insight.summary, "Team is steady.");
        assert_eq!(insight.efficiency_score, 82.0);
        assert_eq!(insight.recommendations.len(), 2);
    }

    #[tokio::test]
    async fn server_error_is_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client(&server).generate(&request()).await.unwrap_err();
        match err {
            InsightError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_json_text_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope("not json at all")))
            .mount(&server)
            .await;

        let err = client(&server).generate(&request()).await.unwrap_err();
        assert!(matches!(err, InsightError::Malformed(_)));
    }

    #[tokio::test]
    async fn empty_candidates_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = client(&server).generate(&request()).await.unwrap_err();
        assert!(matches!(err, InsightError::Malformed(_)));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = parse_insight(r#"{"summary":"x","recommendations":[]}"#).unwrap_err();
        assert!(matches!(err, InsightError::Malformed(_)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse_insight(
            r#"{"summary":"x","efficiencyScore":5,"recommendations":[],"mood":"good"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, InsightError::Malformed(_)));
    }

    #[test]
    fn score_must_be_in_range() {
        let err = parse_insight(r#"{"summary":"x","efficiencyScore":140,"recommendations":[]}"#)
            .unwrap_err();
        assert!(matches!(err, InsightError::ScoreOutOfRange(s) if s == 140.0));

        assert!(parse_insight(r#"{"summary":"x","efficiencyScore":0,"recommendations":[]}"#).is_ok());
        assert!(parse_insight(r#"{"summary":"x","efficiencyScore":100,"recommendations":[]}"#).is_ok());
    }

    #[test]
    fn body_requests_structured_json() {
        let body = request_body(&request()).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            json!(["summary", "efficiencyScore", "recommendations"])
        );
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains(r#""empId":"2001""#));
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        let client =
            GeminiClient::new("https://example.test/", "m", "k", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url(), "https://example.test/v1beta/models/m:generateContent");
    }

    #[test]
    fn disabled_settings_build_no_client() {
        let settings = InsightSettings {
            enabled: false,
            ..InsightSettings::default()
        };
        assert!(matches!(
            GeminiClient::from_settings(&settings),
            Err(InsightError::Disabled)
        ));

        let settings = InsightSettings {
            api_key_env: "WORKSYNC_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..InsightSettings::default()
        };
        assert!(matches!(
            GeminiClient::from_settings(&settings),
            Err(InsightError::MissingApiKey(_))
        ));
    }
}
