//! OpenAI-compatible question generator.
//!
//! Works with OpenAI and any endpoint exposing `/v1/chat/completions`
//! (OpenRouter, Ollama, vLLM, ...). One chat completion is sent per
//! question; the reply is expected to be a JSON object with `question`
//! and `assessment_criteria`.

use async_trait::async_trait;
use qbank_config::GeneratorConfig;
use qbank_core::error::GenerationError;
use qbank_core::generator::QuestionGenerator;
use qbank_core::question::{CriteriaCategory, GeneratedQuestion, QuestionKey};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace, warn};

const SYSTEM_PROMPT: &str = "You are an assistant that generates structured interview questions.";

/// A question generator backed by an OpenAI-compatible chat API.
pub struct OpenAiCompatGenerator {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiCompatGenerator {
    /// Create a generator with default sampling (temperature 0.7, 300 tokens).
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        Self::with_timeout(name, base_url, api_key, model, Duration::from_secs(120))
    }

    fn with_timeout(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 300,
            client,
        })
    }

    /// Create an OpenAI generator (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Result<Self, GenerationError> {
        Self::new("openai", "https://api.openai.com/v1", api_key, "gpt-4o-mini")
    }

    /// Build a generator from the `[generator]` config section.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            GenerationError::NotConfigured(
                "no API key: set generator.api_key, QBANK_API_KEY or OPENAI_API_KEY".into(),
            )
        })?;

        Ok(Self::with_timeout(
            config.provider.clone(),
            config.api_url.clone(),
            api_key,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )?
        .temperature(config.temperature)
        .max_tokens(config.max_tokens))
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// The user prompt for one question.
pub fn build_prompt(key: &QuestionKey) -> String {
    format!(
        r#"Create an interview question for the subject '{subject}', tailored for a candidate with
{experience} of experience applying to a {company_type}.

Provide the response in the following JSON format:
{{
    "question": "<The interview question>",
    "assessment_criteria": [
        {{
            "category": "<Category Name>",
            "points": [
                "<Point 1>",
                "<Point 2>"
            ]
        }}
    ]
}}"#,
        subject = key.subject,
        experience = key.experience,
        company_type = key.company_type,
    )
}

/// Parse the model's reply into a [`GeneratedQuestion`].
///
/// A Markdown code fence around the JSON is tolerated. Anything that is
/// not an object with a string `question` and a well-formed
/// `assessment_criteria` array is `MalformedPayload`.
pub fn parse_payload(raw: &str) -> Result<GeneratedQuestion, GenerationError> {
    let body = strip_code_fence(raw);

    let value: Value = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedPayload(format!("reply is not JSON: {e}")))?;

    let question = value
        .get("question")
        .and_then(Value::as_str)
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| GenerationError::MalformedPayload("missing 'question'".into()))?
        .to_string();

    let criteria = value
        .get("assessment_criteria")
        .cloned()
        .ok_or_else(|| GenerationError::MalformedPayload("missing 'assessment_criteria'".into()))?;
    let assessment_criteria: Vec<CriteriaCategory> = serde_json::from_value(criteria)
        .map_err(|e| GenerationError::MalformedPayload(format!("bad 'assessment_criteria': {e}")))?;

    Ok(GeneratedQuestion {
        question,
        assessment_criteria,
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[async_trait]
impl QuestionGenerator for OpenAiCompatGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, key: &QuestionKey) -> Result<GeneratedQuestion, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(key) },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        });

        debug!(
            provider = %self.name,
            model = %self.model,
            subject = %key.subject,
            "Sending question generation request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(GenerationError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(GenerationError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(GenerationError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            GenerationError::MalformedPayload(format!("Failed to parse response: {e}"))
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GenerationError::MalformedPayload("No content in response".into()))?;

        trace!(raw = %content, "Raw provider reply");
        parse_payload(&content)
    }
}

// --- OpenAI API types ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use std::sync::{Arc, Mutex};

    fn key() -> QuestionKey {
        QuestionKey::new("Databases", "2-4 years", "Startup").unwrap()
    }

    /// Canned chat-completions endpoint; records the last request body.
    #[derive(Clone)]
    struct FakeChat {
        status: StatusCode,
        content: Option<String>,
        last_request: Arc<Mutex<Option<Value>>>,
    }

    impl FakeChat {
        fn replying(content: &str) -> Self {
            Self {
                status: StatusCode::OK,
                content: Some(content.into()),
                last_request: Arc::default(),
            }
        }

        fn failing(status: StatusCode) -> Self {
            Self {
                status,
                content: None,
                last_request: Arc::default(),
            }
        }
    }

    async fn completions(
        State(fake): State<FakeChat>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        assert_eq!(
            headers.get("authorization").and_then(|v| v.to_str().ok()),
            Some("Bearer sk-test")
        );
        *fake.last_request.lock().unwrap() = Some(body);
        if fake.status != StatusCode::OK {
            return (fake.status, "upstream says no").into_response();
        }
        Json(serde_json::json!({
            "model": "gpt-4o-mini",
            "choices": [{ "message": { "role": "assistant", "content": fake.content } }]
        }))
        .into_response()
    }

    async fn spawn(fake: FakeChat) -> OpenAiCompatGenerator {
        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(fake);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        OpenAiCompatGenerator::new("test", format!("http://{addr}/v1/"), "sk-test", "gpt-4o-mini")
            .unwrap()
    }

    const GOOD_REPLY: &str = r#"{
        "question": "How would you shard a Postgres table?",
        "assessment_criteria": [
            {"category": "Scaling", "points": ["Picks a shard key", "Discusses rebalancing"]}
        ]
    }"#;

    #[test]
    fn openai_constructor() {
        let generator = OpenAiCompatGenerator::openai("sk-test").unwrap();
        assert_eq!(generator.name(), "openai");
        assert_eq!(generator.model(), "gpt-4o-mini");
        assert!(generator.base_url.contains("api.openai.com"));
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = GeneratorConfig::default();
        let err = OpenAiCompatGenerator::from_config(&config).err().unwrap();
        assert!(matches!(err, GenerationError::NotConfigured(_)));
    }

    #[test]
    fn from_config_applies_sampling() {
        let config = GeneratorConfig {
            api_key: Some("sk-test".into()),
            temperature: 0.1,
            max_tokens: 512,
            model: "gpt-4o".into(),
            ..GeneratorConfig::default()
        };
        let generator = OpenAiCompatGenerator::from_config(&config).unwrap();
        assert_eq!(generator.model(), "gpt-4o");
        assert_eq!(generator.max_tokens, 512);
        assert!((generator.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn prompt_mentions_the_whole_key() {
        let prompt = build_prompt(&key());
        assert!(prompt.contains("'Databases'"));
        assert!(prompt.contains("2-4 years of experience"));
        assert!(prompt.contains("applying to a Startup"));
        assert!(prompt.contains("\"assessment_criteria\""));
    }

    #[test]
    fn parse_plain_json() {
        let q = parse_payload(GOOD_REPLY).unwrap();
        assert_eq!(q.question, "How would you shard a Postgres table?");
        assert_eq!(q.assessment_criteria.len(), 1);
        assert_eq!(q.assessment_criteria[0].points.len(), 2);
    }

    #[test]
    fn parse_fenced_json() {
        let fenced = format!("```json\n{GOOD_REPLY}\n```");
        let q = parse_payload(&fenced).unwrap();
        assert_eq!(q.assessment_criteria[0].category, "Scaling");
    }

    #[test]
    fn parse_rejects_missing_fields() {
        let err = parse_payload(r#"{"assessment_criteria": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedPayload(ref m) if m.contains("question")));

        let err = parse_payload(r#"{"question": "Why?"}"#).unwrap_err();
        assert!(
            matches!(err, GenerationError::MalformedPayload(ref m) if m.contains("assessment_criteria"))
        );
    }

    #[test]
    fn parse_rejects_prose() {
        let err = parse_payload("Sure! Here is a question: why Rust?").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedPayload(_)));
    }

    #[test]
    fn parse_rejects_badly_shaped_criteria() {
        let err =
            parse_payload(r#"{"question": "Why?", "assessment_criteria": "be good"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn generate_sends_prompt_and_parses_reply() {
        let fake = FakeChat::replying(GOOD_REPLY);
        let generator = spawn(fake.clone()).await;

        let q = generator.generate(&key()).await.unwrap();
        assert_eq!(q.question, "How would you shard a Postgres table?");

        let sent = fake.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent["model"], "gpt-4o-mini");
        assert_eq!(sent["max_tokens"], 300);
        assert_eq!(sent["messages"][0]["role"], "system");
        assert_eq!(sent["messages"][0]["content"], SYSTEM_PROMPT);
        assert!(
            sent["messages"][1]["content"]
                .as_str()
                .unwrap()
                .contains("Databases")
        );
    }

    #[tokio::test]
    async fn malformed_reply_is_generation_failure() {
        let generator = spawn(FakeChat::replying(r#"{"text": "no question here"}"#)).await;
        let err = generator.generate(&key()).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn status_codes_map_to_errors() {
        let generator = spawn(FakeChat::failing(StatusCode::TOO_MANY_REQUESTS)).await;
        assert!(matches!(
            generator.generate(&key()).await,
            Err(GenerationError::RateLimited { .. })
        ));

        let generator = spawn(FakeChat::failing(StatusCode::UNAUTHORIZED)).await;
        assert!(matches!(
            generator.generate(&key()).await,
            Err(GenerationError::AuthenticationFailed(_))
        ));

        let generator = spawn(FakeChat::failing(StatusCode::INTERNAL_SERVER_ERROR)).await;
        let err = generator.generate(&key()).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::ApiError { status_code: 500, ref message } if message.contains("upstream")
        ));
    }
}
