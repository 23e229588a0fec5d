//! Generation backend boundary.
//!
//! The external generator is a capability, not a dependency: it either
//! returns a structured reply or fails, and every failure mode (network,
//! timeout, malformed output, not configured) looks the same to the
//! orchestrator. Production talks to an Ollama chat endpoint; tests use
//! `FakeBackend` with pre-configured outcomes.

use crate::prompts::SYSTEM_PROMPT;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solace_common::{Emotion, SolaceError, UnifiedReply};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

/// One turn of bounded history, in the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A generate-or-fail capability.
///
/// Implementations must be cheap to share across concurrent calls; all
/// state is per-call.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// One attempt at generating a reply for `message` with bounded
    /// `history`. Any problem is an `Err`; the caller falls back.
    async fn generate(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<UnifiedReply, SolaceError>;

    /// Cheap reachability probe, used for advisory logging only.
    async fn is_available(&self) -> bool;

    /// Short name for log lines.
    fn name(&self) -> &str;
}

// ============================================================================
// Reply parsing - shared by every backend
// ============================================================================

/// Wire shape of a well-behaved backend reply.
#[derive(Debug, Deserialize)]
struct RawReply {
    emotion: Option<String>,
    confidence: Option<f64>,
    sentiment_score: Option<f64>,
    response: Option<String>,
    coping_tip: Option<String>,
}

/// Strip markdown code fences the model may wrap its JSON in.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    for fence in ["```json", "```"] {
        if let Some(rest) = trimmed.strip_prefix(fence) {
            if let Some(inner) = rest.rsplit_once("```") {
                return inner.0.trim();
            }
            return rest.trim();
        }
    }
    trimmed
}

/// Extract the outermost JSON object if the model added prose around it.
fn extract_json(text: &str) -> &str {
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return &text[start..=end];
        }
    }
    text
}

/// Parse and normalize backend output into the unified shape.
///
/// Tolerant the way models require: direct parse first, then fence/brace
/// cleanup, then field-by-field extraction. An out-of-set emotion label
/// becomes neutral rather than failing the call; a missing or empty
/// response text is the one unrecoverable case.
pub fn parse_reply(text: &str) -> Result<UnifiedReply, SolaceError> {
    let cleaned = extract_json(strip_fences(text));

    let raw: RawReply = match serde_json::from_str(cleaned) {
        Ok(raw) => raw,
        Err(_) => {
            let value: Value = serde_json::from_str(cleaned).map_err(|e| {
                SolaceError::Backend(format!("backend returned non-JSON output: {}", e))
            })?;
            RawReply {
                emotion: value
                    .get("emotion")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
                confidence: value.get("confidence").and_then(|v| v.as_f64()),
                sentiment_score: value.get("sentiment_score").and_then(|v| v.as_f64()),
                response: value
                    .get("response")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
                coping_tip: value
                    .get("coping_tip")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            }
        }
    };

    let response = raw
        .response
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| SolaceError::Backend("backend reply has no response text".to_string()))?;

    let emotion = raw
        .emotion
        .as_deref()
        .and_then(Emotion::from_str)
        .unwrap_or(Emotion::Neutral);

    Ok(UnifiedReply {
        emotion,
        confidence: raw.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
        sentiment_score: raw.sentiment_score.unwrap_or(0.0).clamp(-1.0, 1.0),
        response,
        coping_tip: raw
            .coping_tip
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Take a deep breath.".to_string()),
        is_crisis: emotion == Emotion::Crisis,
    })
}

// ============================================================================
// Ollama backend (production)
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

/// Chat client for a local Ollama endpoint.
pub struct OllamaBackend {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaBackend {
    /// The timeout bounds the single impure step of the whole engine; a
    /// slow backend degrades to the deterministic path, it never blocks
    /// the caller.
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    async fn generate(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<UnifiedReply, SolaceError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: ChatRole::System,
            content: SYSTEM_PROMPT.to_string(),
        });
        messages.extend_from_slice(history);
        messages.push(ChatMessage {
            role: ChatRole::User,
            content: message.to_string(),
        });

        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
            format: Some("json".to_string()),
        };

        let url = format!("{}/api/chat", self.endpoint);
        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SolaceError::Backend(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SolaceError::Backend(format!(
                "backend returned {}",
                response.status()
            )));
        }

        let chat: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| SolaceError::Backend(format!("unreadable response body: {}", e)))?;

        parse_reply(&chat.message.content)
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        self.http_client
            .get(&url)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

// ============================================================================
// Fake backend (testing)
// ============================================================================

/// Deterministic backend for tests: scripted outcomes, call tracking, no
/// network.
pub struct FakeBackend {
    /// Outcomes consumed in order; the last one repeats once exhausted.
    script: Mutex<VecDeque<Result<UnifiedReply, String>>>,
    available: bool,
    calls: Arc<Mutex<usize>>,
    last_history: Arc<Mutex<Option<Vec<ChatMessage>>>>,
}

impl FakeBackend {
    /// Backend that always succeeds with `reply`.
    pub fn succeeding(reply: UnifiedReply) -> Self {
        Self::scripted(vec![Ok(reply)])
    }

    /// Backend that always fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::scripted(vec![Err(message.to_string())])
    }

    /// Backend that plays `outcomes` in order, repeating the last.
    pub fn scripted(outcomes: Vec<Result<UnifiedReply, String>>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            available: true,
            calls: Arc::new(Mutex::new(0)),
            last_history: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// How many times `generate` was invoked.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    /// History passed to the most recent `generate` call.
    pub fn last_history(&self) -> Option<Vec<ChatMessage>> {
        self.last_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    async fn generate(
        &self,
        _message: &str,
        history: &[ChatMessage],
    ) -> Result<UnifiedReply, SolaceError> {
        *self.calls.lock().unwrap() += 1;
        *self.last_history.lock().unwrap() = Some(history.to_vec());

        let mut script = self.script.lock().unwrap();
        let outcome = if script.len() > 1 {
            script.pop_front().expect("script non-empty")
        } else {
            script.front().cloned().expect("script non-empty")
        };
        outcome.map_err(SolaceError::Backend)
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Log the backend's reachability once at startup. Advisory only: the
/// engine behaves identically either way, attempting and falling back.
pub async fn log_availability(backend: &dyn GenerationBackend) {
    if backend.is_available().await {
        info!("Generation backend '{}' is reachable", backend.name());
    } else {
        warn!(
            "Generation backend '{}' is unreachable - rule-based fallback will serve replies",
            backend.name()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "emotion": "sad",
            "confidence": 0.85,
            "sentiment_score": -0.6,
            "response": "That sounds really hard.",
            "coping_tip": "Try a short walk."
        }"#
    }

    #[test]
    fn test_parse_well_formed_reply() {
        let reply = parse_reply(sample_json()).unwrap();
        assert_eq!(reply.emotion, Emotion::Sad);
        assert_eq!(reply.confidence, 0.85);
        assert_eq!(reply.response, "That sounds really hard.");
        assert!(!reply.is_crisis);
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let fenced = format!("```json\n{}\n```", sample_json());
        let reply = parse_reply(&fenced).unwrap();
        assert_eq!(reply.emotion, Emotion::Sad);
    }

    #[test]
    fn test_parse_extracts_json_from_prose() {
        let wrapped = format!("Sure! Here you go: {} Hope that helps.", sample_json());
        let reply = parse_reply(&wrapped).unwrap();
        assert_eq!(reply.emotion, Emotion::Sad);
    }

    #[test]
    fn test_parse_normalizes_unknown_emotion_to_neutral() {
        let json = r#"{"emotion": "ecstatic", "response": "Nice!"}"#;
        let reply = parse_reply(json).unwrap();
        assert_eq!(reply.emotion, Emotion::Neutral);
        assert!(!reply.is_crisis);
    }

    #[test]
    fn test_parse_defaults_missing_fields() {
        let json = r#"{"emotion": "happy", "response": "Love that for you!"}"#;
        let reply = parse_reply(json).unwrap();
        assert_eq!(reply.confidence, 0.5);
        assert_eq!(reply.sentiment_score, 0.0);
        assert_eq!(reply.coping_tip, "Take a deep breath.");
    }

    #[test]
    fn test_parse_clamps_out_of_range_scores() {
        let json = r#"{
            "emotion": "happy",
            "confidence": 3.0,
            "sentiment_score": -7.5,
            "response": "ok"
        }"#;
        let reply = parse_reply(json).unwrap();
        assert_eq!(reply.confidence, 1.0);
        assert_eq!(reply.sentiment_score, -1.0);
    }

    #[test]
    fn test_parse_rejects_missing_response() {
        let json = r#"{"emotion": "happy", "coping_tip": "smile"}"#;
        assert!(parse_reply(json).is_err());
        let empty = r#"{"emotion": "happy", "response": "   "}"#;
        assert!(parse_reply(empty).is_err());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_reply("I'm sorry, I can't help with that.").is_err());
    }

    #[test]
    fn test_parse_crisis_label_sets_flag() {
        let json = r#"{"emotion": "crisis", "response": "Please call 988 right now."}"#;
        let reply = parse_reply(json).unwrap();
        assert!(reply.is_crisis);
        assert_eq!(reply.emotion, Emotion::Crisis);
    }

    #[tokio::test]
    async fn test_fake_backend_scripted_outcomes() {
        let ok_reply = UnifiedReply {
            emotion: Emotion::Happy,
            confidence: 0.9,
            sentiment_score: 0.8,
            response: "yay".to_string(),
            coping_tip: "keep going".to_string(),
            is_crisis: false,
        };
        let fake = FakeBackend::scripted(vec![
            Err("boom".to_string()),
            Ok(ok_reply.clone()),
        ]);

        assert!(fake.generate("hi", &[]).await.is_err());
        assert_eq!(fake.generate("hi", &[]).await.unwrap(), ok_reply);
        // Last outcome repeats.
        assert_eq!(fake.generate("hi", &[]).await.unwrap(), ok_reply);
        assert_eq!(fake.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fake_backend_records_history() {
        let fake = FakeBackend::failing("down");
        let history = vec![ChatMessage {
            role: ChatRole::User,
            content: "earlier".to_string(),
        }];
        let _ = fake.generate("now", &history).await;
        assert_eq!(fake.last_history(), Some(history));
    }
}
