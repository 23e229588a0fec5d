//! Generation orchestrator.
//!
//! Decides, per message, between the external generation backend and the
//! local rule-based path. The crisis check always runs locally first and
//! short-circuits - the backend is never consulted for crisis messages.
//! Everything else is best-effort backend with a deterministic fallback,
//! so a non-crisis caller never observes a hard failure.

use crate::classifier;
use crate::config::SolaceConfig;
use crate::extractors;
use crate::generation::{self, ChatMessage, ChatRole, GenerationBackend, OllamaBackend};
use crate::responses;
use solace_common::{ChatTurn, UnifiedReply};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ResponseEngine {
    /// None when no backend is configured - equivalent to a backend that
    /// always fails.
    backend: Option<Arc<dyn GenerationBackend>>,
    history_limit: usize,
}

impl ResponseEngine {
    pub fn new(backend: Option<Arc<dyn GenerationBackend>>) -> Self {
        Self {
            backend,
            history_limit: 10,
        }
    }

    /// Rule-based only, no backend. Used for tests and as the degenerate
    /// configuration.
    pub fn rule_based() -> Self {
        Self::new(None)
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Build from config: Ollama backend when enabled, plain fallback
    /// engine otherwise.
    pub fn from_config(config: &SolaceConfig) -> Self {
        let backend: Option<Arc<dyn GenerationBackend>> = if config.backend.enabled {
            info!(
                "Generation backend enabled: {} ({})",
                config.backend.endpoint, config.backend.model
            );
            Some(Arc::new(OllamaBackend::new(
                &config.backend.endpoint,
                &config.backend.model,
                Duration::from_secs(config.backend.timeout_secs),
            )))
        } else {
            info!("Generation backend disabled - rule-based replies only");
            None
        };

        Self::new(backend).with_history_limit(config.backend.history_limit)
    }

    /// Advisory startup log; never changes behavior.
    pub async fn log_availability(&self) {
        if let Some(backend) = &self.backend {
            generation::log_availability(backend.as_ref()).await;
        }
    }

    /// Produce a reply for a message with its recent history.
    ///
    /// At most one backend attempt; any failure falls back to the
    /// classifier + selector. The output shape is identical on every path.
    pub async fn generate(&self, text: &str, history: &[ChatTurn]) -> UnifiedReply {
        // Safety gate: local, deterministic, not overridable.
        if extractors::crisis(text) {
            warn!("Crisis indicators detected - responding with crisis resources");
            return responses::crisis_reply();
        }

        if let Some(backend) = &self.backend {
            let bounded = bound_history(history, self.history_limit);
            match backend.generate(text, &bounded).await {
                Ok(reply) => {
                    debug!(
                        "Backend '{}' replied (emotion: {})",
                        backend.name(),
                        reply.emotion
                    );
                    return reply;
                }
                Err(e) => {
                    warn!(
                        "Backend '{}' failed, using rule-based fallback: {}",
                        backend.name(),
                        e
                    );
                }
            }
        }

        self.fallback(text)
    }

    /// The deterministic path: classify, then select.
    fn fallback(&self, text: &str) -> UnifiedReply {
        let result = classifier::classify(text);
        let (response, coping_tip) = responses::select(&result);
        UnifiedReply {
            emotion: result.emotion,
            confidence: result.confidence,
            sentiment_score: result.sentiment_score,
            response,
            coping_tip,
            is_crisis: result.is_crisis,
        }
    }
}

/// Convert caller history to backend messages, keeping only the most
/// recent `limit` turns.
fn bound_history(history: &[ChatTurn], limit: usize) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(limit);
    history[start..]
        .iter()
        .map(|turn| ChatMessage {
            role: if turn.is_ai_response {
                ChatRole::Assistant
            } else {
                ChatRole::User
            },
            content: turn.content.clone(),
        })
        .collect()
}
