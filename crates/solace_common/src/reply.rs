//! Unified reply shape and conversation history types.

use crate::emotion::Emotion;
use serde::{Deserialize, Serialize};

/// One prior turn of the conversation, as stored by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub content: String,
    /// True for turns authored by the assistant, false for the user.
    pub is_ai_response: bool,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_ai_response: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_ai_response: true,
        }
    }
}

/// The engine's output, identical in shape whichever path produced it.
///
/// Callers cannot tell (and must not care) whether the generation backend
/// or the rule-based fallback answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedReply {
    pub emotion: Emotion,
    pub confidence: f64,
    pub sentiment_score: f64,
    pub response: String,
    pub coping_tip: String,
    pub is_crisis: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_turn_constructors() {
        assert!(!ChatTurn::user("hi").is_ai_response);
        assert!(ChatTurn::assistant("hello").is_ai_response);
    }

    #[test]
    fn test_unified_reply_serde_shape() {
        let reply = UnifiedReply {
            emotion: Emotion::Neutral,
            confidence: 0.3,
            sentiment_score: 0.0,
            response: "I'm listening.".to_string(),
            coping_tip: "Take a deep breath.".to_string(),
            is_crisis: false,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["emotion"], "neutral");
        assert_eq!(json["is_crisis"], false);
        let back: UnifiedReply = serde_json::from_value(json).unwrap();
        assert_eq!(back, reply);
    }
}
