//! The closed emotion set and classification result type.

use serde::{Deserialize, Serialize};

/// Emotions the engine can classify.
///
/// The set is closed: external labels outside it are normalized to
/// `Neutral` at the validation boundary, never stored as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Sad,
    Anxious,
    Angry,
    Confused,
    Tired,
    Grateful,
    Neutral,
    Heartbreak,
    Grief,
    Depressed,
    Crisis,
}

impl Emotion {
    /// Every variant, in declaration order. Used by coverage tests and
    /// prompt building.
    pub const ALL: [Emotion; 12] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Anxious,
        Emotion::Angry,
        Emotion::Confused,
        Emotion::Tired,
        Emotion::Grateful,
        Emotion::Neutral,
        Emotion::Heartbreak,
        Emotion::Grief,
        Emotion::Depressed,
        Emotion::Crisis,
    ];

    /// Parse from a wire label (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "happy" => Some(Self::Happy),
            "sad" => Some(Self::Sad),
            "anxious" => Some(Self::Anxious),
            "angry" => Some(Self::Angry),
            "confused" => Some(Self::Confused),
            "tired" => Some(Self::Tired),
            "grateful" => Some(Self::Grateful),
            "neutral" => Some(Self::Neutral),
            "heartbreak" => Some(Self::Heartbreak),
            "grief" => Some(Self::Grief),
            "depressed" => Some(Self::Depressed),
            "crisis" => Some(Self::Crisis),
            _ => None,
        }
    }

    /// Fixed sentiment score per emotion, in [-1, 1].
    ///
    /// Never computed per message - always this table.
    pub fn sentiment_score(&self) -> f64 {
        match self {
            Self::Happy => 0.8,
            Self::Grateful => 0.9,
            Self::Sad => -0.7,
            Self::Heartbreak => -0.85,
            Self::Grief => -0.9,
            Self::Depressed => -0.85,
            Self::Anxious => -0.5,
            Self::Angry => -0.6,
            Self::Confused => -0.2,
            Self::Tired => -0.3,
            Self::Neutral => 0.0,
            Self::Crisis => -1.0,
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Anxious => "anxious",
            Self::Angry => "angry",
            Self::Confused => "confused",
            Self::Tired => "tired",
            Self::Grateful => "grateful",
            Self::Neutral => "neutral",
            Self::Heartbreak => "heartbreak",
            Self::Grief => "grief",
            Self::Depressed => "depressed",
            Self::Crisis => "crisis",
        };
        write!(f, "{}", s)
    }
}

/// Result of one classification call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    pub emotion: Emotion,
    /// Signal strength in [0, 1]: phrase match > combined emoji+keyword >
    /// single signal > none.
    pub confidence: f64,
    /// Always the emotion's table value, see [`Emotion::sentiment_score`].
    pub sentiment_score: f64,
    /// True iff the crisis layer matched. Absorbing: forces all other
    /// fields to the crisis values.
    pub is_crisis: bool,
    /// Names of the phrase groups that contributed. Only used to pick
    /// response variants, never to alter emotion or confidence.
    pub context_tags: Vec<String>,
}

impl EmotionResult {
    /// Build a non-crisis result; sentiment comes from the fixed table.
    pub fn new(emotion: Emotion, confidence: f64, context_tags: Vec<String>) -> Self {
        Self {
            emotion,
            confidence,
            sentiment_score: emotion.sentiment_score(),
            is_crisis: false,
            context_tags,
        }
    }

    /// The absorbing crisis result.
    pub fn crisis() -> Self {
        Self {
            emotion: Emotion::Crisis,
            confidence: 1.0,
            sentiment_score: -1.0,
            is_crisis: true,
            context_tags: vec!["crisis".to_string(), "safety".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trips_every_variant() {
        for emotion in Emotion::ALL {
            let parsed = Emotion::from_str(&emotion.to_string());
            assert_eq!(parsed, Some(emotion));
        }
    }

    #[test]
    fn test_from_str_rejects_unknown_labels() {
        assert_eq!(Emotion::from_str("ecstatic"), None);
        assert_eq!(Emotion::from_str(""), None);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(Emotion::from_str("HAPPY"), Some(Emotion::Happy));
        assert_eq!(Emotion::from_str("Crisis"), Some(Emotion::Crisis));
    }

    #[test]
    fn test_sentiment_scores_stay_in_range() {
        for emotion in Emotion::ALL {
            let s = emotion.sentiment_score();
            assert!((-1.0..=1.0).contains(&s), "{} out of range: {}", emotion, s);
        }
    }

    #[test]
    fn test_only_crisis_reaches_minus_one() {
        assert_eq!(Emotion::Crisis.sentiment_score(), -1.0);
        for emotion in Emotion::ALL {
            if emotion != Emotion::Crisis {
                assert!(emotion.sentiment_score() > -1.0);
            }
        }
    }

    #[test]
    fn test_serde_uses_snake_case_labels() {
        let json = serde_json::to_string(&Emotion::Heartbreak).unwrap();
        assert_eq!(json, "\"heartbreak\"");
        let back: Emotion = serde_json::from_str("\"grief\"").unwrap();
        assert_eq!(back, Emotion::Grief);
    }

    #[test]
    fn test_crisis_result_is_absorbing_shape() {
        let result = EmotionResult::crisis();
        assert!(result.is_crisis);
        assert_eq!(result.emotion, Emotion::Crisis);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.sentiment_score, -1.0);
        assert!(result.context_tags.contains(&"safety".to_string()));
    }

    #[test]
    fn test_new_result_pulls_sentiment_from_table() {
        let result = EmotionResult::new(Emotion::Grief, 0.9, vec![]);
        assert_eq!(result.sentiment_score, -0.9);
        assert!(!result.is_crisis);
    }
}
