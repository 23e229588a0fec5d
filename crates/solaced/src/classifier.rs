//! Rule-based emotion classification.
//!
//! Combines the extractor signals under a strict priority ladder. Phrase
//! matches are trusted over emoji/keyword signals because multi-word
//! patterns encode intent rather than isolated sentiment words; crisis
//! preempts everything.

use crate::extractors;
use crate::patterns;
use solace_common::{Emotion, EmotionResult};

/// Classify a message. Pure and deterministic: same text, same result.
///
/// Priority, each step terminal once reached:
/// 1. crisis                       -> crisis, 1.0
/// 2. phrase candidate             -> phrase emotion, 0.9
/// 3. emoji + keyword candidates   -> negation-arbitrated pick, 0.8
/// 4. emoji only                   -> emoji emotion, 0.7
/// 5. keyword only                 -> keyword emotion, 0.7
/// 6. nothing, negated positive    -> sad, 0.6
/// 7. nothing at all               -> neutral, 0.3
pub fn classify(text: &str) -> EmotionResult {
    if extractors::crisis(text) {
        return EmotionResult::crisis();
    }

    let signal = extractors::phrase(text);
    let emoji = extractors::emoji(text);
    let keyword = extractors::keyword(text);
    let negated = patterns::negation_before_positive(text);

    let (emotion, confidence) = match (signal.emotion, emoji, keyword) {
        (Some(e), _, _) => (e, 0.9),
        (None, Some(em), Some(kw)) => {
            // A negated positive distrusts the keyword pick, unless the
            // emoji itself reads happy (sarcastic 😊 after "not okay").
            let chosen = if negated {
                if em == Emotion::Happy {
                    kw
                } else {
                    em
                }
            } else {
                kw
            };
            (chosen, 0.8)
        }
        (None, Some(em), None) => (em, 0.7),
        (None, None, Some(kw)) => (kw, 0.7),
        (None, None, None) => {
            if negated {
                (Emotion::Sad, 0.6)
            } else {
                (Emotion::Neutral, 0.3)
            }
        }
    };

    EmotionResult::new(emotion, confidence, signal.tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_absorbs_everything() {
        let result = classify("I want to kill myself but today was amazing 😊");
        assert!(result.is_crisis);
        assert_eq!(result.emotion, Emotion::Crisis);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.sentiment_score, -1.0);
    }

    #[test]
    fn test_phrase_beats_keyword() {
        // "broke up" (phrase, heartbreak) + "tired" (keyword).
        let result = classify("we broke up and I'm tired");
        assert_eq!(result.emotion, Emotion::Heartbreak);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_emoji_plus_keyword_prefers_keyword() {
        let result = classify("feeling worried today 😢");
        assert_eq!(result.emotion, Emotion::Anxious);
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_negated_happy_emoji_defers_to_keyword() {
        // Negation holds and the emoji is happy: keyword candidate wins.
        let result = classify("not fine at all 😊");
        assert_eq!(result.emotion, Emotion::Sad);
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_negation_with_sad_emoji_prefers_emoji() {
        // Negation holds, emoji is not happy: emoji candidate wins.
        let result = classify("not good 😠");
        assert_eq!(result.emotion, Emotion::Angry);
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_emoji_only() {
        let result = classify("😴😴");
        assert_eq!(result.emotion, Emotion::Tired);
        assert_eq!(result.confidence, 0.7);
    }

    #[test]
    fn test_keyword_only() {
        let result = classify("feeling pretty frustrated and annoyed");
        assert_eq!(result.emotion, Emotion::Angry);
        assert_eq!(result.confidence, 0.7);
    }

    #[test]
    fn test_bare_negation_lands_sad() {
        // "okay" flips the negation rule without being a keyword, so no
        // extractor fires and the negation fallback applies.
        let result = classify("I am not okay");
        assert_eq!(result.emotion, Emotion::Sad);
        assert_eq!(result.confidence, 0.6);
    }

    #[test]
    fn test_neutral_fallthrough() {
        let result = classify("lets play a game");
        assert_eq!(result.emotion, Emotion::Neutral);
        assert_eq!(result.confidence, 0.3);
        assert_eq!(result.sentiment_score, 0.0);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let text = "I'm anxious about my exams 😰";
        let first = classify(text);
        for _ in 0..10 {
            assert_eq!(classify(text), first);
        }
    }

    #[test]
    fn test_context_tags_survive_on_keyword_path() {
        // "job" tags work_school via hint group; the emotion itself comes
        // from the keyword layer.
        let result = classify("my job has me overwhelmed");
        assert_eq!(result.emotion, Emotion::Anxious);
        assert_eq!(result.confidence, 0.7);
        assert!(result.context_tags.contains(&"work_school".to_string()));
    }
}
