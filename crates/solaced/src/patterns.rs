//! Pattern registry for the rule-based classification layers.
//!
//! Crisis regexes, emotion phrase groups, emoji and keyword tables, and the
//! negation rule. Everything is compiled once at first use and read-only
//! afterwards. Table declaration order is the tie-break order wherever two
//! candidates score equally.

use regex::{Regex, RegexBuilder};
use solace_common::Emotion;
use std::sync::LazyLock;

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

// ============================================================================
// Crisis layer - highest priority, always checked first
// ============================================================================

/// Self-harm indicators. Any match anywhere in the text triggers the crisis
/// path; order only affects short-circuit speed, never the outcome.
static CRISIS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bsuicid",
        r"\bkill\s*(my|him|her|them)?self",
        r"\bwant\s*to\s*die\b",
        r"\bwanna\s*die\b",
        r"\bdon.?t\s*want\s*to\s*(live|be alive|exist)",
        r"\bend\s*(my|it\s*all|this)\s*(life)?",
        r"\bi\s*will\s*die\b",
        r"\bi.?m\s*going\s*to\s*die\b",
        r"\bno\s*reason\s*to\s*live",
        r"\bself\s*harm",
        r"\bcut(ting)?\s*(my)?self",
        r"\bhurt(ing)?\s*(my)?self",
        r"\bjump\s*off",
        r"\boverdose",
        r"\bpill",
        r"\bnoose",
        r"\bhang(ing)?\s*myself",
        r"\blife\s*is\s*(not\s*)?worth",
        r"\bgive\s*up\s*on\s*(life|everything|living)",
        r"\bno\s*point\s*(in\s*living|anymore)",
        r"\bbetter\s*off\s*(dead|without\s*me)",
        r"\bnobody\s*(would\s*)?(care|miss|notice)\s*if\s*i",
        r"\bworld\s*(is|would\s*be)\s*better\s*without\s*me",
    ]
    .iter()
    .map(|p| ci(p))
    .collect()
});

pub fn crisis_patterns() -> &'static [Regex] {
    &CRISIS_PATTERNS
}

// ============================================================================
// Phrase groups - multi-word contextual patterns
// ============================================================================

/// A named cluster of patterns for one emotional context.
///
/// Emotion-bearing groups vote for their canonical emotion; hint groups
/// (`emotion: None`) contribute only a context tag for response selection.
pub struct PhraseGroup {
    pub name: &'static str,
    pub emotion: Option<Emotion>,
    pub patterns: Vec<Regex>,
}

/// Declaration order is the phrase tie-break order: when two groups'
/// emotions score equally, the earlier group wins.
static PHRASE_GROUPS: LazyLock<Vec<PhraseGroup>> = LazyLock::new(|| {
    let group = |name: &'static str, emotion: Option<Emotion>, patterns: &[&str]| PhraseGroup {
        name,
        emotion,
        patterns: patterns.iter().map(|p| ci(p)).collect(),
    };

    vec![
        group(
            "heartbreak",
            Some(Emotion::Heartbreak),
            &[
                r"\bbroke\s*up",
                r"\bbreak\s*up",
                r"\bbreakup",
                r"\bbroken\s*up",
                r"\bdumped\s*me",
                r"\bleft\s*me",
                r"\bcheated\s*on",
                r"\bdivorce",
                r"\bseparation",
                r"\bex\s*(boy|girl)friend",
                r"\bmiss(ing)?\s*(him|her|them|my\s*(ex|bf|gf|partner|husband|wife))",
                r"\bher\s*memories",
                r"\bhis\s*memories",
                r"\bmoved?\s*on",
                r"\brelationship\s*(ended|over|failed)",
                r"\bheart\s*broken",
                r"\blove\s*(lost|gone|ended|hurts)",
            ],
        ),
        group(
            "grief",
            Some(Emotion::Grief),
            &[
                r"\b(passed|died|death|funeral|mourn|griev|gone\s*forever)",
                r"\blost\s*(my|a)\s*(mom|dad|mother|father|parent|friend|brother|sister|son|daughter|baby|pet|dog|cat)",
                r"\bmiss(ing)?\s*(my\s*)?(mom|dad|mother|father|friend|brother|sister)",
            ],
        ),
        group(
            "loneliness",
            Some(Emotion::Sad),
            &[
                r"\bno\s*(one|body)\s*(cares|loves|understands|listens|is\s*there)",
                r"\ball\s*alone",
                r"\bso\s*lonely",
                r"\bfeel(ing)?\s*alone",
                r"\bhave\s*no\s*(friends|one)",
                r"\bnobody\s*(likes|loves|cares)",
                r"\bno\s*friends",
                r"\bisolat",
            ],
        ),
        group(
            "depression",
            Some(Emotion::Depressed),
            &[
                r"\bnot\s*feeling\s*(good|well|okay|ok|fine|great|right)",
                r"\bfeel(ing)?\s*(terrible|awful|horrible|worthless|hopeless|useless|empty|numb|nothing)",
                r"\bcan.?t\s*(go\s*on|take\s*(it|this)|do\s*this\s*anymore|cope|handle)",
                r"\bwhat.?s\s*the\s*point",
                r"\bnothing\s*matters",
                r"\bi\s*hate\s*(my\s*)?life",
                r"\blife\s*(is\s*)?(hard|tough|meaningless|pointless|terrible)",
                r"\bwish\s*i\s*(wasn.?t|weren.?t|could\s*disappear)",
                r"\bi\s*don.?t\s*care\s*anymore",
                r"\bcrying\s*(all|every)",
                r"\bcan.?t\s*stop\s*crying",
            ],
        ),
        group(
            "anxiety",
            Some(Emotion::Anxious),
            &[
                r"\bpanic\s*(attack|ing)",
                r"\bcan.?t\s*(breathe|sleep|relax|stop\s*(worrying|thinking))",
                r"\bheart\s*(racing|pounding)",
                r"\bracing\s*thoughts",
                r"\bwhat\s*if\s",
                r"\bscared\s*(of|to|about)",
                r"\bworr(y|ied|ying)\s*(about|that|so\s*much)",
                r"\bfeel(ing)?\s*(anxious|nervous|panick|restless|on\s*edge)",
                r"\bstress(ed|ing|ful)",
            ],
        ),
        group(
            "anger",
            Some(Emotion::Angry),
            &[
                r"\bpiss(ed|es|ing)",
                r"\bso\s*(angry|mad|frustrated|furious)",
                r"\bsick\s*(of|and\s*tired)",
                r"\bfed\s*up",
                r"\bhate\s*(this|it|everyone|everything|him|her|them|my)",
                r"\bcan.?t\s*stand",
                r"\bwant\s*to\s*(scream|punch|hit|break)",
            ],
        ),
        group(
            "positive",
            Some(Emotion::Happy),
            &[
                r"\bfeeling\s*(good|great|better|amazing|wonderful|happy|blessed|grateful|fantastic)",
                r"\bgood\s*day",
                r"\bgreat\s*day",
                r"\bhappy\s*(today|right\s*now|lately)",
                r"\bthank\s*(you|u)\s*(so\s*much|for)",
                r"\byou\s*(helped|make|made)\s*(me)?\s*(feel)?\s*(better|good)",
                r"\bi\s*feel\s*(so\s*)?(much\s*)?better",
            ],
        ),
        // Hint groups: tag only, no emotion vote. Their names match the
        // response sub-bucket keys.
        group(
            "relationship",
            None,
            &[
                r"\b(girl|boy)friend",
                r"\bmy\s*(ex|bf|gf|partner|husband|wife)\b",
                r"\b(dating|marriage|relationship)",
            ],
        ),
        group(
            "family",
            None,
            &[
                r"\bmy\s*(mom|dad|mother|father|parents?|brother|sister|grandma|grandpa|family)\b",
                r"\bat\s*home\b",
            ],
        ),
        group(
            "work_school",
            None,
            &[
                r"\b(work|job|boss|coworker|colleague|office|shift)\b",
                r"\b(school|class|exams?|homework|grades?|college|university|teacher)\b",
                r"\b(deadline|interview)\b",
            ],
        ),
    ]
});

pub fn phrase_groups() -> &'static [PhraseGroup] {
    &PHRASE_GROUPS
}

// ============================================================================
// Emoji table - occurrence counts, not mere presence
// ============================================================================

/// Declaration order is the emoji tie-break order.
pub const EMOJI_TABLE: &[(Emotion, &[&str])] = &[
    (
        Emotion::Sad,
        &[
            "😢", "😭", "😿", "😞", "😔", "😥", "🥺", "💔", "😩", "😪", "🥲",
        ],
    ),
    (Emotion::Angry, &["😠", "😡", "🤬", "💢", "👿", "😤"]),
    (Emotion::Anxious, &["😰", "😨", "😱", "😬", "🫣", "😳"]),
    (
        Emotion::Happy,
        &[
            "😊", "😃", "😄", "🥰", "😁", "🎉", "❤️", "💖", "✨", "🥳", "😍", "🤗",
        ],
    ),
    (Emotion::Tired, &["😴", "😪", "🥱", "💤"]),
    (Emotion::Confused, &["😕", "😟", "🤔", "😵", "🫤"]),
    (Emotion::Grateful, &["🙏", "💛", "🤝", "💕"]),
];

// ============================================================================
// Keyword table - whole-word, case-insensitive
// ============================================================================

/// Declaration order is the keyword tie-break order.
pub const KEYWORD_TABLE: &[(Emotion, &[&str])] = &[
    (
        Emotion::Sad,
        &[
            "sad", "unhappy", "depressed", "down", "miserable", "hopeless",
            "lonely", "heartbroken", "grief", "crying", "tears", "lost",
            "empty", "numb", "broken", "hurt", "pain", "suffering", "sorrow",
            "despair", "melancholy", "gloomy", "blue", "upset", "devastated",
            "terrible", "awful", "horrible", "worst", "ruined", "shattered",
            "worthless", "useless", "pathetic", "failure", "disappointed",
            "regret", "miss", "missing", "ache", "aching", "wounded",
        ],
    ),
    (
        Emotion::Anxious,
        &[
            "anxious", "worried", "nervous", "scared", "fear", "panic",
            "stressed", "overwhelmed", "terrified", "uneasy", "restless",
            "tense", "dread", "apprehensive", "insecure", "paranoid",
            "frightened", "shaking", "trembling", "uncertain", "overthinking",
        ],
    ),
    (
        Emotion::Angry,
        &[
            "angry", "mad", "furious", "irritated", "frustrated", "annoyed",
            "rage", "hostile", "bitter", "resentful", "outraged", "livid",
            "infuriated", "agitated", "enraged", "disgusted", "betrayed",
        ],
    ),
    (
        Emotion::Happy,
        &[
            "happy", "joy", "grateful", "thankful", "excited", "wonderful",
            "amazing", "great", "fantastic", "blessed", "cheerful", "delighted",
            "elated", "thrilled", "content", "pleased", "optimistic",
            "peaceful", "calm", "serene", "hopeful", "proud", "confident",
            "awesome", "good", "fine", "well", "better", "beautiful",
        ],
    ),
    (
        Emotion::Confused,
        &[
            "confused", "uncertain", "unsure", "stuck", "helpless",
            "conflicted", "torn", "indecisive", "puzzled", "bewildered",
        ],
    ),
    (
        Emotion::Tired,
        &[
            "tired", "exhausted", "drained", "burnout", "fatigued",
            "depleted", "weary", "sluggish", "lethargic",
        ],
    ),
];

// ============================================================================
// Negation rule
// ============================================================================

pub const NEGATION_WORDS: &[&str] = &[
    "not", "no", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt",
    "won't", "wont", "can't", "cant", "cannot", "never", "isn't", "isnt",
    "aren't", "arent", "wasn't", "wasnt", "hardly", "barely", "neither",
];

/// Positive-sentiment words a negation can flip.
pub const POSITIVE_WORDS: &[&str] = &[
    "good", "fine", "well", "okay", "ok", "great", "happy", "right", "better",
];

/// Negation word, then at most one intervening word, then a positive word.
static NEGATION_BEFORE_POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    let negations = NEGATION_WORDS
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    let positives = POSITIVE_WORDS.join("|");
    ci(&format!(
        r"\b(?:{negations})\b\s+(?:\w+\s+)?(?:{positives})\b"
    ))
});

/// "not happy", "don't feel fine" and friends: an apparent-positive that is
/// actually negated. Queried by the keyword extractor and the classifier.
pub fn negation_before_positive(text: &str) -> bool {
    NEGATION_BEFORE_POSITIVE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_compile() {
        assert!(!crisis_patterns().is_empty());
        assert!(!phrase_groups().is_empty());
        assert!(!negation_before_positive("warm-up"));
    }

    #[test]
    fn test_crisis_patterns_match_case_insensitive() {
        let any_match =
            |text: &str| crisis_patterns().iter().any(|p| p.is_match(text));
        assert!(any_match("I want to KILL MYSELF"));
        assert!(any_match("thinking about suicide again"));
        assert!(any_match("there's no point anymore"));
        assert!(!any_match("I killed it at the gym today"));
    }

    #[test]
    fn test_emotion_groups_precede_hint_groups() {
        let groups = phrase_groups();
        let first_hint = groups
            .iter()
            .position(|g| g.emotion.is_none())
            .expect("hint groups present");
        assert!(groups[..first_hint].iter().all(|g| g.emotion.is_some()));
        assert!(groups[first_hint..].iter().all(|g| g.emotion.is_none()));
    }

    #[test]
    fn test_hint_group_names_are_sub_bucket_keys() {
        let hints: Vec<_> = phrase_groups()
            .iter()
            .filter(|g| g.emotion.is_none())
            .map(|g| g.name)
            .collect();
        assert_eq!(hints, vec!["relationship", "family", "work_school"]);
    }

    #[test]
    fn test_negation_directly_before_positive() {
        assert!(negation_before_positive("I am not okay"));
        assert!(negation_before_positive("I'm not happy about this"));
    }

    #[test]
    fn test_negation_with_one_word_gap() {
        assert!(negation_before_positive("I don't feel fine"));
        assert!(negation_before_positive("never been good at this"));
    }

    #[test]
    fn test_no_negation_on_plain_positive() {
        assert!(!negation_before_positive("I am happy"));
        assert!(!negation_before_positive("everything is fine"));
    }

    #[test]
    fn test_negation_is_word_bounded() {
        // "knot" must not count as "not"
        assert!(!negation_before_positive("the knot is fine"));
    }
}
