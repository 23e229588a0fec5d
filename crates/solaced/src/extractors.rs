//! Signal extractors over a raw message.
//!
//! Four independent pure detectors: crisis, phrase, emoji, keyword. Each
//! returns a candidate emotion (or none) plus supporting evidence. The
//! classifier combines them under a fixed priority policy.

use crate::patterns;
use solace_common::Emotion;
use std::collections::HashSet;

/// True iff any crisis pattern matches anywhere in the text.
///
/// Must run before every other extractor: crisis text may incidentally
/// match positive patterns, and crisis always wins.
pub fn crisis(text: &str) -> bool {
    patterns::crisis_patterns().iter().any(|p| p.is_match(text))
}

/// Phrase-layer output: a possible emotion vote plus every group tag that
/// matched, hint groups included.
#[derive(Debug, Clone, Default)]
pub struct PhraseSignal {
    pub emotion: Option<Emotion>,
    pub tags: Vec<String>,
}

/// Match every phrase group against the text. Each matching pattern adds
/// one vote to the group's emotion; the highest-voted emotion wins, ties
/// going to the earlier-declared group. Hint groups tag without voting.
pub fn phrase(text: &str) -> PhraseSignal {
    let mut votes: Vec<(Emotion, usize)> = Vec::new();
    let mut tags: Vec<String> = Vec::new();

    for group in patterns::phrase_groups() {
        let hits = group.patterns.iter().filter(|p| p.is_match(text)).count();
        if hits == 0 {
            continue;
        }
        tags.push(group.name.to_string());
        if let Some(emotion) = group.emotion {
            match votes.iter_mut().find(|(e, _)| *e == emotion) {
                Some((_, count)) => *count += hits,
                None => votes.push((emotion, hits)),
            }
        }
    }

    // Strict > keeps the first-encountered emotion on ties.
    let emotion = votes
        .iter()
        .fold(None::<(Emotion, usize)>, |best, &(e, n)| match best {
            Some((_, m)) if n <= m => best,
            _ => Some((e, n)),
        })
        .map(|(e, _)| e);

    PhraseSignal { emotion, tags }
}

/// Count occurrences of each emotion's emoji glyphs; highest total wins,
/// ties going to the earlier table entry. None if no glyph is present.
pub fn emoji(text: &str) -> Option<Emotion> {
    let mut best: Option<(Emotion, usize)> = None;

    for &(emotion, glyphs) in patterns::EMOJI_TABLE {
        let count: usize = glyphs.iter().map(|g| text.matches(g).count()).sum();
        if count == 0 {
            continue;
        }
        match best {
            Some((_, m)) if count <= m => {}
            _ => best = Some((emotion, count)),
        }
    }

    best.map(|(e, _)| e)
}

/// Lowercase word tokens of the text. Splitting on non-alphanumerics makes
/// keyword matching word-boundary-safe by construction.
fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

/// Whole-word keyword scoring with negation adjustment.
///
/// Each keyword present in the text adds one point to its emotion. If a
/// negation precedes a positive word, any happy score is discarded and sad
/// gains a fixed +2 - "I'm not okay" must never register as happy.
pub fn keyword(text: &str) -> Option<Emotion> {
    let words = tokenize(text);

    let mut scores: Vec<(Emotion, usize)> = patterns::KEYWORD_TABLE
        .iter()
        .map(|&(emotion, keywords)| {
            let hits = keywords.iter().filter(|k| words.contains(**k)).count();
            (emotion, hits)
        })
        .collect();

    if scores.iter().all(|&(_, n)| n == 0) {
        return None;
    }

    if patterns::negation_before_positive(text) {
        for (emotion, count) in scores.iter_mut() {
            match emotion {
                Emotion::Happy => *count = 0,
                Emotion::Sad => *count += 2,
                _ => {}
            }
        }
    }

    scores
        .iter()
        .fold(None::<(Emotion, usize)>, |best, &(e, n)| match best {
            Some((_, m)) if n <= m => best,
            _ => Some((e, n)),
        })
        .filter(|&(_, n)| n > 0)
        .map(|(e, _)| e)
}
