//! Text polarity scoring for news headlines.

use std::collections::HashMap;

use crate::constants::sentiment::NEGATION_FACTOR;

/// Maps free text to a polarity in [-1, 1]. Empty text scores 0.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("bullish", 0.8),
    ("soar", 0.8),
    ("surge", 0.7),
    ("rally", 0.7),
    ("outperform", 0.7),
    ("record", 0.6),
    ("beat", 0.6),
    ("exceed", 0.6),
    ("upgrade", 0.6),
    ("profit", 0.6),
    ("growth", 0.6),
    ("breakthrough", 0.6),
    ("optimistic", 0.6),
    ("strong", 0.5),
    ("gain", 0.5),
    ("rise", 0.5),
    ("jump", 0.5),
    ("improve", 0.5),
    ("recovery", 0.5),
    ("rebound", 0.5),
    ("positive", 0.5),
    ("good", 0.5),
    ("great", 0.6),
    ("excellent", 0.8),
    ("confident", 0.5),
    ("expand", 0.4),
    ("success", 0.6),
    ("boost", 0.5),
    ("dividend", 0.3),
    ("stable", 0.2),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("bearish", -0.8),
    ("crash", -0.9),
    ("fraud", -0.9),
    ("plunge", -0.8),
    ("crisis", -0.8),
    ("bankruptcy", -0.9),
    ("disappoint", -0.7),
    ("fail", -0.7),
    ("lawsuit", -0.6),
    ("downgrade", -0.6),
    ("decline", -0.6),
    ("drop", -0.6),
    ("loss", -0.6),
    ("miss", -0.6),
    ("slump", -0.7),
    ("tumble", -0.7),
    ("fear", -0.6),
    ("underperform", -0.6),
    ("weak", -0.5),
    ("fall", -0.5),
    ("concern", -0.5),
    ("worry", -0.5),
    ("warning", -0.5),
    ("negative", -0.5),
    ("bad", -0.5),
    ("challenge", -0.4),
    ("regulatory", -0.3),
    ("uncertainty", -0.5),
    ("headwind", -0.4),
    ("volatile", -0.3),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "none", "cannot", "cant", "don't", "dont", "doesn't",
    "doesnt", "didn't", "didnt", "won't", "wont", "isn't", "isnt", "wasn't", "wasnt", "hardly",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("extremely", 2.0),
    ("highly", 1.5),
    ("strongly", 1.5),
    ("significantly", 1.5),
    ("sharply", 1.5),
    ("dramatically", 1.8),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("marginally", 0.5),
];

const SUFFIXES: &[&str] = &["ing", "ed", "es", "s", "d"];

/// Word-list polarity tuned for financial headlines.
///
/// Each matched word contributes its weight. A preceding negator flips and
/// damps the next matched word, an intensifier scales it. The text's polarity
/// is the mean contribution, clamped to [-1, 1].
#[derive(Clone, Debug)]
pub struct LexiconPolarity {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
}

impl Default for LexiconPolarity {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconPolarity {
    pub fn new() -> Self {
        let words = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS)
            .map(|(w, s)| (w.to_string(), *s))
            .collect();
        let intensifiers = INTENSIFIERS.iter().map(|(w, m)| (w.to_string(), *m)).collect();
        Self { words, intensifiers }
    }

    /// Merge extra entries over the built-in word list
    pub fn with_overrides(mut self, extra: &HashMap<String, f64>) -> Self {
        for (word, weight) in extra {
            self.words.insert(word.to_lowercase(), weight.clamp(-1.0, 1.0));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn lookup(&self, token: &str) -> Option<f64> {
        if let Some(score) = self.words.get(token) {
            return Some(*score);
        }
        SUFFIXES.iter().find_map(|suffix| {
            let stem = token.strip_suffix(suffix)?;
            if stem.len() < 3 {
                return None;
            }
            self.words.get(stem).copied()
        })
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

impl PolarityScorer for LexiconPolarity {
    fn polarity(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut matched = 0usize;
        let mut negate = false;
        let mut multiplier = 1.0;

        for token in tokens(text) {
            if NEGATIONS.contains(&token.as_str()) {
                negate = true;
                continue;
            }
            if let Some(m) = self.intensifiers.get(&token) {
                multiplier = *m;
                continue;
            }
            if let Some(mut score) = self.lookup(&token) {
                if negate {
                    score *= NEGATION_FACTOR;
                    negate = false;
                }
                total += score * multiplier;
                multiplier = 1.0;
                matched += 1;
            }
        }

        if matched == 0 {
            return 0.0;
        }
        (total / matched as f64).clamp(-1.0, 1.0)
    }
}
