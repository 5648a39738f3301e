//! Sentiment polarity scoring for journal entries.
//!
//! `SentimentScorer` is the seam the entry store depends on. The bundled
//! `LexiconScorer` averages per-word polarities from a small built-in lexicon,
//! adjusting for a directly preceding intensifier ("very good") and for a
//! negation within the two previous words ("not good", "didn't enjoy").

use std::collections::HashMap;

use regex::Regex;

/// Lower-case words with an optional apostrophe suffix ("didn't", "it's").
const WORD_PATTERN: &str = r"[a-z]+(?:'[a-z]+)?";

/// Multiplier applied to a word's polarity when it is negated.
const NEGATION_FACTOR: f64 = -0.5;

/// How many words back a negation still applies.
const NEGATION_WINDOW: usize = 2;

/// Abstraction over polarity scorers.
pub trait SentimentScorer: Send + Sync {
    /// Polarity of `text` in [-1.0, 1.0]. Neutral or unknown text scores 0.0.
    fn polarity(&self, text: &str) -> f64;

    /// Scorer name for logging.
    fn name(&self) -> &str;
}

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("calm", 0.3),
    ("cheerful", 0.7),
    ("content", 0.4),
    ("delighted", 0.9),
    ("delightful", 0.9),
    ("enjoy", 0.5),
    ("enjoyed", 0.5),
    ("excellent", 1.0),
    ("excited", 0.4),
    ("fantastic", 0.9),
    ("fine", 0.4),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("grateful", 0.6),
    ("great", 0.8),
    ("happy", 0.8),
    ("hopeful", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("peaceful", 0.5),
    ("perfect", 1.0),
    ("pleasant", 0.7),
    ("pleased", 0.5),
    ("productive", 0.4),
    ("proud", 0.8),
    ("relaxed", 0.4),
    ("relieved", 0.4),
    ("satisfied", 0.5),
    ("success", 0.6),
    ("successful", 0.75),
    ("thankful", 0.6),
    ("wonderful", 1.0),
    // negative
    ("afraid", -0.6),
    ("angry", -0.5),
    ("annoyed", -0.4),
    ("annoying", -0.8),
    ("anxious", -0.4),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("depressed", -0.7),
    ("difficult", -0.5),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("disgusting", -1.0),
    ("dreadful", -1.0),
    ("exhausted", -0.4),
    ("fail", -0.5),
    ("failed", -0.5),
    ("frustrated", -0.7),
    ("frustrating", -0.6),
    ("hate", -0.8),
    ("hated", -0.9),
    ("horrible", -1.0),
    ("hurt", -0.5),
    ("lonely", -0.5),
    ("mad", -0.6),
    ("miserable", -1.0),
    ("nervous", -0.3),
    ("painful", -0.7),
    ("poor", -0.4),
    ("sad", -0.5),
    ("scared", -0.5),
    ("sick", -0.7),
    ("stressed", -0.5),
    ("stressful", -0.6),
    ("terrible", -1.0),
    ("tired", -0.4),
    ("ugly", -0.7),
    ("unhappy", -0.6),
    ("upset", -0.6),
    ("worried", -0.4),
    ("worse", -0.4),
    ("worst", -1.0),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("quite", 1.1),
    ("really", 1.3),
    ("so", 1.2),
    ("super", 1.3),
    ("totally", 1.4),
    ("truly", 1.3),
    ("very", 1.3),
];

const NEGATIONS: &[&str] = &["never", "no", "nobody", "not", "nothing", "hardly", "barely"];

/// Word-lexicon polarity scorer.
pub struct LexiconScorer {
    words: Regex,
    lexicon: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            words: Regex::new(WORD_PATTERN).expect("word pattern is valid"),
            lexicon: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    fn is_negation(word: &str) -> bool {
        NEGATIONS.contains(&word) || word.ends_with("n't")
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self.words.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut scores = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.lexicon.get(token) else {
                continue;
            };

            let mut score = base;
            if let Some(factor) = i
                .checked_sub(1)
                .and_then(|prev| self.intensifiers.get(tokens[prev]))
            {
                score = (score * factor).clamp(-1.0, 1.0);
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i].iter().any(|w| Self::is_negation(w)) {
                score *= NEGATION_FACTOR;
            }

            scores.push(score);
        }

        if scores.is_empty() {
            return 0.0;
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_sentence_scores_above_zero() {
        let scorer = LexiconScorer::new();
        assert!(scorer.polarity("I had a wonderful day") > 0.0);
    }

    #[test]
    fn test_negative_sentence_scores_below_zero() {
        let scorer = LexiconScorer::new();
        assert!(scorer.polarity("This was terrible and awful") < 0.0);
    }

    #[test]
    fn test_unknown_words_are_neutral() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.polarity("The meeting moved to Thursday"), 0.0);
        assert_eq!(scorer.polarity(""), 0.0);
    }

    #[test]
    fn test_negation_flips_and_damps() {
        let scorer = LexiconScorer::new();
        let plain = scorer.polarity("it was good");
        let negated = scorer.polarity("it was not good");
        assert!(plain > 0.0);
        assert!(negated < 0.0);
        assert!(negated.abs() < plain.abs());

        assert!(scorer.polarity("I didn't enjoy it") < 0.0);
    }

    #[test]
    fn test_intensifier_strengthens_without_leaving_range() {
        let scorer = LexiconScorer::new();
        assert!(scorer.polarity("very good") > scorer.polarity("good"));
        assert_eq!(scorer.polarity("absolutely perfect"), 1.0);
        assert_eq!(scorer.polarity("extremely awful"), -1.0);
    }

    #[test]
    fn test_mixed_text_averages() {
        let scorer = LexiconScorer::new();
        let score = scorer.polarity("Great breakfast but a terrible commute");
        assert!((score - (-0.1)).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_case_insensitive() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.polarity("HAPPY"), scorer.polarity("happy"));
        assert_eq!(scorer.name(), "lexicon");
    }
}
