// Valence-lexicon sentiment scoring.
//
// Each token found in the lexicon contributes a valence on a -4..4 scale,
// adjusted by a preceding booster word, by shouting (ALL CAPS in mixed-case
// text), and by a negation within the three previous tokens. The summed
// valence is squashed into a compound score in [-1, 1]:
//
//   compound = s / sqrt(s^2 + alpha)
//
// The negative/neutral/positive proportions describe how much of the text
// carried each polarity. Rounding matches the conventional report format
// (compound to 4 places, proportions to 3).

use std::collections::HashMap;

use anyhow::Result;
use unicode_segmentation::UnicodeSegmentation;

use super::traits::{Sentiment, SentimentAnalyzer};

/// Normalization constant: approximates the max expected valence sum.
const ALPHA: f64 = 15.0;
/// Multiplier applied when a negation precedes the token.
const NEGATION_SCALAR: f64 = -0.74;
/// Valence added (in the token's direction) after a booster word.
const BOOSTER_INCREMENT: f64 = 0.293;
/// Valence added (in the token's direction) for an ALL CAPS token.
const CAPS_INCREMENT: f64 = 0.733;
/// How far back a negation word reaches.
const NEGATION_WINDOW: usize = 3;

const LEXICON: &[(&str, f64)] = &[
    ("abandon", -1.9),
    ("abuse", -3.2),
    ("accept", 1.6),
    ("afraid", -2.2),
    ("agony", -3.2),
    ("alone", -1.0),
    ("amazing", 2.8),
    ("anger", -2.7),
    ("angry", -2.3),
    ("awesome", 3.1),
    ("bad", -2.5),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("bless", 1.8),
    ("blessed", 2.9),
    ("bliss", 2.7),
    ("brave", 2.4),
    ("broken", -2.1),
    ("calm", 1.3),
    ("care", 2.2),
    ("chaos", -2.1),
    ("cheer", 2.3),
    ("cruel", -2.8),
    ("cry", -2.1),
    ("curse", -2.5),
    ("damn", -1.7),
    ("danger", -2.4),
    ("dark", -0.8),
    ("dead", -3.3),
    ("death", -2.9),
    ("demon", -2.5),
    ("destroy", -2.5),
    ("devil", -3.4),
    ("die", -2.9),
    ("disaster", -3.1),
    ("doom", -1.7),
    ("enemy", -2.5),
    ("evil", -3.4),
    ("excellent", 2.7),
    ("fail", -2.5),
    ("faith", 1.8),
    ("fear", -2.2),
    ("fine", 0.8),
    ("free", 2.3),
    ("friend", 2.2),
    ("fun", 2.3),
    ("glory", 2.3),
    ("god", 1.1),
    ("good", 1.9),
    ("grace", 1.8),
    ("great", 3.1),
    ("grief", -2.2),
    ("guilty", -1.8),
    ("happy", 2.7),
    ("hate", -2.7),
    ("heal", 1.4),
    ("heaven", 2.6),
    ("hell", -3.6),
    ("help", 1.7),
    ("hope", 1.9),
    ("hurt", -2.4),
    ("ill", -1.8),
    ("joy", 2.8),
    ("kill", -3.7),
    ("kind", 2.4),
    ("liar", -3.1),
    ("lie", -1.6),
    ("lost", -1.3),
    ("love", 3.2),
    ("lucky", 2.3),
    ("mercy", 1.5),
    ("miracle", 2.8),
    ("miserable", -2.2),
    ("murder", -3.7),
    ("nice", 1.8),
    ("pain", -2.3),
    ("peace", 2.5),
    ("perfect", 2.7),
    ("poor", -2.1),
    ("pray", 1.3),
    ("pretty", 2.2),
    ("pure", 1.9),
    ("rage", -2.6),
    ("sad", -2.1),
    ("safe", 1.9),
    ("save", 2.2),
    ("scared", -1.9),
    ("shame", -2.1),
    ("sick", -2.3),
    ("sin", -2.6),
    ("smile", 1.5),
    ("sorrow", -2.4),
    ("strong", 2.3),
    ("stupid", -2.4),
    ("success", 2.7),
    ("suffer", -2.5),
    ("terrible", -2.1),
    ("thank", 1.5),
    ("truth", 1.3),
    ("ugly", -2.3),
    ("victory", 2.8),
    ("war", -2.9),
    ("weak", -1.9),
    ("win", 2.8),
    ("wise", 2.1),
    ("wonderful", 2.7),
    ("worst", -3.1),
    ("wrong", -2.1),
];

const BOOSTERS: &[&str] = &[
    "absolutely",
    "completely",
    "deeply",
    "extremely",
    "highly",
    "incredibly",
    "really",
    "so",
    "totally",
    "truly",
    "very",
];

const DAMPENERS: &[&str] = &["barely", "hardly", "kinda", "slightly", "somewhat"];

const NEGATIONS: &[&str] = &[
    "ain't", "aint", "cannot", "can't", "cant", "didn't", "didnt", "doesn't", "doesnt", "don't",
    "dont", "isn't", "isnt", "never", "no", "nobody", "none", "nor", "not", "nothing", "nowhere",
    "won't", "wont", "without",
];

/// Lexicon-based polarity scorer, the default `SentimentAnalyzer`.
pub struct LexiconSentimentAnalyzer {
    lexicon: HashMap<String, f64>,
}

impl Default for LexiconSentimentAnalyzer {
    fn default() -> Self {
        Self::with_lexicon(LEXICON.iter().map(|(w, v)| (w.to_string(), *v)))
    }
}

impl LexiconSentimentAnalyzer {
    /// Build an analyzer from custom (word, valence) pairs.
    /// Words are matched case-insensitively.
    pub fn with_lexicon(entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        let lexicon = entries
            .into_iter()
            .map(|(word, valence)| (word.to_lowercase(), valence))
            .collect();
        Self { lexicon }
    }

    fn token_valence(&self, tokens: &[&str], lowered: &[String], idx: usize, mixed_case: bool) -> f64 {
        let Some(&base) = self.lexicon.get(&lowered[idx]) else {
            return 0.0;
        };
        let direction = base.signum();
        let mut valence = base;

        if mixed_case && is_shouted(tokens[idx]) {
            valence += CAPS_INCREMENT * direction;
        }

        if idx > 0 {
            let prev = lowered[idx - 1].as_str();
            if BOOSTERS.contains(&prev) {
                valence += BOOSTER_INCREMENT * direction;
            } else if DAMPENERS.contains(&prev) {
                valence -= BOOSTER_INCREMENT * direction;
            }
        }

        let window_start = idx.saturating_sub(NEGATION_WINDOW);
        if lowered[window_start..idx]
            .iter()
            .any(|w| NEGATIONS.contains(&w.as_str()))
        {
            valence *= NEGATION_SCALAR;
        }

        valence
    }
}

impl SentimentAnalyzer for LexiconSentimentAnalyzer {
    fn polarity(&self, text: &str) -> Result<Sentiment> {
        let tokens: Vec<&str> = text.unicode_words().collect();
        if tokens.is_empty() {
            return Ok(Sentiment::default());
        }

        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let mixed_case = tokens.iter().any(|t| is_shouted(t))
            && tokens.iter().any(|t| !is_shouted(t));

        let valences: Vec<f64> = (0..tokens.len())
            .map(|i| self.token_valence(&tokens, &lowered, i, mixed_case))
            .collect();

        let sum: f64 = valences.iter().sum();
        let compound = (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0);

        // Sentiment-bearing tokens weigh one unit more than neutral ones.
        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neutral_count = 0.0;
        for v in &valences {
            if *v > 0.0 {
                pos_sum += v + 1.0;
            } else if *v < 0.0 {
                neg_sum += v - 1.0;
            } else {
                neutral_count += 1.0;
            }
        }

        let total = pos_sum + neg_sum.abs() + neutral_count;
        Ok(Sentiment {
            negative: round_to(neg_sum.abs() / total, 3),
            neutral: round_to(neutral_count / total, 3),
            positive: round_to(pos_sum / total, 3),
            compound: round_to(compound, 4),
        })
    }
}

/// True for tokens written entirely in uppercase letters (at least two).
fn is_shouted(token: &str) -> bool {
    token.chars().filter(|c| c.is_alphabetic()).count() > 1
        && token
            .chars()
            .all(|c| !c.is_alphabetic() || c.is_uppercase())
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
