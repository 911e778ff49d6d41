// Stylometric features of a phrase.
//
// Both averages are guarded: text with no words (or no sentences) yields 0
// rather than NaN, so every phrase gets a finite score.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Average word and sentence length of a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleFeatures {
    /// Mean characters per word
    pub avg_word_length: f64,
    /// Mean words per sentence
    pub avg_sentence_length: f64,
}

/// Compute the stylometric features of `text`. Total over any input.
pub fn extract(text: &str) -> StyleFeatures {
    let words: Vec<&str> = text.unicode_words().collect();
    let sentence_count = text.unicode_sentences().count();

    let avg_word_length = if words.is_empty() {
        0.0
    } else {
        let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        total_chars as f64 / words.len() as f64
    };

    let avg_sentence_length = if sentence_count == 0 {
        0.0
    } else {
        words.len() as f64 / sentence_count as f64
    };

    StyleFeatures {
        avg_word_length,
        avg_sentence_length,
    }
}
