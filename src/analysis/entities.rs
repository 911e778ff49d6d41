// Heuristic named-entity spans.
//
// Proper names in short phrases are almost always capitalized runs
// ("Jesus Christ", "New York"), and cardinal numbers are entities in their
// own right. A run only continues across plain whitespace, so punctuation
// splits "Paris, France" into two spans.

use std::collections::HashSet;

use anyhow::Result;
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

use super::traits::EntityRecognizer;

/// Capitalized-run entity recognizer, the default `EntityRecognizer`.
pub struct CapitalizedSpanRecognizer {
    stop_words: HashSet<String>,
}

impl Default for CapitalizedSpanRecognizer {
    fn default() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self {
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

impl CapitalizedSpanRecognizer {
    /// A lone capitalized word is kept only if it could plausibly be a name.
    fn keeps_single(&self, word: &str) -> bool {
        word.chars().count() > 1 && !self.stop_words.contains(&word.to_lowercase())
    }
}

impl EntityRecognizer for CapitalizedSpanRecognizer {
    fn entities(&self, text: &str) -> Result<Vec<String>> {
        let mut spans = Vec::new();
        // Current capitalized run: (start byte, end byte, word count)
        let mut run: Option<(usize, usize, usize)> = None;

        let close_run = |run: &mut Option<(usize, usize, usize)>, spans: &mut Vec<String>| {
            if let Some((start, end, words)) = run.take() {
                let span = &text[start..end];
                if words > 1 || self.keeps_single(span) {
                    spans.push(span.to_string());
                }
            }
        };

        for (offset, word) in text.unicode_word_indices() {
            let end = offset + word.len();

            if is_numeric(word) {
                close_run(&mut run, &mut spans);
                spans.push(word.to_string());
                continue;
            }

            if !is_capitalized(word) {
                close_run(&mut run, &mut spans);
                continue;
            }

            match run {
                Some((start, prev_end, words))
                    if text[prev_end..offset].chars().all(char::is_whitespace) =>
                {
                    run = Some((start, end, words + 1));
                }
                _ => {
                    close_run(&mut run, &mut spans);
                    run = Some((offset, end, 1));
                }
            }
        }
        close_run(&mut run, &mut spans);

        Ok(spans)
    }
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn is_numeric(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_digit())
        && word
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}
