// Single-document dominant-topic model.
//
// A one-topic model fitted to a single phrase puts its heaviest weight on
// the phrase's most frequent term, so the topic id reduces to that term's
// position in the phrase's sorted vocabulary. This keeps the id stable
// across runs, which the exact-match aggregation relies on.

use std::collections::BTreeMap;

use anyhow::Result;
use regex_lite::Regex;

use super::traits::TopicModel;

/// Default token pattern: runs of two or more word characters.
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Topic model keyed on the most frequent vocabulary term.
pub struct DominantTermTopicModel {
    token_pattern: Regex,
}

impl Default for DominantTermTopicModel {
    fn default() -> Self {
        Self {
            // The pattern is a compile-time constant and always valid.
            token_pattern: Regex::new(TOKEN_PATTERN).expect("static token pattern"),
        }
    }
}

impl DominantTermTopicModel {
    /// Lowercased term counts, keyed in sorted vocabulary order.
    pub fn vocabulary(&self, text: &str) -> BTreeMap<String, usize> {
        let lowered = text.to_lowercase();
        let mut counts = BTreeMap::new();
        for m in self.token_pattern.find_iter(&lowered) {
            *counts.entry(m.as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

impl TopicModel for DominantTermTopicModel {
    fn dominant_topic(&self, text: &str) -> Result<i64> {
        let vocabulary = self.vocabulary(text);
        if vocabulary.is_empty() {
            anyhow::bail!("empty vocabulary; phrase has no terms of two or more characters");
        }

        // Ties go to the later vocabulary index.
        let (index, _) = vocabulary
            .values()
            .enumerate()
            .fold((0usize, 0usize), |best, (i, &count)| {
                if count >= best.1 {
                    (i, count)
                } else {
                    best
                }
            });

        Ok(index as i64)
    }
}
