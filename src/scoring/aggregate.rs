// Composite score and exact-match aggregation.
//
//   score = sentiment.compound + avg_word_length + avg_sentence_length
//
// Fingerprints landing on the same score (bit-exact, see `bucket_key`) are
// merged into one entry: the first fingerprint seen is kept and its
// occurrence count goes up. This deliberately treats "same score" as "same
// fingerprint", so two different phrases that happen to score identically
// share a bucket.

use std::collections::HashMap;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::{bucket_key, score_text};
use crate::fingerprint::builder::Fingerprint;

/// Compute the composite fingerprint score. Plain f64 sum, no rounding.
pub fn composite_score(fingerprint: &Fingerprint) -> f64 {
    fingerprint.sentiment.compound
        + fingerprint.features.avg_word_length
        + fingerprint.features.avg_sentence_length
}

/// One aggregation bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AggregationEntry {
    /// The first fingerprint observed at this score
    pub fingerprint: Fingerprint,
    /// Rows that mapped to this score; always >= 1
    pub occurrence_count: u32,
}

/// Score -> entry table for one page, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PageTable {
    entries: Vec<(f64, AggregationEntry)>,
    index: HashMap<u64, usize>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every fingerprint into a fresh table.
    pub fn aggregate(fingerprints: impl IntoIterator<Item = Fingerprint>) -> Self {
        let mut table = Self::new();
        for fingerprint in fingerprints {
            table.upsert(fingerprint);
        }
        table
    }

    /// Score `fingerprint` and record it. Returns the score.
    ///
    /// An existing bucket keeps its original fingerprint; `fingerprint` only
    /// bumps the count.
    pub fn upsert(&mut self, fingerprint: Fingerprint) -> f64 {
        let score = composite_score(&fingerprint);
        self.add(score, fingerprint, 1);
        score
    }

    /// Merge another table's entries into this one with the same
    /// first-seen-wins rule, summing occurrence counts.
    pub fn merge(&mut self, other: &PageTable) {
        for (score, entry) in other.iter() {
            self.add(score, entry.fingerprint.clone(), entry.occurrence_count);
        }
    }

    fn add(&mut self, score: f64, fingerprint: Fingerprint, occurrences: u32) {
        match self.index.get(&bucket_key(score)) {
            Some(&i) => self.entries[i].1.occurrence_count += occurrences,
            None => {
                self.index.insert(bucket_key(score), self.entries.len());
                self.entries.push((
                    score,
                    AggregationEntry {
                        fingerprint,
                        occurrence_count: occurrences,
                    },
                ));
            }
        }
    }

    pub fn get(&self, score: f64) -> Option<&AggregationEntry> {
        self.index
            .get(&bucket_key(score))
            .map(|&i| &self.entries[i].1)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &AggregationEntry)> {
        self.entries.iter().map(|(score, entry)| (*score, entry))
    }

    /// Distinct scores in first-seen order.
    pub fn scores(&self) -> Vec<f64> {
        self.entries.iter().map(|(score, _)| *score).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serializes as a JSON object keyed by score text, preserving row order.
impl Serialize for PageTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (score, entry) in &self.entries {
            map.serialize_entry(&score_text(*score), entry)?;
        }
        map.end()
    }
}
