// Fingerprint construction from a raw results row.
//
// A row must carry exactly five cells. Anything else (header rows, ad
// rows, truncated markup) is skipped without error so one bad row never
// costs the rest of the page.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::features::{self, StyleFeatures};
use crate::analysis::traits::{Analysis, AnalysisProviders, Sentiment};

/// Number of cells in a well-formed results row.
pub const RECORD_FIELDS: usize = 5;

/// One scraped results row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub phrase: String,
    pub jewish_value: String,
    pub english_value: String,
    pub simple_value: String,
    pub search_count: String,
}

impl Record {
    /// Interpret a row's cells as a record. Returns `None` unless there
    /// are exactly five cells.
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        match cells {
            [phrase, jewish, english, simple, searches] => Some(Self {
                phrase: phrase.clone(),
                jewish_value: jewish.clone(),
                english_value: english.clone(),
                simple_value: simple.clone(),
                search_count: searches.clone(),
            }),
            _ => None,
        }
    }
}

/// The full derived record for one phrase.
///
/// Analysis outputs and style features are computed once, when the
/// fingerprint is built, and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Fingerprint {
    pub phrase: String,
    pub jewish_value: String,
    pub english_value: String,
    pub simple_value: String,
    pub search_count: String,
    pub sentiment: Sentiment,
    pub topic_id: i64,
    pub entities: Vec<String>,
    /// Features of `phrase`; feeds the score but is not exported.
    #[serde(skip)]
    pub features: StyleFeatures,
}

impl Fingerprint {
    /// Combine a record with its analysis. Features come from the phrase only.
    pub fn new(record: Record, analysis: Analysis) -> Self {
        let features = features::extract(&record.phrase);
        Self {
            phrase: record.phrase,
            jewish_value: record.jewish_value,
            english_value: record.english_value,
            simple_value: record.simple_value,
            search_count: record.search_count,
            sentiment: analysis.sentiment,
            topic_id: analysis.topic_id,
            entities: analysis.entities,
            features,
        }
    }
}

/// Builds fingerprints from raw rows using a set of analysis providers.
pub struct FingerprintBuilder<'a> {
    providers: &'a AnalysisProviders,
}

impl<'a> FingerprintBuilder<'a> {
    pub fn new(providers: &'a AnalysisProviders) -> Self {
        Self { providers }
    }

    /// Build a fingerprint from a row's cells, or `None` for a malformed row.
    pub fn build(&self, cells: &[String]) -> Option<Fingerprint> {
        let Some(record) = Record::from_cells(cells) else {
            debug!(cells = cells.len(), "Skipping row with unexpected cell count");
            return None;
        };

        let analysis = self.providers.analyze(&record.phrase);
        debug!(
            phrase = %record.phrase,
            jewish = %record.jewish_value,
            english = %record.english_value,
            simple = %record.simple_value,
            searches = %record.search_count,
            compound = analysis.sentiment.compound,
            topic = analysis.topic_id,
            entities = ?analysis.entities,
            "Built fingerprint"
        );

        Some(Fingerprint::new(record, analysis))
    }
}
