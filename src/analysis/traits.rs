// Analysis provider traits — the swap-ready abstraction.
//
// Like the results source, these let us swap out an analysis backend
// without touching the scoring pipeline. The defaults are small local
// heuristics; a model-backed implementation only has to satisfy the trait.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::entities::CapitalizedSpanRecognizer;
use super::sentiment::LexiconSentimentAnalyzer;
use super::topic::DominantTermTopicModel;

/// Topic id recorded when the topic model fails on a phrase.
pub const UNKNOWN_TOPIC: i64 = -1;

/// Polarity scores for a piece of text.
///
/// `compound` is in [-1, 1]; the three proportions are in [0, 1]. Only
/// `compound` feeds the fingerprint score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

/// Scores text polarity.
pub trait SentimentAnalyzer: Send + Sync {
    fn polarity(&self, text: &str) -> Result<Sentiment>;
}

/// Assigns a single dominant topic id to one document.
pub trait TopicModel: Send + Sync {
    fn dominant_topic(&self, text: &str) -> Result<i64>;
}

/// Extracts named-entity spans, in text order.
pub trait EntityRecognizer: Send + Sync {
    fn entities(&self, text: &str) -> Result<Vec<String>>;
}

/// Everything the analysis providers say about one phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub sentiment: Sentiment,
    pub topic_id: i64,
    pub entities: Vec<String>,
}

/// The three analysis capabilities bundled together.
pub struct AnalysisProviders {
    pub sentiment: Box<dyn SentimentAnalyzer>,
    pub topics: Box<dyn TopicModel>,
    pub entities: Box<dyn EntityRecognizer>,
}

impl Default for AnalysisProviders {
    fn default() -> Self {
        Self {
            sentiment: Box::new(LexiconSentimentAnalyzer::default()),
            topics: Box::new(DominantTermTopicModel::default()),
            entities: Box::new(CapitalizedSpanRecognizer::default()),
        }
    }
}

impl AnalysisProviders {
    pub fn new(
        sentiment: Box<dyn SentimentAnalyzer>,
        topics: Box<dyn TopicModel>,
        entities: Box<dyn EntityRecognizer>,
    ) -> Self {
        Self {
            sentiment,
            topics,
            entities,
        }
    }

    /// Run all three providers over `text`.
    ///
    /// Never fails: a provider error is logged and replaced with zero
    /// sentiment, `UNKNOWN_TOPIC`, or no entities respectively.
    pub fn analyze(&self, text: &str) -> Analysis {
        let sentiment = self.sentiment.polarity(text).unwrap_or_else(|e| {
            warn!(error = %e, phrase = text, "Sentiment analysis failed, using neutral");
            Sentiment::default()
        });

        let topic_id = self.topics.dominant_topic(text).unwrap_or_else(|e| {
            warn!(error = %e, phrase = text, "Topic modeling failed, using unknown topic");
            UNKNOWN_TOPIC
        });

        let entities = self.entities.entities(text).unwrap_or_else(|e| {
            warn!(error = %e, phrase = text, "Entity recognition failed, using none");
            Vec::new()
        });

        Analysis {
            sentiment,
            topic_id,
            entities,
        }
    }
}
