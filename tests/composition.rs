// Composition tests — the page session end to end with a mock source.
//
// These tests exercise the data flow between modules:
//   ResultsSource -> FingerprintBuilder -> PageTable -> cluster -> export
// without network calls. Exports go to a temporary directory.

use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use gemprint::analysis::traits::{
    AnalysisProviders, EntityRecognizer, Sentiment, SentimentAnalyzer, TopicModel,
};
use gemprint::gematrix::client::ResultsSource;
use gemprint::gematrix::parse::ResultsPage;
use gemprint::output::files::Exporter;
use gemprint::pipeline::pages::{Continuation, PageLimit, PageRequests};
use gemprint::pipeline::session::PageSession;

// ============================================================
// Test doubles
// ============================================================

enum Reply {
    Rows(Vec<Vec<String>>),
    NoResults,
    Timeout,
}

/// Serves canned replies per page; unknown pages have no results.
struct MockSource {
    replies: HashMap<u32, Reply>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl MockSource {
    fn new(replies: Vec<(u32, Reply)>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultsSource for MockSource {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<Option<ResultsPage>> {
        self.calls.lock().unwrap().push((query.to_string(), page));
        match self.replies.get(&page) {
            Some(Reply::Rows(rows)) => Ok(Some(ResultsPage {
                heading: Some(format!("Results for {query}")),
                rows: rows.clone(),
            })),
            Some(Reply::Timeout) => anyhow::bail!("operation timed out"),
            Some(Reply::NoResults) | None => Ok(None),
        }
    }
}

struct Neutral;

impl SentimentAnalyzer for Neutral {
    fn polarity(&self, _text: &str) -> Result<Sentiment> {
        Ok(Sentiment {
            negative: 0.0,
            neutral: 1.0,
            positive: 0.0,
            compound: 0.0,
        })
    }
}

impl TopicModel for Neutral {
    fn dominant_topic(&self, _text: &str) -> Result<i64> {
        Ok(4)
    }
}

impl EntityRecognizer for Neutral {
    fn entities(&self, _text: &str) -> Result<Vec<String>> {
        Ok(vec!["Seven".to_string()])
    }
}

fn mock_providers() -> AnalysisProviders {
    AnalysisProviders::new(Box::new(Neutral), Box::new(Neutral), Box::new(Neutral))
}

/// Always says yes, and remembers which pages it was asked about.
struct CountingPrompt {
    asked: Vec<u32>,
    max: usize,
}

impl Continuation for &mut CountingPrompt {
    fn proceed(&mut self, finished_page: u32) -> Result<bool> {
        self.asked.push(finished_page);
        Ok(self.asked.len() < self.max)
    }
}

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn read_csv(path: &std::path::Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader.records().map(|r| r.unwrap()).collect()
}

// ============================================================
// End to end
// ============================================================

#[tokio::test]
async fn identical_rows_export_one_entry_with_count_two() {
    let source = MockSource::new(vec![(
        1,
        Reply::Rows(vec![
            row(&["seven", "49", "294", "65", "1,024"]),
            row(&["seven", "49", "294", "65", "1,024"]),
        ]),
    )]);
    let providers = mock_providers();
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(dir.path());

    let summary = PageSession::new(&source, &providers, &exporter)
        .run(PageRequests::new("7", 1, PageLimit::new(1)))
        .await
        .unwrap();
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.fingerprints, 1);

    let records = read_csv(&dir.path().join("7_page_1.csv"));
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(&record[0], "seven");
    assert_eq!(&record[1], "49");
    assert_eq!(&record[5], "4");
    assert_eq!(&record[8], "2");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("7_page_1.json")).unwrap())
            .unwrap();
    let entries = json.as_object().unwrap();
    assert_eq!(entries.len(), 1);

    // JSON key and CSV score column carry the same text
    let (score_key, entry) = entries.iter().next().unwrap();
    assert_eq!(score_key, &record[7]);
    // "seven": 5 chars, 1 word, 1 sentence -> 0 + 5 + 1
    assert_eq!(score_key, "6.0");

    let fp = &entry["Fingerprint"];
    assert_eq!(fp["Phrase"].as_str().unwrap(), &record[0]);
    assert_eq!(fp["JewishValue"].as_str().unwrap(), &record[1]);
    assert_eq!(fp["EnglishValue"].as_str().unwrap(), &record[2]);
    assert_eq!(fp["SimpleValue"].as_str().unwrap(), &record[3]);
    assert_eq!(fp["TopicId"].to_string(), record[5].to_string());
    assert_eq!(entry["OccurrenceCount"].to_string(), record[8].to_string());
    let sentiment: serde_json::Value = serde_json::from_str(&record[4]).unwrap();
    assert_eq!(fp["Sentiment"], sentiment);
    let entities: serde_json::Value = serde_json::from_str(&record[6]).unwrap();
    assert_eq!(fp["Entities"], entities);
}

#[tokio::test]
async fn malformed_rows_never_reach_exports() {
    let source = MockSource::new(vec![(
        1,
        Reply::Rows(vec![
            row(&["Word", "Jewish"]),
            row(&["amen", "1", "2", "3", "4"]),
            row(&["too", "many", "cells", "in", "this", "row"]),
        ]),
    )]);
    let providers = mock_providers();
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(dir.path());
    let session = PageSession::new(&source, &providers, &exporter);

    let outcome = session.process_page("amen", 1).await;
    assert_eq!(outcome.skipped_rows, 2);
    assert_eq!(outcome.table.len(), 1);

    session
        .run(PageRequests::new("amen", 1, PageLimit::new(1)))
        .await
        .unwrap();
    let records = read_csv(&dir.path().join("amen_page_1.csv"));
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][0], "amen");
}

#[tokio::test]
async fn fetch_failure_exports_empty_pair_and_keeps_going() {
    let source = MockSource::new(vec![
        (1, Reply::Timeout),
        (2, Reply::Rows(vec![row(&["amen", "1", "2", "3", "4"])])),
    ]);
    let providers = mock_providers();
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(dir.path());
    let mut prompt = CountingPrompt {
        asked: Vec::new(),
        max: 2,
    };

    let summary = PageSession::new(&source, &providers, &exporter)
        .run(PageRequests::new("love", 1, &mut prompt))
        .await
        .unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.fetch_failures, 1);
    // Asked after page 1 (despite the failure) and after page 2
    assert_eq!(prompt.asked, vec![1, 2]);

    let csv = fs::read_to_string(dir.path().join("love_page_1.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1);
    assert!(csv.starts_with("Phrase,JewishValue"));
    let json = fs::read_to_string(dir.path().join("love_page_1.json")).unwrap();
    assert_eq!(json.trim(), "{}");

    assert_eq!(read_csv(&dir.path().join("love_page_2.csv")).len(), 1);
}

#[tokio::test]
async fn no_results_page_is_empty_not_an_error() {
    let source = MockSource::new(vec![(1, Reply::NoResults)]);
    let providers = mock_providers();
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(dir.path());
    let session = PageSession::new(&source, &providers, &exporter);

    let outcome = session.process_page("zzz", 1).await;
    assert!(!outcome.had_results);
    assert!(outcome.fetch_error.is_none());
    assert!(outcome.table.is_empty());
    assert!(outcome.neighbors.is_empty());
}

#[tokio::test]
async fn pages_are_requested_in_order_with_the_query() {
    let source = MockSource::new(vec![]);
    let providers = mock_providers();
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(dir.path());

    PageSession::new(&source, &providers, &exporter)
        .run(PageRequests::new("666", 3, PageLimit::new(3)))
        .await
        .unwrap();

    assert_eq!(
        source.calls(),
        vec![
            ("666".to_string(), 3),
            ("666".to_string(), 4),
            ("666".to_string(), 5)
        ]
    );
    assert!(dir.path().join("666_page_5.json").exists());
}

#[tokio::test]
async fn near_scores_are_clustered_per_page() {
    // "aaaa" -> 4 + 1 = 5.0; "aaaa aaaa" -> 4 + 2 = 6.0; "aaa aaaaa" -> 4 + 2 = 6.0
    // "aaaa aaaaa" -> 4.5 + 2 = 6.5. No two distinct scores within 0.1.
    let source = MockSource::new(vec![(
        1,
        Reply::Rows(vec![
            row(&["aaaa", "1", "1", "1", "1"]),
            row(&["aaaa aaaa", "1", "1", "1", "1"]),
            row(&["aaa aaaaa", "1", "1", "1", "1"]),
            row(&["aaaa aaaaa", "1", "1", "1", "1"]),
        ]),
    )]);
    let providers = mock_providers();
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(dir.path());

    let outcome = PageSession::new(&source, &providers, &exporter)
        .process_page("a", 1)
        .await;
    assert_eq!(outcome.table.len(), 3);
    assert_eq!(outcome.table.get(6.0).unwrap().occurrence_count, 2);
    assert_eq!(outcome.table.get(6.0).unwrap().fingerprint.phrase, "aaaa aaaa");
    assert!(outcome.neighbors.is_empty());

    // A wider threshold links 6.0 and 6.5
    let outcome = PageSession::new(&source, &providers, &exporter)
        .with_threshold(0.6)
        .process_page("a", 1)
        .await;
    assert_eq!(outcome.neighbors.get(6.0), Some(1));
    assert_eq!(outcome.neighbors.get(6.5), Some(1));
    assert_eq!(outcome.neighbors.get(5.0), None);
}

#[tokio::test]
async fn consolidation_merges_pages() {
    let source = MockSource::new(vec![
        (1, Reply::Rows(vec![row(&["amen", "1", "2", "3", "4"])])),
        (
            2,
            Reply::Rows(vec![
                row(&["amen", "5", "6", "7", "8"]),
                row(&["hallelujah", "1", "2", "3", "4"]),
            ]),
        ),
    ]);
    let providers = mock_providers();
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(dir.path());

    let summary = PageSession::new(&source, &providers, &exporter)
        .with_consolidation(true)
        .run(PageRequests::new("amen", 1, PageLimit::new(2)))
        .await
        .unwrap();

    let paths = summary.consolidated.unwrap();
    assert_eq!(paths.csv, dir.path().join("amen_all_pages.csv"));

    let records = read_csv(&paths.csv);
    assert_eq!(records.len(), 2);
    // First-seen fingerprint kept, counts summed across pages
    assert_eq!(&records[0][0], "amen");
    assert_eq!(&records[0][1], "1");
    assert_eq!(&records[0][8], "2");

    // Per-page exports are unaffected
    assert_eq!(read_csv(&dir.path().join("amen_page_2.csv")).len(), 2);
}

#[tokio::test]
async fn consolidation_off_by_default() {
    let source = MockSource::new(vec![]);
    let providers = mock_providers();
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(dir.path());

    let summary = PageSession::new(&source, &providers, &exporter)
        .run(PageRequests::new("amen", 1, PageLimit::new(1)))
        .await
        .unwrap();
    assert!(summary.consolidated.is_none());
    assert!(!dir.path().join("amen_all_pages.csv").exists());
}
