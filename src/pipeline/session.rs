// Page session: fetch -> build -> aggregate -> cluster -> export -> report,
// once per page, until the page requests run out.
//
// Pages are processed strictly one after another. A transport failure is
// not fatal: the page is reported and exported as empty and the session
// still asks whether to continue. Export I/O errors do abort the run.

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use super::pages::{Continuation, PageRequests};
use crate::analysis::traits::AnalysisProviders;
use crate::fingerprint::builder::FingerprintBuilder;
use crate::gematrix::client::ResultsSource;
use crate::gematrix::parse::ResultsPage;
use crate::output::files::{ExportPaths, Exporter};
use crate::output::{terminal, truncate_chars};
use crate::scoring::aggregate::PageTable;
use crate::scoring::cluster::{cluster, NeighborCounts, DEFAULT_SIMILARITY_THRESHOLD};

/// Where a page is in its lifecycle. Logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Building,
    Aggregating,
    Clustering,
    Exporting,
    Reporting,
    AwaitingContinue,
}

/// Result of running the scoring core over one page.
#[derive(Debug, Clone, Default)]
pub struct PageOutcome {
    pub page: u32,
    /// Summary heading from the results page, if any
    pub heading: Option<String>,
    pub table: PageTable,
    pub neighbors: NeighborCounts,
    /// Rows dropped for having the wrong cell count
    pub skipped_rows: usize,
    /// Set when the fetch failed and the page was treated as empty
    pub fetch_error: Option<String>,
    /// False when the page had no results section at all
    pub had_results: bool,
}

/// Totals for a finished session.
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub pages: u32,
    pub fetch_failures: u32,
    pub fingerprints: usize,
    /// Present when consolidation was enabled
    pub consolidated: Option<ExportPaths>,
}

/// Drives the per-page pipeline for one query.
pub struct PageSession<'a> {
    source: &'a dyn ResultsSource,
    providers: &'a AnalysisProviders,
    exporter: &'a Exporter,
    threshold: f64,
    consolidate: bool,
}

impl<'a> PageSession<'a> {
    pub fn new(
        source: &'a dyn ResultsSource,
        providers: &'a AnalysisProviders,
        exporter: &'a Exporter,
    ) -> Self {
        Self {
            source,
            providers,
            exporter,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            consolidate: false,
        }
    }

    /// Also keep a cross-page table and export it when the session ends.
    pub fn with_consolidation(mut self, enabled: bool) -> Self {
        self.consolidate = enabled;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Fetch, build, aggregate and cluster one page. No files, no prompts.
    pub async fn process_page(&self, query: &str, page: u32) -> PageOutcome {
        debug!(page, stage = ?Stage::Fetching, "Page stage");
        let (results, fetch_error) = match self.source.fetch_page(query, page).await {
            Ok(results) => (results, None),
            Err(e) => {
                warn!(page, error = %e, "Fetch failed, treating page as empty");
                (None, Some(format!("{e:#}")))
            }
        };

        let had_results = results.is_some();
        let ResultsPage { heading, rows } = results.unwrap_or_default();

        debug!(page, stage = ?Stage::Building, rows = rows.len(), "Page stage");
        let builder = FingerprintBuilder::new(self.providers);
        let pb = progress_bar(rows.len());
        let mut fingerprints = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(phrase) = row.first() {
                pb.set_message(truncate_chars(phrase, 30));
            }
            if let Some(fp) = builder.build(row) {
                fingerprints.push(fp);
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
        let skipped_rows = rows.len() - fingerprints.len();

        debug!(page, stage = ?Stage::Aggregating, fingerprints = fingerprints.len(), "Page stage");
        let table = PageTable::aggregate(fingerprints);

        debug!(page, stage = ?Stage::Clustering, scores = table.len(), "Page stage");
        let neighbors = cluster(&table.scores(), self.threshold);

        info!(
            page,
            rows = rows.len(),
            skipped = skipped_rows,
            distinct = table.len(),
            clustered = neighbors.len(),
            "Processed page"
        );

        PageOutcome {
            page,
            heading,
            table,
            neighbors,
            skipped_rows,
            fetch_error,
            had_results,
        }
    }

    /// Run pages until the request sequence ends.
    pub async fn run<C: Continuation>(
        &self,
        mut requests: PageRequests<C>,
    ) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut all_pages = self.consolidate.then(PageTable::new);

        for request in requests.by_ref() {
            println!("{}", format!("Page {}:", request.page).bold());
            let outcome = self.process_page(&request.query, request.page).await;

            match (&outcome.fetch_error, &outcome.heading) {
                (Some(error), _) => {
                    summary.fetch_failures += 1;
                    println!("{} {}", "Error:".red().bold(), error);
                }
                (None, Some(heading)) => println!("{heading}"),
                (None, None) if !outcome.had_results => println!("No results found."),
                (None, None) => {}
            }

            debug!(page = request.page, stage = ?Stage::Exporting, "Page stage");
            let paths = self
                .exporter
                .write_page(&request.query, request.page, &outcome.table)?;

            debug!(page = request.page, stage = ?Stage::Reporting, "Page stage");
            terminal::display_page_report(request.page, &outcome.table, &outcome.neighbors);
            terminal::display_export(&paths);

            summary.pages += 1;
            summary.fingerprints += outcome.table.len();
            if let Some(all) = all_pages.as_mut() {
                all.merge(&outcome.table);
            }

            debug!(page = request.page, stage = ?Stage::AwaitingContinue, "Page stage");
        }

        if let Some(all) = all_pages {
            let neighbors = cluster(&all.scores(), self.threshold);
            println!(
                "\n{}",
                format!(
                    "=== All pages: {} distinct fingerprints, {} with near-duplicates ===",
                    all.len(),
                    neighbors.len()
                )
                .bold()
            );
            let paths = self.exporter.write_consolidated(requests.query(), &all)?;
            terminal::display_export(&paths);
            summary.consolidated = Some(paths);
        }

        info!(
            pages = summary.pages,
            failures = summary.fetch_failures,
            fingerprints = summary.fingerprints,
            "Session finished"
        );
        Ok(summary)
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("  Analyzing [{bar:30}] {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb
}
