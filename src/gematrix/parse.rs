// Results-page parsing.
//
// The page carries an element with id "results" containing an h2 summary
// and a `table.results`. Each `tr` becomes a row of trimmed cell texts.
// Rows are returned as-is; deciding whether a row is well formed is the
// fingerprint builder's job.

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

/// The parsed contents of one results page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsPage {
    /// Summary heading above the table, if present
    pub heading: Option<String>,
    /// Cell texts of every table row, header rows included
    pub rows: Vec<Vec<String>>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {css:?}: {e:?}"))
}

/// Parse a results page. `Ok(None)` means the page has no results section,
/// which is a normal "no results" outcome.
pub fn parse_results_page(html: &str) -> Result<Option<ResultsPage>> {
    let document = Html::parse_document(html);

    let results_sel = selector("#results")?;
    let Some(results) = document.select(&results_sel).next() else {
        return Ok(None);
    };

    let heading_sel = selector("h2")?;
    let heading = results
        .select(&heading_sel)
        .next()
        .map(|h| cell_text(&h))
        .filter(|h| !h.is_empty());

    let table_sel = selector("table.results")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let rows = match results.select(&table_sel).next() {
        Some(table) => table
            .select(&row_sel)
            .map(|row| row.select(&cell_sel).map(|cell| cell_text(&cell)).collect())
            .collect(),
        None => Vec::new(),
    };

    Ok(Some(ResultsPage { heading, rows }))
}

/// Concatenate an element's text nodes, each trimmed, dropping blanks.
fn cell_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}
