// Page requests — a lazy sequence of pages driven by an external decision.
//
// The session pulls requests one at a time. The first pull yields the start
// page; every later pull asks the Continuation whether to go past the page
// just finished. Once it says no, the sequence ends. Keeping the decision
// behind a trait lets the scoring pipeline run headless (a fixed page
// budget) or interactive (a y/n prompt) without knowing which.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::warn;

/// Decides whether to fetch the page after `finished_page`.
pub trait Continuation {
    fn proceed(&mut self, finished_page: u32) -> Result<bool>;
}

/// True for the single-letter affirmative, in either case.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Interactive continuation: asks on stdout, reads one line from stdin.
/// End of input counts as "no".
pub struct StdinPrompt;

impl Continuation for StdinPrompt {
    fn proceed(&mut self, _finished_page: u32) -> Result<bool> {
        print!("Do you want to view the next page? (y/n): ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let mut answer = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read answer")?;
        Ok(read > 0 && is_affirmative(&answer))
    }
}

/// Headless continuation: process at most `max_pages` pages in total.
pub struct PageLimit {
    remaining: u32,
}

impl PageLimit {
    pub fn new(max_pages: u32) -> Self {
        // The first page is always fetched; the limit covers the rest.
        Self {
            remaining: max_pages.saturating_sub(1),
        }
    }
}

impl Continuation for PageLimit {
    fn proceed(&mut self, _finished_page: u32) -> Result<bool> {
        if self.remaining == 0 {
            return Ok(false);
        }
        self.remaining -= 1;
        Ok(true)
    }
}

/// One page to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: String,
    pub page: u32,
}

/// Lazy, restartable sequence of page requests for one query.
pub struct PageRequests<C: Continuation> {
    query: String,
    start_page: u32,
    last_page: Option<u32>,
    done: bool,
    continuation: C,
}

impl<C: Continuation> PageRequests<C> {
    pub fn new(query: impl Into<String>, start_page: u32, continuation: C) -> Self {
        Self {
            query: query.into(),
            start_page: start_page.max(1),
            last_page: None,
            done: false,
            continuation,
        }
    }

    /// Start over from the first page. The continuation keeps its state.
    pub fn restart(&mut self) {
        self.last_page = None;
        self.done = false;
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl<C: Continuation> Iterator for PageRequests<C> {
    type Item = PageRequest;

    fn next(&mut self) -> Option<PageRequest> {
        if self.done {
            return None;
        }

        let page = match self.last_page {
            None => self.start_page,
            Some(finished) => {
                let proceed = self.continuation.proceed(finished).unwrap_or_else(|e| {
                    warn!(error = %e, "Continuation failed, stopping");
                    false
                });
                if !proceed {
                    self.done = true;
                    return None;
                }
                finished + 1
            }
        };

        self.last_page = Some(page);
        Some(PageRequest {
            query: self.query.clone(),
            page,
        })
    }
}
