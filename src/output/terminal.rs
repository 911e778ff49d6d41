// Colored terminal output for page reports and single-phrase analysis.
//
// This module handles all terminal-specific formatting. The session and
// main.rs delegate here so the pipeline itself stays print-free.

use colored::Colorize;

use crate::analysis::traits::{Analysis, Sentiment};
use crate::fingerprint::features::StyleFeatures;
use crate::output::files::ExportPaths;
use crate::scoring::aggregate::PageTable;
use crate::scoring::cluster::NeighborCounts;
use crate::scoring::score_text;

const RULE: &str = "---------------------";

/// Print every aggregation entry of a page, with its neighbor count if any.
pub fn display_page_report(page: u32, table: &PageTable, neighbors: &NeighborCounts) {
    println!(
        "\n{}",
        format!("=== Page {page}: {} distinct fingerprints ===", table.len()).bold()
    );

    if table.is_empty() {
        println!("  {}", "No fingerprints on this page.".dimmed());
        return;
    }

    println!("{}", RULE.dimmed());
    for (score, entry) in table.iter() {
        let fp = &entry.fingerprint;
        println!("  Phrase:            {}", fp.phrase.bold());
        println!("  Jewish gematria:   {}", fp.jewish_value);
        println!("  English gematria:  {}", fp.english_value);
        println!("  Simple gematria:   {}", fp.simple_value);
        println!("  Sentiment:         {}", format_sentiment(&fp.sentiment));
        println!("  Topic:             {}", fp.topic_id);
        println!("  Entities:          {}", format_entities(&fp.entities));
        println!("  Fingerprint score: {}", score_text(score).cyan());
        println!("  Occurrences:       {}", entry.occurrence_count);
        if let Some(similar) = neighbors.get(score) {
            println!(
                "  Similar scores:    {}",
                similar.to_string().yellow().bold()
            );
        }
        println!("{}", RULE.dimmed());
    }

    let clustered = neighbors.len();
    if clustered > 0 {
        println!(
            "  {} {} of {} scores have near-duplicates",
            "~".yellow(),
            clustered,
            table.len()
        );
    }
}

/// Print where a table was exported.
pub fn display_export(paths: &ExportPaths) {
    println!(
        "  {} {}, {}",
        "Saved".green(),
        paths.csv.display(),
        paths.json.display()
    );
}

/// Print the full breakdown for one phrase (the `score` command).
pub fn display_phrase_analysis(
    phrase: &str,
    features: &StyleFeatures,
    analysis: &Analysis,
    score: f64,
) {
    println!("\n{}", format!("=== Fingerprint for \"{phrase}\" ===").bold());
    println!("  Avg word length:     {:.4}", features.avg_word_length);
    println!("  Avg sentence length: {:.4}", features.avg_sentence_length);
    println!("  Sentiment:           {}", format_sentiment(&analysis.sentiment));
    println!("  Topic:               {}", analysis.topic_id);
    println!("  Entities:            {}", format_entities(&analysis.entities));
    println!("  Fingerprint score:   {}", score_text(score).cyan().bold());
}

fn format_sentiment(sentiment: &Sentiment) -> String {
    let compound = format!("{:+.4}", sentiment.compound);
    let colored_compound = if sentiment.compound > 0.05 {
        compound.green()
    } else if sentiment.compound < -0.05 {
        compound.red()
    } else {
        compound.normal()
    };
    format!(
        "{} (neg {:.3}, neu {:.3}, pos {:.3})",
        colored_compound, sentiment.negative, sentiment.neutral, sentiment.positive
    )
}

fn format_entities(entities: &[String]) -> String {
    if entities.is_empty() {
        "none".dimmed().to_string()
    } else {
        entities.join(", ")
    }
}
