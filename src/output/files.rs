// Per-page export files.
//
// Every page produces `{query}_page_{n}.csv` and `{query}_page_{n}.json`
// under the output directory, which is created on demand. An empty table
// still yields a valid pair: a header-only CSV and `{}`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::scoring::aggregate::PageTable;
use crate::scoring::score_text;

/// Fixed CSV column order.
pub const CSV_HEADER: [&str; 9] = [
    "Phrase",
    "JewishValue",
    "EnglishValue",
    "SimpleValue",
    "Sentiment",
    "TopicId",
    "Entities",
    "FingerprintScore",
    "OccurrenceCount",
];

/// Where a table was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Writes page tables to CSV/JSON file pairs in one directory.
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Export one page's table.
    pub fn write_page(&self, query: &str, page: u32, table: &PageTable) -> Result<ExportPaths> {
        self.write_pair(&page_stem(query, page), table)
    }

    /// Export the cross-page table accumulated over a whole session.
    pub fn write_consolidated(&self, query: &str, table: &PageTable) -> Result<ExportPaths> {
        self.write_pair(&format!("{}_all_pages", sanitize_query(query)), table)
    }

    fn write_pair(&self, stem: &str, table: &PageTable) -> Result<ExportPaths> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create output directory {}", self.dir.display()))?;

        let paths = ExportPaths {
            csv: self.dir.join(format!("{stem}.csv")),
            json: self.dir.join(format!("{stem}.json")),
        };

        let csv_file = File::create(&paths.csv)
            .with_context(|| format!("Failed to create {}", paths.csv.display()))?;
        write_csv(csv_file, table)
            .with_context(|| format!("Failed to write {}", paths.csv.display()))?;

        let json_file = File::create(&paths.json)
            .with_context(|| format!("Failed to create {}", paths.json.display()))?;
        write_json(BufWriter::new(json_file), table)
            .with_context(|| format!("Failed to write {}", paths.json.display()))?;

        Ok(paths)
    }
}

/// File stem for one page: `{query}_page_{n}`.
pub fn page_stem(query: &str, page: u32) -> String {
    format!("{}_page_{page}", sanitize_query(query))
}

/// Path separators in the query would escape the output directory.
fn sanitize_query(query: &str) -> String {
    query.replace(['/', '\\'], "_")
}

/// Write the table as CSV with the fixed header. Sentiment and entities
/// are embedded as compact JSON.
pub fn write_csv<W: Write>(writer: W, table: &PageTable) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for (score, entry) in table.iter() {
        let fp = &entry.fingerprint;
        csv.write_record([
            fp.phrase.clone(),
            fp.jewish_value.clone(),
            fp.english_value.clone(),
            fp.simple_value.clone(),
            serde_json::to_string(&fp.sentiment)?,
            fp.topic_id.to_string(),
            serde_json::to_string(&fp.entities)?,
            score_text(score),
            entry.occurrence_count.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the table as an indented JSON object keyed by score.
pub fn write_json<W: Write>(mut writer: W, table: &PageTable) -> Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    table.serialize(&mut serializer)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_stem() {
        assert_eq!(page_stem("7", 1), "7_page_1");
        assert_eq!(page_stem("love and war", 3), "love and war_page_3");
        assert_eq!(page_stem("a/b\\c", 2), "a_b_c_page_2");
    }

    #[test]
    fn test_empty_table_exports() {
        let mut csv = Vec::new();
        write_csv(&mut csv, &PageTable::new()).unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Phrase,JewishValue,EnglishValue,SimpleValue,Sentiment,TopicId,Entities,FingerprintScore,OccurrenceCount\n"
        );

        let mut json = Vec::new();
        write_json(&mut json, &PageTable::new()).unwrap();
        assert_eq!(String::from_utf8(json).unwrap(), "{}\n");
    }
}
