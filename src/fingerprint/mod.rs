// Fingerprints — one derived record per scraped phrase.

pub mod builder;
pub mod features;
