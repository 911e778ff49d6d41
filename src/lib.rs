// Gemprint: fingerprint scoring for gematria search results.
//
// This is the library root. Each module corresponds to a stage of the
// per-page pipeline: retrieve, analyze, score, cluster, export.

pub mod analysis;
pub mod config;
pub mod fingerprint;
pub mod gematrix;
pub mod output;
pub mod pipeline;
pub mod scoring;
