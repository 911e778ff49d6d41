// Scoring — composite fingerprint scores, exact-match aggregation, and
// near-duplicate clustering over one page of results.

pub mod aggregate;
pub mod cluster;

/// Aggregation key for a score: its IEEE-754 bit pattern.
///
/// Adding 0.0 folds -0.0 into +0.0 so the key agrees with `==` for every
/// non-NaN score. No tolerance is applied; two scores share a bucket only
/// if they are exactly equal.
pub fn bucket_key(score: f64) -> u64 {
    (score + 0.0).to_bits()
}

/// Render a score the way it appears in exports and reports: the shortest
/// text that round-trips to the same f64, always with a fractional part.
pub fn score_text(score: f64) -> String {
    format!("{score:?}")
}
