// Near-duplicate clustering over a page's distinct scores.
//
// Two distinct scores are neighbors when |a - b| < threshold. Each score's
// count is the number of other scores within the threshold; scores with no
// neighbor are left out of the result entirely. Pairwise comparison is
// O(n^2), fine for one page of results.

use std::collections::HashMap;

use super::bucket_key;

/// Distance under which two distinct scores count as near-duplicates.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.1;

/// Neighbor counts keyed by score. Absent means "no similar scores".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborCounts {
    counts: HashMap<u64, usize>,
}

impl NeighborCounts {
    /// Number of other scores within the threshold of `score`, if any.
    pub fn get(&self, score: f64) -> Option<usize> {
        self.counts.get(&bucket_key(score)).copied()
    }

    /// Scores with at least one neighbor, and their counts. Unordered.
    pub fn iter(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.counts
            .iter()
            .map(|(bits, count)| (f64::from_bits(*bits), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count, for each score, the other scores closer than `threshold`.
///
/// Equal scores are never neighbors of each other, matching the aggregation
/// rule that equal scores are the same bucket.
pub fn cluster(scores: &[f64], threshold: f64) -> NeighborCounts {
    let mut counts: HashMap<u64, usize> = HashMap::new();

    for (i, &a) in scores.iter().enumerate() {
        for &b in &scores[i + 1..] {
            if a != b && (a - b).abs() < threshold {
                *counts.entry(bucket_key(a)).or_insert(0) += 1;
                *counts.entry(bucket_key(b)).or_insert(0) += 1;
            }
        }
    }

    NeighborCounts { counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_score_absent() {
        let counts = cluster(&[1.00, 1.05, 2.00], DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(counts.get(1.00), Some(1));
        assert_eq!(counts.get(1.05), Some(1));
        assert_eq!(counts.get(2.00), None);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_chain_counts_each_neighbor() {
        // 1.00 and 1.16 are both within 0.1 of 1.08 but not of each other
        let counts = cluster(&[1.00, 1.08, 1.16], 0.1);
        assert_eq!(counts.get(1.00), Some(1));
        assert_eq!(counts.get(1.08), Some(2));
        assert_eq!(counts.get(1.16), Some(1));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let counts = cluster(&[0.0, 0.5], 0.5);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_empty_and_single() {
        assert!(cluster(&[], 0.1).is_empty());
        assert!(cluster(&[3.0], 0.1).is_empty());
    }

    #[test]
    fn test_threshold_is_a_parameter() {
        let scores = [1.0, 1.3];
        assert!(cluster(&scores, 0.1).is_empty());
        assert_eq!(cluster(&scores, 0.5).get(1.3), Some(1));
    }
}
