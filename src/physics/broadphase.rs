//! Broadphase: candidate pairs from bounding-box overlap.

use super::body_set::{BodyHandle, BodySet};

/// Brute-force pair finder over every unordered pair `(i, j)`, `i < j`.
///
/// Bounding boxes are tested with the same strict inequalities as the exact
/// tests, so any pair the narrowphase would accept is kept.
#[derive(Debug, Default)]
pub struct AllPairs;

impl AllPairs {
    pub fn new() -> Self {
        Self
    }

    /// Candidate pairs in insertion order of the first body, then the second.
    pub fn find_pairs(&self, bodies: &BodySet) -> Vec<(BodyHandle, BodyHandle)> {
        let entries: Vec<_> = bodies
            .iter()
            .map(|(handle, body)| (handle, body.compute_aabb()))
            .collect();

        let mut pairs = Vec::new();
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let (handle_a, aabb_a) = &entries[i];
                let (handle_b, aabb_b) = &entries[j];
                if aabb_a.overlaps(aabb_b) {
                    pairs.push((*handle_a, *handle_b));
                }
            }
        }

        pairs
    }
}
