//! Agreement between two partitions of the same vertex set.
//!
//! Provides Adjusted Rand Index (ARI) and Normalized Mutual Information (NMI)
//! scoring, computed from a contingency table over community ids.

use std::collections::HashMap;

use serde::Serialize;

use super::{Partition, partition_error};
use crate::error::Result;

/// ARI and NMI computed from one contingency table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PartitionAgreement {
    /// Adjusted Rand Index in `[-1.0, 1.0]`.
    pub ari: f64,
    /// Normalized Mutual Information in `[0.0, 1.0]`.
    pub nmi: f64,
}

struct Contingency {
    items: usize,
    left: Vec<usize>,
    right: Vec<usize>,
    joint: HashMap<(usize, usize), usize>,
}

impl Contingency {
    /// Aligns `right` on the vertex order of `left`.
    fn build(left: &Partition, right: &Partition) -> Result<Self> {
        if let Some(extra) = right.assignments().keys().find(|id| left.community(id).is_none()) {
            return Err(partition_error(extra, "vertex missing from the first partition"));
        }
        let mut table = Self {
            items: left.len(),
            left: vec![0; left.community_count()],
            right: vec![0; right.community_count()],
            joint: HashMap::new(),
        };
        for (id, &a) in left.assignments() {
            let b = right
                .community(id)
                .ok_or_else(|| partition_error(id, "vertex missing from the second partition"))?;
            table.left[a] += 1;
            table.right[b] += 1;
            *table.joint.entry((a, b)).or_insert(0) += 1;
        }
        Ok(table)
    }

    fn adjusted_rand_index(&self) -> f64 {
        if self.items < 2 {
            return 1.0;
        }
        let sum_pairs: f64 = self.joint.values().copied().map(comb2).sum();
        let sum_left: f64 = self.left.iter().copied().map(comb2).sum();
        let sum_right: f64 = self.right.iter().copied().map(comb2).sum();
        let expected = sum_left * sum_right / comb2(self.items);
        let max_index = 0.5 * (sum_left + sum_right);
        let denominator = max_index - expected;
        if denominator == 0.0 {
            1.0
        } else {
            (sum_pairs - expected) / denominator
        }
    }

    #[expect(clippy::cast_precision_loss, reason = "vertex counts stay far below 2^52")]
    fn normalized_mutual_information(&self) -> f64 {
        if self.items == 0 {
            return 1.0;
        }
        let n = self.items as f64;
        let mutual: f64 = self
            .joint
            .iter()
            .map(|(&(a, b), &count)| {
                let count = count as f64;
                (count / n) * ((count * n) / (self.left[a] as f64 * self.right[b] as f64)).ln()
            })
            .sum();
        let left_entropy = entropy(&self.left, n);
        let right_entropy = entropy(&self.right, n);
        match (left_entropy == 0.0, right_entropy == 0.0) {
            (true, true) => 1.0,
            (true, false) | (false, true) => 0.0,
            (false, false) => (mutual / (left_entropy * right_entropy).sqrt()).clamp(0.0, 1.0),
        }
    }
}

#[expect(clippy::cast_precision_loss, reason = "vertex counts stay far below 2^52")]
fn comb2(value: usize) -> f64 {
    let value = value as f64;
    value * (value - 1.0) / 2.0
}

#[expect(clippy::cast_precision_loss, reason = "vertex counts stay far below 2^52")]
fn entropy(counts: &[usize], n: f64) -> f64 {
    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let probability = count as f64 / n;
            -probability * probability.ln()
        })
        .sum()
}

/// Adjusted Rand Index between two partitions.
///
/// # Errors
/// Returns [`crate::AlgorithmError::InvalidSolution`] when the partitions do
/// not cover the same vertices.
pub fn adjusted_rand_index(left: &Partition, right: &Partition) -> Result<f64> {
    Ok(Contingency::build(left, right)?.adjusted_rand_index())
}

/// Normalized Mutual Information (geometric normalization) between two
/// partitions.
///
/// # Errors
/// Returns [`crate::AlgorithmError::InvalidSolution`] when the partitions do
/// not cover the same vertices.
pub fn normalized_mutual_information(left: &Partition, right: &Partition) -> Result<f64> {
    Ok(Contingency::build(left, right)?.normalized_mutual_information())
}

/// ARI and NMI in one pass over the contingency table.
///
/// # Errors
/// Returns [`crate::AlgorithmError::InvalidSolution`] when the partitions do
/// not cover the same vertices.
pub fn partition_agreement(left: &Partition, right: &Partition) -> Result<PartitionAgreement> {
    let table = Contingency::build(left, right)?;
    Ok(PartitionAgreement {
        ari: table.adjusted_rand_index(),
        nmi: table.normalized_mutual_information(),
    })
}
