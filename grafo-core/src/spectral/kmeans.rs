//! Lloyd's k-means with farthest-point seeding.

use nalgebra::{DMatrix, RowDVector};

/// Clusters the rows of `points` into at most `k` groups.
///
/// Seeding is deterministic: the first row, then repeatedly the row farthest
/// from every chosen seed (lowest index on ties). Duplicate rows can leave
/// fewer distinct seeds than `k`. A cluster that empties keeps its previous
/// centroid. Stops when no assignment changes or after `max_iterations`
/// rounds.
pub(crate) fn kmeans(points: &DMatrix<f64>, k: usize, max_iterations: usize) -> Vec<usize> {
    let n = points.nrows();
    if n == 0 || k == 0 {
        return vec![0; n];
    }
    let mut centroids = farthest_point_seeds(points, k);
    let mut labels = assign(points, &centroids);
    for _ in 0..max_iterations {
        update_centroids(points, &labels, &mut centroids);
        let next = assign(points, &centroids);
        if next == labels {
            break;
        }
        labels = next;
    }
    labels
}

fn farthest_point_seeds(points: &DMatrix<f64>, k: usize) -> Vec<RowDVector<f64>> {
    let n = points.nrows();
    let mut seeds = vec![points.row(0).into_owned()];
    let mut nearest: Vec<f64> = (0..n).map(|i| squared_distance(points, i, &seeds[0])).collect();
    while seeds.len() < k.min(n) {
        let mut best = 0;
        for i in 1..n {
            if nearest[i] > nearest[best] {
                best = i;
            }
        }
        if nearest[best] <= 0.0 {
            break;
        }
        let seed = points.row(best).into_owned();
        for (i, distance) in nearest.iter_mut().enumerate() {
            *distance = distance.min(squared_distance(points, i, &seed));
        }
        seeds.push(seed);
    }
    seeds
}

fn squared_distance(points: &DMatrix<f64>, row: usize, centroid: &RowDVector<f64>) -> f64 {
    (points.row(row) - centroid).norm_squared()
}

fn assign(points: &DMatrix<f64>, centroids: &[RowDVector<f64>]) -> Vec<usize> {
    (0..points.nrows())
        .map(|row| {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (cluster, centroid) in centroids.iter().enumerate() {
                let distance = squared_distance(points, row, centroid);
                if distance < best_distance {
                    best = cluster;
                    best_distance = distance;
                }
            }
            best
        })
        .collect()
}

#[expect(clippy::cast_precision_loss, reason = "cluster sizes stay far below 2^52")]
fn update_centroids(points: &DMatrix<f64>, labels: &[usize], centroids: &mut [RowDVector<f64>]) {
    let mut sums: Vec<RowDVector<f64>> = centroids
        .iter()
        .map(|centroid| RowDVector::zeros(centroid.ncols()))
        .collect();
    let mut counts = vec![0_usize; centroids.len()];
    for (row, &label) in labels.iter().enumerate() {
        sums[label] += points.row(row);
        counts[label] += 1;
    }
    for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count > 0 {
            *centroid = sum / count as f64;
        }
    }
}
