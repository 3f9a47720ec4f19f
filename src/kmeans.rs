//! Mini-batch k-means over 3-channel points.
//!
//! Works on raw channel values with squared Euclidean distance. Every
//! iteration looks at no more than `batch_size` points, and initialization
//! only looks at a bounded random subset, so the working set does not grow
//! with the input beyond the input slice itself.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::color::Point;
use crate::error::Result;
use crate::reduce::ReduceOptions;

/// Outcome of one clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster centers, not yet rounded to 8-bit channels.
    pub centers: Vec<Point>,
    /// Number of points ever assigned to each center, across all batches.
    pub counts: Vec<u64>,
    /// Number of mini-batch iterations that ran.
    pub iterations: usize,
    /// Whether the run stopped because centers moved less than the tolerance.
    pub converged: bool,
}

impl Clustering {
    fn empty() -> Self {
        Self {
            centers: Vec::new(),
            counts: Vec::new(),
            iterations: 0,
            converged: true,
        }
    }
}

#[inline(always)]
pub fn squared_distance(a: &Point, b: &Point) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Index and squared distance of the center closest to `point`.
///
/// Ties go to the lowest index. Returns `None` when `centers` is empty.
pub fn nearest_center(point: &Point, centers: &[Point]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, center) in centers.iter().enumerate() {
        let dist = squared_distance(point, center);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }
    best
}

/// Seeded mini-batch k-means.
#[derive(Debug, Clone, Default)]
pub struct MiniBatchKMeans {
    options: ReduceOptions,
}

impl MiniBatchKMeans {
    pub fn new(options: ReduceOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReduceOptions {
        &self.options
    }

    /// Cluster `points` into `min(k, points.len())` centers.
    ///
    /// Centers are returned in index order. Identical input (same order),
    /// `k` and options always give identical output.
    pub fn fit(&self, points: &[Point], k: usize) -> Result<Clustering> {
        self.options.validate()?;

        let n_centers = k.min(points.len());
        if n_centers == 0 {
            return Ok(Clustering::empty());
        }

        let mut rng = StdRng::seed_from_u64(self.options.seed());
        let mut centers = self.init_centers(points, n_centers, &mut rng);
        let mut counts = vec![0u64; n_centers];

        // Per-batch accumulators, reused across iterations.
        let mut batch_sums: Vec<Point> = vec![[0.0; 3]; n_centers];
        let mut batch_counts: Vec<u64> = vec![0; n_centers];
        let batch_len = self.options.batch_size().min(points.len());

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.options.max_iterations() {
            iterations += 1;

            batch_sums.fill([0.0; 3]);
            batch_counts.fill(0);

            // Sums and counts only: the update does not depend on the order
            // points appear in the batch.
            for idx in index::sample(&mut rng, points.len(), batch_len) {
                let point = &points[idx];
                let Some((cluster, _)) = nearest_center(point, &centers) else {
                    continue;
                };
                let sum = &mut batch_sums[cluster];
                sum[0] += point[0];
                sum[1] += point[1];
                sum[2] += point[2];
                batch_counts[cluster] += 1;
            }

            let max_shift = update_centers(&mut centers, &mut counts, &batch_sums, &batch_counts);

            tracing::trace!(iteration = iterations, max_shift, "Mini-batch step");

            if max_shift < self.options.tolerance() {
                converged = true;
                break;
            }
        }

        tracing::debug!(
            points = points.len(),
            clusters = n_centers,
            iterations,
            converged,
            "Mini-batch k-means finished"
        );

        Ok(Clustering {
            centers,
            counts,
            iterations,
            converged,
        })
    }

    /// Greedy k-means++ seeding over a random subset of at most
    /// `max(3 * batch_size, k)` points.
    ///
    /// No input index is chosen twice. Once every remaining candidate sits
    /// on an existing center, the next center is a uniformly drawn unused
    /// candidate.
    fn init_centers(&self, points: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
        let init_size = self
            .options
            .batch_size()
            .saturating_mul(3)
            .max(k)
            .min(points.len());
        let candidates: Vec<Point> = index::sample(rng, points.len(), init_size)
            .into_iter()
            .map(|idx| points[idx])
            .collect();

        let mut used = vec![false; candidates.len()];
        let first = rng.random_range(0..candidates.len());
        used[first] = true;

        let mut centers = Vec::with_capacity(k);
        centers.push(candidates[first]);

        let mut closest: Vec<f64> = candidates
            .iter()
            .map(|c| squared_distance(c, &candidates[first]))
            .collect();

        let local_trials = 2 + (k as f64).ln().floor() as usize;

        while centers.len() < k {
            let potential: f64 = closest.iter().sum();

            let chosen = if potential > 0.0 {
                let mut best: Option<(usize, f64)> = None;
                for _ in 0..local_trials {
                    let target = rng.random::<f64>() * potential;
                    let trial = weighted_pick(&closest, target);
                    let trial_potential: f64 = candidates
                        .iter()
                        .zip(&closest)
                        .map(|(c, &d)| d.min(squared_distance(c, &candidates[trial])))
                        .sum();
                    match best {
                        Some((_, best_potential)) if trial_potential >= best_potential => {}
                        _ => best = Some((trial, trial_potential)),
                    }
                }
                // local_trials >= 2, so a trial always ran.
                best.map_or(0, |(trial, _)| trial)
            } else {
                let unused: Vec<usize> = (0..candidates.len()).filter(|&i| !used[i]).collect();
                unused[rng.random_range(0..unused.len())]
            };

            used[chosen] = true;
            let center = candidates[chosen];
            for (d, c) in closest.iter_mut().zip(&candidates) {
                *d = d.min(squared_distance(c, &center));
            }
            centers.push(center);
        }

        centers
    }
}

/// Fold one batch into the centers and return the largest squared shift.
///
/// Each center that received points becomes the mean of every point ever
/// assigned to it: its previous value weighted by `counts`, combined with
/// the batch sum. Centers with no points in the batch are left unchanged.
fn update_centers(
    centers: &mut [Point],
    counts: &mut [u64],
    batch_sums: &[Point],
    batch_counts: &[u64],
) -> f64 {
    let mut max_shift = 0.0_f64;
    for (cluster, center) in centers.iter_mut().enumerate() {
        let assigned = batch_counts[cluster];
        if assigned == 0 {
            continue;
        }

        let previous = *center;
        let prior = counts[cluster] as f64;
        let total = counts[cluster] + assigned;

        for ch in 0..3 {
            center[ch] = (previous[ch] * prior + batch_sums[cluster][ch]) / total as f64;
        }
        counts[cluster] = total;

        max_shift = max_shift.max(squared_distance(&previous, center));
    }
    max_shift
}

/// First index whose cumulative weight exceeds `target`.
///
/// Zero-weight entries are never returned while some weight is positive.
fn weighted_pick(weights: &[f64], target: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (idx, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = idx;
        if cumulative > target {
            return idx;
        }
    }
    last_positive
}
