// Isolation forest
// Random-partition ensemble: anomalous rows isolate in fewer splits, so a
// short mean path length across trees turns into a score near 1.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::DetectorConfig;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Average path length of an unsuccessful binary search over `n` points.
/// Used both to normalize scores and to credit unexplored subtrees when a
/// traversal ends in a leaf that still holds several rows.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Quantile with linear interpolation between the two nearest order
/// statistics. `q` is clamped to [0, 1].
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + weight * (sorted[upper] - sorted[lower])
}

#[derive(Debug)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        size: usize,
    },
}

fn grow(rows: &[usize], data: &[Vec<f64>], depth: usize, limit: usize, rng: &mut StdRng) -> TreeNode {
    if depth >= limit || rows.len() <= 1 {
        return TreeNode::Leaf { size: rows.len() };
    }

    // Only features with spread among the current rows can split them.
    let dims = data[rows[0]].len();
    let mut candidates = Vec::new();
    for feature in 0..dims {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &row in rows {
            let value = data[row][feature];
            min = min.min(value);
            max = max.max(value);
        }
        if max > min {
            candidates.push((feature, min, max));
        }
    }
    if candidates.is_empty() {
        return TreeNode::Leaf { size: rows.len() };
    }

    let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(min..max);
    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
        rows.iter().partition(|&&row| data[row][feature] < threshold);

    TreeNode::Split {
        feature,
        threshold,
        left: Box::new(grow(&left_rows, data, depth + 1, limit, rng)),
        right: Box::new(grow(&right_rows, data, depth + 1, limit, rng)),
    }
}

fn path_length(node: &TreeNode, point: &[f64], depth: usize) -> f64 {
    match node {
        TreeNode::Leaf { size } => depth as f64 + average_path_length(*size),
        TreeNode::Split { feature, threshold, left, right } => {
            if point[*feature] < *threshold {
                path_length(left, point, depth + 1)
            } else {
                path_length(right, point, depth + 1)
            }
        }
    }
}

pub struct IsolationForest {
    trees: Vec<TreeNode>,
    normalizer: f64,
}

impl IsolationForest {
    /// Fit an ensemble on `data` (rows of equal-length feature vectors).
    /// Each tree draws its own sub-sample without replacement, capped at
    /// `sample_size` rows, and grows to the usual `ceil(log2(sample))`
    /// height limit. The RNG is seeded from the config so identical input
    /// yields an identical forest.
    pub fn fit(data: &[Vec<f64>], config: &DetectorConfig) -> Self {
        if data.is_empty() {
            return Self { trees: Vec::new(), normalizer: 0.0 };
        }

        let sample_size = config.sample_size.min(data.len()).max(1);
        let height_limit = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut trees = Vec::with_capacity(config.trees);
        for _ in 0..config.trees {
            let rows = rand::seq::index::sample(&mut rng, data.len(), sample_size).into_vec();
            trees.push(grow(&rows, data, 0, height_limit, &mut rng));
        }

        Self { trees, normalizer: average_path_length(sample_size) }
    }

    /// Anomaly score in (0, 1); higher means easier to isolate. Degenerate
    /// forests (under two distinct rows to learn from) score everything a
    /// neutral 0.5.
    pub fn score(&self, point: &[f64]) -> f64 {
        if self.trees.is_empty() || self.normalizer <= 0.0 {
            return 0.5;
        }
        let total: f64 = self.trees.iter().map(|tree| path_length(tree, point, 0)).sum();
        let mean = total / self.trees.len() as f64;
        2f64.powf(-mean / self.normalizer)
    }

    pub fn score_all(&self, data: &[Vec<f64>]) -> Vec<f64> {
        data.iter().map(|point| self.score(point)).collect()
    }
}
