//! Isolation forest outlier model
//!
//! An ensemble of random isolation trees. Each tree recursively partitions a
//! random sub-sample on a random feature at a uniform random threshold until
//! points are isolated or the depth limit is hit. Outliers are isolated in
//! fewer splits, so their average path length is shorter.
//!
//! Scores follow the `score_samples` convention: values are negative, and
//! the more negative a score the more anomalous the point. The decision
//! offset is the `contamination` quantile of the training scores.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

/// Number of telemetry features per sample
pub const NUM_FEATURES: usize = 3;

pub const DEFAULT_TREES: usize = 100;
pub const DEFAULT_MAX_SAMPLES: usize = 256;
pub const DEFAULT_CONTAMINATION: f64 = 0.1;
pub const DEFAULT_SEED: u64 = 42;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

pub type Features = [f64; NUM_FEATURES];

/// Reasons a forest cannot be fitted
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("training row {row} contains a non-finite feature")]
    NonFiniteFeature { row: usize },

    #[error("contamination must be in (0, 0.5], got {0}")]
    InvalidContamination(f64),
}

/// Hyper-parameters of the forest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_samples: usize,
    /// Expected share of outliers in the training data
    pub contamination: f64,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREES,
            max_samples: DEFAULT_MAX_SAMPLES,
            contamination: DEFAULT_CONTAMINATION,
            seed: DEFAULT_SEED,
        }
    }
}

/// Inlier/outlier label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Inlier,
    Outlier,
}

impl Label {
    /// Conventional `1` / `-1` encoding
    pub fn as_i8(self) -> i8 {
        match self {
            Label::Inlier => 1,
            Label::Outlier => -1,
        }
    }

    pub fn is_outlier(self) -> bool {
        matches!(self, Label::Outlier)
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone)]
struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn build(rng: &mut StdRng, rows: Vec<Features>, max_depth: usize) -> Self {
        Self {
            root: grow(rng, rows, 0, max_depth),
        }
    }

    fn path_length(&self, x: &Features) -> f64 {
        let mut node = &self.root;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

fn grow(rng: &mut StdRng, rows: Vec<Features>, depth: usize, max_depth: usize) -> Node {
    if depth >= max_depth || rows.len() <= 1 {
        return Node::Leaf { size: rows.len() };
    }

    // Only features with spread can separate anything
    let mut candidates: Vec<(usize, f64, f64)> = Vec::with_capacity(NUM_FEATURES);
    for feature in 0..NUM_FEATURES {
        let (min, max) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r[feature]), hi.max(r[feature]))
        });
        if max > min {
            candidates.push((feature, min, max));
        }
    }
    if candidates.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = split_point(min, max, rng.gen());
    let (left, right): (Vec<Features>, Vec<Features>) =
        rows.into_iter().partition(|r| r[feature] <= threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(grow(rng, left, depth + 1, max_depth)),
        right: Box::new(grow(rng, right, depth + 1, max_depth)),
    }
}

/// Point at fraction `t` of `[min, max)`
///
/// Interpolates without forming `max - min`, which overflows for readings
/// of opposite sign near `f64::MAX`. The result always leaves `max` on the
/// right of the split.
fn split_point(min: f64, max: f64, t: f64) -> f64 {
    let threshold = min * (1.0 - t) + max * t;
    if threshold >= min && threshold < max {
        threshold
    } else {
        min
    }
}

/// Average path length of an unsuccessful BST search over `n` points
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

/// A fitted isolation forest
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sub_sample_size: usize,
    offset: f64,
    training_size: usize,
}

impl IsolationForest {
    /// Fit a forest on the given rows
    pub fn fit(data: &[Features], config: &ForestConfig) -> Result<Self, FitError> {
        if data.is_empty() {
            return Err(FitError::EmptyTrainingSet);
        }
        if let Some(row) = data.iter().position(|r| r.iter().any(|v| !v.is_finite())) {
            return Err(FitError::NonFiniteFeature { row });
        }
        if !(config.contamination > 0.0 && config.contamination <= 0.5) {
            return Err(FitError::InvalidContamination(config.contamination));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let sub_sample_size = config.max_samples.max(1).min(data.len());
        let max_depth = (sub_sample_size.max(2) as f64).log2().ceil() as usize;

        let trees = (0..config.n_trees.max(1))
            .map(|_| {
                let rows: Vec<Features> = index::sample(&mut rng, data.len(), sub_sample_size)
                    .into_iter()
                    .map(|i| data[i])
                    .collect();
                IsolationTree::build(&mut rng, rows, max_depth)
            })
            .collect();

        let mut forest = Self {
            trees,
            sub_sample_size,
            offset: 0.0,
            training_size: data.len(),
        };

        let training_scores: Vec<f64> = data.iter().map(|r| forest.score_samples(r)).collect();
        forest.offset = percentile(&training_scores, config.contamination * 100.0);

        Ok(forest)
    }

    /// Raw anomaly score in `[-1, 0)`; lower is more anomalous
    pub fn score_samples(&self, x: &Features) -> f64 {
        let mean_depth = self.trees.iter().map(|t| t.path_length(x)).sum::<f64>()
            / self.trees.len() as f64;
        let normaliser = average_path_length(self.sub_sample_size);
        if normaliser <= 0.0 {
            return -1.0;
        }
        -(2.0_f64).powf(-mean_depth / normaliser)
    }

    /// Score shifted by the offset; negative means outlier
    pub fn decision_function(&self, x: &Features) -> f64 {
        self.score_samples(x) - self.offset
    }

    pub fn predict(&self, x: &Features) -> Label {
        if self.decision_function(x) < 0.0 {
            Label::Outlier
        } else {
            Label::Inlier
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn training_size(&self) -> usize {
        self.training_size
    }
}

/// Linearly interpolated percentile, `p` in `[0, 100]`
fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
