//! Decision Tree - CART with Gini impurity
//!
//! Array-based tree: nodes live in one Vec, children are indices.
//! `x <= threshold` goes left. Leaves store the fraction of class-1 samples
//! that reached them, so the forest can average probabilities.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::logic::dataset::Label;
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

/// A node in the decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// P(class 1) among training samples in this leaf
        probability: f64,
        samples: usize,
    },
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }
}

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    /// Candidate features drawn per split
    pub max_features: usize,
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: crate::constants::DEFAULT_MAX_DEPTH,
            max_features: default_max_features(FEATURE_COUNT),
            min_samples_split: 2,
        }
    }
}

/// floor(sqrt(n)), at least 1
pub fn default_max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt().floor() as usize).max(1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

/// Best threshold found for one node
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// Borrowed training data shared by every recursive call
struct GrowContext<'a> {
    x: &'a [FeatureVector],
    y: &'a [Label],
    params: &'a TreeParams,
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `sample_indices` (may repeat: bootstrap)
    pub fn fit(
        x: &[FeatureVector],
        y: &[Label],
        sample_indices: &[usize],
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let ctx = GrowContext { x, y, params };
        let mut indices = sample_indices.to_vec();

        if indices.is_empty() {
            tree.push_leaf(0.0, 0);
        } else {
            tree.grow(&ctx, &mut indices, 0, rng);
        }
        tree
    }

    /// Probability of class 1 for one sample
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { probability, .. }) => return *probability,
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        self.node_depth(0)
    }

    fn node_depth(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => {
                1 + self.node_depth(*left).max(self.node_depth(*right))
            }
        }
    }

    fn push_leaf(&mut self, probability: f64, samples: usize) -> usize {
        self.nodes.push(TreeNode::Leaf { probability, samples });
        self.nodes.len() - 1
    }

    fn grow(&mut self, ctx: &GrowContext<'_>, indices: &mut [usize], depth: usize, rng: &mut StdRng) -> usize {
        let n = indices.len();
        let positives = indices.iter().filter(|&&i| ctx.y[i].is_positive()).count();
        let probability = positives as f64 / n as f64;

        let pure = positives == 0 || positives == n;
        if pure || depth >= ctx.params.max_depth || n < ctx.params.min_samples_split {
            return self.push_leaf(probability, n);
        }

        let candidate = match best_split(ctx, indices, rng) {
            Some(c) => c,
            None => return self.push_leaf(probability, n),
        };

        // Reserve the slot so the parent index precedes its children
        let node = self.push_leaf(probability, n);

        let (left_part, right_part) = partition(ctx.x, indices, candidate.feature, candidate.threshold);
        let left = self.grow(ctx, left_part, depth + 1, rng);
        let right = self.grow(ctx, right_part, depth + 1, rng);

        self.nodes[node] = TreeNode::Split {
            feature: candidate.feature,
            threshold: candidate.threshold,
            left,
            right,
        };
        node
    }
}

/// Reorder `indices` in place: `<= threshold` first. Both halves are non-empty
/// because the threshold lies strictly between two observed values.
fn partition<'s>(
    x: &[FeatureVector],
    indices: &'s mut [usize],
    feature: usize,
    threshold: f64,
) -> (&'s mut [usize], &'s mut [usize]) {
    indices.sort_by(|&a, &b| {
        let left_a = x[a].values[feature] <= threshold;
        let left_b = x[b].values[feature] <= threshold;
        left_b.cmp(&left_a)
    });
    let mid = indices
        .iter()
        .position(|&i| x[i].values[feature] > threshold)
        .unwrap_or(indices.len());
    indices.split_at_mut(mid)
}

fn gini(positives: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    let p = positives / total;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

/// Lowest weighted Gini over randomly drawn features. Features that are
/// constant on this node don't count toward `max_features`, so the search
/// only gives up when no feature can separate the samples.
fn best_split(ctx: &GrowContext<'_>, indices: &[usize], rng: &mut StdRng) -> Option<SplitCandidate> {
    let n_candidates = ctx.params.max_features.clamp(1, FEATURE_COUNT);
    let mut features: Vec<usize> = (0..FEATURE_COUNT).collect();
    features.shuffle(rng);

    let n = indices.len() as f64;
    let total_pos = indices.iter().filter(|&&i| ctx.y[i].is_positive()).count() as f64;

    let mut best: Option<SplitCandidate> = None;
    let mut column: Vec<(f64, bool)> = Vec::with_capacity(indices.len());
    let mut visited = 0usize;

    for feature in features {
        if visited >= n_candidates {
            break;
        }

        column.clear();
        column.extend(indices.iter().map(|&i| (ctx.x[i].values[feature], ctx.y[i].is_positive())));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        if column[0].0 >= column[column.len() - 1].0 {
            continue;
        }
        visited += 1;

        let mut left_n = 0.0;
        let mut left_pos = 0.0;

        for k in 0..column.len() - 1 {
            left_n += 1.0;
            if column[k].1 {
                left_pos += 1.0;
            }

            let (current, next) = (column[k].0, column[k + 1].0);
            if current >= next {
                continue;
            }

            let right_n = n - left_n;
            let right_pos = total_pos - left_pos;
            let impurity = (left_n * gini(left_pos, left_n) + right_n * gini(right_pos, right_n)) / n;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let mid = current + (next - current) / 2.0;
                // Guard against the midpoint rounding up onto `next`
                let threshold = if mid < next { mid } else { current };
                best = Some(SplitCandidate { feature, threshold, impurity });
            }
        }
    }

    best
}
