//! t-SNE configuration.

use serde::{Deserialize, Serialize};

/// Input-space dissimilarity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Euclidean,
    #[default]
    Cosine,
}

/// Starting layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Init {
    /// First two input columns (the leading principal components for PCA
    /// input), rescaled so the first has standard deviation `INIT_STD`.
    #[default]
    Pca,
    /// Isotropic Gaussian with standard deviation `INIT_STD`.
    Random,
}

/// Spread of the initial layout.
pub const INIT_STD: f64 = 1e-4;

/// Optimiser settings. Unknown keys in a serialised bag are ignored.
///
/// `n_jobs = 0` uses rayon's default thread count.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TsneCfg {
    pub perplexity: f64,
    pub metric: Metric,
    pub init: Init,
    pub n_jobs: usize,
    /// Total gradient iterations, early exaggeration included.
    pub n_iter: usize,
    pub early_exaggeration_iter: usize,
    pub early_exaggeration: f64,
    /// `None` picks `max(n / early_exaggeration, 200)`.
    pub learning_rate: Option<f64>,
    pub initial_momentum: f64,
    pub final_momentum: f64,
    pub min_gain: f64,
    /// Invoke the observer every this many iterations (1 = every iteration).
    pub callback_every: usize,
    pub seed: u64,
    pub verbose: bool,
}

impl Default for TsneCfg {
    fn default() -> Self {
        Self {
            perplexity: 50.0,
            metric: Metric::Cosine,
            init: Init::Pca,
            n_jobs: 0,
            n_iter: 750,
            early_exaggeration_iter: 250,
            early_exaggeration: 12.0,
            learning_rate: None,
            initial_momentum: 0.5,
            final_momentum: 0.8,
            min_gain: 0.01,
            callback_every: 1,
            seed: 42,
            verbose: false,
        }
    }
}

impl TsneCfg {
    pub(crate) fn learning_rate_for(&self, n: usize) -> f64 {
        self.learning_rate
            .unwrap_or_else(|| (n as f64 / self.early_exaggeration).max(200.0))
    }

    /// Perplexity capped at `(n - 1) / 3` so each row has enough neighbours.
    pub(crate) fn effective_perplexity(&self, n: usize) -> f64 {
        let cap = (n.saturating_sub(1)) as f64 / 3.0;
        self.perplexity.min(cap).max(f64::MIN_POSITIVE)
    }
}
