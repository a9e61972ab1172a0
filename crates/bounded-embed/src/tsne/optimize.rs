//! Gradient descent with momentum and per-coordinate gains.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use super::affinity::joint_probabilities;
use super::cfg::{Init, TsneCfg, INIT_STD};
use super::gradient::kl_gradient;
use super::{EmbeddingOptimizer, IterationObserver, OptimizerError};
use crate::{PointSet, Vec2};

const GAIN_UP: f64 = 0.2;
const GAIN_DOWN: f64 = 0.8;
const LOG_EVERY: usize = 50;

/// Exact (O(n²)) t-SNE.
///
/// After every `callback_every` iterations the observer receives the live
/// position buffer; whatever it writes there is where the next gradient step
/// starts from.
#[derive(Debug, Default)]
pub struct Tsne {
    pub cfg: TsneCfg,
    embedding: Option<PointSet>,
}

impl Tsne {
    pub fn new(cfg: TsneCfg) -> Self {
        Self {
            cfg,
            embedding: None,
        }
    }

    /// Final layout of the last successful `fit`.
    pub fn embedding(&self) -> Option<&[Vec2]> {
        self.embedding.as_deref()
    }

    pub fn is_fitted(&self) -> bool {
        self.embedding.is_some()
    }

    fn pool(&self) -> Result<ThreadPool, OptimizerError> {
        ThreadPoolBuilder::new()
            .num_threads(self.cfg.n_jobs)
            .build()
            .map_err(|e| OptimizerError::ThreadPool(e.to_string()))
    }

    fn validate(&self, input: &DMatrix<f64>) -> Result<(), OptimizerError> {
        let (n, d) = input.shape();
        if n < 2 {
            return Err(OptimizerError::TooFewObservations { n });
        }
        if d == 0 {
            return Err(OptimizerError::NoFeatures);
        }
        if self.cfg.perplexity.is_nan() || self.cfg.perplexity <= 0.0 {
            return Err(OptimizerError::InvalidPerplexity(self.cfg.perplexity));
        }
        if let Some(k) = input.iter().position(|v| !v.is_finite()) {
            return Err(OptimizerError::NonFiniteInput {
                row: k % n,
                col: k / n,
            });
        }
        Ok(())
    }
}

/// Initial layout per `Init`.
pub(crate) fn initial_layout(input: &DMatrix<f64>, init: Init, seed: u64) -> PointSet {
    let n = input.nrows();
    if init == Init::Pca && input.ncols() >= 2 {
        let c0 = input.column(0);
        let c1 = input.column(1);
        let (m0, m1) = (c0.mean(), c1.mean());
        let sd = (c0.iter().map(|v| (v - m0).powi(2)).sum::<f64>() / n as f64).sqrt();
        if sd > 0.0 {
            let s = INIT_STD / sd;
            return (0..n)
                .map(|i| Vec2::new((c0[i] - m0) * s, (c1[i] - m1) * s))
                .collect();
        }
    }
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            // Box–Muller
            let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
            let u2: f64 = rng.gen::<f64>();
            let r = (-2.0 * u1.ln()).sqrt() * INIT_STD;
            let t = std::f64::consts::TAU * u2;
            Vec2::new(r * t.cos(), r * t.sin())
        })
        .collect()
}

impl EmbeddingOptimizer for Tsne {
    fn fit(
        &mut self,
        input: &DMatrix<f64>,
        observer: &mut dyn IterationObserver,
    ) -> Result<PointSet, OptimizerError> {
        self.validate(input)?;
        let cfg = self.cfg;
        let n = input.nrows();
        let perplexity = cfg.effective_perplexity(n);
        if perplexity < cfg.perplexity {
            warn!(
                requested = cfg.perplexity,
                used = perplexity,
                n,
                "perplexity too large for the number of observations; lowering"
            );
        }
        let lr = cfg.learning_rate_for(n);
        let every = cfg.callback_every.max(1);
        let pool = self.pool()?;
        info!(
            n,
            dims = input.ncols(),
            perplexity,
            metric = ?cfg.metric,
            threads = pool.current_num_threads(),
            learning_rate = lr,
            "t-SNE fit"
        );

        let p = pool.install(|| joint_probabilities(input, cfg.metric, perplexity));
        let mut y = initial_layout(input, cfg.init, cfg.seed);
        let mut update = vec![Vec2::zeros(); n];
        let mut gains = vec![Vec2::repeat(1.0); n];
        let mut grad = vec![Vec2::zeros(); n];

        for iter in 1..=cfg.n_iter {
            let early = iter <= cfg.early_exaggeration_iter;
            let (exaggeration, momentum) = if early {
                (cfg.early_exaggeration, cfg.initial_momentum)
            } else {
                (1.0, cfg.final_momentum)
            };
            let kl = pool.install(|| kl_gradient(&p, &y, exaggeration, &mut grad));

            for ((yi, ui), (gi, gain)) in y
                .iter_mut()
                .zip(update.iter_mut())
                .zip(grad.iter().zip(gains.iter_mut()))
            {
                for k in 0..2 {
                    gain[k] = if (gi[k] > 0.0) != (ui[k] > 0.0) {
                        gain[k] + GAIN_UP
                    } else {
                        (gain[k] * GAIN_DOWN).max(cfg.min_gain)
                    };
                    ui[k] = momentum * ui[k] - lr * gain[k] * gi[k];
                    yi[k] += ui[k];
                }
            }

            if let Some(k) = y.iter().position(|v| !(v.x.is_finite() && v.y.is_finite())) {
                return Err(OptimizerError::Diverged { iter, index: k });
            }

            if cfg.verbose && iter % LOG_EVERY == 0 {
                info!(iter, kl, exaggeration, "t-SNE progress");
            } else {
                debug!(iter, kl, "t-SNE iteration");
            }

            if iter % every == 0 {
                pool.install(|| observer.on_iteration(iter, kl, &mut y));
            }
        }

        self.embedding = Some(y.clone());
        Ok(y)
    }
}
