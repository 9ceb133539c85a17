use std::time::{Duration, Instant};

use log::{debug, info};

use crate::{Dataset, Error, Network, Result, loss};

/// Stopping and logging parameters for [`Network::fit`].
#[derive(Debug, Clone, Copy)]
pub struct FitConfig {
    /// Hard cap on the number of epochs.
    pub max_epochs: usize,
    /// Training stops once the epoch error (half SSE over the dataset) is at
    /// or below this value.
    pub target_error: f64,
    /// Log progress every `log_every` epochs; 0 disables progress logging.
    pub log_every: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_epochs: 1_000_000,
            target_error: 0.01,
            log_every: 1_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FitReport {
    pub epochs: usize,
    /// Error of the last completed epoch.
    pub final_error: f64,
    pub converged: bool,
    pub elapsed: Duration,
}

impl Network {
    /// Train on every sample of `train`, in order, once per epoch, until the
    /// epoch error reaches `cfg.target_error` or `cfg.max_epochs` is hit.
    ///
    /// The epoch error is `0.5 * Σ_samples Σ_outputs (target - output)^2`,
    /// measured right after each sample's own update.
    pub fn fit(&mut self, train: &Dataset, cfg: FitConfig) -> Result<FitReport> {
        if train.is_empty() {
            return Err(Error::InvalidData(
                "train dataset must not be empty".to_owned(),
            ));
        }
        if train.input_dim() != self.input_dim() {
            return Err(Error::DimensionMismatch {
                what: "train input",
                expected: self.input_dim(),
                got: train.input_dim(),
            });
        }
        if train.target_dim() != self.output_dim() {
            return Err(Error::DimensionMismatch {
                what: "train target",
                expected: self.output_dim(),
                got: train.target_dim(),
            });
        }
        if cfg.max_epochs == 0 {
            return Err(Error::InvalidConfig("max_epochs must be > 0".to_owned()));
        }
        if !(cfg.target_error.is_finite() && cfg.target_error >= 0.0) {
            return Err(Error::InvalidConfig(
                "target_error must be finite and >= 0".to_owned(),
            ));
        }

        let start = Instant::now();
        let mut trainer = self.trainer();
        let mut scratch = self.scratch();
        let mut epoch = 0;
        let mut error = f64::INFINITY;

        while error > cfg.target_error && epoch < cfg.max_epochs {
            error = 0.0;
            for idx in 0..train.len() {
                let input = train.input(idx);
                let target = train.target(idx);

                self.train_with(input, target, &mut trainer)?;
                let out = self.forward_with(input, &mut scratch)?;
                error += loss::sse(out, target);
            }
            error *= 0.5;
            epoch += 1;

            if cfg.log_every > 0 && epoch % cfg.log_every == 0 {
                info!("epoch {epoch}, error = {error}");
            }
        }

        let converged = error <= cfg.target_error;
        debug!("fit stopped after {epoch} epochs (converged: {converged})");

        Ok(FitReport {
            epochs: epoch,
            final_error: error,
            converged,
            elapsed: start.elapsed(),
        })
    }

    /// Predict outputs for all inputs in `data`.
    ///
    /// Returns a flat buffer with shape `(len, output_dim)`.
    pub fn predict(&self, data: &Dataset) -> Result<Vec<f64>> {
        if data.input_dim() != self.input_dim() {
            return Err(Error::DimensionMismatch {
                what: "dataset input",
                expected: self.input_dim(),
                got: data.input_dim(),
            });
        }

        let mut scratch = self.scratch();
        let mut preds = Vec::with_capacity(data.len() * self.output_dim());
        for idx in 0..data.len() {
            preds.extend_from_slice(self.forward_with(data.input(idx), &mut scratch)?);
        }
        Ok(preds)
    }

    /// Mean over samples and outputs of `(target - output)^2`.
    pub fn evaluate_mse(&self, data: &Dataset) -> Result<f64> {
        if data.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }
        if data.target_dim() != self.output_dim() {
            return Err(Error::DimensionMismatch {
                what: "dataset target",
                expected: self.output_dim(),
                got: data.target_dim(),
            });
        }

        let mut scratch = self.scratch();
        let mut total = 0.0_f64;
        for idx in 0..data.len() {
            let out = self.forward_with(data.input(idx), &mut scratch)?;
            total += loss::mse(out, data.target(idx));
        }
        Ok(total / data.len() as f64)
    }
}
