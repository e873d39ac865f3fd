//! Training loop for one per-feature forecaster
//!
//! A fixed number of epochs of shuffled mini-batch gradient descent on
//! MSE with an adaptive optimizer. No early stopping, no validation
//! split; the epoch count is the only termination condition.

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use crate::forecast::model::SequenceForecaster;
use crate::forecast::window::WindowedDataset;
use candle_core::{DType, Device, Tensor};
use candle_nn::{loss, AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use rand::seq::SliceRandom;
use tracing::debug;

/// Fits one [`SequenceForecaster`] per call on windowed data
pub struct Trainer {
    config: ModelConfig,
    device: Device,
}

impl Trainer {
    /// `device` is resolved once at startup and shared read-only
    pub fn new(config: ModelConfig, device: Device) -> Self {
        Self { config, device }
    }

    /// Train a fresh forecaster on `dataset`.
    ///
    /// `output_size` is the requested horizon in days. Fails fast on an
    /// empty dataset and on non-finite epoch loss.
    pub fn train(&self, dataset: &WindowedDataset, output_size: usize) -> Result<SequenceForecaster> {
        let n_samples = dataset.len();
        if n_samples == 0 {
            return Err(ForecastError::InsufficientData(
                "cannot train on an empty windowed dataset".to_string(),
            ));
        }

        let seq_len = dataset.inputs[0].len();
        let x_flat: Vec<f32> = dataset.inputs.iter().flatten().copied().collect();
        let y_flat: Vec<f32> = dataset.targets.iter().flatten().copied().collect();
        let x = Tensor::from_vec(x_flat, (n_samples, seq_len, 1), &self.device)?;
        let y = Tensor::from_vec(y_flat, (n_samples, output_size), &self.device)?;

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &self.device);
        let model = SequenceForecaster::new(&self.config, output_size, vb)?;

        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            weight_decay: 0.0,
            ..Default::default()
        };
        let mut optimizer = AdamW::new(varmap.all_vars(), params)?;

        let batch_size = self.config.batch_size.min(n_samples);
        let mut indices: Vec<u32> = (0..n_samples as u32).collect();
        let mut rng = rand::rng();

        for epoch in 0..self.config.epochs {
            indices.shuffle(&mut rng);

            let mut epoch_loss = 0.0;
            let mut n_batches = 0;
            for chunk in indices.chunks(batch_size) {
                let ids = Tensor::from_vec(chunk.to_vec(), chunk.len(), &self.device)?;
                let x_batch = x.index_select(&ids, 0)?;
                let y_batch = y.index_select(&ids, 0)?;

                let predictions = model.forward(&x_batch, true)?;
                let batch_loss = loss::mse(&predictions, &y_batch)?;
                optimizer.backward_step(&batch_loss)?;

                epoch_loss += batch_loss.to_scalar::<f32>()? as f64;
                n_batches += 1;
            }

            let avg_loss = epoch_loss / n_batches as f64;
            if !avg_loss.is_finite() {
                return Err(ForecastError::Training(format!(
                    "non-finite loss {avg_loss} at epoch {}",
                    epoch + 1
                )));
            }
            debug!(
                "epoch {}/{}, loss: {:.4}",
                epoch + 1,
                self.config.epochs,
                avg_loss
            );
        }

        Ok(model)
    }
}
