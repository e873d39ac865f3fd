//! Feed-forward consolidation network
//!
//! Blends the stacked per-feature forecasts into one output column:
//! `input_size → hidden1 → ReLU → hidden2 → ReLU → output_size`, final
//! layer linear for regression.
//!
//! Two weight modes exist. `Random` keeps the reference endpoint's quirk
//! of running the network with fresh, never-trained initialization.
//! `Static` overwrites every weight and bias with fixed constants so the
//! consolidation step is reproducible without training data.

use crate::config::{ConsolidatorConfig, ConsolidatorMode};
use crate::error::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder, VarMap};

/// Static-mode constants: (fc1 weight, fc1 bias, fc2 weight, fc2 bias,
/// fc3 weight, fc3 bias)
const STATIC_WEIGHTS: (f32, f32, f32, f32, f32, f32) = (0.2, 0.1, 0.3, 0.1, 0.4, 0.5);

/// Three-layer regressor over one prediction-per-feature row
pub struct Consolidator {
    fc1: Linear,
    fc2: Linear,
    fc3: Linear,
}

impl Consolidator {
    /// Build according to the configured weight mode
    pub fn new(config: &ConsolidatorConfig, input_size: usize, device: &Device) -> Result<Self> {
        match config.mode {
            ConsolidatorMode::Random => Self::with_random_weights(config, input_size, device),
            ConsolidatorMode::Static => Self::with_static_weights(config, input_size, device),
        }
    }

    /// Default (random-init, untrained) weights
    pub fn with_random_weights(
        config: &ConsolidatorConfig,
        input_size: usize,
        device: &Device,
    ) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        Ok(Self {
            fc1: linear(input_size, config.hidden1, vb.pp("fc1"))?,
            fc2: linear(config.hidden1, config.hidden2, vb.pp("fc2"))?,
            fc3: linear(config.hidden2, config.output_size, vb.pp("fc3"))?,
        })
    }

    /// Fixed constant weights, deterministic output
    pub fn with_static_weights(
        config: &ConsolidatorConfig,
        input_size: usize,
        device: &Device,
    ) -> Result<Self> {
        let (w1, b1, w2, b2, w3, b3) = STATIC_WEIGHTS;
        Ok(Self {
            fc1: constant_layer(input_size, config.hidden1, w1, b1, device)?,
            fc2: constant_layer(config.hidden1, config.hidden2, w2, b2, device)?,
            fc3: constant_layer(config.hidden2, config.output_size, w3, b3, device)?,
        })
    }

    /// Forward pass: `(rows, input_size)` in, `(rows, output_size)` out
    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let x = self.fc1.forward(x)?.relu()?;
        let x = self.fc2.forward(&x)?.relu()?;
        Ok(self.fc3.forward(&x)?)
    }

    /// Consolidate a stacked forecast matrix into the final prediction.
    ///
    /// `stacked[d][f]` is feature `f`'s forecast for day `d`; the result
    /// keeps one row per day, matching the reference response shape.
    pub fn consolidate(&self, stacked: &[Vec<f64>], device: &Device) -> Result<Vec<Vec<f64>>> {
        let rows = stacked.len();
        let cols = stacked.first().map(Vec::len).unwrap_or(0);
        let flat: Vec<f32> = stacked.iter().flatten().map(|v| *v as f32).collect();
        let x = Tensor::from_vec(flat, (rows, cols), device)?;

        let output = self.forward(&x)?.to_vec2::<f32>()?;
        Ok(output
            .into_iter()
            .map(|row| row.into_iter().map(|v| v as f64).collect())
            .collect())
    }
}

fn constant_layer(
    in_dim: usize,
    out_dim: usize,
    weight: f32,
    bias: f32,
    device: &Device,
) -> Result<Linear> {
    let w = Tensor::full(weight, (out_dim, in_dim), device)?;
    let b = Tensor::full(bias, out_dim, device)?;
    Ok(Linear::new(w, Some(b)))
}
