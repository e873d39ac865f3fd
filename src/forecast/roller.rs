//! Day-by-day autoregressive rollout
//!
//! The model natively forecasts `days` steps per call, but only the first
//! element of each forward pass is consumed; the window then slides one
//! step and the prediction is fed back in. This mirrors the reference
//! behavior exactly, wasted horizon elements included.

use crate::error::{ForecastError, Result};
use crate::forecast::model::SequenceForecaster;
use crate::forecast::scaler::MinMaxScaler;
use candle_core::{Device, Tensor};

/// Roll the trained model forward `days` steps from `seed_window`.
///
/// `seed_window` holds `sequence_length` scaled values; the result is in
/// original units, exactly `days` long. Deterministic for a fixed model
/// and window since dropout is disabled during inference.
pub fn roll(
    model: &SequenceForecaster,
    seed_window: &[f32],
    days: usize,
    scaler: &MinMaxScaler,
    device: &Device,
) -> Result<Vec<f64>> {
    if seed_window.is_empty() {
        return Err(ForecastError::InsufficientData(
            "empty seed window for rollout".to_string(),
        ));
    }

    let seq_len = seed_window.len();
    let mut window = seed_window.to_vec();
    let mut predictions = Vec::with_capacity(days);

    for _ in 0..days {
        let x = Tensor::from_vec(window.clone(), (1, seq_len, 1), device)?;
        let output = model.forward(&x, false)?.to_vec2::<f32>()?;
        // First element of the multi-step output is this step's forecast
        let next = output[0][0];

        predictions.push(next as f64);
        window.remove(0);
        window.push(next);
    }

    Ok(scaler.inverse_transform(&predictions))
}
