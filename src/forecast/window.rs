//! Sliding-window supervised dataset construction

use crate::error::{ForecastError, Result};

/// Supervised (window, horizon) pairs derived from one scaled series
///
/// `inputs[i]` holds `sequence_length` consecutive scaled values and
/// `targets[i]` the `prediction_horizon` values that follow them.
#[derive(Debug, Clone, Default)]
pub struct WindowedDataset {
    pub inputs: Vec<Vec<f32>>,
    pub targets: Vec<Vec<f32>>,
}

impl WindowedDataset {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Slice a scaled series into supervised pairs.
///
/// Produces exactly `max(0, len - sequence_length - prediction_horizon + 1)`
/// samples. An empty result is returned as-is; callers that need at least
/// one sample must surface that as an `InsufficientData` error.
pub fn make_windows(
    scaled: &[f64],
    sequence_length: usize,
    prediction_horizon: usize,
) -> WindowedDataset {
    let len = scaled.len();
    if len < sequence_length + prediction_horizon {
        return WindowedDataset::default();
    }

    let n_samples = len - sequence_length - prediction_horizon + 1;
    let mut inputs = Vec::with_capacity(n_samples);
    let mut targets = Vec::with_capacity(n_samples);

    for i in sequence_length..=(len - prediction_horizon) {
        inputs.push(
            scaled[i - sequence_length..i]
                .iter()
                .map(|v| *v as f32)
                .collect(),
        );
        targets.push(
            scaled[i..i + prediction_horizon]
                .iter()
                .map(|v| *v as f32)
                .collect(),
        );
    }

    WindowedDataset { inputs, targets }
}

/// `make_windows` plus the at-least-one-sample check most callers want
pub fn require_windows(
    scaled: &[f64],
    sequence_length: usize,
    prediction_horizon: usize,
) -> Result<WindowedDataset> {
    let dataset = make_windows(scaled, sequence_length, prediction_horizon);
    if dataset.is_empty() {
        return Err(ForecastError::InsufficientData(format!(
            "series of length {} cannot produce a single window of {} steps plus a {}-day horizon",
            scaled.len(),
            sequence_length,
            prediction_horizon
        )));
    }
    Ok(dataset)
}
