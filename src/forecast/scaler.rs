//! Min-max scaling into [0, 1]
//!
//! One scaler per feature, fit once over that feature's full history. The
//! scaler fit on one feature must never touch another feature's values;
//! the pipeline carries them in a keyed map for that reason.

use crate::error::{ForecastError, Result};

/// Affine map from an observed value range onto [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    min: f64,
    range: f64,
}

impl MinMaxScaler {
    /// Fit a scaler over `values` and return the scaled series with it.
    ///
    /// Fails with `InsufficientData` on an empty input.
    pub fn fit_transform(values: &[f64]) -> Result<(Vec<f64>, MinMaxScaler)> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientData(
                "cannot fit scaler on an empty series".to_string(),
            ));
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // A constant series maps to all-zeros rather than dividing by zero
        let range = if max > min { max - min } else { 1.0 };

        let scaler = MinMaxScaler { min, range };
        let scaled = values.iter().map(|v| scaler.transform_one(*v)).collect();
        Ok((scaled, scaler))
    }

    fn transform_one(&self, value: f64) -> f64 {
        (value - self.min) / self.range
    }

    /// Map scaled values back into original units
    pub fn inverse_transform(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|v| v * self.range + self.min).collect()
    }
}
