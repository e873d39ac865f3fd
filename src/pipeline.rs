//! Request orchestration
//!
//! Runs `FETCH → per-feature {NORMALIZE → TRAIN → ROLL} → STACK →
//! CONSOLIDATE` for one request. No retries; the first failing stage
//! aborts the whole request. Everything built here is owned by the
//! request and dropped with it.

use crate::config::{Config, ConsolidatorConfig, ModelConfig};
use crate::error::{ForecastError, Result};
use crate::forecast::{require_windows, roll, Consolidator, MinMaxScaler, Trainer};
use crate::provider::DataProvider;
use crate::types::{Feature, RawSeries};
use candle_core::Device;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Validated forecast request
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRequest {
    pub ticker: String,
    pub days: usize,
    pub period: String,
}

/// Final consolidated prediction, one row per forecast day
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    pub final_prediction: Vec<Vec<f64>>,
}

/// Orchestrates the full train-and-predict pipeline per request
pub struct Pipeline {
    provider: Arc<dyn DataProvider>,
    model_config: ModelConfig,
    consolidator_config: ConsolidatorConfig,
    ticker_suffix: String,
    device: Device,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn DataProvider>, config: &Config, device: Device) -> Self {
        Self {
            provider,
            model_config: config.model.clone(),
            consolidator_config: config.consolidator.clone(),
            ticker_suffix: config.provider.ticker_suffix.clone(),
            device,
        }
    }

    /// Run one forecast request end to end
    pub async fn predict(&self, request: ForecastRequest) -> Result<ForecastResponse> {
        if request.ticker.trim().is_empty() {
            return Err(ForecastError::InvalidInput("ticker must not be empty".to_string()));
        }
        if request.days == 0 {
            return Err(ForecastError::InvalidInput("days must be at least 1".to_string()));
        }

        let symbol = format!("{}{}", request.ticker.to_uppercase(), self.ticker_suffix);
        let series = self.provider.fetch(&symbol, &request.period).await?;
        info!("fetched {} bars for {}", series.len(), symbol);

        // Training is CPU/accelerator-bound and blocking; keep it off the
        // async runtime.
        let model_config = self.model_config.clone();
        let consolidator_config = self.consolidator_config.clone();
        let device = self.device.clone();
        let days = request.days;
        tokio::task::spawn_blocking(move || {
            run_forecast(series, days, &model_config, &consolidator_config, &device)
        })
        .await
        .map_err(|e| ForecastError::Internal(format!("forecast task panicked: {e}")))?
    }
}

/// The synchronous core: train one model per feature, roll each forward,
/// stack, consolidate.
fn run_forecast(
    series: RawSeries,
    days: usize,
    model_config: &ModelConfig,
    consolidator_config: &ConsolidatorConfig,
    device: &Device,
) -> Result<ForecastResponse> {
    let trainer = Trainer::new(model_config.clone(), device.clone());

    // Scalers are keyed by feature; a scaler fit on one feature must never
    // be applied to another.
    let mut scalers: HashMap<Feature, MinMaxScaler> = HashMap::new();
    let mut forecasts: Vec<Vec<f64>> = Vec::with_capacity(Feature::ALL.len());

    for feature in Feature::ALL {
        let values = series.feature_series(feature);
        let (scaled, scaler) = MinMaxScaler::fit_transform(&values)?;
        let dataset = require_windows(&scaled, model_config.sequence_length, days)?;
        scalers.insert(feature, scaler);

        info!("training model for feature: {}", feature);
        let model = trainer.train(&dataset, days)?;

        // Seed the rollout with the most recent training window, as the
        // reference pipeline does.
        let seed = dataset
            .inputs
            .last()
            .ok_or_else(|| ForecastError::Internal("windowed dataset lost its samples".to_string()))?;
        let rolled = roll(&model, seed, days, &scalers[&feature], device)?;
        forecasts.push(rolled);
    }

    // Stack per-feature vectors into one (days, features) matrix
    let stacked: Vec<Vec<f64>> = (0..days)
        .map(|day| forecasts.iter().map(|f| f[day]).collect())
        .collect();

    let consolidator = Consolidator::new(consolidator_config, Feature::ALL.len(), device)?;
    let final_prediction = consolidator.consolidate(&stacked, device)?;

    Ok(ForecastResponse { final_prediction })
}
