//! End-to-end tests for the forecast pipeline and error envelope

#[cfg(test)]
mod tests {
    use crate::config::{Config, ConsolidatorMode};
    use crate::error::ForecastError;
    use crate::pipeline::{ForecastRequest, Pipeline};
    use crate::provider::DataProvider;
    use crate::server::ApiError;
    use crate::types::{Bar, RawSeries};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use candle_core::Device;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    /// Returns `n` days of synthetic, linearly increasing bars
    struct LinearProvider {
        n_days: usize,
    }

    #[async_trait]
    impl DataProvider for LinearProvider {
        async fn fetch(&self, _ticker: &str, _period: &str) -> crate::error::Result<RawSeries> {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let bars = (0..self.n_days)
                .map(|i| {
                    let base = 100.0 + i as f64;
                    Bar {
                        timestamp: start + Duration::days(i as i64),
                        open: base,
                        high: base + 1.0,
                        low: base - 1.0,
                        close: base + 0.5,
                        volume: 10_000.0 + 10.0 * i as f64,
                    }
                })
                .collect();
            Ok(RawSeries::new(bars))
        }
    }

    /// Always reports an unknown ticker
    struct EmptyProvider;

    #[async_trait]
    impl DataProvider for EmptyProvider {
        async fn fetch(&self, ticker: &str, _period: &str) -> crate::error::Result<RawSeries> {
            Err(ForecastError::NoData(ticker.to_string()))
        }
    }

    /// Config shrunk enough that training finishes quickly in CI
    fn test_config() -> Config {
        let mut config = Config::default();
        config.model.sequence_length = 12;
        config.model.hidden_size = 8;
        config.model.epochs = 2;
        config.model.batch_size = 8;
        config
    }

    fn pipeline(provider: Arc<dyn DataProvider>, config: &Config) -> Pipeline {
        Pipeline::new(provider, config, Device::Cpu)
    }

    #[tokio::test]
    async fn test_end_to_end_forecast() {
        let config = test_config();
        let pipeline = pipeline(Arc::new(LinearProvider { n_days: 200 }), &config);

        let response = pipeline
            .predict(ForecastRequest {
                ticker: "TESTCO".to_string(),
                days: 3,
                period: "max".to_string(),
            })
            .await
            .unwrap();

        // One consolidated row per forecast day
        assert_eq!(response.final_prediction.len(), 3);
        for row in &response.final_prediction {
            assert_eq!(row.len(), 1);
            assert!(row[0].is_finite());
        }
    }

    #[tokio::test]
    async fn test_end_to_end_static_consolidator() {
        let mut config = test_config();
        config.consolidator.mode = ConsolidatorMode::Static;
        let pipeline = pipeline(Arc::new(LinearProvider { n_days: 120 }), &config);

        let response = pipeline
            .predict(ForecastRequest {
                ticker: "testco".to_string(),
                days: 2,
                period: "1y".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.final_prediction.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_history_maps_to_no_data() {
        let config = test_config();
        let pipeline = pipeline(Arc::new(EmptyProvider), &config);

        let err = pipeline
            .predict(ForecastRequest {
                ticker: "GHOST".to_string(),
                days: 3,
                period: "max".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ForecastError::NoData(_)));
        // Ticker was uppercased and suffixed before the fetch
        assert!(err.to_string().contains("GHOST.NS"));
    }

    #[tokio::test]
    async fn test_short_history_is_insufficient_data() {
        let config = test_config();
        // 10 bars cannot fill a 12-step window plus a 3-day horizon
        let pipeline = pipeline(Arc::new(LinearProvider { n_days: 10 }), &config);

        let err = pipeline
            .predict(ForecastRequest {
                ticker: "TESTCO".to_string(),
                days: 3,
                period: "max".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData(_)));
    }

    #[tokio::test]
    async fn test_zero_days_rejected_before_fetch() {
        let config = test_config();
        let pipeline = pipeline(Arc::new(EmptyProvider), &config);

        let err = pipeline
            .predict(ForecastRequest {
                ticker: "TESTCO".to_string(),
                days: 0,
                period: "max".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let resp =
            ApiError(ForecastError::NoData("GHOST.NS".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("no data"));
    }

    #[tokio::test]
    async fn test_client_vs_server_error_status() {
        let cases = [
            (
                ForecastError::InvalidInput("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ForecastError::InsufficientData("short".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ForecastError::Training("diverged".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let resp = ApiError(err).into_response();
            assert_eq!(resp.status(), expected);
        }
    }
}
