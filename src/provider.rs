//! Market data providers
//!
//! Fetches historical daily OHLCV bars for a ticker. The provider is a
//! thin, replaceable collaborator behind the [`DataProvider`] trait so the
//! pipeline can be exercised against a stub in tests.

use crate::config::ProviderConfig;
use crate::error::{ForecastError, Result};
use crate::types::{Bar, RawSeries};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Source of historical daily bars
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch daily bars for `ticker` over `period` (e.g. "1y", "max").
    ///
    /// Must return [`ForecastError::NoData`] when the ticker is unknown or
    /// has no usable history, never an empty series.
    async fn fetch(&self, ticker: &str, period: &str) -> Result<RawSeries>;
}

/// Yahoo-style chart API client
#[derive(Clone)]
pub struct YahooProvider {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

// Individual entries are null on days the exchange reported no value;
// those rows are dropped wholesale.
#[derive(Debug, Deserialize)]
struct Quote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

impl YahooProvider {
    /// Create a new provider client
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent("stockcast/0.1")
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn parse_series(&self, ticker: &str, resp: ChartResponse) -> Result<RawSeries> {
        if let Some(err) = resp.chart.error {
            return Err(ForecastError::NoData(format!(
                "{ticker}: {}",
                err.description.unwrap_or_else(|| "provider error".to_string())
            )));
        }

        let result = resp
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| ForecastError::NoData(ticker.to_string()))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| ForecastError::NoData(ticker.to_string()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            let row = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
                quote.volume.get(i).copied().flatten(),
            );
            // Drop any row with a missing value
            if let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = row {
                let timestamp = DateTime::<Utc>::from_timestamp(*ts, 0)
                    .ok_or_else(|| ForecastError::Internal(format!("bad timestamp {ts}")))?;
                bars.push(Bar {
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume,
                });
            }
        }

        if bars.is_empty() {
            return Err(ForecastError::NoData(ticker.to_string()));
        }

        debug!("fetched {} bars for {}", bars.len(), ticker);
        Ok(RawSeries::new(bars))
    }
}

#[async_trait]
impl DataProvider for YahooProvider {
    async fn fetch(&self, ticker: &str, period: &str) -> Result<RawSeries> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let resp: ChartResponse = self
            .http
            .get(&url)
            .query(&[("range", period), ("interval", "1d")])
            .send()
            .await?
            .json()
            .await?;

        self.parse_series(ticker, resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> YahooProvider {
        YahooProvider::new(&ProviderConfig::default()).unwrap()
    }

    #[test]
    fn parse_drops_rows_with_missing_values() {
        let resp: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":[{
                "timestamp":[1700000000,1700086400,1700172800],
                "indicators":{"quote":[{
                    "open":[1.0,2.0,3.0],
                    "high":[1.5,null,3.5],
                    "low":[0.5,1.5,2.5],
                    "close":[1.2,2.2,3.2],
                    "volume":[100,200,300]
                }]}
            }],"error":null}}"#,
        )
        .unwrap();

        let series = provider().parse_series("TEST.NS", resp).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].open, 1.0);
        assert_eq!(series.bars[1].open, 3.0);
    }

    #[test]
    fn parse_empty_result_is_no_data() {
        let resp: ChartResponse =
            serde_json::from_str(r#"{"chart":{"result":[],"error":null}}"#).unwrap();
        let err = provider().parse_series("NOPE.NS", resp).unwrap_err();
        assert!(matches!(err, ForecastError::NoData(_)));
    }

    #[test]
    fn parse_provider_error_is_no_data() {
        let resp: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();
        let err = provider().parse_series("GONE.NS", resp).unwrap_err();
        assert!(err.to_string().contains("No data found"));
    }

    #[test]
    fn parse_all_null_rows_is_no_data() {
        let resp: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":[{
                "timestamp":[1700000000],
                "indicators":{"quote":[{
                    "open":[null],"high":[null],"low":[null],"close":[null],"volume":[null]
                }]}
            }],"error":null}}"#,
        )
        .unwrap();
        let err = provider().parse_series("HOLLOW.NS", resp).unwrap_err();
        assert!(matches!(err, ForecastError::NoData(_)));
    }
}
