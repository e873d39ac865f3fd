//! Core data types: daily bars and the five OHLCV features
//!
//! All series are request-scoped: fetched fresh, consumed, discarded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The five daily trading metrics, one sequence model is trained per each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Feature {
    /// All features, in the column order the consolidator expects
    pub const ALL: [Feature; 5] = [
        Feature::Open,
        Feature::High,
        Feature::Low,
        Feature::Close,
        Feature::Volume,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Open => "Open",
            Feature::High => "High",
            Feature::Low => "Low",
            Feature::Close => "Close",
            Feature::Volume => "Volume",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One daily OHLCV bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Value of a single named feature
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Open => self.open,
            Feature::High => self.high,
            Feature::Low => self.low,
            Feature::Close => self.close,
            Feature::Volume => self.volume,
        }
    }
}

/// Ordered history of daily bars for one ticker
///
/// Invariant: bars are in strictly increasing timestamp order and carry
/// no missing values (rows with gaps are dropped at fetch time).
#[derive(Debug, Clone, Default)]
pub struct RawSeries {
    pub bars: Vec<Bar>,
}

impl RawSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Extract one feature as a plain numeric column
    pub fn feature_series(&self, feature: Feature) -> Vec<f64> {
        self.bars.iter().map(|b| b.value(feature)).collect()
    }
}
