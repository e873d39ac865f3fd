//! Per-feature forecasting stack
//!
//! Scaling and windowing of the raw series, the recurrent sequence model,
//! its training loop, the autoregressive rollout, and the consolidation
//! network that blends the per-feature forecasts.

mod consolidator;
mod model;
mod roller;
mod scaler;
mod trainer;
mod window;


pub use consolidator::Consolidator;
pub use model::SequenceForecaster;
pub use roller::roll;
pub use scaler::MinMaxScaler;
pub use trainer::Trainer;
pub use window::{make_windows, require_windows, WindowedDataset};
