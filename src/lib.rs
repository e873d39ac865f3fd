//! On-demand stock price forecasting service
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum) → Pipeline → Provider (OHLCV history)
//!                  │
//!                  ├─ per feature: Scaler → Windows → Trainer → Roller
//!                  └─ Consolidator (feed-forward blend) → response
//! ```
//!
//! Models are trained inside the request and discarded with it; nothing
//! is persisted across calls.

pub mod config;
pub mod error;
pub mod forecast;
pub mod pipeline;
pub mod provider;
pub mod server;
pub mod types;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod integration_tests;
