//! On-demand stock price forecasting service
//!
//! Trains per-feature LSTM models per request and serves consolidated
//! multi-day forecasts over HTTP.

use clap::{Parser, Subcommand};
use stockcast::{
    config::Config,
    pipeline::{ForecastRequest, Pipeline},
    provider::YahooProvider,
    server,
};
use candle_core::Device;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stockcast")]
#[command(about = "On-demand LSTM stock price forecasting service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP forecast server
    Serve,
    /// Run one forecast from the command line and print the result
    Predict {
        /// Ticker symbol (exchange suffix is appended automatically)
        ticker: String,
        /// Days to forecast
        #[arg(short, long, default_value = "1")]
        days: usize,
        /// History period to train on
        #[arg(short, long, default_value = "max")]
        period: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    // Accelerator selection happens once; everything downstream receives
    // the device explicitly.
    let device = Device::cuda_if_available(0).unwrap_or(Device::Cpu);
    tracing::info!("using device: {:?}", device);

    let provider = Arc::new(YahooProvider::new(&config.provider)?);
    let pipeline = Arc::new(Pipeline::new(provider, &config, device));

    match cli.command {
        Commands::Serve => {
            server::serve(pipeline, &config.server.host, config.server.port).await
        }
        Commands::Predict { ticker, days, period } => {
            let response = pipeline
                .predict(ForecastRequest { ticker, days, period })
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
