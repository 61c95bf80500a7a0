// src/main.rs
use std::env;
use std::sync::Arc;

use env_logger::Builder;
use log::{info, warn, LevelFilter};
use reqwest::Client;

use stock_dashboard::api;
use stock_dashboard::provider::{AlphaVantage, MarketData};

#[tokio::main]
async fn main() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    let api_key = env::var("ALPHAVANTAGE_API_KEY").unwrap_or_else(|_| {
        warn!("ALPHAVANTAGE_API_KEY not set, using the provider's demo key");
        "demo".to_string()
    });
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3030);

    let provider: Arc<dyn MarketData> = Arc::new(AlphaVantage::new(Client::new(), api_key));
    let routes = api::routes(provider);

    info!("Starting the stock dashboard...");
    info!("Server running on http://127.0.0.1:{}", port);
    warp::serve(routes).run(([127, 0, 0, 1], port)).await;
}
