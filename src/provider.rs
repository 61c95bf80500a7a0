// src/provider.rs
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;
use log::info;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{DateRange, NewsArticle, PricePoint, PriceSeries, Ticker};

const MAX_NEWS_ARTICLES: usize = 5;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to market-data provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("market-data provider returned HTTP {status}")]
    Status { status: u16 },
    #[error("could not parse provider response: {0}")]
    Malformed(String),
    #[error("provider does not recognize ticker '{ticker}'")]
    UnknownSymbol { ticker: Ticker },
    #[error("provider rate limit reached: {message}")]
    RateLimited { message: String },
}

pub type ProviderFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Typed client interface to the external market-data provider.
///
/// Returned series are ordered by date ascending with unique dates, and
/// contain only points inside the requested range. A series may be empty
/// when the provider has no data for the range.
pub trait MarketData: Send + Sync {
    fn daily_series<'a>(
        &'a self,
        ticker: &'a Ticker,
        range: DateRange,
    ) -> ProviderFuture<'a, PriceSeries>;

    fn news<'a>(&'a self, ticker: &'a Ticker) -> ProviderFuture<'a, Vec<NewsArticle>>;
}

#[derive(Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

#[derive(Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct NewsFeedItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    source: String,
}

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(default)]
    feed: Vec<NewsFeedItem>,
}

/// Alpha Vantage market-data client.
pub struct AlphaVantage {
    client: Client,
    api_key: String,
}

impl AlphaVantage {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    async fn get_body(&self, url: &str) -> Result<String, ProviderError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

impl MarketData for AlphaVantage {
    fn daily_series<'a>(
        &'a self,
        ticker: &'a Ticker,
        range: DateRange,
    ) -> ProviderFuture<'a, PriceSeries> {
        Box::pin(async move {
            let url = format!(
                "https://www.alphavantage.co/query?function=TIME_SERIES_DAILY&symbol={}&outputsize=full&apikey={}",
                ticker, self.api_key
            );
            info!("Fetching daily series for {} from provider", ticker);
            let body = self.get_body(&url).await?;
            let series = parse_daily_series(ticker, &body, range)?;
            info!(
                "Provider returned {} points for {} in range {}..={}",
                series.points.len(),
                ticker,
                range.start,
                range.end
            );
            Ok(series)
        })
    }

    fn news<'a>(&'a self, ticker: &'a Ticker) -> ProviderFuture<'a, Vec<NewsArticle>> {
        Box::pin(async move {
            let url = format!(
                "https://www.alphavantage.co/query?function=NEWS_SENTIMENT&tickers={}&limit={}&apikey={}",
                ticker, MAX_NEWS_ARTICLES, self.api_key
            );
            info!("Fetching news for {} from provider", ticker);
            let body = self.get_body(&url).await?;
            parse_news(&body)
        })
    }
}

/// Parses a `TIME_SERIES_DAILY` response body into an ascending series,
/// keeping only points inside the requested range.
pub fn parse_daily_series(
    ticker: &Ticker,
    body: &str,
    range: DateRange,
) -> Result<PriceSeries, ProviderError> {
    let response: DailyResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    if response.error_message.is_some() {
        return Err(ProviderError::UnknownSymbol {
            ticker: ticker.clone(),
        });
    }
    if let Some(message) = response.note.or(response.information) {
        return Err(ProviderError::RateLimited { message });
    }

    let time_series = response.time_series.ok_or_else(|| {
        ProviderError::Malformed("response has no 'Time Series (Daily)' field".to_string())
    })?;

    let mut points = Vec::new();
    for (date_str, bar) in time_series {
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|_| ProviderError::Malformed(format!("bad date '{date_str}'")))?;
        if !range.contains(date) {
            continue;
        }
        let close: f64 = bar
            .close
            .parse()
            .map_err(|_| ProviderError::Malformed(format!("bad close '{}'", bar.close)))?;
        points.push(PricePoint { date, close });
    }
    points.sort_by_key(|p| p.date);

    Ok(PriceSeries {
        ticker: ticker.clone(),
        points,
    })
}

/// Parses a `NEWS_SENTIMENT` response body, keeping at most five articles.
/// A response without a feed yields an empty list rather than an error.
pub fn parse_news(body: &str) -> Result<Vec<NewsArticle>, ProviderError> {
    let response: NewsResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    Ok(response
        .feed
        .into_iter()
        .take(MAX_NEWS_ARTICLES)
        .map(|item| NewsArticle {
            title: if item.title.trim().is_empty() {
                "Untitled".to_string()
            } else {
                item.title
            },
            url: item.url,
            source: if item.source.trim().is_empty() {
                "Financial News".to_string()
            } else {
                item.source
            },
        })
        .collect())
}
