// src/api.rs
use std::convert::Infallible;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use warp::{Filter, Rejection, Reply};

use crate::error::{handle_rejection, ApiError};
use crate::metrics;
use crate::models::{DateRange, NewsArticle, PricePoint, SummaryMetrics, Ticker};
use crate::provider::MarketData;

/// Default lookback when the request carries no explicit dates.
const DEFAULT_RANGE_DAYS: i64 = 365;

#[derive(Deserialize)]
struct DashboardQuery {
    tickers: String,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct NewsQuery {
    tickers: String,
}

/// Per-ticker outcome: either a chart-ready series with metrics, or an
/// error message for that ticker alone.
#[derive(Serialize)]
#[serde(untagged)]
pub enum TickerReport {
    Data {
        ticker: Ticker,
        series: Vec<PricePoint>,
        metrics: SummaryMetrics,
    },
    Failed {
        ticker: Ticker,
        error: String,
    },
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub reports: Vec<TickerReport>,
}

#[derive(Serialize)]
pub struct NewsReport {
    pub ticker: Ticker,
    pub articles: Vec<NewsArticle>,
}

pub fn routes(
    provider: Arc<dyn MarketData>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::html(include_str!("../static/index.html")));

    let dashboard = warp::path!("api" / "dashboard")
        .and(warp::get())
        .and(warp::query::<DashboardQuery>())
        .and(with_provider(provider.clone()))
        .and_then(dashboard_handler);

    let news = warp::path!("api" / "news")
        .and(warp::get())
        .and(warp::query::<NewsQuery>())
        .and(with_provider(provider))
        .and_then(news_handler);

    index.or(dashboard).or(news).recover(handle_rejection)
}

fn with_provider(
    provider: Arc<dyn MarketData>,
) -> impl Filter<Extract = (Arc<dyn MarketData>,), Error = Infallible> + Clone {
    warp::any().map(move || provider.clone())
}

fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DateRange, ApiError> {
    let end = end.unwrap_or_else(|| Utc::now().date_naive());
    let start = start.unwrap_or(end - Duration::days(DEFAULT_RANGE_DAYS));
    if start > end {
        return Err(ApiError::InvalidRange { start, end });
    }
    Ok(DateRange { start, end })
}

async fn dashboard_handler(
    query: DashboardQuery,
    provider: Arc<dyn MarketData>,
) -> Result<impl Reply, Rejection> {
    let tickers = Ticker::parse_list(&query.tickers)
        .map_err(|e| warp::reject::custom(ApiError::from(e)))?;
    let range = resolve_range(query.start, query.end).map_err(warp::reject::custom)?;

    let mut reports = Vec::with_capacity(tickers.len());
    for ticker in &tickers {
        reports.push(ticker_report(provider.as_ref(), ticker, range).await);
    }

    Ok(warp::reply::json(&DashboardResponse {
        start: range.start,
        end: range.end,
        reports,
    }))
}

async fn ticker_report(
    provider: &dyn MarketData,
    ticker: &Ticker,
    range: DateRange,
) -> TickerReport {
    let series = match provider.daily_series(ticker, range).await {
        Ok(series) => series,
        Err(e) => {
            error!("Failed to fetch data for {}: {}", ticker, e);
            return TickerReport::Failed {
                ticker: ticker.clone(),
                error: e.to_string(),
            };
        }
    };

    match metrics::build(&series) {
        Ok(metrics) => TickerReport::Data {
            ticker: ticker.clone(),
            series: series.points,
            metrics,
        },
        Err(_) => TickerReport::Failed {
            ticker: ticker.clone(),
            error: format!(
                "no data for {} between {} and {}",
                ticker, range.start, range.end
            ),
        },
    }
}

async fn news_handler(
    query: NewsQuery,
    provider: Arc<dyn MarketData>,
) -> Result<impl Reply, Rejection> {
    let tickers = Ticker::parse_list(&query.tickers)
        .map_err(|e| warp::reject::custom(ApiError::from(e)))?;

    let mut reports = Vec::with_capacity(tickers.len());
    for ticker in &tickers {
        // A ticker with no news still gets a report; failures degrade to
        // an empty article list rather than failing the request.
        let articles = match provider.news(ticker).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Failed to fetch news for {}: {}", ticker, e);
                Vec::new()
            }
        };
        reports.push(NewsReport {
            ticker: ticker.clone(),
            articles,
        });
    }

    Ok(warp::reply::json(&reports))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_trailing_year() {
        let range = resolve_range(None, None).unwrap();
        assert_eq!(range.end - range.start, Duration::days(DEFAULT_RANGE_DAYS));
    }

    #[test]
    fn explicit_range_is_kept() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let range = resolve_range(Some(start), Some(end)).unwrap();
        assert_eq!(range, DateRange { start, end });
    }

    #[test]
    fn inverted_range_is_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            resolve_range(Some(start), Some(end)),
            Err(ApiError::InvalidRange { .. })
        ));
    }

    #[test]
    fn single_bound_defaults_the_other() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let range = resolve_range(None, Some(end)).unwrap();
        assert_eq!(range.end, end);
        assert_eq!(range.start, end - Duration::days(DEFAULT_RANGE_DAYS));
    }
}
