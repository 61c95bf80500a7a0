// src/error.rs
use std::convert::Infallible;

use chrono::NaiveDate;
use log::error;
use serde_json::json;
use thiserror::Error;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::models::TickerError;

/// Request-level errors that reject the whole HTTP request.
///
/// Per-ticker failures never become an `ApiError`; they are reported inside
/// the response body so the other tickers still render.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidTicker(#[from] TickerError),
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl warp::reject::Reject for ApiError {}

/// Converts rejections into JSON error bodies.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(api_error) = err.find::<ApiError>() {
        (StatusCode::BAD_REQUEST, api_error.to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (
            StatusCode::BAD_REQUEST,
            "invalid query parameters; expected tickers=<list> with optional start/end dates (YYYY-MM-DD)".to_string(),
        )
    } else if let Some(e) = err.find::<warp::reject::MethodNotAllowed>() {
        (StatusCode::METHOD_NOT_ALLOWED, e.to_string())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    };

    let body = warp::reply::json(&json!({ "error": message }));
    Ok(warp::reply::with_status(body, status))
}
