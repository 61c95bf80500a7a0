// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_TICKER_LEN: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker symbol cannot be empty")]
    Empty,
    #[error("ticker symbol '{symbol}' is longer than 10 characters")]
    TooLong { symbol: String },
    #[error("ticker symbol '{symbol}' must start with a letter")]
    InvalidStart { symbol: String },
    #[error("ticker symbol '{symbol}' contains invalid character '{ch}'")]
    InvalidChar { symbol: String, ch: char },
}

/// A validated stock ticker symbol, always upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Parses a single symbol: trims, upper-cases, and validates.
    ///
    /// A symbol is 1 to 10 characters, starts with an ASCII letter, and
    /// contains only ASCII letters plus `.` and `-` (e.g. `BRK.B`).
    pub fn parse(input: &str) -> Result<Self, TickerError> {
        let symbol = input.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(TickerError::Empty);
        }
        if symbol.len() > MAX_TICKER_LEN {
            return Err(TickerError::TooLong { symbol });
        }
        let first = symbol.chars().next().unwrap_or_default();
        if !first.is_ascii_alphabetic() {
            return Err(TickerError::InvalidStart { symbol });
        }
        if let Some(ch) = symbol
            .chars()
            .find(|c| !c.is_ascii_alphabetic() && *c != '.' && *c != '-')
        {
            return Err(TickerError::InvalidChar { symbol, ch });
        }
        Ok(Ticker(symbol))
    }

    /// Parses a comma- or whitespace-separated list of symbols.
    ///
    /// Duplicates are dropped, keeping the first occurrence. Errors if the
    /// input contains no symbols at all or any symbol is malformed.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, TickerError> {
        let mut tickers: Vec<Ticker> = Vec::new();
        for token in input.split(|c: char| c == ',' || c.is_ascii_whitespace()) {
            if token.trim().is_empty() {
                continue;
            }
            let ticker = Ticker::parse(token)?;
            if !tickers.contains(&ticker) {
                tickers.push(ticker);
            }
        }
        if tickers.is_empty() {
            return Err(TickerError::Empty);
        }
        Ok(tickers)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive calendar date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ordered daily close series for one ticker, dates ascending and unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    pub ticker: Ticker,
    pub points: Vec<PricePoint>,
}

/// Summary statistics derived from one [`PriceSeries`].
///
/// `percent_change` is expressed in percent and is `None` when the first
/// close is zero, in which case no meaningful percentage exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub latest_price: f64,
    pub first_price: f64,
    pub absolute_change: f64,
    pub percent_change: Option<f64>,
    pub min_price: f64,
    pub max_price: f64,
    pub mean_price: f64,
}

/// A news article headline for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    pub source: String,
}
