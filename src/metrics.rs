// src/metrics.rs
use thiserror::Error;

use crate::models::{PriceSeries, SummaryMetrics};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("price series is empty")]
pub struct EmptySeries;

/// Computes summary metrics from a price series in a single pass.
///
/// The series must be ordered by date ascending; the first point supplies
/// `first_price` and the last supplies `latest_price`. Fails only when the
/// series has no points.
pub fn build(series: &PriceSeries) -> Result<SummaryMetrics, EmptySeries> {
    let mut points = series.points.iter();
    let first = points.next().ok_or(EmptySeries)?;

    let mut latest = first.close;
    let mut min = first.close;
    let mut max = first.close;
    let mut sum = first.close;

    for point in points {
        latest = point.close;
        min = min.min(point.close);
        max = max.max(point.close);
        sum += point.close;
    }

    let absolute_change = latest - first.close;
    let percent_change = if first.close == 0.0 {
        None
    } else {
        Some(absolute_change / first.close * 100.0)
    };

    Ok(SummaryMetrics {
        latest_price: latest,
        first_price: first.close,
        absolute_change,
        percent_change,
        min_price: min,
        max_price: max,
        mean_price: sum / series.points.len() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PricePoint, Ticker};
    use chrono::NaiveDate;

    const TOLERANCE: f64 = 1e-9;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries {
            ticker: Ticker::parse("AAPL").unwrap(),
            points: closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PricePoint {
                    date: start + chrono::Duration::days(i as i64),
                    close,
                })
                .collect(),
        }
    }

    #[test]
    fn empty_series_is_an_error() {
        assert_eq!(build(&series(&[])), Err(EmptySeries));
    }

    #[test]
    fn three_point_series() {
        let metrics = build(&series(&[100.0, 110.0, 90.0])).unwrap();
        assert_eq!(metrics.latest_price, 90.0);
        assert_eq!(metrics.first_price, 100.0);
        assert_eq!(metrics.min_price, 90.0);
        assert_eq!(metrics.max_price, 110.0);
        assert!((metrics.mean_price - 100.0).abs() < TOLERANCE);
        assert_eq!(metrics.absolute_change, -10.0);
        assert!((metrics.percent_change.unwrap() + 10.0).abs() < TOLERANCE);
    }

    #[test]
    fn single_point_series() {
        let metrics = build(&series(&[50.0])).unwrap();
        assert_eq!(metrics.latest_price, 50.0);
        assert_eq!(metrics.first_price, 50.0);
        assert_eq!(metrics.min_price, 50.0);
        assert_eq!(metrics.max_price, 50.0);
        assert_eq!(metrics.mean_price, 50.0);
        assert_eq!(metrics.absolute_change, 0.0);
        assert_eq!(metrics.percent_change, Some(0.0));
    }

    #[test]
    fn percent_change_unavailable_when_first_price_is_zero() {
        let metrics = build(&series(&[0.0, 25.0])).unwrap();
        assert_eq!(metrics.percent_change, None);
        assert_eq!(metrics.absolute_change, 25.0);
    }

    #[test]
    fn every_close_is_within_min_max() {
        let closes = [412.5, 398.0, 405.25, 441.0, 399.9, 420.0];
        let metrics = build(&series(&closes)).unwrap();
        for close in closes {
            assert!(metrics.min_price <= close && close <= metrics.max_price);
        }
    }

    #[test]
    fn mean_matches_arithmetic_mean() {
        let closes = [10.0, 20.0, 30.0, 40.0];
        let metrics = build(&series(&closes)).unwrap();
        let expected = closes.iter().sum::<f64>() / closes.len() as f64;
        assert!((metrics.mean_price - expected).abs() < TOLERANCE);
    }
}
