use analysis_core::{AnalysisError, MarketHistory, PriceSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::*;

pub const RSI_PERIOD: usize = 14;
pub const SMA_SHORT_PERIOD: usize = 20;
pub const SMA_LONG_PERIOD: usize = 50;

/// Indicator series aligned with the bars they were computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub rsi14: Vec<Option<f64>>,
    pub sma20: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
    pub vwap: Vec<Option<f64>>,
}

/// Indicator values at the most recent bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: f64,
    pub rsi14: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub vwap: Option<f64>,
}

/// Period-over-period percentage changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub daily_change: f64,
    pub weekly_change: f64,
    pub monthly_change: f64,
}

#[derive(Default)]
pub struct TechnicalAnalysisEngine;

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn indicators(&self, series: &PriceSeries) -> IndicatorSet {
        let closes = series.closes();

        IndicatorSet {
            rsi14: rsi(&closes, RSI_PERIOD),
            sma20: sma(&closes, SMA_SHORT_PERIOD),
            sma50: sma(&closes, SMA_LONG_PERIOD),
            vwap: vwap(&series.bars),
        }
    }

    /// Latest close plus the last value of every indicator
    pub fn snapshot(&self, series: &PriceSeries) -> Result<IndicatorSnapshot, AnalysisError> {
        let price = series.last_close().ok_or_else(|| {
            AnalysisError::InsufficientData(format!("{} series has no bars", series.kind.name()))
        })?;

        let set = self.indicators(series);
        let last = |values: &[Option<f64>]| values.last().copied().flatten();

        let snapshot = IndicatorSnapshot {
            price,
            rsi14: last(&set.rsi14),
            sma20: last(&set.sma20),
            sma50: last(&set.sma50),
            vwap: last(&set.vwap),
        };
        debug!(bars = series.len(), ?snapshot, "computed indicator snapshot");
        Ok(snapshot)
    }

    pub fn performance(&self, history: &MarketHistory) -> Result<PerformanceSnapshot, AnalysisError> {
        Ok(PerformanceSnapshot {
            daily_change: self.change(&history.daily)?,
            weekly_change: self.change(&history.weekly)?,
            monthly_change: self.change(&history.monthly)?,
        })
    }

    fn change(&self, series: &PriceSeries) -> Result<f64, AnalysisError> {
        pct_change(&series.closes()).map_err(|e| match e {
            AnalysisError::InsufficientData(msg) => {
                AnalysisError::InsufficientData(format!("{} series: {}", series.kind.name(), msg))
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{Bar, SeriesKind};
    use chrono::Utc;

    fn series(kind: SeriesKind, closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .map(|&close| Bar {
                timestamp: Utc::now(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000.0,
            })
            .collect();
        PriceSeries::new(kind, bars)
    }

    #[test]
    fn test_indicators_are_aligned() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let set = TechnicalAnalysisEngine::new().indicators(&series(SeriesKind::Daily, &closes));

        assert_eq!(set.rsi14.len(), 60);
        assert_eq!(set.sma20.len(), 60);
        assert_eq!(set.sma50.len(), 60);
        assert_eq!(set.vwap.len(), 60);
        assert!(set.sma50[48].is_none());
        assert!(set.sma50[49].is_some());
    }

    #[test]
    fn test_snapshot_with_two_bars() {
        let engine = TechnicalAnalysisEngine::new();
        let snap = engine.snapshot(&series(SeriesKind::Daily, &[100.0, 105.0])).unwrap();

        assert_eq!(snap.price, 105.0);
        assert!(snap.rsi14.is_none());
        assert!(snap.sma20.is_none());
        assert!(snap.sma50.is_none());
        assert!((snap.vwap.unwrap() - 102.5).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_empty_series() {
        let engine = TechnicalAnalysisEngine::new();
        let err = engine.snapshot(&series(SeriesKind::Daily, &[])).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));
    }

    #[test]
    fn test_performance() {
        let history = MarketHistory {
            daily: series(SeriesKind::Daily, &[100.0, 105.0]),
            weekly: series(SeriesKind::Weekly, &[100.0, 110.0]),
            monthly: series(SeriesKind::Monthly, &[110.0, 100.0]),
        };
        let perf = TechnicalAnalysisEngine::new().performance(&history).unwrap();

        assert_eq!(format!("{:.2}", perf.daily_change), "5.00");
        assert_eq!(format!("{:.2}", perf.weekly_change), "10.00");
        assert_eq!(format!("{:.2}", perf.monthly_change), "-9.09");
    }

    #[test]
    fn test_performance_short_weekly_series() {
        let history = MarketHistory {
            daily: series(SeriesKind::Daily, &[100.0, 105.0]),
            weekly: series(SeriesKind::Weekly, &[100.0]),
            monthly: series(SeriesKind::Monthly, &[100.0, 101.0]),
        };
        let err = TechnicalAnalysisEngine::new().performance(&history).unwrap_err();

        match err {
            AnalysisError::InsufficientData(msg) => assert!(msg.starts_with("weekly series")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
