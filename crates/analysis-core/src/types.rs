use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Granularity of a fetched price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    /// 1 month of daily bars
    Daily,
    /// 1 year of weekly bars
    Weekly,
    /// 5 years of monthly bars
    Monthly,
}

impl SeriesKind {
    /// Lookback range and bar interval, in Yahoo chart notation
    pub fn range_and_interval(&self) -> (&'static str, &'static str) {
        match self {
            SeriesKind::Daily => ("1mo", "1d"),
            SeriesKind::Weekly => ("1y", "1wk"),
            SeriesKind::Monthly => ("5y", "1mo"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SeriesKind::Daily => "daily",
            SeriesKind::Weekly => "weekly",
            SeriesKind::Monthly => "monthly",
        }
    }
}

/// Chronological bars of one granularity, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub kind: SeriesKind,
    pub bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(kind: SeriesKind, bars: Vec<Bar>) -> Self {
        Self { kind, bars }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// The three series fetched per ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketHistory {
    pub daily: PriceSeries,
    pub weekly: PriceSeries,
    pub monthly: PriceSeries,
}

/// Company metadata.
///
/// Text and ratio fields stay optional and render as `N/A`. Fields the data
/// source reports as zero when absent are resolved at construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub sector: Option<String>,
    pub market_cap: f64,
    pub fifty_two_week_low: f64,
    pub fifty_two_week_high: f64,
    pub volume: u64,
    pub average_volume: u64,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub trailing_eps: f64,
    pub peg_ratio: Option<f64>,
}

/// A disclosed insider transaction, kept as scraped text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsiderTrade {
    pub date: String,
    pub insider_name: String,
    pub title: String,
    pub trade_type: String,
    pub price: String,
    pub quantity: String,
    pub shares_owned: String,
    pub ownership_change: String,
    pub value: String,
}

/// Model output before and after styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub raw: String,
    pub formatted: String,
}
