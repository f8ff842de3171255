//! Indicator primitives over close/volume slices.
//!
//! Every series returned here is aligned index-for-index with its input;
//! positions without enough history hold `None`.

use analysis_core::{AnalysisError, Bar};

/// Simple Moving Average over a trailing window
pub fn sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period {
        return result;
    }

    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result[i] = Some(sum / period as f64);
    }
    result
}

/// Relative Strength Index using trailing simple means of gains and losses.
///
/// The first bar contributes a zero delta, so the first value lands at
/// index `period - 1`.
pub fn rsi(data: &[f64], period: usize) -> Vec<Option<f64>> {
    if data.is_empty() {
        return vec![];
    }

    let mut gains = Vec::with_capacity(data.len());
    let mut losses = Vec::with_capacity(data.len());
    gains.push(0.0);
    losses.push(0.0);

    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gain = sma(&gains, period);
    let avg_loss = sma(&losses, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => Some(rsi_from_averages(gain, loss)),
            _ => None,
        })
        .collect()
}

/// RSI from average gain/loss. A window with no losses is pinned at 100,
/// a window with no movement at all at 50.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Volume-Weighted Average Price, cumulative from the first bar
pub fn vwap(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut vwap_values = Vec::with_capacity(bars.len());
    let mut cumulative_pv = 0.0;
    let mut cumulative_volume = 0.0;

    for bar in bars {
        cumulative_pv += bar.close * bar.volume;
        cumulative_volume += bar.volume;

        let vwap = if cumulative_volume > 0.0 {
            Some(cumulative_pv / cumulative_volume)
        } else {
            None
        };

        vwap_values.push(vwap);
    }

    vwap_values
}

/// Percent change between the last two closes
pub fn pct_change(closes: &[f64]) -> Result<f64, AnalysisError> {
    let [.., previous, latest] = closes else {
        return Err(AnalysisError::InsufficientData(format!(
            "need at least 2 bars for a percentage change, got {}",
            closes.len()
        )));
    };

    if *previous == 0.0 {
        return Err(AnalysisError::InvalidData(
            "previous close is zero".to_string(),
        ));
    }

    Ok((latest / previous - 1.0) * 100.0)
}
