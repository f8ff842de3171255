#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use analysis_core::{AnalysisError, Bar};
    use chrono::Utc;

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    // Deterministic zig-zag series long enough for every window
    fn long_prices(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    fn bars_from(closes: &[f64], volumes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| Bar {
                timestamp: Utc::now() - chrono::Duration::days((closes.len() - i) as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume,
            })
            .collect()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert!((result[2].unwrap() - 2.0).abs() < 0.001); // (1+2+3)/3 = 2
        assert!((result[3].unwrap() - 3.0).abs() < 0.001); // (2+3+4)/3 = 3
        assert!((result[4].unwrap() - 4.0).abs() < 0.001); // (3+4+5)/3 = 4
    }

    #[test]
    fn test_sma_insufficient_data() {
        let data = vec![1.0, 2.0];
        let result = sma(&data, 5);

        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_sma_trailing_mean_at_last_index() {
        let prices = long_prices(60);

        let sma20 = sma(&prices, 20);
        let sma50 = sma(&prices, 50);

        let expected20 = prices[40..].iter().sum::<f64>() / 20.0;
        let expected50 = prices[10..].iter().sum::<f64>() / 50.0;
        assert!((sma20[59].unwrap() - expected20).abs() < 1e-9);
        assert!((sma50[59].unwrap() - expected50).abs() < 1e-9);
    }

    #[test]
    fn test_sma_does_not_mutate_input() {
        let prices = sample_prices();
        let copy = prices.clone();
        let _ = sma(&prices, 5);
        let _ = rsi(&prices, 14);
        assert_eq!(prices, copy);
    }

    #[test]
    fn test_rsi_first_defined_index() {
        let prices = sample_prices();
        let result = rsi(&prices, 14);

        assert_eq!(result.len(), prices.len());
        assert!(result[..13].iter().all(|v| v.is_none()));
        assert!(result[13..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn test_rsi_range() {
        let prices = long_prices(80);
        let result = rsi(&prices, 14);

        for value in result.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_matches_simple_means() {
        let prices = sample_prices();
        let result = rsi(&prices, 14);

        // Window ending at the last bar covers deltas 6..=19
        let (mut gain, mut loss) = (0.0, 0.0);
        for i in 6..prices.len() {
            let change = prices[i] - prices[i - 1];
            if change > 0.0 {
                gain += change;
            } else {
                loss -= change;
            }
        }
        let expected = 100.0 - 100.0 / (1.0 + (gain / 14.0) / (loss / 14.0));

        assert!((result[19].unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_all_gains_is_clamped() {
        let uptrend: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&uptrend, 14);

        assert_eq!(result.last().copied().flatten(), Some(100.0));
    }

    #[test]
    fn test_rsi_flat_window_is_neutral() {
        let flat = vec![100.0; 20];
        let result = rsi(&flat, 14);

        assert_eq!(result.last().copied().flatten(), Some(50.0));
    }

    #[test]
    fn test_rsi_all_losses_is_zero() {
        let downtrend: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let result = rsi(&downtrend, 14);

        assert_eq!(result.last().copied().flatten(), Some(0.0));
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let data = vec![1.0, 2.0, 3.0];
        let result = rsi(&data, 14);

        assert_eq!(result, vec![None, None, None]);
    }

    #[test]
    fn test_vwap_is_cumulative() {
        let closes = [10.0, 20.0, 30.0];
        let volumes = [1.0, 2.0, 3.0];
        let result = vwap(&bars_from(&closes, &volumes));

        assert!((result[0].unwrap() - 10.0).abs() < 1e-9);
        assert!((result[1].unwrap() - 50.0 / 3.0).abs() < 1e-9);
        assert!((result[2].unwrap() - 140.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_vwap_bounded_by_close_range() {
        let closes = long_prices(40);
        let volumes: Vec<f64> = (0..40).map(|i| 1_000.0 + (i * 37 % 11) as f64 * 100.0).collect();
        let result = vwap(&bars_from(&closes, &volumes));

        for (i, value) in result.iter().enumerate() {
            let window = &closes[..=i];
            let min = window.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let v = value.unwrap();
            assert!(v >= min - 1e-9 && v <= max + 1e-9);
        }
    }

    #[test]
    fn test_vwap_with_zero_volume() {
        let closes = [10.0, 20.0];
        let volumes = [0.0, 5.0];
        let result = vwap(&bars_from(&closes, &volumes));

        assert!(result[0].is_none());
        assert!((result[1].unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_pct_change_up_and_down() {
        assert_eq!(format!("{:.2}", pct_change(&[100.0, 110.0]).unwrap()), "10.00");
        assert_eq!(format!("{:.2}", pct_change(&[110.0, 100.0]).unwrap()), "-9.09");
    }

    #[test]
    fn test_pct_change_uses_last_two_bars() {
        let change = pct_change(&[1.0, 50.0, 100.0, 105.0]).unwrap();
        assert!((change - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_pct_change_insufficient_data() {
        assert!(matches!(pct_change(&[100.0]), Err(AnalysisError::InsufficientData(_))));
        assert!(matches!(pct_change(&[]), Err(AnalysisError::InsufficientData(_))));
    }

    #[test]
    fn test_pct_change_zero_previous_close() {
        assert!(matches!(pct_change(&[0.0, 1.0]), Err(AnalysisError::InvalidData(_))));
    }
}
