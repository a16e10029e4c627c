use chrono::NaiveDate;
use proptest::prelude::*;
use signal_stock::config::{ModelConfig, SimulationConfig};
use signal_stock::engine::normalizer::reputation_multiplier;
use signal_stock::engine::scorer::momentum_score;
use signal_stock::{compute_stock, ActivityRecord, ChangeDirection, StockEngine, UserProfile};

fn days_from(counts: &[u32]) -> Vec<ActivityRecord> {
    let start = NaiveDate::from_ymd_opt(2023, 10, 1).unwrap();
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| ActivityRecord::new(start + chrono::Duration::days(i as i64), c))
        .collect()
}

fn profile(counts: &[u32], stars: u64, top: u64, followers: u64) -> UserProfile {
    UserProfile::new("prop")
        .with_days(days_from(counts))
        .with_stars(stars, top)
        .with_followers(followers)
}

/// Mostly idle calendars with bursts, like real contribution graphs
fn activity() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(
        prop_oneof![
            6 => Just(0u32),
            3 => 1u32..8,
            1 => 8u32..120,
        ],
        0..400,
    )
}

proptest! {
    #[test]
    fn candles_are_continuous_and_floored(
        counts in activity(),
        stars in 0u64..200_000,
        followers in 0u64..50_000,
    ) {
        let result = compute_stock(&profile(&counts, stars, stars / 2, followers));
        for candle in &result.candlesticks {
            prop_assert!(candle.close >= 1.0);
            prop_assert!(candle.open >= 1.0);
            prop_assert!(candle.high >= candle.open.max(candle.close));
            prop_assert!(candle.low <= candle.open.min(candle.close));
            prop_assert_eq!(candle.is_green, candle.volume > 0);
        }
        for pair in result.candlesticks.windows(2) {
            prop_assert_eq!(pair[0].close, pair[1].open);
            prop_assert!(pair[0].date < pair[1].date);
        }
        if let Some(last) = result.candlesticks.last() {
            prop_assert_eq!(result.price, last.close);
        }
    }

    #[test]
    fn scores_stay_in_range(
        counts in activity(),
        stars in 0u64..10_000_000,
        top in 0u64..10_000_000,
        followers in 0u64..10_000_000,
        total_override in prop::option::of(0u64..100_000),
    ) {
        let mut p = profile(&counts, stars, top, followers);
        if let Some(total) = total_override {
            p = p.with_contributions_total(total);
        }
        let result = compute_stock(&p);
        for score in result.metrics.as_array() {
            prop_assert!(score.is_finite());
            prop_assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
        }
        prop_assert!(result.change.is_finite());
    }

    #[test]
    fn direction_follows_change(counts in activity()) {
        let result = compute_stock(&profile(&counts, 0, 0, 0));
        let raw = match result.candlesticks.as_slice() {
            [.., previous, last] => (last.close - previous.close) / previous.close * 100.0,
            _ => 0.0,
        };
        let expected = if raw > 0.1 {
            ChangeDirection::Up
        } else if raw < -0.1 {
            ChangeDirection::Down
        } else {
            ChangeDirection::Neutral
        };
        prop_assert_eq!(result.change_direction, expected);
    }

    #[test]
    fn computation_is_deterministic(counts in activity(), stars in 0u64..5000, followers in 0u64..5000) {
        let p = profile(&counts, stars, 0, followers);
        let engine = StockEngine::new(ModelConfig::default());
        let first = serde_json::to_string(&engine.compute(&p)).unwrap();
        let second = serde_json::to_string(&engine.compute(&p)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn reputation_multiplier_is_bounded(stars in any::<u32>(), followers in any::<u32>()) {
        let m = reputation_multiplier(stars as u64, followers as u64, &SimulationConfig::default());
        prop_assert!((1.0..=1.25).contains(&m));
    }

    #[test]
    fn equal_windows_score_fifty(level in 1u32..50) {
        let counts = vec![level; 60];
        prop_assert_eq!(momentum_score(&days_from(&counts), &Default::default()), 50.0);
    }
}

#[test]
fn idle_year_is_a_flat_dollar_week() {
    let result = compute_stock(&profile(&[0; 365], 10, 10, 10));
    assert_eq!(result.candlesticks.len(), 7);
    for candle in &result.candlesticks {
        assert_eq!((candle.open, candle.high, candle.low, candle.close), (1.0, 1.0, 1.0, 1.0));
        assert_eq!(candle.volume, 0);
        assert!(!candle.is_green);
    }
    assert_eq!(result.price, 1.0);
    assert_eq!(result.change_direction, ChangeDirection::Neutral);
}

#[test]
fn empty_calendar_does_not_panic() {
    let result = compute_stock(&UserProfile::new("nobody"));
    assert!(result.candlesticks.is_empty());
    assert_eq!(result.price, 1.0);
    assert_eq!(result.change, 0.0);
    assert_eq!(result.metrics.momentum, 50.0);
    assert_eq!(result.metrics.consistency, 0.0);
}

#[test]
fn small_rise_reported_as_point_one_is_up() {
    let counts = [
        2, 0, 0, 0, 1, 3, 3, 0, 0, 0, 0, 0, 0, 3, 0, 2, 3, 0, 0, 2, 0, 3, 2, 0, 0, 0, 0, 1, 0, 0, 2, 0,
    ];
    let result = compute_stock(&profile(&counts, 0, 0, 0));
    let n = result.candlesticks.len();
    let (previous, last) = (result.candlesticks[n - 2].close, result.candlesticks[n - 1].close);
    assert!(last > previous);
    assert_eq!(result.change, 0.1);
    assert_eq!(result.change_direction, ChangeDirection::Up);
}

#[test]
fn active_year_climbs() {
    let counts: Vec<u32> = (0..365).map(|i| if i % 7 < 5 { 6 } else { 0 }).collect();
    let result = compute_stock(&profile(&counts, 2000, 900, 300));
    let first = &result.candlesticks[0];
    assert!(result.price > first.open * 2.0, "price {} vs ipo {}", result.price, first.open);
}
