use crate::config::SimulationConfig;
use crate::models::stock::{Candle, ChangeDirection, MetricScores, StockResult};
use crate::util;

/// Unrounded percentage move between the last two closes, 0 with fewer than two candles
pub fn daily_change(candles: &[Candle]) -> f64 {
    match candles {
        [.., previous, last] if previous.close > 0.0 => {
            (last.close - previous.close) / previous.close * 100.0
        }
        _ => 0.0,
    }
}

pub fn compose(metrics: MetricScores, candlesticks: Vec<Candle>, config: &SimulationConfig) -> StockResult {
    // 没有任何日数据时按地板价报价
    let price = candlesticks
        .last()
        .map(|c| c.close)
        .unwrap_or(config.price_floor);
    // 方向按未舍入的涨跌幅判断，只有展示的 change 保留两位小数
    let raw_change = daily_change(&candlesticks);

    StockResult {
        price: util::round2(price),
        change: util::round2(raw_change),
        change_direction: ChangeDirection::from_change(raw_change),
        metrics,
        candlesticks,
    }
}
