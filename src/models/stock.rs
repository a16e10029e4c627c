use chrono::NaiveDate;
use serde::Serialize;

use super::profile::UserSummary;

/// 日K线
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u32,  // 当天贡献数
    pub is_green: bool,
}

impl Candle {
    /// Flat $1 candle used when an account never contributed
    pub fn flat(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 0,
            is_green: false,
        }
    }
}

/// Five display scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricScores {
    pub volume: f64,
    pub consistency: f64,
    pub recognition: f64,
    pub social_proof: f64,
    pub momentum: f64,
}

impl MetricScores {
    pub fn as_array(&self) -> [f64; 5] {
        [self.volume, self.consistency, self.recognition, self.social_proof, self.momentum]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Up,
    Down,
    Neutral,
}

impl ChangeDirection {
    /// ±0.1 的死区，避免舍入噪声导致方向抖动
    pub fn from_change(change: f64) -> Self {
        if change > 0.1 {
            ChangeDirection::Up
        } else if change < -0.1 {
            ChangeDirection::Down
        } else {
            ChangeDirection::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeDirection::Up => "up",
            ChangeDirection::Down => "down",
            ChangeDirection::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockResult {
    pub price: f64,
    pub change: f64,
    pub change_direction: ChangeDirection,
    pub metrics: MetricScores,
    pub candlesticks: Vec<Candle>,
}

/// API payload: the account summary plus its stock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
    pub user: UserSummary,
    pub stock: StockResult,
}
