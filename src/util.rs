use chrono::NaiveDate;
use log::info;
use crate::models::stock::Candle;
use crate::errors::Result;

// 日期转换工具
pub fn parse_iso_date(date_str: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")?)
}

/// Rounds to two decimals the way `Number(x.toFixed(2))` does: the exact
/// binary value is rounded, and exact midpoints go away from zero.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // 只有 odd/8 形式的值才恰好落在两位小数的中点上，乘以8是精确的
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && (eighths % 2.0) != 0.0 {
        return (value * 100.0).round() / 100.0;
    }
    // 格式化走的是精确十进制展开
    format!("{:.2}", value).parse::<f64>().unwrap_or(value)
}

/// `log10(value + 1) / log10(reference)`, or 0 when the reference is degenerate
pub fn log_scale(value: f64, reference: f64) -> f64 {
    let denominator = reference.log10();
    if !(denominator > 0.0) {
        return 0.0;
    }
    (value.max(0.0) + 1.0).log10() / denominator
}

pub fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

// 限制显示的K线数量，保留最近的记录
pub fn latest_candles(candles: &[Candle], max_records: usize, login: &str) -> Vec<Candle> {
    if candles.len() > max_records {
        info!("Limiting {} candles to the latest {} for {}",
                 candles.len(), max_records, login);
        candles[candles.len() - max_records..].to_vec()
    } else {
        candles.to_vec()
    }
}

/// Fixed-width text rows for printing a candle series
pub fn format_candle_table(candles: &[Candle]) -> Vec<String> {
    let mut lines = Vec::with_capacity(candles.len() + 3);
    lines.push(format!("{:-<72}", ""));
    lines.push(format!("{:<12} {:<10} {:<10} {:<10} {:<10} {:<8} {:<6}",
                       "Date", "Open", "High", "Low", "Close", "Volume", "Green"));
    lines.push(format!("{:-<72}", ""));
    for candle in candles {
        lines.push(format!("{:<12} {:<10.2} {:<10.2} {:<10.2} {:<10.2} {:<8} {:<6}",
                           candle.date.format("%Y-%m-%d"), candle.open, candle.high,
                           candle.low, candle.close, candle.volume, candle.is_green));
    }
    lines
}
