//! 耗时格式化
//!
//! 按量级选择单位：
//! - 小于 1 毫秒：取整到微秒，单位 `μs`
//! - 1 毫秒到 1 秒：毫秒保留两位小数，单位 `ms`
//! - 1 秒及以上：秒保留两位小数，单位 `s`
//!
//! 舍入借助 `bigdecimal` 在十进制表示上进行（四舍五入，远离零），避免
//! `0.0000005` 这类值在二进制浮点下乘以 10^6 后落到 0.4999… 的问题。
//! 小数末尾的 0 不输出。

use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;

/// 把秒数格式化为带单位的字符串
///
/// ```
/// use query_logger::query::format_duration;
///
/// assert_eq!(format_duration(0.0000005), "1μs");
/// assert_eq!(format_duration(0.0025), "2.5ms");
/// assert_eq!(format_duration(1.5), "1.5s");
/// ```
pub fn format_duration(seconds: f64) -> String {
    // 负数、NaN 与无穷大没有意义，按 0 处理
    let seconds = if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 };

    if seconds < 0.001 {
        format!("{}μs", round_decimal(seconds, 1_000_000, 0))
    } else if seconds < 1.0 {
        format!("{}ms", round_decimal(seconds, 1_000, 2))
    } else {
        format!("{}s", round_decimal(seconds, 1, 2))
    }
}

/// 将 `value * scale` 在十进制上舍入到 `places` 位小数，去掉末尾的 0
fn round_decimal(value: f64, scale: i64, places: i64) -> String {
    // f64 的 Display 输出最短的可回读十进制表示，且不使用科学计数法
    let decimal = BigDecimal::from_str(&value.to_string()).unwrap_or_default();
    (decimal * BigDecimal::from(scale))
        .with_scale_round(places, RoundingMode::HalfUp)
        .normalized()
        .to_plain_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microseconds() {
        assert_eq!(format_duration(0.0), "0μs");
        assert_eq!(format_duration(0.0000005), "1μs");
        assert_eq!(format_duration(0.0000004), "0μs");
        assert_eq!(format_duration(0.000123), "123μs");
        assert_eq!(format_duration(0.0009995), "1000μs");
    }

    #[test]
    fn test_milliseconds() {
        assert_eq!(format_duration(0.001), "1ms");
        assert_eq!(format_duration(0.0025), "2.5ms");
        assert_eq!(format_duration(0.012345), "12.35ms");
        assert_eq!(format_duration(0.99999), "999.99ms");
        assert_eq!(format_duration(0.999996), "1000ms");
        assert_eq!(format_duration(0.12), "120ms");
    }

    #[test]
    fn test_seconds() {
        assert_eq!(format_duration(1.0), "1s");
        assert_eq!(format_duration(1.5), "1.5s");
        assert_eq!(format_duration(2.345), "2.35s");
        assert_eq!(format_duration(9.999), "10s");
        assert_eq!(format_duration(123.456), "123.46s");
        assert_eq!(format_duration(1.005), "1.01s");
        assert_eq!(format_duration(2.675), "2.68s");
        assert_eq!(format_duration(3600.0), "3600s");
    }

    #[test]
    fn test_suffix_and_sign() {
        let samples = [0.0, 1e-9, 0.0004, 0.001, 0.5, 0.999, 1.0, 3600.25];
        for d in samples {
            let label = format_duration(d);
            let (number, unit) = if let Some(n) = label.strip_suffix("μs") {
                (n, "μs")
            } else if let Some(n) = label.strip_suffix("ms") {
                (n, "ms")
            } else if let Some(n) = label.strip_suffix('s') {
                (n, "s")
            } else {
                panic!("未知单位: {label}");
            };
            let value: f64 = number.parse().unwrap();
            assert!(value >= 0.0, "{label}");
            let expected = if d < 0.001 {
                "μs"
            } else if d < 1.0 {
                "ms"
            } else {
                "s"
            };
            assert_eq!(unit, expected, "{label}");
        }
    }

    #[test]
    fn test_negative_clamped() {
        assert_eq!(format_duration(-1.0), "0μs");
        assert_eq!(format_duration(-0.0), "0μs");
        assert_eq!(format_duration(f64::NAN), "0μs");
        assert_eq!(format_duration(f64::INFINITY), "0μs");
        assert_eq!(format_duration(f64::NEG_INFINITY), "0μs");
    }
}
