// ==========================================
// Excel 表格数据工具 - 日期解析
// ==========================================
// 职责: 按固定模式列表解析日期/时间字符串
// 说明: 三类入口共用同一模式列表，只在调用方的提示消息上区分精度
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// 日期时间模式（先试更长的，避免 "%H:%M" 吞掉秒）
const DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// 仅日期模式
const DATE_PATTERNS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y年%m月%d日"];

/// 仅时间模式
const TIME_PATTERNS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// 解析为日期时间
///
/// 依次尝试: 完整日期时间 → 仅日期（补零点） → 仅时间（补 1970-01-01）。
/// 全部失败返回 None，调用方自行决定提示消息。
pub fn to_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    for pattern in DATETIME_PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(dt);
        }
    }
    for pattern in DATE_PATTERNS {
        if let Ok(d) = NaiveDate::parse_from_str(value, pattern) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    for pattern in TIME_PATTERNS {
        if let Ok(t) = NaiveTime::parse_from_str(value, pattern) {
            return NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(t));
        }
    }
    None
}

/// 解析为日期（截断到天）
pub fn to_date(value: &str) -> Option<NaiveDate> {
    to_datetime(value).map(|dt| dt.date())
}

/// 解析为时刻
pub fn to_time(value: &str) -> Option<NaiveTime> {
    to_datetime(value).map(|dt| dt.time())
}

/// 导出用格式化: 日期
pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y/%m/%d").to_string()
}

/// 导出用格式化: 日期时间
pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y/%m/%d %H:%M:%S").to_string()
}

/// 导出用格式化: 时刻
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_datetime_full() {
        let dt = to_datetime("2024-03-05 08:30:15").unwrap();
        assert_eq!(format_datetime(dt), "2024/03/05 08:30:15");
    }

    #[test]
    fn test_to_datetime_with_millis() {
        assert!(to_datetime("2024-03-05 08:30:15.250").is_some());
    }

    #[test]
    fn test_to_datetime_slash_unpadded() {
        let dt = to_datetime("2024/3/5 8:30").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_to_datetime_chinese_date() {
        let d = to_date("2024年3月5日").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_to_date_truncates_time() {
        let d = to_date("2024-03-05 23:59:59").unwrap();
        assert_eq!(format_date(d), "2024/03/05");
    }

    #[test]
    fn test_to_time_only() {
        let t = to_time("08:30").unwrap();
        assert_eq!(format_time(t), "08:30:00");
    }

    #[test]
    fn test_invalid_strings() {
        assert!(to_datetime("abc").is_none());
        assert!(to_datetime("2024-13-01").is_none());
        assert!(to_date("").is_none());
    }
}
