pub mod csv;
pub mod rest;

pub use csv::CsvSource;
pub use rest::RestSource;

/// 把 vendor 端各種價格寫法正規化成 Shopify money 字串
///
/// 處理逗號小數（"12,34"）、千分位（"1.234,56"）、貨幣符號與空白。
pub(crate) fn normalize_price(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // 兩種分隔都有：最右邊的是小數點，另一個是千分位
        (Some(comma), Some(dot)) => {
            if comma > dot {
                cleaned.replace('.', "").replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        // 只有逗號：當小數點
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| format!("{:.2}", v))
}

pub(crate) fn price_from_json(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|v| format!("{:.2}", v)),
        serde_json::Value::String(s) => normalize_price(s),
        _ => None,
    }
}

/// 數量解析失敗一律當 0，寧可同步成缺貨也不要整列失敗
pub(crate) fn parse_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return n;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map(|v| v.round() as i64)
        .unwrap_or(0)
}

pub(crate) fn quantity_from_json(value: &serde_json::Value) -> i64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|v| v.round() as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => parse_quantity(s),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_price_plain() {
        assert_eq!(normalize_price("12.34").as_deref(), Some("12.34"));
        assert_eq!(normalize_price("12").as_deref(), Some("12.00"));
        assert_eq!(normalize_price(" 9.9 ").as_deref(), Some("9.90"));
    }

    #[test]
    fn test_normalize_price_decimal_comma() {
        assert_eq!(normalize_price("12,34").as_deref(), Some("12.34"));
        assert_eq!(normalize_price("€ 12,34").as_deref(), Some("12.34"));
    }

    #[test]
    fn test_normalize_price_thousands_separators() {
        assert_eq!(normalize_price("1.234,56").as_deref(), Some("1234.56"));
        assert_eq!(normalize_price("1,234.56").as_deref(), Some("1234.56"));
    }

    #[test]
    fn test_normalize_price_garbage() {
        assert_eq!(normalize_price(""), None);
        assert_eq!(normalize_price("n/a"), None);
        assert_eq!(normalize_price("-"), None);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity("3.0"), 3);
        assert_eq!(parse_quantity("2,7"), 3);
        assert_eq!(parse_quantity("-1"), -1);
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("unknown"), 0);
    }

    #[test]
    fn test_quantity_from_json() {
        assert_eq!(quantity_from_json(&serde_json::json!(7)), 7);
        assert_eq!(quantity_from_json(&serde_json::json!(7.6)), 8);
        assert_eq!(quantity_from_json(&serde_json::json!("12")), 12);
        assert_eq!(quantity_from_json(&serde_json::json!(null)), 0);
    }

    #[test]
    fn test_price_from_json() {
        assert_eq!(
            price_from_json(&serde_json::json!(19.9)).as_deref(),
            Some("19.90")
        );
        assert_eq!(
            price_from_json(&serde_json::json!("19,90")).as_deref(),
            Some("19.90")
        );
        assert_eq!(price_from_json(&serde_json::json!(true)), None);
    }
}
