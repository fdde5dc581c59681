use chrono::{Datelike, Local, NaiveDate};
use log::debug;
use url::Url;

use crate::config::DateStyle;
use crate::errors::Result;

// 请求日期字符串
pub fn request_date_string(date: NaiveDate, style: DateStyle) -> String {
    match style {
        // 月份从0开始且不补零，与网页版发送的参数一致
        DateStyle::Legacy => format!("{}-{}-{}", date.year(), date.month0(), date.day()),
        DateStyle::Calendar => date.format("%Y-%m-%d").to_string(),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Trims a user supplied symbol; blank input means "no symbol".
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        None
    } else {
        Some(symbol.to_string())
    }
}

/// Reads the `symbol` query parameter from a page URL.
///
/// Accepts absolute URLs as well as a bare query string such as `?symbol=AAPL`.
pub fn symbol_from_url(raw: &str) -> Result<Option<String>> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost/")?.join(raw)?,
        Err(e) => return Err(e.into()),
    };

    let symbol = url
        .query_pairs()
        .find(|(key, _)| key == "symbol")
        .and_then(|(_, value)| normalize_symbol(&value));
    debug!("Symbol from URL {}: {:?}", raw, symbol);
    Ok(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_date_uses_zero_based_month_without_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(request_date_string(date, DateStyle::Legacy), "2024-0-5");

        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(request_date_string(date, DateStyle::Legacy), "2026-9-19");
    }

    #[test]
    fn calendar_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(request_date_string(date, DateStyle::Calendar), "2024-01-05");
    }

    #[test]
    fn normalizes_blank_symbols_to_none() {
        assert_eq!(normalize_symbol("  AAPL "), Some("AAPL".to_string()));
        assert_eq!(normalize_symbol("   "), None);
        assert_eq!(normalize_symbol(""), None);
    }

    #[test]
    fn reads_symbol_from_absolute_url() {
        let symbol = symbol_from_url("https://stockalyse.local/?symbol=MSFT&foo=1").unwrap();
        assert_eq!(symbol, Some("MSFT".to_string()));
    }

    #[test]
    fn reads_symbol_from_bare_query_string() {
        assert_eq!(symbol_from_url("?symbol=TSLA").unwrap(), Some("TSLA".to_string()));
        assert_eq!(symbol_from_url("?other=1").unwrap(), None);
        assert_eq!(symbol_from_url("?symbol=").unwrap(), None);
    }

    #[test]
    fn decodes_percent_encoded_symbol() {
        let symbol = symbol_from_url("http://localhost/?symbol=BRK%2EB").unwrap();
        assert_eq!(symbol, Some("BRK.B".to_string()));
    }
}
