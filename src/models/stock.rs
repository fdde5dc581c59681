use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 单条行情数据，只保留日期和收盘价
///
/// The provider also sends open/high/low/volume; serde ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    pub close: f64,
}

/// Price history in the order the provider returned it.
pub type PriceSeries = Vec<PricePoint>;

/// One plotted point of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartRow {
    pub date: NaiveDateTime,
    pub close: f64,
}

impl From<&PricePoint> for ChartRow {
    fn from(point: &PricePoint) -> Self {
        Self {
            date: point.date,
            close: point.close,
        }
    }
}

/// Timestamp (de)serialization for provider records.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    /// Parses the provider's `YYYY-MM-DD HH:MM:SS`, plus the ISO and date-only variants.
    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        let raw = raw.trim();
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, FORMAT) {
            return Ok(ts);
        }
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, ISO_FORMAT) {
            return Ok(ts);
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Ok(ts.naive_utc());
        }
        // 只有日期时按零点处理
        NaiveDateTime::parse_from_str(&format!("{} 00:00:00", raw), FORMAT)
    }

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
