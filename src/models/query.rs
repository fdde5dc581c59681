use std::fmt;
use std::str::FromStr;

use crate::errors::StockalyseError;

/// 可选的回看窗口（数据点数量）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayCount {
    #[default]
    Seven,
    Fourteen,
    TwentyOne,
    TwentyEight,
}

impl DayCount {
    pub const ALL: [DayCount; 4] = [
        DayCount::Seven,
        DayCount::Fourteen,
        DayCount::TwentyOne,
        DayCount::TwentyEight,
    ];

    pub fn get(self) -> usize {
        match self {
            DayCount::Seven => 7,
            DayCount::Fourteen => 14,
            DayCount::TwentyOne => 21,
            DayCount::TwentyEight => 28,
        }
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<usize> for DayCount {
    type Error = StockalyseError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        DayCount::ALL
            .into_iter()
            .find(|count| count.get() == value)
            .ok_or_else(|| {
                StockalyseError::ConfigError(format!(
                    "unsupported day count {}, expected one of 7, 14, 21, 28",
                    value
                ))
            })
    }
}

impl FromStr for DayCount {
    type Err = StockalyseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<usize>().map_err(|_| {
            StockalyseError::ConfigError(format!("day count must be a number, got '{}'", s.trim()))
        })?;
        DayCount::try_from(value)
    }
}

/// What the user asked for: a symbol (maybe none yet) and a lookback window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub symbol: Option<String>,
    pub day_count: DayCount,
}

impl Query {
    pub fn new(symbol: Option<String>) -> Self {
        Self {
            symbol,
            day_count: DayCount::default(),
        }
    }

    pub fn with_day_count(mut self, day_count: DayCount) -> Self {
        self.day_count = day_count;
        self
    }
}
