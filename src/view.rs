use std::fmt;

use crate::chart::{chart_rows, chart_title, AXIS_DATE_FORMAT, SERIES_LABEL};
use crate::models::query::DayCount;
use crate::models::stock::ChartRow;
use crate::state::{AppState, FetchError, FetchState};

pub const APP_NAME: &str = "Stockalyse";
pub const NO_STOCK: &str = "No Stock defined";
pub const NOT_FOUND: &str = "Stock couldn't be found!";
pub const LOADING: &str = "Loading...";

/// The one screen shown for a given state.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    NoStock,
    NotFound,
    Error(FetchError),
    Report {
        symbol: String,
        day_count: DayCount,
        rows: Vec<ChartRow>,
    },
    Loading,
}

impl View {
    /// Picks the view for `state`; the first matching rule wins.
    pub fn select(state: &AppState) -> Self {
        if state.fetch == FetchState::Empty {
            return View::NotFound;
        }
        let Some(symbol) = state.symbol() else {
            return View::NoStock;
        };
        match &state.fetch {
            FetchState::Failed(error) => View::Error(error.clone()),
            FetchState::Loaded(series) if !series.is_empty() => View::Report {
                symbol: symbol.to_string(),
                day_count: state.day_count(),
                rows: chart_rows(series, state.day_count()),
            },
            _ => View::Loading,
        }
    }

    pub fn title(&self) -> Option<String> {
        match self {
            View::Report { symbol, day_count, .. } => Some(chart_title(symbol, *day_count)),
            _ => None,
        }
    }
}

fn write_header(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", APP_NAME)?;
    writeln!(f, "{:=<1$}", "", APP_NAME.len())?;
    writeln!(f, "Symbol: type a ticker and press Enter")?;
    writeln!(f)
}

fn write_selector(f: &mut fmt::Formatter<'_>, selected: DayCount) -> fmt::Result {
    write!(f, "Timeframe:")?;
    for day_count in DayCount::ALL {
        if day_count == selected {
            write!(f, " [{} Days]", day_count)?;
        } else {
            write!(f, " {} Days", day_count)?;
        }
    }
    writeln!(f)
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // 出错时只输出原始错误，不带页头
            View::Error(error) => writeln!(f, "{}", error.to_json()),
            View::NoStock => {
                write_header(f)?;
                writeln!(f, "{}", NO_STOCK)
            }
            View::NotFound => {
                write_header(f)?;
                writeln!(f, "{}", NOT_FOUND)
            }
            View::Loading => {
                write_header(f)?;
                writeln!(f, "{}", LOADING)
            }
            View::Report { symbol, day_count, rows } => {
                write_header(f)?;
                writeln!(f, "Stock: {}", symbol)?;
                writeln!(f, "{}", chart_title(symbol, *day_count))?;
                writeln!(f, "{:-<30}", "")?;
                writeln!(f, "{:<12} {:>12}", "Date", SERIES_LABEL)?;
                for row in rows {
                    writeln!(
                        f,
                        "{:<12} {:>12.2}",
                        row.date.format(AXIS_DATE_FORMAT).to_string(),
                        row.close
                    )?;
                }
                writeln!(f, "{:-<30}", "")?;
                write_selector(f, *day_count)
            }
        }
    }
}
