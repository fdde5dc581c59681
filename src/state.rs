//! UI state and its transitions.
//!
//! Every event replaces the whole [`AppState`]; a transition may ask the caller
//! to start one fetch. Nothing here performs I/O.

use log::{debug, warn};
use serde::Serialize;

use crate::config::StalePolicy;
use crate::errors::StockalyseError;
use crate::models::query::{DayCount, Query};
use crate::models::stock::PriceSeries;
use crate::util::normalize_symbol;

/// Identifies one issued fetch.
pub type RequestTag = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Network,
    Status,
    Decode,
    Provider,
    Other,
}

/// A failed fetch, kept in the state and shown verbatim as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"message\":{:?}}}", self.message))
    }
}

impl From<&StockalyseError> for FetchError {
    fn from(error: &StockalyseError) -> Self {
        let kind = match error {
            StockalyseError::RequestError(_) | StockalyseError::IoError(_) => FailureKind::Network,
            StockalyseError::HttpStatus { .. } => FailureKind::Status,
            StockalyseError::JsonError(_) | StockalyseError::DateError(_) => FailureKind::Decode,
            StockalyseError::ProviderError(_) => FailureKind::Provider,
            _ => FailureKind::Other,
        };
        FetchError::new(kind, error.to_string())
    }
}

impl From<StockalyseError> for FetchError {
    fn from(error: StockalyseError) -> Self {
        FetchError::from(&error)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded(PriceSeries),
    /// The provider answered with no records: the symbol does not exist.
    Empty,
    Failed(FetchError),
}

/// Command produced by a transition: fetch history for `symbol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub tag: RequestTag,
    pub symbol: String,
}

/// Result of a fetch, fed back into the state.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub tag: RequestTag,
    pub symbol: String,
    pub result: Result<PriceSeries, FetchError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Mounted,
    SymbolSubmitted(String),
    DayCountSelected(DayCount),
    FetchCompleted(Completion),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub query: Query,
    pub fetch: FetchState,
    pub stale_policy: StalePolicy,
    /// Tag of the most recently issued request still awaiting its completion.
    pub pending: Option<RequestTag>,
    next_tag: RequestTag,
}

/// The next state plus at most one fetch to start.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AppState,
    pub fetch: Option<FetchRequest>,
}

impl Transition {
    fn stay(state: AppState) -> Self {
        Self { state, fetch: None }
    }
}

impl AppState {
    pub fn new(query: Query, stale_policy: StalePolicy) -> Self {
        Self {
            query,
            fetch: FetchState::Idle,
            stale_policy,
            pending: None,
            next_tag: 1,
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        self.query.symbol.as_deref()
    }

    pub fn day_count(&self) -> DayCount {
        self.query.day_count
    }

    pub fn apply(self, event: Event) -> Transition {
        match event {
            Event::Mounted => self.start_fetch(),
            Event::SymbolSubmitted(raw) => {
                let symbol = normalize_symbol(&raw);
                AppState {
                    query: Query { symbol, ..self.query.clone() },
                    ..self
                }
                .start_fetch()
            }
            Event::DayCountSelected(day_count) => Transition::stay(AppState {
                query: Query { day_count, ..self.query.clone() },
                ..self
            }),
            Event::FetchCompleted(completion) => self.complete(completion),
        }
    }

    // symbol 为空时不发请求，回到 Idle
    fn start_fetch(self) -> Transition {
        let Some(symbol) = self.query.symbol.clone() else {
            return Transition::stay(AppState {
                fetch: FetchState::Idle,
                pending: None,
                ..self
            });
        };

        let tag = self.next_tag;
        debug!("Issuing request #{} for {}", tag, symbol);
        Transition {
            state: AppState {
                fetch: FetchState::Loading,
                pending: Some(tag),
                next_tag: tag + 1,
                ..self
            },
            fetch: Some(FetchRequest { tag, symbol }),
        }
    }

    fn complete(self, completion: Completion) -> Transition {
        let is_latest = self.pending == Some(completion.tag);
        if !is_latest && self.stale_policy == StalePolicy::Discard {
            warn!(
                "Discarding stale response #{} for {} (waiting for {:?})",
                completion.tag, completion.symbol, self.pending
            );
            return Transition::stay(self);
        }

        let pending = if is_latest { None } else { self.pending };
        let state = match completion.result {
            // 代码已被清空时，迟到的空结果不再显示“未找到”
            Ok(series) if series.is_empty() && self.query.symbol.is_none() => AppState {
                fetch: FetchState::Idle,
                pending,
                ..self
            },
            Ok(series) if series.is_empty() => AppState {
                query: Query { symbol: None, ..self.query.clone() },
                fetch: FetchState::Empty,
                pending,
                ..self
            },
            Ok(series) => AppState {
                fetch: FetchState::Loaded(series),
                pending,
                ..self
            },
            Err(error) => AppState {
                fetch: FetchState::Failed(error),
                pending,
                ..self
            },
        };
        Transition::stay(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stock::PricePoint;
    use chrono::NaiveDate;

    fn series(len: usize) -> PriceSeries {
        (0..len)
            .map(|i| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    + chrono::Duration::hours(4 * i as i64),
                close: 100.0 + i as f64,
            })
            .collect()
    }

    fn mounted(symbol: Option<&str>, policy: StalePolicy) -> Transition {
        AppState::new(Query::new(symbol.map(str::to_string)), policy).apply(Event::Mounted)
    }

    fn completed(tag: RequestTag, symbol: &str, result: Result<PriceSeries, FetchError>) -> Event {
        Event::FetchCompleted(Completion {
            tag,
            symbol: symbol.to_string(),
            result,
        })
    }

    #[test]
    fn mount_without_symbol_issues_nothing() {
        let transition = mounted(None, StalePolicy::Discard);
        assert_eq!(transition.fetch, None);
        assert_eq!(transition.state.fetch, FetchState::Idle);
    }

    #[test]
    fn mount_with_symbol_starts_loading() {
        let transition = mounted(Some("AAPL"), StalePolicy::Discard);
        assert_eq!(
            transition.fetch,
            Some(FetchRequest { tag: 1, symbol: "AAPL".to_string() })
        );
        assert_eq!(transition.state.fetch, FetchState::Loading);
        assert_eq!(transition.state.pending, Some(1));
    }

    #[test]
    fn non_empty_completion_loads_series() {
        let state = mounted(Some("AAPL"), StalePolicy::Discard).state;
        let state = state.apply(completed(1, "AAPL", Ok(series(3)))).state;
        assert_eq!(state.fetch, FetchState::Loaded(series(3)));
        assert_eq!(state.pending, None);
        assert_eq!(state.symbol(), Some("AAPL"));
    }

    #[test]
    fn empty_completion_resets_symbol() {
        let state = mounted(Some("ZZZZ"), StalePolicy::Discard).state;
        let transition = state.apply(completed(1, "ZZZZ", Ok(Vec::new())));
        assert_eq!(transition.fetch, None);
        assert_eq!(transition.state.fetch, FetchState::Empty);
        assert_eq!(transition.state.symbol(), None);
    }

    #[test]
    fn failure_replaces_loaded_chart() {
        let state = mounted(Some("AAPL"), StalePolicy::Discard).state;
        let state = state.apply(completed(1, "AAPL", Ok(series(7)))).state;
        let transition = state.apply(Event::SymbolSubmitted("MSFT".to_string()));
        let error = FetchError::new(FailureKind::Network, "connection refused");
        let state = transition.state.apply(completed(2, "MSFT", Err(error.clone()))).state;
        assert_eq!(state.fetch, FetchState::Failed(error));
    }

    #[test]
    fn day_count_change_never_fetches() {
        let state = mounted(Some("AAPL"), StalePolicy::Discard).state;
        let state = state.apply(completed(1, "AAPL", Ok(series(30)))).state;
        for day_count in DayCount::ALL {
            let transition = state.clone().apply(Event::DayCountSelected(day_count));
            assert_eq!(transition.fetch, None);
            assert_eq!(transition.state.day_count(), day_count);
            assert_eq!(transition.state.fetch, FetchState::Loaded(series(30)));
        }
    }

    #[test]
    fn submission_clears_chart_and_fetches_once() {
        let state = mounted(Some("AAPL"), StalePolicy::Discard).state;
        let state = state.apply(completed(1, "AAPL", Ok(series(7)))).state;
        let transition = state.apply(Event::SymbolSubmitted(" MSFT ".to_string()));
        assert_eq!(
            transition.fetch,
            Some(FetchRequest { tag: 2, symbol: "MSFT".to_string() })
        );
        assert_eq!(transition.state.fetch, FetchState::Loading);
        assert_eq!(transition.state.symbol(), Some("MSFT"));
    }

    #[test]
    fn resubmitting_same_symbol_fetches_again() {
        let state = mounted(Some("AAPL"), StalePolicy::Discard).state;
        let state = state.apply(completed(1, "AAPL", Ok(series(7)))).state;
        let transition = state.apply(Event::SymbolSubmitted("AAPL".to_string()));
        assert_eq!(transition.fetch.map(|request| request.tag), Some(2));
    }

    #[test]
    fn submission_retries_after_failure() {
        let state = mounted(Some("AAPL"), StalePolicy::Discard).state;
        let error = FetchError::new(FailureKind::Network, "timeout");
        let state = state.apply(completed(1, "AAPL", Err(error))).state;
        let transition = state.apply(Event::SymbolSubmitted("AAPL".to_string()));
        assert_eq!(transition.state.fetch, FetchState::Loading);
        assert!(transition.fetch.is_some());
    }

    #[test]
    fn blank_submission_clears_symbol_without_fetch() {
        let state = mounted(Some("AAPL"), StalePolicy::Discard).state;
        let transition = state.apply(Event::SymbolSubmitted("   ".to_string()));
        assert_eq!(transition.fetch, None);
        assert_eq!(transition.state.symbol(), None);
        assert_eq!(transition.state.fetch, FetchState::Idle);
        assert_eq!(transition.state.pending, None);
    }

    // 过期响应：默认丢弃，只认最后一次请求
    #[test]
    fn stale_completion_is_discarded_by_default() {
        let state = mounted(Some("AAPL"), StalePolicy::Discard).state;
        let state = state.apply(Event::SymbolSubmitted("MSFT".to_string())).state;
        let state = state.apply(completed(2, "MSFT", Ok(series(2)))).state;
        let state = state.apply(completed(1, "AAPL", Ok(series(5)))).state;
        assert_eq!(state.fetch, FetchState::Loaded(series(2)));
        assert_eq!(state.symbol(), Some("MSFT"));
    }

    // 兼容模式：最后返回的响应覆盖状态
    #[test]
    fn stale_completion_overwrites_under_last_resolved_wins() {
        let state = mounted(Some("AAPL"), StalePolicy::LastResolvedWins).state;
        let state = state.apply(Event::SymbolSubmitted("MSFT".to_string())).state;
        let state = state.apply(completed(2, "MSFT", Ok(series(2)))).state;
        let state = state.apply(completed(1, "AAPL", Ok(series(5)))).state;
        assert_eq!(state.fetch, FetchState::Loaded(series(5)));
        assert_eq!(state.symbol(), Some("MSFT"));
    }

    #[test]
    fn stale_completion_before_latest_keeps_waiting_for_latest() {
        let state = mounted(Some("AAPL"), StalePolicy::LastResolvedWins).state;
        let state = state.apply(Event::SymbolSubmitted("MSFT".to_string())).state;
        let state = state.apply(completed(1, "AAPL", Ok(series(5)))).state;
        assert_eq!(state.pending, Some(2));
        let state = state.apply(completed(2, "MSFT", Ok(series(2)))).state;
        assert_eq!(state.pending, None);
        assert_eq!(state.fetch, FetchState::Loaded(series(2)));
    }

    #[test]
    fn late_empty_result_after_blank_submission_keeps_no_stock() {
        let state = mounted(Some("ZZZZ"), StalePolicy::LastResolvedWins).state;
        let state = state.apply(Event::SymbolSubmitted("  ".to_string())).state;
        let state = state.apply(completed(1, "ZZZZ", Ok(Vec::new()))).state;
        assert_eq!(state.symbol(), None);
        assert_eq!(state.fetch, FetchState::Idle);
    }

    #[test]
    fn fetch_error_serializes_as_json() {
        let error = FetchError::new(FailureKind::Network, "connection refused");
        assert_eq!(
            error.to_json(),
            r#"{"kind":"network","message":"connection refused"}"#
        );
    }

    #[test]
    fn maps_crate_errors_to_failure_kinds() {
        let status = StockalyseError::HttpStatus { status: 500, body: "boom".to_string() };
        assert_eq!(FetchError::from(&status).kind, FailureKind::Status);
        let provider = StockalyseError::ProviderError("Invalid API KEY".to_string());
        assert_eq!(FetchError::from(provider).kind, FailureKind::Provider);
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(FetchError::from(StockalyseError::from(json)).kind, FailureKind::Decode);
    }
}
