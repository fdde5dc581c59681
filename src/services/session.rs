use std::sync::Arc;

use log::{error, info};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::config::{Config, DateStyle};
use crate::models::query::{DayCount, Query};
use crate::providers::base::{HistoryRequest, PriceHistoryProvider};
use crate::state::{AppState, Completion, Event, FetchError, FetchRequest};
use crate::util;
use crate::view::View;

/// Completions of spawned fetches, in the order they resolve.
pub type Completions = UnboundedReceiver<Completion>;

/// 会话：持有当前状态，并把请求命令交给数据提供者执行
pub struct Session<P: PriceHistoryProvider + 'static> {
    provider: Arc<P>,
    date_style: DateStyle,
    state: AppState,
    sender: UnboundedSender<Completion>,
    requests_issued: usize,
}

impl<P: PriceHistoryProvider + 'static> Session<P> {
    /// Creates a session seeded with `query`. Fetch results arrive on the returned
    /// receiver and must be handed back through [`Session::complete`].
    pub fn new(provider: Arc<P>, config: &Config, query: Query) -> (Self, Completions) {
        let (sender, receiver) = unbounded_channel();
        let session = Self {
            provider,
            date_style: config.date_style,
            state: AppState::new(query, config.stale_policy),
            sender,
            requests_issued: 0,
        };
        (session, receiver)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> View {
        View::select(&self.state)
    }

    pub fn requests_issued(&self) -> usize {
        self.requests_issued
    }

    pub fn mount(&mut self) {
        self.dispatch(Event::Mounted);
    }

    pub fn submit_symbol(&mut self, raw: &str) {
        self.dispatch(Event::SymbolSubmitted(raw.to_string()));
    }

    pub fn select_day_count(&mut self, day_count: DayCount) {
        self.dispatch(Event::DayCountSelected(day_count));
    }

    pub fn complete(&mut self, completion: Completion) {
        self.dispatch(Event::FetchCompleted(completion));
    }

    fn dispatch(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        let transition = state.apply(event);
        self.state = transition.state;
        if let Some(request) = transition.fetch {
            self.spawn_fetch(request);
        }
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        self.requests_issued += 1;
        let date = util::request_date_string(util::today(), self.date_style);
        let history_request = HistoryRequest::for_date(&request.symbol, &date);
        let provider = Arc::clone(&self.provider);
        let sender = self.sender.clone();

        info!(
            "Request #{} for {} via {}",
            request.tag,
            request.symbol,
            provider.provider_name()
        );
        tokio::spawn(async move {
            let result = provider
                .fetch_history(&history_request)
                .await
                .map_err(|e| {
                    error!("Failed to fetch history for {}: {}", request.symbol, e);
                    FetchError::from(e)
                });
            let completion = Completion {
                tag: request.tag,
                symbol: request.symbol,
                result,
            };
            // 接收端已关闭说明会话已结束，结果直接丢弃
            let _ = sender.send(completion);
        });
    }
}
