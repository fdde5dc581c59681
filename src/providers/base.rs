use crate::errors::Result;
use crate::models::stock::PriceSeries;
use async_trait::async_trait;

/// One price history lookup as sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: String,
    pub from: String,
    pub to: String,
}

impl HistoryRequest {
    /// `from` and `to` are always the same date string.
    pub fn for_date(symbol: &str, date: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            from: date.to_string(),
            to: date.to_string(),
        }
    }
}

/// Base trait for price history providers
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Short provider name used in logs
    fn provider_name(&self) -> &'static str;

    /// Fetch the intraday history for a symbol.
    /// An empty series means the provider does not know the symbol.
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceSeries>;
}
