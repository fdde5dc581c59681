use crate::config::Config;
use crate::errors::{Result, StockalyseError};
use crate::models::stock::{PricePoint, PriceSeries};
use crate::providers::base::{HistoryRequest, PriceHistoryProvider};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;
use url::Url;

const HISTORY_PATH: [&str; 4] = ["api", "v3", "historical-chart", "4hour"];
const MAX_ERROR_BODY: usize = 200;

/// Financial Modeling Prep 4 小时行情客户端
pub struct FmpClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl FmpClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(StockalyseError::RequestError)?;

        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(StockalyseError::ConfigError(format!(
                "base url {} cannot carry a path",
                config.base_url
            )));
        }

        if config.api_key.is_none() {
            warn!("No API key configured, requests are sent without one");
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Builds `{base}/api/v3/historical-chart/4hour/{symbol}?from=..&to=..&apikey=..`.
    pub fn history_url(&self, request: &HistoryRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StockalyseError::ConfigError(format!("base url {} cannot carry a path", self.base_url))
            })?;
            segments
                .pop_if_empty()
                .extend(&HISTORY_PATH)
                .push(&request.symbol);
        }
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("from", &request.from)
                .append_pair("to", &request.to);
            if let Some(api_key) = &self.api_key {
                query.append_pair("apikey", api_key);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl PriceHistoryProvider for FmpClient {
    fn provider_name(&self) -> &'static str {
        "FMP"
    }

    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceSeries> {
        info!("获取 {} 的行情数据 ({} - {})", request.symbol, request.from, request.to);
        let url = self.history_url(request)?;

        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(StockalyseError::RequestError)?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("{} responded with status {} ({} bytes)", request.symbol, status, body.len());

        let series = parse_history_body(status, &body)?;
        debug!("获取到 {} 条行情记录", series.len());
        Ok(series)
    }
}

/// Classifies a provider response.
///
/// Non-2xx statuses and error-shaped JSON objects (`{"Error Message": ...}`) are
/// failures. A JSON array is the history; an empty one means the symbol is unknown.
pub fn parse_history_body(status: u16, body: &str) -> Result<PriceSeries> {
    if !(200..300).contains(&status) {
        return Err(StockalyseError::HttpStatus {
            status,
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        });
    }

    let json: Value = serde_json::from_str(body)?;
    match json {
        Value::Array(records) => records
            .into_iter()
            .map(|record| serde_json::from_value::<PricePoint>(record).map_err(StockalyseError::from))
            .collect(),
        // 空对象与空数组一样，表示代码不存在
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        Value::Object(map) => {
            let message = map
                .get("Error Message")
                .or_else(|| map.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string);
            let message = match message {
                Some(message) => message,
                None => Value::Object(map).to_string(),
            };
            Err(StockalyseError::ProviderError(message))
        }
        other => Err(StockalyseError::ProviderError(format!(
            "unexpected response: {}",
            other
        ))),
    }
}
