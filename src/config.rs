use std::env;
use std::time::Duration;

use log::warn;

pub const API_KEY_ENV: &str = "FMP_API_KEY";
pub const BASE_URL_ENV: &str = "FMP_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com";

/// How the `from`/`to` query values are built from the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `YYYY-M-D` with a zero-based month and no padding, as the web app sent it.
    #[default]
    Legacy,
    /// ISO `YYYY-MM-DD`.
    Calendar,
}

/// What to do with a fetch completion whose request is no longer the latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Drop it; only the most recently issued request may update the state.
    #[default]
    Discard,
    /// Apply it anyway, whichever request resolves last wins.
    LastResolvedWins,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub request_timeout: Duration,
    pub date_style: DateStyle,
    pub stale_policy: StalePolicy,
    pub chart_width: u64,
    pub chart_height: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            date_style: DateStyle::Legacy,
            stale_policy: StalePolicy::Discard,
            chart_width: 600,
            chart_height: 400,
        }
    }

    /// 从环境变量读取配置，缺少 API key 时只记录警告
    pub fn from_env() -> Self {
        let mut config = Self::new();
        match env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => config.api_key = Some(key.trim().to_string()),
            _ => warn!("{} is not set, provider requests will most likely be rejected", API_KEY_ENV),
        }
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        config
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_date_style(mut self, date_style: DateStyle) -> Self {
        self.date_style = date_style;
        self
    }

    pub fn with_stale_policy(mut self, stale_policy: StalePolicy) -> Self {
        self.stale_policy = stale_policy;
        self
    }

    pub fn with_chart_size(mut self, width: u64, height: u64) -> Self {
        self.chart_width = width;
        self.chart_height = height;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
