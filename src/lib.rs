// 公开导出的模块，供外部使用
pub mod chart;
pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod state;
pub mod util;
pub mod view;

// 重新导出常用类型，方便使用
pub use config::{Config, DateStyle, StalePolicy};
pub use errors::{Result, StockalyseError};
pub use models::query::{DayCount, Query};
pub use models::stock::{ChartRow, PricePoint, PriceSeries};
pub use providers::{FmpClient, HistoryRequest, PriceHistoryProvider};
pub use services::Session;
pub use state::{AppState, FetchError, FetchState};
pub use view::View;
