pub mod base;
pub mod fmp;

pub use base::{HistoryRequest, PriceHistoryProvider};
pub use fmp::FmpClient;
