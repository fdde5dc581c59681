pub mod query;
pub mod stock;
