pub mod repository;
pub mod service;

pub use service::{open_store, InMemorySkuCostStore, SkuCostStore, SqliteSkuCostStore};
