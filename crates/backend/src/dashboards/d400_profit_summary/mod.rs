pub mod aggregation;
pub mod export;
pub mod service;

pub use aggregation::{aggregate_order, aggregate_period, PeriodReport, PeriodTotals};
pub use service::ReportError;
