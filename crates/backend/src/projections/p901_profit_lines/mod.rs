pub mod profit;

pub use profit::{calc_profit_for_line, profit_row, ProfitBreakdown, ReportSettings};
