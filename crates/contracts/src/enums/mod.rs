pub mod cargo_rounding;
pub mod discount_policy;

pub use cargo_rounding::CargoRounding;
pub use discount_policy::DiscountMergePolicy;
