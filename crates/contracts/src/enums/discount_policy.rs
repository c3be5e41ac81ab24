use serde::{Deserialize, Serialize};

/// How flat discount fields and itemized `discountDetails` entries are combined.
///
/// Flat summary fields and itemized breakdowns are not guaranteed to be mutually
/// exclusive in every upstream payload shape. `Sum` can double-count when both are
/// present; `Max` can undercount when they describe different discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMergePolicy {
    /// flat + itemized
    #[default]
    Sum,
    /// max(flat, itemized), per discount bucket
    Max,
}

impl DiscountMergePolicy {
    pub fn code(&self) -> &'static str {
        match self {
            DiscountMergePolicy::Sum => "sum",
            DiscountMergePolicy::Max => "max",
        }
    }
}
